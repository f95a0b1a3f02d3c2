pub mod auction_house;
pub mod price_oracle;
