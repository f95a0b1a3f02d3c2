use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Int128;

/// Number of decimals of every USD value the auction house works with.
pub const USD_DECIMALS: u32 = 8;

/// Query interface the auction house expects from the price oracle contract.
///
/// Assets are keyed by their native denom or by their cw20 contract address.
#[cw_serde]
#[derive(QueryResponses)]
pub enum OracleQueryMsg {
    /// Whether a price feed has been registered for the asset
    #[returns(FeedConfiguredResponse)]
    FeedConfigured {
        asset: String,
    },
    /// Latest answer of the asset's feed, `None` if no feed is registered
    #[returns(LatestPriceResponse)]
    LatestPrice {
        asset: String,
    },
}

#[cw_serde]
pub struct FeedConfiguredResponse {
    pub configured: bool,
}

#[cw_serde]
pub struct LatestPriceResponse {
    pub price: Option<PriceData>,
}

#[cw_serde]
/// A single USD answer reported by a feed
pub struct PriceData {
    /// USD price of one whole unit of the asset. Feeds may report non-positive values.
    pub price: Int128,
    /// Number of decimals of `price`
    pub decimals: u8,
    /// Block time (seconds) at which the answer was reported
    pub updated_at: u64,
}
