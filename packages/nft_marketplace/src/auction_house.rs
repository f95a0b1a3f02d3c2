use std::fmt;

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};
use cw20::Cw20ReceiveMsg;
use cw721::Cw721ReceiveMsg;
use cw_ownable::{cw_ownable_execute, cw_ownable_query};

#[cw_serde]
pub struct InstantiateMsg {
    /// Owner of the contract, defaults to the instantiator
    pub owner: Option<String>,
    /// Address receiving the marketplace fees
    pub fee_recipient: String,
    /// Price oracle contract used to value bids in USD
    pub oracle: String,
    /// Native denom accepted for native auctions
    pub native_denom: String,
    /// Decimals of the native denom, used to value native bids
    pub native_decimals: u8,
    /// Max age of an oracle answer in seconds, defaults to one hour
    pub max_price_age: Option<u64>,
}

#[cw_ownable_execute]
#[cw_serde]
pub enum ExecuteMsg {
    /// Lists an NFT for auction. The contract must be approved to transfer the token.
    CreateAuction {
        /// The cw721 contract of the NFT
        nft_contract: String,
        /// The NFT being auctioned
        token_id: String,
        /// The first bid has to be strictly higher than this price
        start_price: Uint128,
        /// Auction length in seconds
        duration: u64,
        /// cw20 contract the auction is paid in. `None` for the native denom.
        payment_token: Option<String>,
    },
    /// Lists an NFT sent through cw721 `SendNft`, `msg` being a [`ReceiveNftMsg`]
    ReceiveNft(Cw721ReceiveMsg),
    /// Bids on a native auction with the funds attached
    Bid {
        auction_id: u64,
    },
    /// Bids on a cw20 auction. The contract must have an allowance for `amount`.
    BidWithToken {
        auction_id: u64,
        amount: Uint128,
    },
    /// Bids on a cw20 auction through cw20 `Send`, `msg` being a [`ReceiveTokenMsg`]
    Receive(Cw20ReceiveMsg),
    /// Settles an expired auction. Callable by the seller or the owner.
    EndAuction {
        auction_id: u64,
    },
    /// Terminates an auction early, refunding the highest bidder. Owner only.
    EmergencyCancel {
        auction_id: u64,
    },
    /// Replaces the whole fee tier schedule. Owner only.
    SetFeeTiers {
        tiers: Vec<FeeTier>,
    },
    /// USD value (8 decimals) under which the default fee applies. Owner only.
    SetMinUsdValue {
        value: Uint128,
    },
    /// Fee applied under the minimum USD value or outside every tier. Owner only.
    SetDefaultPlatformFee {
        fee_bps: u16,
    },
    /// Owner only.
    SetFeeRecipient {
        address: String,
    },
    /// Owner only.
    UpdateConfig {
        oracle: Option<String>,
        max_price_age: Option<u64>,
    },
}

/// Hook message attached to cw721 `SendNft`
#[cw_serde]
pub enum ReceiveNftMsg {
    CreateAuction {
        start_price: Uint128,
        duration: u64,
        payment_token: Option<String>,
    },
}

/// Hook message attached to cw20 `Send`
#[cw_serde]
pub enum ReceiveTokenMsg {
    Bid {
        auction_id: u64,
    },
}

#[cw_ownable_query]
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(FeeSchedule)]
    FeeSchedule {},
    #[returns(Auction)]
    Auction {
        auction_id: u64,
    },
    /// Ids of the auctions that are not ended and not expired
    #[returns(Vec<u64>)]
    ActiveAuctions {},
    /// Every auction, in id order
    #[returns(AuctionsResponse)]
    Auctions {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// Fee that would be charged if the auction settled at its current highest bid
    #[returns(PlatformFeeResponse)]
    PlatformFee {
        auction_id: u64,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
/// Config of the contract
pub struct Config {
    /// Address receiving the marketplace fees
    pub fee_recipient: Addr,
    /// Price oracle contract
    pub oracle: Addr,
    /// Native denom accepted for native auctions
    pub native_denom: String,
    /// Decimals of the native denom
    pub native_decimals: u8,
    /// Max age of an oracle answer in seconds
    pub max_price_age: u64,
}

#[cw_serde]
/// The currency an auction is denominated in
pub enum PaymentAsset {
    /// The configured native denom
    Native,
    /// A cw20 token contract
    Cw20(Addr),
}

impl PaymentAsset {
    /// Key identifying the asset in the price oracle
    pub fn oracle_key(&self, native_denom: &str) -> String {
        match self {
            PaymentAsset::Native => native_denom.to_string(),
            PaymentAsset::Cw20(token) => token.to_string(),
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, PaymentAsset::Native)
    }
}

impl fmt::Display for PaymentAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentAsset::Native => write!(f, "native"),
            PaymentAsset::Cw20(token) => write!(f, "cw20:{}", token),
        }
    }
}

#[cw_serde]
pub struct Auction {
    /// Owner of the NFT at creation time
    pub seller: Addr,
    pub nft_contract: Addr,
    pub token_id: String,
    /// Block time (seconds) at creation
    pub start_time: u64,
    /// Bids are accepted until this time (inclusive)
    pub end_time: u64,
    pub start_price: Uint128,
    pub payment_asset: PaymentAsset,
    /// Set once a bid has been accepted
    pub highest_bidder: Option<Addr>,
    /// Equals `start_price` until the first bid
    pub highest_bid: Uint128,
    pub ended: bool,
}

#[cw_serde]
/// USD bracket `[min_usd, max_usd)` charged `fee_bps`. USD values have 8 decimals.
pub struct FeeTier {
    pub min_usd: Uint128,
    pub max_usd: Uint128,
    pub fee_bps: u16,
}

#[cw_serde]
pub struct FeeSchedule {
    /// Sorted, non-overlapping tiers
    pub tiers: Vec<FeeTier>,
    /// Applied under `min_usd_threshold` and when no tier matches
    pub default_fee_bps: u16,
    pub min_usd_threshold: Uint128,
}

#[cw_serde]
pub struct AuctionsResponse {
    pub auctions: Vec<AuctionEntry>,
}

#[cw_serde]
pub struct AuctionEntry {
    pub auction_id: u64,
    pub auction: Auction,
}

#[cw_serde]
pub struct PlatformFeeResponse {
    pub fee_amount: Uint128,
    pub fee_bps: u16,
}
