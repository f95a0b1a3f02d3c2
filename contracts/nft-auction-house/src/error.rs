use cosmwasm_std::{
    ConversionOverflowError, DivideByZeroError, OverflowError, StdError, Uint128,
};
use cw_ownable::OwnershipError;
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    PaymentError(#[from] PaymentError),

    #[error(transparent)]
    Ownership(#[from] OwnershipError),

    #[error("Overflow error: {0}")]
    OverflowError(#[from] OverflowError),

    #[error("{0}")]
    ConversionOverflowError(#[from] ConversionOverflowError),

    #[error("{0}")]
    DivideByZeroError(#[from] DivideByZeroError),

    #[error("Not authorized")]
    NotAuthorized {},

    #[error("Reentrant call")]
    Reentrancy {},

    #[error("Start price must be greater than zero")]
    InvalidStartPrice {},

    #[error("Duration too short: {duration}s, minimum is {min}s")]
    DurationTooShort {
        duration: u64,
        min: u64,
    },

    #[error("Duration too long: {duration}s, maximum is {max}s")]
    DurationTooLong {
        duration: u64,
        max: u64,
    },

    #[error("Invalid address: {address}")]
    InvalidAddress {
        address: String,
    },

    #[error("Invalid fee tiers: {reason}")]
    InvalidFeeTiers {
        reason: String,
    },

    #[error("Fee too high: {fee_bps} bps, maximum is {max} bps")]
    FeeTooHigh {
        fee_bps: u16,
        max: u16,
    },

    #[error("Auction {auction_id} not found")]
    AuctionNotFound {
        auction_id: u64,
    },

    #[error("Auction has not started")]
    AuctionNotStarted {},

    #[error("Auction has ended")]
    AuctionHasEnded {},

    #[error("Auction already ended")]
    AuctionAlreadyEnded {},

    #[error("Auction is still open until {end_time}")]
    AuctionStillOpen {
        end_time: u64,
    },

    #[error("Bid too low: {bid}, must be higher than {highest_bid}")]
    BidTooLow {
        bid: Uint128,
        highest_bid: Uint128,
    },

    #[error("Invalid payment token")]
    InvalidPaymentToken {},

    #[error("Transfer failed: {reason}")]
    TransferFailed {
        reason: String,
    },

    #[error("Refund failed: {reason}")]
    RefundFailed {
        reason: String,
    },

    #[error("Price feed not set for {asset}")]
    PriceFeedNotSet {
        asset: String,
    },

    #[error("Invalid price reported for {asset}")]
    InvalidPrice {
        asset: String,
    },

    #[error("Stale price for {asset}, last updated at {updated_at}")]
    StalePrice {
        asset: String,
        updated_at: u64,
    },

    #[error("Unknown reply id: {id}")]
    UnknownReplyId {
        id: u64,
    },

    #[error("Contract can't be migrated! {current_name:?} {current_version:?}")]
    MigrationError {
        current_name: String,
        current_version: String,
    },
}
