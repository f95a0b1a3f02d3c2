use cosmwasm_std::{attr, Addr, Attribute, Deps, Env, SubMsg, Uint128};
use nft_marketplace::auction_house::{Auction, Config};

use crate::fees::{compute_fee_bps, split_payment};
use crate::guard;
use crate::helpers::{nft_transfer_msg, payout_msg};
use crate::oracle::usd_value;
use crate::state::FEE_SCHEDULE;
use crate::ContractError;

/// How an auction was closed
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// The highest bidder gets the NFT, the seller and the fee recipient share the bid
    Won {
        winner: Addr,
        usd_value: Uint128,
        fee_bps: u16,
        fee_amount: Uint128,
        seller_amount: Uint128,
    },
    /// The NFT goes back to the seller, the highest bidder (if any) is refunded
    Cancelled {
        refunded: Option<(Addr, Uint128)>,
    },
}

impl Outcome {
    pub fn attributes(&self) -> Vec<Attribute> {
        match self {
            Outcome::Won {
                winner,
                usd_value,
                fee_bps,
                fee_amount,
                seller_amount,
            } => vec![
                attr("outcome", "won"),
                attr("winner", winner),
                attr("usd_value", usd_value.to_string()),
                attr("fee_bps", fee_bps.to_string()),
                attr("fee_amount", fee_amount.to_string()),
                attr("seller_amount", seller_amount.to_string()),
            ],
            Outcome::Cancelled {
                refunded: None,
            } => vec![attr("outcome", "cancelled")],
            Outcome::Cancelled {
                refunded: Some((bidder, amount)),
            } => vec![
                attr("outcome", "cancelled"),
                attr("refunded", bidder),
                attr("refund_amount", amount.to_string()),
            ],
        }
    }
}

/// Fee owed on `amount` of the auction's payment asset under the current schedule.
/// Returns `(fee_amount, fee_bps, usd_value)`.
pub(crate) fn platform_fee(
    deps: Deps,
    env: &Env,
    config: &Config,
    auction: &Auction,
    amount: Uint128,
) -> Result<(Uint128, u16, Uint128), ContractError> {
    let usd_value =
        usd_value(&deps.querier, env.block.time, config, &auction.payment_asset, amount)?;
    let fee_bps = compute_fee_bps(&FEE_SCHEDULE.load(deps.storage)?, usd_value);
    let (fee_amount, _) = split_payment(amount, fee_bps)?;
    Ok((fee_amount, fee_bps, usd_value))
}

/// Settles an ended auction. Funds are always dispatched before the NFT.
pub(crate) fn finalize(
    deps: Deps,
    env: &Env,
    config: &Config,
    auction: &Auction,
) -> Result<(Outcome, Vec<SubMsg>), ContractError> {
    let Some(winner) = auction.highest_bidder.clone() else {
        return cancel(config, auction);
    };

    let (fee_amount, fee_bps, usd_value) =
        platform_fee(deps, env, config, auction, auction.highest_bid)?;
    let seller_amount = auction.highest_bid.checked_sub(fee_amount)?;

    let mut messages = vec![];
    if !seller_amount.is_zero() {
        messages.push(guard::transfer(payout_msg(
            &auction.payment_asset,
            &config.native_denom,
            &auction.seller,
            seller_amount,
        )?));
    }
    // a zero bank send is rejected by the chain
    if !fee_amount.is_zero() {
        messages.push(guard::transfer(payout_msg(
            &auction.payment_asset,
            &config.native_denom,
            &config.fee_recipient,
            fee_amount,
        )?));
    }
    messages.push(guard::transfer(nft_transfer_msg(
        &auction.nft_contract,
        &winner,
        &auction.token_id,
    )?));

    Ok((
        Outcome::Won {
            winner,
            usd_value,
            fee_bps,
            fee_amount,
            seller_amount,
        },
        messages,
    ))
}

/// Closes an auction without a sale: refunds the highest bidder, then returns the NFT to the seller
///
/// Both legs share one transaction. If the NFT contract rejects the return, the refund reverts
/// with it and the bidder stays unpaid until that contract accepts the transfer.
pub(crate) fn cancel(
    config: &Config,
    auction: &Auction,
) -> Result<(Outcome, Vec<SubMsg>), ContractError> {
    let mut messages = vec![];

    let refunded = match &auction.highest_bidder {
        Some(bidder) => {
            messages.push(guard::refund(payout_msg(
                &auction.payment_asset,
                &config.native_denom,
                bidder,
                auction.highest_bid,
            )?));
            Some((bidder.clone(), auction.highest_bid))
        },
        None => None,
    };

    messages.push(guard::transfer(nft_transfer_msg(
        &auction.nft_contract,
        &auction.seller,
        &auction.token_id,
    )?));

    Ok((
        Outcome::Cancelled {
            refunded,
        },
        messages,
    ))
}
