use cosmwasm_std::{
    attr, from_json, Addr, Attribute, Deps, DepsMut, Env, MessageInfo, Response, Storage, SubMsg,
    Uint128,
};
use cw20::Cw20ReceiveMsg;
use cw721::Cw721ReceiveMsg;
use nft_marketplace::auction_house::{
    Auction, Config, PaymentAsset, ReceiveNftMsg, ReceiveTokenMsg,
};

use crate::guard;
use crate::helpers::{
    nft_transfer_msg, payout_msg, pull_token_msg, query_nft_owner, validate_address,
    validate_duration, validate_payment_asset,
};
use crate::oracle::{usd_value, PriceOracle};
use crate::settlement;
use crate::state::{AUCTIONS, CONFIG, NEXT_AUCTION_ID};
use crate::ContractError;

/// Lists an NFT the contract is approved to move, taking custody of it
#[allow(clippy::too_many_arguments)]
pub(crate) fn create_auction(
    deps: DepsMut,
    env: &Env,
    info: MessageInfo,
    nft_contract: String,
    token_id: String,
    start_price: Uint128,
    duration: u64,
    payment_token: Option<String>,
) -> Result<Response, ContractError> {
    cw_utils::nonpayable(&info)?;

    let auction = new_auction(
        deps.as_ref(),
        env,
        info.sender.clone(),
        &nft_contract,
        token_id,
        start_price,
        duration,
        payment_token.as_deref(),
    )?;

    // the contract may be an approved operator for tokens the caller doesn't own
    let owner = query_nft_owner(&deps.querier, &auction.nft_contract, &auction.token_id)
        .map_err(|err| ContractError::TransferFailed {
            reason: err.to_string(),
        })?;
    if info.sender != owner {
        return Err(ContractError::TransferFailed {
            reason: format!("{} does not own token {}", info.sender, auction.token_id),
        });
    }

    let auction_id = store_auction(deps.storage, &auction)?;

    Ok(Response::default()
        .add_submessage(guard::transfer(nft_transfer_msg(
            &auction.nft_contract,
            &env.contract.address,
            &auction.token_id,
        )?))
        .add_attributes(auction_attributes("create_auction", auction_id, &auction)))
}

/// Lists an NFT received through cw721 `SendNft`, once the contract is seen to hold it
pub(crate) fn receive_nft(
    deps: DepsMut,
    env: &Env,
    info: MessageInfo,
    receive_msg: Cw721ReceiveMsg,
) -> Result<Response, ContractError> {
    cw_utils::nonpayable(&info)?;

    let ReceiveNftMsg::CreateAuction {
        start_price,
        duration,
        payment_token,
    } = from_json(&receive_msg.msg)?;

    let seller = deps.api.addr_validate(&receive_msg.sender)?;
    let auction = new_auction(
        deps.as_ref(),
        env,
        seller,
        info.sender.as_str(),
        receive_msg.token_id,
        start_price,
        duration,
        payment_token.as_deref(),
    )?;

    // the hook is callable by anyone, so custody has to be proven
    let owner = query_nft_owner(&deps.querier, &auction.nft_contract, &auction.token_id)
        .map_err(|err| ContractError::TransferFailed {
            reason: err.to_string(),
        })?;
    if owner != env.contract.address {
        return Err(ContractError::TransferFailed {
            reason: format!("token {} is not held by the auction house", auction.token_id),
        });
    }

    let auction_id = store_auction(deps.storage, &auction)?;

    Ok(Response::default().add_attributes(auction_attributes("create_auction", auction_id, &auction)))
}

/// Bids with the native funds attached
pub(crate) fn bid(
    deps: DepsMut,
    env: &Env,
    info: MessageInfo,
    auction_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let auction = load_auction(deps.storage, auction_id)?;
    ensure_open(&auction, env)?;

    if !auction.payment_asset.is_native() {
        return Err(ContractError::InvalidPaymentToken {});
    }
    let amount = cw_utils::must_pay(&info, &config.native_denom)?;

    accept_bid(deps, env, &config, auction_id, auction, info.sender, amount, None)
}

/// Bids on a cw20 auction, pulling `amount` from the bidder's allowance
pub(crate) fn bid_with_token(
    deps: DepsMut,
    env: &Env,
    info: MessageInfo,
    auction_id: u64,
    amount: Uint128,
) -> Result<Response, ContractError> {
    cw_utils::nonpayable(&info)?;

    let config = CONFIG.load(deps.storage)?;
    let auction = load_auction(deps.storage, auction_id)?;
    ensure_open(&auction, env)?;

    let PaymentAsset::Cw20(token) = &auction.payment_asset else {
        return Err(ContractError::InvalidPaymentToken {});
    };
    let pull =
        guard::transfer(pull_token_msg(token, &info.sender, &env.contract.address, amount)?);

    accept_bid(deps, env, &config, auction_id, auction, info.sender, amount, Some(pull))
}

/// Bids with tokens pushed through cw20 `Send`. `info.sender` is the token contract.
pub(crate) fn receive_token(
    deps: DepsMut,
    env: &Env,
    info: MessageInfo,
    receive_msg: Cw20ReceiveMsg,
) -> Result<Response, ContractError> {
    cw_utils::nonpayable(&info)?;

    let ReceiveTokenMsg::Bid {
        auction_id,
    } = from_json(&receive_msg.msg)?;

    let config = CONFIG.load(deps.storage)?;
    let auction = load_auction(deps.storage, auction_id)?;
    ensure_open(&auction, env)?;

    match &auction.payment_asset {
        PaymentAsset::Cw20(token) if *token == info.sender => {},
        _ => return Err(ContractError::InvalidPaymentToken {}),
    }
    let bidder = deps.api.addr_validate(&receive_msg.sender)?;

    accept_bid(deps, env, &config, auction_id, auction, bidder, receive_msg.amount, None)
}

/// Settles an expired auction. Callable by the seller or the owner.
pub(crate) fn end_auction(
    deps: DepsMut,
    env: &Env,
    info: MessageInfo,
    auction_id: u64,
) -> Result<Response, ContractError> {
    cw_utils::nonpayable(&info)?;

    let mut auction = load_auction(deps.storage, auction_id)?;
    if auction.ended {
        return Err(ContractError::AuctionAlreadyEnded {});
    }
    if env.block.time.seconds() <= auction.end_time {
        return Err(ContractError::AuctionStillOpen {
            end_time: auction.end_time,
        });
    }
    if info.sender != auction.seller && !cw_ownable::is_owner(deps.storage, &info.sender)? {
        return Err(ContractError::NotAuthorized {});
    }

    let config = CONFIG.load(deps.storage)?;
    let (outcome, messages) = settlement::finalize(deps.as_ref(), env, &config, &auction)?;

    auction.ended = true;
    AUCTIONS.save(deps.storage, auction_id, &auction)?;

    Ok(Response::default()
        .add_submessages(messages)
        .add_attribute("action", "end_auction")
        .add_attribute("auction_id", auction_id.to_string())
        .add_attributes(outcome.attributes()))
}

/// Terminates an auction before it ends, refunding the highest bidder. Owner only.
pub(crate) fn emergency_cancel(
    deps: DepsMut,
    info: MessageInfo,
    auction_id: u64,
) -> Result<Response, ContractError> {
    cw_utils::nonpayable(&info)?;
    cw_ownable::assert_owner(deps.storage, &info.sender)?;

    let mut auction = load_auction(deps.storage, auction_id)?;
    if auction.ended {
        return Err(ContractError::AuctionAlreadyEnded {});
    }

    auction.ended = true;
    AUCTIONS.save(deps.storage, auction_id, &auction)?;

    let config = CONFIG.load(deps.storage)?;
    let (outcome, messages) = settlement::cancel(&config, &auction)?;

    Ok(Response::default()
        .add_submessages(messages)
        .add_attribute("action", "emergency_cancel")
        .add_attribute("auction_id", auction_id.to_string())
        .add_attributes(outcome.attributes()))
}

pub(crate) fn load_auction(storage: &dyn Storage, auction_id: u64) -> Result<Auction, ContractError> {
    AUCTIONS.may_load(storage, auction_id)?.ok_or(ContractError::AuctionNotFound {
        auction_id,
    })
}

/// Validates the listing parameters and builds the auction record
#[allow(clippy::too_many_arguments)]
fn new_auction(
    deps: Deps,
    env: &Env,
    seller: Addr,
    nft_contract: &str,
    token_id: String,
    start_price: Uint128,
    duration: u64,
    payment_token: Option<&str>,
) -> Result<Auction, ContractError> {
    if start_price.is_zero() {
        return Err(ContractError::InvalidStartPrice {});
    }
    let duration = validate_duration(duration)?;
    let nft_contract = validate_address(deps.api, nft_contract)?;
    let payment_asset = validate_payment_asset(deps.api, payment_token)?;

    let config = CONFIG.load(deps.storage)?;
    let asset = payment_asset.oracle_key(&config.native_denom);
    if !PriceOracle(config.oracle).is_feed_configured(&deps.querier, &asset)? {
        return Err(ContractError::PriceFeedNotSet {
            asset,
        });
    }

    let start_time = env.block.time.seconds();
    Ok(Auction {
        seller,
        nft_contract,
        token_id,
        start_time,
        end_time: start_time + duration,
        start_price,
        payment_asset,
        highest_bidder: None,
        highest_bid: start_price,
        ended: false,
    })
}

/// Saves a new auction under the next id
fn store_auction(storage: &mut dyn Storage, auction: &Auction) -> Result<u64, ContractError> {
    let auction_id = NEXT_AUCTION_ID.load(storage)?;
    NEXT_AUCTION_ID.save(storage, &(auction_id + 1))?;
    AUCTIONS.save(storage, auction_id, auction)?;
    Ok(auction_id)
}

fn ensure_open(auction: &Auction, env: &Env) -> Result<(), ContractError> {
    let now = env.block.time.seconds();
    if auction.ended || now > auction.end_time {
        return Err(ContractError::AuctionHasEnded {});
    }
    if now < auction.start_time {
        return Err(ContractError::AuctionNotStarted {});
    }
    Ok(())
}

/// Records a bid whose funds are in custody (or pulled by `pull`), refunding the previous bidder.
///
/// Messages run pull first, then refund. Any failure reverts the whole bid, state included.
#[allow(clippy::too_many_arguments)]
fn accept_bid(
    deps: DepsMut,
    env: &Env,
    config: &Config,
    auction_id: u64,
    mut auction: Auction,
    bidder: Addr,
    amount: Uint128,
    pull: Option<SubMsg>,
) -> Result<Response, ContractError> {
    if amount <= auction.highest_bid {
        return Err(ContractError::BidTooLow {
            bid: amount,
            highest_bid: auction.highest_bid,
        });
    }

    let mut messages: Vec<SubMsg> = pull.into_iter().collect();
    let mut attributes = vec![];

    if let Some(previous) = &auction.highest_bidder {
        messages.push(guard::refund(payout_msg(
            &auction.payment_asset,
            &config.native_denom,
            previous,
            auction.highest_bid,
        )?));
        attributes.push(attr("refunded", previous));
        attributes.push(attr("refund_amount", auction.highest_bid.to_string()));
    }

    let usd_value =
        usd_value(&deps.querier, env.block.time, config, &auction.payment_asset, amount)?;

    auction.highest_bidder = Some(bidder.clone());
    auction.highest_bid = amount;
    AUCTIONS.save(deps.storage, auction_id, &auction)?;

    Ok(Response::default()
        .add_submessages(messages)
        .add_attribute("action", "bid")
        .add_attribute("auction_id", auction_id.to_string())
        .add_attribute("bidder", bidder)
        .add_attribute("amount", amount.to_string())
        .add_attribute("usd_value", usd_value.to_string())
        .add_attributes(attributes))
}

fn auction_attributes(action: &str, auction_id: u64, auction: &Auction) -> Vec<Attribute> {
    vec![
        attr("action", action),
        attr("auction_id", auction_id.to_string()),
        attr("seller", &auction.seller),
        attr("nft_contract", &auction.nft_contract),
        attr("token_id", &auction.token_id),
        attr("start_price", auction.start_price.to_string()),
        attr("payment_asset", auction.payment_asset.to_string()),
        attr("end_time", auction.end_time.to_string()),
    ]
}
