use cosmwasm_std::{to_json_binary, Binary, Deps, Env, Order, StdResult};
use cw_storage_plus::Bound;
use nft_marketplace::auction_house::{AuctionEntry, AuctionsResponse, PlatformFeeResponse};

use crate::executions::load_auction;
use crate::settlement::platform_fee;
use crate::state::{AUCTIONS, CONFIG, FEE_SCHEDULE};
use crate::ContractError;

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    to_json_binary(&CONFIG.load(deps.storage)?)
}

pub fn query_fee_schedule(deps: Deps) -> StdResult<Binary> {
    to_json_binary(&FEE_SCHEDULE.load(deps.storage)?)
}

pub fn query_auction(deps: Deps, auction_id: u64) -> Result<Binary, ContractError> {
    Ok(to_json_binary(&load_auction(deps.storage, auction_id)?)?)
}

/// Ids of the auctions still accepting bids, recomputed from storage on every call
pub fn query_active_auctions(deps: Deps, env: &Env) -> StdResult<Binary> {
    let now = env.block.time.seconds();
    let active = AUCTIONS
        .range(deps.storage, None, None, Order::Ascending)
        .filter_map(|item| match item {
            Ok((auction_id, auction)) if !auction.ended && now <= auction.end_time => {
                Some(Ok(auction_id))
            },
            Ok(_) => None,
            Err(err) => Some(Err(err)),
        })
        .collect::<StdResult<Vec<u64>>>()?;

    to_json_binary(&active)
}

pub fn query_auctions(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    let auctions = AUCTIONS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            item.map(|(auction_id, auction)| AuctionEntry {
                auction_id,
                auction,
            })
        })
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&AuctionsResponse {
        auctions,
    })
}

/// Fee the auction would pay if settled now at its current highest bid
pub fn query_platform_fee(deps: Deps, env: &Env, auction_id: u64) -> Result<Binary, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let auction = load_auction(deps.storage, auction_id)?;
    let (fee_amount, fee_bps, _) = platform_fee(deps, env, &config, &auction, auction.highest_bid)?;

    Ok(to_json_binary(&PlatformFeeResponse {
        fee_amount,
        fee_bps,
    })?)
}
