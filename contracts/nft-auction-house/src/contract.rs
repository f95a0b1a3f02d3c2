use cosmwasm_std::{
    ensure, entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Reply,
    Response, StdError,
};
use cw2::{get_contract_version, set_contract_version};
use semver::Version;

use nft_marketplace::auction_house::{Config, ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};

use crate::error::ContractError;
use crate::fees::default_fee_schedule;
use crate::helpers::validate_address;
use crate::oracle::DEFAULT_MAX_PRICE_AGE;
use crate::state::{CONFIG, FEE_SCHEDULE, LOCKED, NEXT_AUCTION_ID};
use crate::{admin, executions, guard, queries};

pub const CONTRACT_NAME: &str = "crates.io:nft-auction-house";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let ownership = cw_ownable::initialize_owner(
        deps.storage,
        deps.api,
        Some(msg.owner.as_deref().unwrap_or(info.sender.as_str())),
    )?;

    ensure!(
        !msg.native_denom.is_empty(),
        StdError::generic_err("native_denom must not be empty")
    );

    let config = Config {
        fee_recipient: validate_address(deps.api, &msg.fee_recipient)?,
        oracle: validate_address(deps.api, &msg.oracle)?,
        native_denom: msg.native_denom,
        native_decimals: msg.native_decimals,
        max_price_age: msg.max_price_age.unwrap_or(DEFAULT_MAX_PRICE_AGE),
    };
    CONFIG.save(deps.storage, &config)?;
    FEE_SCHEDULE.save(deps.storage, &default_fee_schedule())?;
    NEXT_AUCTION_ID.save(deps.storage, &0)?;
    LOCKED.save(deps.storage, &false)?;

    Ok(Response::default()
        .add_attribute("action", "instantiate")
        .add_attribute("owner", ownership.owner.map(|o| o.to_string()).unwrap_or_default())
        .add_attribute("fee_recipient", config.fee_recipient)
        .add_attribute("oracle", config.oracle)
        .add_attribute("native_denom", config.native_denom))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::CreateAuction {
            nft_contract,
            token_id,
            start_price,
            duration,
            payment_token,
        } => non_reentrant(deps, |deps| {
            executions::create_auction(
                deps,
                &env,
                info,
                nft_contract,
                token_id,
                start_price,
                duration,
                payment_token,
            )
        }),
        ExecuteMsg::ReceiveNft(receive_msg) => {
            non_reentrant(deps, |deps| executions::receive_nft(deps, &env, info, receive_msg))
        },
        ExecuteMsg::Bid {
            auction_id,
        } => non_reentrant(deps, |deps| executions::bid(deps, &env, info, auction_id)),
        ExecuteMsg::BidWithToken {
            auction_id,
            amount,
        } => non_reentrant(deps, |deps| {
            executions::bid_with_token(deps, &env, info, auction_id, amount)
        }),
        ExecuteMsg::Receive(receive_msg) => {
            non_reentrant(deps, |deps| executions::receive_token(deps, &env, info, receive_msg))
        },
        ExecuteMsg::EndAuction {
            auction_id,
        } => non_reentrant(deps, |deps| executions::end_auction(deps, &env, info, auction_id)),
        ExecuteMsg::EmergencyCancel {
            auction_id,
        } => non_reentrant(deps, |deps| executions::emergency_cancel(deps, info, auction_id)),
        ExecuteMsg::SetFeeTiers {
            tiers,
        } => admin::set_fee_tiers(deps, info, tiers),
        ExecuteMsg::SetMinUsdValue {
            value,
        } => admin::set_min_usd_value(deps, info, value),
        ExecuteMsg::SetDefaultPlatformFee {
            fee_bps,
        } => admin::set_default_platform_fee(deps, info, fee_bps),
        ExecuteMsg::SetFeeRecipient {
            address,
        } => admin::set_fee_recipient(deps, info, address),
        ExecuteMsg::UpdateConfig {
            oracle,
            max_price_age,
        } => admin::update_config(deps, info, oracle, max_price_age),
        ExecuteMsg::UpdateOwnership(action) => admin::update_ownership(deps, &env, info, action),
    }
}

/// Runs a mutating auction operation under the reentrancy lock
fn non_reentrant<F>(mut deps: DepsMut, operation: F) -> Result<Response, ContractError>
where
    F: FnOnce(DepsMut) -> Result<Response, ContractError>,
{
    guard::acquire(deps.storage)?;
    match operation(deps.branch()) {
        Ok(res) => guard::seal(deps.storage, res),
        Err(err) => {
            guard::release(deps.storage)?;
            Err(err)
        },
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::Config {} => Ok(queries::query_config(deps)?),
        QueryMsg::FeeSchedule {} => Ok(queries::query_fee_schedule(deps)?),
        QueryMsg::Auction {
            auction_id,
        } => queries::query_auction(deps, auction_id),
        QueryMsg::ActiveAuctions {} => Ok(queries::query_active_auctions(deps, &env)?),
        QueryMsg::Auctions {
            start_after,
            limit,
        } => Ok(queries::query_auctions(deps, start_after, limit)?),
        QueryMsg::PlatformFee {
            auction_id,
        } => queries::query_platform_fee(deps, &env, auction_id),
        QueryMsg::Ownership {} => Ok(to_json_binary(&cw_ownable::get_ownership(deps.storage)?)?),
    }
}

#[entry_point]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    guard::on_reply(deps.storage, msg.id, msg.result)
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    let migration_error = || ContractError::MigrationError {
        current_name: stored.contract.clone(),
        current_version: stored.version.clone(),
    };

    if stored.contract != CONTRACT_NAME {
        return Err(migration_error());
    }
    let stored_version: Version = stored.version.parse().map_err(|_| migration_error())?;
    let new_version: Version = CONTRACT_VERSION.parse().map_err(|_| migration_error())?;
    // no downgrades
    if stored_version > new_version {
        return Err(migration_error());
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::default()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
