use cosmwasm_std::{DepsMut, Env, MessageInfo, Response, Uint128};
use nft_marketplace::auction_house::FeeTier;

use crate::fees::{validate_fee_bps, validate_fee_tiers};
use crate::helpers::validate_address;
use crate::state::{CONFIG, FEE_SCHEDULE};
use crate::ContractError;

/// Replaces the whole tier schedule once every tier is validated
pub(crate) fn set_fee_tiers(
    deps: DepsMut,
    info: MessageInfo,
    tiers: Vec<FeeTier>,
) -> Result<Response, ContractError> {
    cw_utils::nonpayable(&info)?;
    cw_ownable::assert_owner(deps.storage, &info.sender)?;

    validate_fee_tiers(&tiers)?;

    let tier_count = tiers.len();
    FEE_SCHEDULE.update::<_, ContractError>(deps.storage, |mut schedule| {
        schedule.tiers = tiers;
        Ok(schedule)
    })?;

    Ok(Response::default()
        .add_attribute("action", "set_fee_tiers")
        .add_attribute("tier_count", tier_count.to_string()))
}

pub(crate) fn set_min_usd_value(
    deps: DepsMut,
    info: MessageInfo,
    value: Uint128,
) -> Result<Response, ContractError> {
    cw_utils::nonpayable(&info)?;
    cw_ownable::assert_owner(deps.storage, &info.sender)?;

    FEE_SCHEDULE.update::<_, ContractError>(deps.storage, |mut schedule| {
        schedule.min_usd_threshold = value;
        Ok(schedule)
    })?;

    Ok(Response::default()
        .add_attribute("action", "set_min_usd_value")
        .add_attribute("min_usd_threshold", value.to_string()))
}

pub(crate) fn set_default_platform_fee(
    deps: DepsMut,
    info: MessageInfo,
    fee_bps: u16,
) -> Result<Response, ContractError> {
    cw_utils::nonpayable(&info)?;
    cw_ownable::assert_owner(deps.storage, &info.sender)?;

    let fee_bps = validate_fee_bps(fee_bps)?;
    FEE_SCHEDULE.update::<_, ContractError>(deps.storage, |mut schedule| {
        schedule.default_fee_bps = fee_bps;
        Ok(schedule)
    })?;

    Ok(Response::default()
        .add_attribute("action", "set_default_platform_fee")
        .add_attribute("default_fee_bps", fee_bps.to_string()))
}

pub(crate) fn set_fee_recipient(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    cw_utils::nonpayable(&info)?;
    cw_ownable::assert_owner(deps.storage, &info.sender)?;

    let fee_recipient = validate_address(deps.api, &address)?;
    CONFIG.update::<_, ContractError>(deps.storage, |mut config| {
        config.fee_recipient = fee_recipient.clone();
        Ok(config)
    })?;

    Ok(Response::default()
        .add_attribute("action", "set_fee_recipient")
        .add_attribute("fee_recipient", fee_recipient))
}

/// Updates the oracle and the accepted age of its answers
pub(crate) fn update_config(
    deps: DepsMut,
    info: MessageInfo,
    oracle: Option<String>,
    max_price_age: Option<u64>,
) -> Result<Response, ContractError> {
    cw_utils::nonpayable(&info)?;
    cw_ownable::assert_owner(deps.storage, &info.sender)?;

    let mut config = CONFIG.load(deps.storage)?;
    if let Some(oracle) = oracle {
        config.oracle = validate_address(deps.api, &oracle)?;
    }
    if let Some(max_price_age) = max_price_age {
        config.max_price_age = max_price_age;
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::default().add_attributes(vec![
        ("action", "update_config".to_string()),
        ("oracle", config.oracle.to_string()),
        ("max_price_age", config.max_price_age.to_string()),
    ]))
}

/// Proposes, accepts or renounces ownership through `cw-ownable`
pub(crate) fn update_ownership(
    deps: DepsMut,
    env: &Env,
    info: MessageInfo,
    action: cw_ownable::Action,
) -> Result<Response, ContractError> {
    cw_utils::nonpayable(&info)?;
    let ownership = cw_ownable::update_ownership(deps, &env.block, &info.sender, action)?;
    Ok(Response::default().add_attributes(ownership.into_attributes()))
}
