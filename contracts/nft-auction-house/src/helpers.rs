use cosmwasm_std::{
    coins, to_json_binary, Addr, Api, BankMsg, CosmosMsg, QuerierWrapper, StdResult, Uint128,
    WasmMsg,
};
use cw20::Cw20ExecuteMsg;
use cw721::{Cw721ExecuteMsg, Cw721QueryMsg, OwnerOfResponse};
use nft_marketplace::auction_house::PaymentAsset;

use crate::ContractError;

/// Shortest auction, one minute
pub const MIN_DURATION: u64 = 60;
/// Longest auction, 30 days
pub const MAX_DURATION: u64 = 2_592_000;

/// Validates an address, reporting failures as [`ContractError::InvalidAddress`]
pub(crate) fn validate_address(api: &dyn Api, address: &str) -> Result<Addr, ContractError> {
    api.addr_validate(address).map_err(|_| ContractError::InvalidAddress {
        address: address.to_string(),
    })
}

pub(crate) fn validate_duration(duration: u64) -> Result<u64, ContractError> {
    if duration < MIN_DURATION {
        return Err(ContractError::DurationTooShort {
            duration,
            min: MIN_DURATION,
        });
    }
    if duration > MAX_DURATION {
        return Err(ContractError::DurationTooLong {
            duration,
            max: MAX_DURATION,
        });
    }
    Ok(duration)
}

/// `None` is the native denom, anything else must be a cw20 contract address
pub(crate) fn validate_payment_asset(
    api: &dyn Api,
    payment_token: Option<&str>,
) -> Result<PaymentAsset, ContractError> {
    Ok(match payment_token {
        None => PaymentAsset::Native,
        Some(token) => PaymentAsset::Cw20(validate_address(api, token)?),
    })
}

/// Sends `amount` of the payment asset out of custody
pub(crate) fn payout_msg(
    asset: &PaymentAsset,
    native_denom: &str,
    recipient: &Addr,
    amount: Uint128,
) -> StdResult<CosmosMsg> {
    Ok(match asset {
        PaymentAsset::Native => BankMsg::Send {
            to_address: recipient.to_string(),
            amount: coins(amount.u128(), native_denom),
        }
        .into(),
        PaymentAsset::Cw20(token) => WasmMsg::Execute {
            contract_addr: token.to_string(),
            msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
                recipient: recipient.to_string(),
                amount,
            })?,
            funds: vec![],
        }
        .into(),
    })
}

/// Pulls `amount` of `token` from `owner` into custody, using the contract's allowance
pub(crate) fn pull_token_msg(
    token: &Addr,
    owner: &Addr,
    custody: &Addr,
    amount: Uint128,
) -> StdResult<CosmosMsg> {
    Ok(WasmMsg::Execute {
        contract_addr: token.to_string(),
        msg: to_json_binary(&Cw20ExecuteMsg::TransferFrom {
            owner: owner.to_string(),
            recipient: custody.to_string(),
            amount,
        })?,
        funds: vec![],
    }
    .into())
}

pub(crate) fn nft_transfer_msg(
    nft_contract: &Addr,
    recipient: &Addr,
    token_id: &str,
) -> StdResult<CosmosMsg> {
    Ok(WasmMsg::Execute {
        contract_addr: nft_contract.to_string(),
        msg: to_json_binary(&Cw721ExecuteMsg::TransferNft {
            recipient: recipient.to_string(),
            token_id: token_id.to_string(),
        })?,
        funds: vec![],
    }
    .into())
}

/// Queries the current owner of an NFT
pub(crate) fn query_nft_owner(
    querier: &QuerierWrapper,
    nft_contract: &Addr,
    token_id: &str,
) -> StdResult<String> {
    let res: OwnerOfResponse = querier.query_wasm_smart(
        nft_contract,
        &Cw721QueryMsg::OwnerOf {
            token_id: token_id.to_string(),
            include_expired: None,
        },
    )?;
    Ok(res.owner)
}
