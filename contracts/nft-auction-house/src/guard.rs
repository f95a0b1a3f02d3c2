//! Non-reentrant lock over the mutating auction operations.
//!
//! The lock is taken at entry. An operation without outbound messages releases it before
//! returning. Otherwise the last outbound message replies on success and the reply releases
//! it, after every message and whatever it triggered has executed. A failing operation
//! releases it on its way out. Any nested call into a locked operation meanwhile fails with
//! [`ContractError::Reentrancy`].
//!
//! Every outbound message also replies on error so a failing collaborator surfaces as
//! [`ContractError::TransferFailed`] or [`ContractError::RefundFailed`].

use cosmwasm_std::{CosmosMsg, ReplyOn, Response, StdResult, Storage, SubMsg, SubMsgResult};

use crate::state::LOCKED;
use crate::ContractError;

/// Pulls, payouts and NFT moves
pub const TRANSFER_REPLY_ID: u64 = 1;
/// Refunds of an outbid or cancelled bidder
pub const REFUND_REPLY_ID: u64 = 2;

pub(crate) fn acquire(storage: &mut dyn Storage) -> Result<(), ContractError> {
    if LOCKED.may_load(storage)?.unwrap_or(false) {
        return Err(ContractError::Reentrancy {});
    }
    LOCKED.save(storage, &true)?;
    Ok(())
}

pub(crate) fn release(storage: &mut dyn Storage) -> StdResult<()> {
    LOCKED.save(storage, &false)
}

/// Hands the lock over to the response: released now if nothing is dispatched, else by the
/// reply of the last message.
pub(crate) fn seal(storage: &mut dyn Storage, mut res: Response) -> Result<Response, ContractError> {
    match res.messages.last_mut() {
        Some(last) => last.reply_on = ReplyOn::Always,
        None => release(storage)?,
    }
    Ok(res)
}

pub(crate) fn transfer(msg: impl Into<CosmosMsg>) -> SubMsg {
    SubMsg::reply_on_error(msg, TRANSFER_REPLY_ID)
}

pub(crate) fn refund(msg: impl Into<CosmosMsg>) -> SubMsg {
    SubMsg::reply_on_error(msg, REFUND_REPLY_ID)
}

/// Handles the reply of an outbound message
pub(crate) fn on_reply(
    storage: &mut dyn Storage,
    id: u64,
    result: SubMsgResult,
) -> Result<Response, ContractError> {
    match (id, result) {
        (TRANSFER_REPLY_ID | REFUND_REPLY_ID, SubMsgResult::Ok(_)) => {
            release(storage)?;
            Ok(Response::new().add_attribute("action", "release_lock"))
        },
        (TRANSFER_REPLY_ID, SubMsgResult::Err(reason)) => Err(ContractError::TransferFailed {
            reason,
        }),
        (REFUND_REPLY_ID, SubMsgResult::Err(reason)) => Err(ContractError::RefundFailed {
            reason,
        }),
        (id, _) => Err(ContractError::UnknownReplyId {
            id,
        }),
    }
}
