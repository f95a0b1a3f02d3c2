pub mod admin;
pub mod contract;
mod error;
pub mod executions;
pub mod fees;
pub mod guard;
pub mod helpers;
pub mod oracle;
pub mod queries;
pub mod settlement;
pub mod state;

#[cfg(test)]
mod tests;

pub use crate::error::ContractError;
