use cosmwasm_std::{Addr, Int128, QuerierWrapper, StdResult, Timestamp, Uint128, Uint256};
use cw20::{Cw20QueryMsg, TokenInfoResponse};
use nft_marketplace::auction_house::{Config, PaymentAsset};
use nft_marketplace::price_oracle::{
    FeedConfiguredResponse, LatestPriceResponse, OracleQueryMsg, USD_DECIMALS,
};

use crate::ContractError;

/// Seconds an oracle answer stays usable unless configured otherwise
pub const DEFAULT_MAX_PRICE_AGE: u64 = 3_600;

/// Thin client over the price oracle contract
pub struct PriceOracle(pub Addr);

impl PriceOracle {
    pub fn is_feed_configured(&self, querier: &QuerierWrapper, asset: &str) -> StdResult<bool> {
        let res: FeedConfiguredResponse = querier.query_wasm_smart(
            &self.0,
            &OracleQueryMsg::FeedConfigured {
                asset: asset.to_string(),
            },
        )?;
        Ok(res.configured)
    }

    /// USD value (8 decimals) of `amount` base units of `asset`, which has `asset_decimals`.
    pub fn value_in_base_units(
        &self,
        querier: &QuerierWrapper,
        now: Timestamp,
        max_price_age: u64,
        amount: Uint128,
        asset: &str,
        asset_decimals: u8,
    ) -> Result<Uint128, ContractError> {
        let res: LatestPriceResponse = querier.query_wasm_smart(
            &self.0,
            &OracleQueryMsg::LatestPrice {
                asset: asset.to_string(),
            },
        )?;
        let data = res.price.ok_or_else(|| ContractError::PriceFeedNotSet {
            asset: asset.to_string(),
        })?;

        if data.price <= Int128::zero() {
            return Err(ContractError::InvalidPrice {
                asset: asset.to_string(),
            });
        }
        if now.seconds().saturating_sub(data.updated_at) > max_price_age {
            return Err(ContractError::StalePrice {
                asset: asset.to_string(),
                updated_at: data.updated_at,
            });
        }

        let ten = Uint256::from(10u128);
        let scale = ten.checked_pow(USD_DECIMALS)?;
        let unit = ten.checked_pow(asset_decimals as u32 + data.decimals as u32)?;

        let value = Uint256::from(amount)
            .checked_mul(Uint256::from(data.price.i128().unsigned_abs()))?
            .checked_mul(scale)?
            .checked_div(unit)?;

        Ok(Uint128::try_from(value)?)
    }
}

/// Decimals of the payment asset, from the config for the native denom or from the token itself
pub(crate) fn asset_decimals(
    querier: &QuerierWrapper,
    config: &Config,
    asset: &PaymentAsset,
) -> StdResult<u8> {
    match asset {
        PaymentAsset::Native => Ok(config.native_decimals),
        PaymentAsset::Cw20(token) => {
            let info: TokenInfoResponse =
                querier.query_wasm_smart(token, &Cw20QueryMsg::TokenInfo {})?;
            Ok(info.decimals)
        },
    }
}

/// USD value (8 decimals) of `amount` of the payment asset at the current block time
pub(crate) fn usd_value(
    querier: &QuerierWrapper,
    now: Timestamp,
    config: &Config,
    asset: &PaymentAsset,
    amount: Uint128,
) -> Result<Uint128, ContractError> {
    let decimals = asset_decimals(querier, config, asset)?;
    PriceOracle(config.oracle.clone()).value_in_base_units(
        querier,
        now,
        config.max_price_age,
        amount,
        &asset.oracle_key(&config.native_denom),
        decimals,
    )
}
