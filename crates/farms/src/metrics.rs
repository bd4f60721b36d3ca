//! Pure derivation of farm metrics from on-chain snapshots. Nothing here
//! performs IO; degenerate inputs fall back to zero instead of failing.

use {
    crate::{
        config::{FarmConfig, PoolKind},
        liquidity::LiquiditySnapshot,
        pool_info::PoolAllocation,
    },
    alloy::primitives::U256,
    anyhow::{Context, Result},
    bigdecimal::BigDecimal,
    num::Zero,
    number::{
        conversions::{u256_to_big_decimal, u256_to_big_int},
        units,
    },
    serde::Serialize,
};

/// Controller-wide allocation totals that per-pool weights are measured
/// against.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AllocationTotals {
    pub regular: U256,
    pub special: U256,
}

/// Liquidity metrics of a farm, expressed in token amounts rather than raw
/// balances. `lp_total_supply` stays raw since its consumers only compare
/// it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmMetrics {
    pub token_amount_total: BigDecimal,
    pub quote_token_amount_total: BigDecimal,
    pub lp_total_supply: BigDecimal,
    pub lp_total_in_quote_token: BigDecimal,
    pub token_price_vs_quote: BigDecimal,
}

/// Reward weighting of a farm relative to all farms of its regularity.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmAllocation {
    pub pool_weight: BigDecimal,
    pub multiplier: String,
}

/// Derives a farm's liquidity metrics from its snapshot. Stable pairs price
/// the base token with the swap's own quotation, classic pairs with the
/// reserve ratio.
pub fn derive(farm: &FarmConfig, snapshot: &LiquiditySnapshot) -> Result<FarmMetrics> {
    match farm.kind {
        PoolKind::Classic => Ok(classic(farm, snapshot)),
        PoolKind::Stable { .. } => stable(farm, snapshot),
    }
}

fn classic(farm: &FarmConfig, snapshot: &LiquiditySnapshot) -> FarmMetrics {
    let token_amount_total = units::token_amount(&snapshot.token_reserve, farm.token.decimals);
    let quote_token_amount_total =
        units::token_amount(&snapshot.quote_reserve, farm.quote_token.decimals);
    let staked_ratio = staked_ratio(snapshot);

    let quote_staked = &quote_token_amount_total * &staked_ratio;
    // The quote side makes up half the pool by value, so doubling it sizes
    // the staked position. Exact only while the pair is balanced.
    let lp_total_in_quote_token = &quote_staked * BigDecimal::from(2);

    let token_price_vs_quote =
        if token_amount_total.is_zero() || quote_token_amount_total.is_zero() {
            BigDecimal::zero()
        } else {
            &quote_token_amount_total / &token_amount_total
        };

    FarmMetrics {
        token_amount_total,
        quote_token_amount_total,
        lp_total_supply: u256_to_big_decimal(&snapshot.lp_total_supply),
        lp_total_in_quote_token,
        token_price_vs_quote,
    }
}

fn stable(farm: &FarmConfig, snapshot: &LiquiditySnapshot) -> Result<FarmMetrics> {
    let quotation = snapshot
        .stable_price
        .context("stable pair snapshot carries no swap quotation")?;

    let token_amount_total = units::token_amount(&snapshot.token_reserve, farm.token.decimals);
    let quote_token_amount_total =
        units::token_amount(&snapshot.quote_reserve, farm.quote_token.decimals);
    let staked_ratio = staked_ratio(snapshot);

    // The swap quotes one whole base token; scaling by the quote decimals
    // turns it into a price.
    let token_price_vs_quote = units::token_amount(&quotation, farm.quote_token.decimals);

    let quote_staked = &quote_token_amount_total * &staked_ratio;
    let token_staked = &token_amount_total * &staked_ratio;
    let lp_total_in_quote_token = &quote_staked + token_staked * &token_price_vs_quote;

    Ok(FarmMetrics {
        token_amount_total,
        quote_token_amount_total,
        lp_total_supply: u256_to_big_decimal(&snapshot.lp_total_supply),
        lp_total_in_quote_token,
        token_price_vs_quote,
    })
}

/// Share of the LP supply staked in the controller, zero when either side of
/// the division degenerates.
fn staked_ratio(snapshot: &LiquiditySnapshot) -> BigDecimal {
    if snapshot.lp_total_supply.is_zero() || snapshot.staked_lp.is_zero() {
        return BigDecimal::zero();
    }
    u256_to_big_decimal(&snapshot.staked_lp) / u256_to_big_decimal(&snapshot.lp_total_supply)
}

/// Derives a farm's reward weighting. Farms without pool info weigh zero and
/// fall into the special bucket.
pub fn allocation(info: Option<&PoolAllocation>, totals: &AllocationTotals) -> FarmAllocation {
    let alloc_point = info.map(|info| info.alloc_point).unwrap_or_default();
    let total = if info.is_some_and(|info| info.is_regular) {
        totals.regular
    } else {
        totals.special
    };

    let pool_weight = if total.is_zero() || alloc_point.is_zero() {
        BigDecimal::zero()
    } else {
        u256_to_big_decimal(&alloc_point) / u256_to_big_decimal(&total)
    };

    // One multiplier unit is 100 allocation points.
    let multiplier = if alloc_point.is_zero() {
        "0X".to_string()
    } else {
        format!(
            "{}X",
            BigDecimal::new(u256_to_big_int(&alloc_point), 2).normalized()
        )
    };

    FarmAllocation {
        pool_weight,
        multiplier,
    }
}
