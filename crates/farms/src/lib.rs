//! Aggregation pipeline for farm data: batched on-chain reads of pool
//! allocations and pair liquidity, pure metric derivation on top, and fiat
//! pricing through a per-chain reference pair.

pub mod config;
pub mod fetching;
pub mod liquidity;
pub mod metrics;
pub mod pool_info;
pub mod prices;

pub use {
    config::{FarmConfig, FarmToken, PoolKind, ReferenceLp, ReferenceLps},
    fetching::{Farm, FarmFetchError, FarmFetcher},
    liquidity::{LiquidityFetcher, LiquiditySnapshot},
    metrics::{AllocationTotals, FarmAllocation, FarmMetrics},
    pool_info::{ControllerTotals, PoolAllocation, PoolInfoFetcher},
    prices::{PriceResolving, PricedFarm, ReferencePairResolver},
};
