//! The aggregation pipeline joining farm configuration with on-chain state.

use {
    crate::{
        config::{FarmConfig, ReferenceLp},
        liquidity::{LiquidityFetcher, LiquiditySnapshot},
        metrics::{self, AllocationTotals, FarmAllocation, FarmMetrics},
        pool_info::{ControllerTotals, PoolAllocation, PoolInfoFetcher},
        prices::{PriceResolving, PricedFarm, ReferencePairResolver},
    },
    alloy::primitives::Address,
    anyhow::Context,
    multicall::{BatchCallError, BatchCalling},
    serde::Serialize,
    std::sync::Arc,
    tracing::instrument,
};

/// A fully aggregated farm: static configuration joined with liquidity
/// metrics and reward allocation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Farm {
    #[serde(flatten)]
    pub config: FarmConfig,
    #[serde(flatten)]
    pub metrics: FarmMetrics,
    #[serde(flatten)]
    pub allocation: FarmAllocation,
}

#[derive(Debug, thiserror::Error)]
pub enum FarmFetchError {
    #[error(transparent)]
    BatchCall(#[from] BatchCallError),
    #[error("unable to derive metrics for farm {lp_symbol} at index {index}")]
    Computation {
        index: usize,
        lp_symbol: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Aggregates the configured farm list into priced farms. All reads for one
/// fetch go through the same batching backend, so a fetch either observes a
/// consistent snapshot or fails as a whole.
pub struct FarmFetcher {
    pool_info: PoolInfoFetcher,
    liquidity: LiquidityFetcher,
    prices: Arc<dyn PriceResolving>,
}

impl FarmFetcher {
    pub fn new(
        batcher: Arc<dyn BatchCalling>,
        controller: Address,
        prices: Arc<dyn PriceResolving>,
    ) -> Self {
        Self {
            pool_info: PoolInfoFetcher::new(batcher.clone(), controller),
            liquidity: LiquidityFetcher::new(batcher, controller),
            prices,
        }
    }

    /// Creates a fetcher pricing farms through the chain's reference pair.
    pub fn with_reference_prices(batcher: Arc<dyn BatchCalling>, controller: Address) -> Self {
        Self::new(batcher, controller, Arc::new(ReferencePairResolver))
    }

    pub async fn fetch_totals(&self) -> Result<ControllerTotals, BatchCallError> {
        self.pool_info.fetch_totals().await
    }

    /// Fetches and aggregates every configured farm. The allocation and
    /// liquidity batches run concurrently and their results merge by input
    /// index. Any failed farm fails the whole fetch.
    #[instrument(skip_all, fields(farms = farms.len()))]
    pub async fn fetch(
        &self,
        farms: &[FarmConfig],
        totals: &AllocationTotals,
        reference: &ReferenceLp,
    ) -> Result<Vec<PricedFarm>, FarmFetchError> {
        let (allocations, snapshots) =
            futures::try_join!(self.pool_info.fetch(farms), self.liquidity.fetch(farms))?;

        let mut aggregated = Vec::with_capacity(farms.len());
        for (index, farm) in farms.iter().enumerate() {
            match aggregate_farm(farm, allocations.get(index), snapshots.get(index), totals) {
                Ok(farm) => aggregated.push(farm),
                Err(source) => {
                    tracing::error!(
                        ?farm,
                        index,
                        allocation = ?allocations.get(index),
                        snapshot = ?snapshots.get(index),
                        ?totals,
                        ?source,
                        "farm aggregation failed"
                    );
                    return Err(FarmFetchError::Computation {
                        index,
                        lp_symbol: farm.lp_symbol.clone(),
                        source,
                    });
                }
            }
        }
        Ok(self.prices.resolve(aggregated, reference))
    }
}

fn aggregate_farm(
    config: &FarmConfig,
    allocation: Option<&Option<PoolAllocation>>,
    snapshot: Option<&LiquiditySnapshot>,
    totals: &AllocationTotals,
) -> anyhow::Result<Farm> {
    let allocation = allocation.context("missing allocation result")?;
    let snapshot = snapshot.context("missing liquidity snapshot")?;
    let metrics = metrics::derive(config, snapshot)?;
    let allocation = metrics::allocation(allocation.as_ref(), totals);
    Ok(Farm {
        config: config.clone(),
        metrics,
        allocation,
    })
}
