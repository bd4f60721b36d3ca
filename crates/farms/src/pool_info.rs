//! Batched reads of pool allocations and controller-wide counters.

use {
    crate::{config::FarmConfig, metrics::AllocationTotals},
    alloy::{
        primitives::{Address, Bytes, U256},
        sol_types::SolCall,
    },
    contracts::FarmController,
    multicall::{BatchCallError, BatchCalling, Call},
    std::sync::Arc,
    tracing::instrument,
};

/// Reward allocation of a single pool as stored in the controller.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAllocation {
    pub alloc_point: U256,
    /// Regular pools share the regular allocation total, special pools the
    /// special one.
    pub is_regular: bool,
}

/// Controller-wide counters framing every pool's allocation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ControllerTotals {
    pub pool_length: U256,
    pub total_regular_alloc_point: U256,
    pub total_special_alloc_point: U256,
    /// Emission rate for regular pools.
    pub reward_per_block: U256,
}

impl ControllerTotals {
    pub fn allocation_totals(&self) -> AllocationTotals {
        AllocationTotals {
            regular: self.total_regular_alloc_point,
            special: self.total_special_alloc_point,
        }
    }
}

pub struct PoolInfoFetcher {
    pub batcher: Arc<dyn BatchCalling>,
    pub controller: Address,
}

impl PoolInfoFetcher {
    pub fn new(batcher: Arc<dyn BatchCalling>, controller: Address) -> Self {
        Self {
            batcher,
            controller,
        }
    }

    /// Reads pool allocations for all farms carrying a pool id, in one
    /// atomic batch. Results align with the input order; farms without a
    /// pool id yield `None`.
    #[instrument(skip_all, fields(farms = farms.len()))]
    pub async fn fetch(
        &self,
        farms: &[FarmConfig],
    ) -> Result<Vec<Option<PoolAllocation>>, BatchCallError> {
        let calls: Vec<_> = farms
            .iter()
            .filter_map(|farm| farm.pid)
            .map(|pid| {
                self.controller_call(
                    FarmController::poolInfoCall {
                        pid: U256::from(pid),
                    }
                    .abi_encode(),
                )
            })
            .collect();
        let expected = calls.len();
        let results = self
            .batcher
            .execute(calls)
            .await
            .inspect_err(|err| tracing::error!(?err, ?farms, "pool allocation batch failed"))?;
        if results.len() != expected {
            return Err(BatchCallError::ResultCount {
                expected,
                actual: results.len(),
            });
        }

        let mut allocations = vec![None; farms.len()];
        for ((index, _), data) in farms
            .iter()
            .enumerate()
            .filter(|(_, farm)| farm.pid.is_some())
            .zip(results)
        {
            let info = FarmController::poolInfoCall::abi_decode_returns(&data)?;
            allocations[index] = Some(PoolAllocation {
                alloc_point: info.allocPoint,
                is_regular: info.isRegular,
            });
        }
        Ok(allocations)
    }

    /// Reads the controller's global allocation counters and reward rate.
    #[instrument(skip_all)]
    pub async fn fetch_totals(&self) -> Result<ControllerTotals, BatchCallError> {
        let calls = vec![
            self.controller_call(FarmController::poolLengthCall {}.abi_encode()),
            self.controller_call(FarmController::totalRegularAllocPointCall {}.abi_encode()),
            self.controller_call(FarmController::totalSpecialAllocPointCall {}.abi_encode()),
            self.controller_call(
                FarmController::rewardPerBlockCall { isRegular: true }.abi_encode(),
            ),
        ];
        let results = self.batcher.execute(calls).await.inspect_err(|err| {
            tracing::error!(
                ?err,
                controller = ?self.controller,
                "controller totals batch failed"
            )
        })?;
        let [pool_length, regular, special, reward]: [Bytes; 4] =
            results
                .try_into()
                .map_err(|results: Vec<Bytes>| BatchCallError::ResultCount {
                    expected: 4,
                    actual: results.len(),
                })?;

        Ok(ControllerTotals {
            pool_length: FarmController::poolLengthCall::abi_decode_returns(&pool_length)?,
            total_regular_alloc_point:
                FarmController::totalRegularAllocPointCall::abi_decode_returns(&regular)?,
            total_special_alloc_point:
                FarmController::totalSpecialAllocPointCall::abi_decode_returns(&special)?,
            reward_per_block: FarmController::rewardPerBlockCall::abi_decode_returns(&reward)?,
        })
    }

    fn controller_call(&self, data: Vec<u8>) -> Call {
        Call {
            to: self.controller,
            data: data.into(),
        }
    }
}
