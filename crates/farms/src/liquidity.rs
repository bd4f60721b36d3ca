//! Batched reads of per-farm pair liquidity.

use {
    crate::config::{FarmConfig, PoolKind},
    alloy::{
        primitives::{Address, Bytes, U256},
        sol_types::SolCall,
    },
    contracts::{ERC20, StableSwap},
    multicall::{BatchCallError, BatchCalling, Call},
    number::units,
    std::sync::Arc,
    tracing::instrument,
};

/// Raw liquidity state of one farm.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LiquiditySnapshot {
    /// Reserve of the farm's base token held by the pair.
    pub token_reserve: U256,
    /// Reserve of the farm's quote token held by the pair.
    pub quote_reserve: U256,
    /// LP tokens staked in the farm controller.
    pub staked_lp: U256,
    /// Total LP token supply.
    pub lp_total_supply: U256,
    /// The swap's quotation for one whole base token, present for stable
    /// pairs only.
    pub stable_price: Option<U256>,
}

pub struct LiquidityFetcher {
    pub batcher: Arc<dyn BatchCalling>,
    pub controller: Address,
}

impl LiquidityFetcher {
    pub fn new(batcher: Arc<dyn BatchCalling>, controller: Address) -> Self {
        Self {
            batcher,
            controller,
        }
    }

    /// Reads the liquidity state of all farms in one atomic batch. Results
    /// align with the input order.
    #[instrument(skip_all, fields(farms = farms.len()))]
    pub async fn fetch(
        &self,
        farms: &[FarmConfig],
    ) -> Result<Vec<LiquiditySnapshot>, BatchCallError> {
        let calls: Vec<_> = farms
            .iter()
            .flat_map(|farm| self.farm_calls(farm))
            .collect();
        let expected = calls.len();
        let results = self
            .batcher
            .execute(calls)
            .await
            .inspect_err(|err| tracing::error!(?err, ?farms, "liquidity batch failed"))?;

        let mut remaining = results.as_slice();
        let snapshots = farms
            .iter()
            .map(|farm| {
                let (chunk, rest) = remaining.split_at_checked(call_shape(farm)).ok_or(
                    BatchCallError::ResultCount {
                        expected,
                        actual: results.len(),
                    },
                )?;
                remaining = rest;
                decode_snapshot(farm, chunk)
            })
            .collect::<Result<Vec<_>, _>>()?;
        if !remaining.is_empty() {
            return Err(BatchCallError::ResultCount {
                expected,
                actual: results.len(),
            });
        }
        Ok(snapshots)
    }

    fn farm_calls(&self, farm: &FarmConfig) -> Vec<Call> {
        let balance_of = |token: Address, holder: Address| Call {
            to: token,
            data: ERC20::balanceOfCall { account: holder }.abi_encode().into(),
        };
        let staked = balance_of(farm.lp_address, self.controller);
        let supply = Call {
            to: farm.lp_address,
            data: ERC20::totalSupplyCall {}.abi_encode().into(),
        };

        match farm.kind {
            PoolKind::Classic => vec![
                balance_of(farm.token.address, farm.lp_address),
                balance_of(farm.quote_token.address, farm.lp_address),
                staked,
                supply,
            ],
            PoolKind::Stable { swap_address } => {
                let balances = |i: u64| Call {
                    to: swap_address,
                    data: StableSwap::balancesCall { i: U256::from(i) }
                        .abi_encode()
                        .into(),
                };
                // Asks the swap to price one whole base token.
                let quotation = Call {
                    to: swap_address,
                    data: StableSwap::get_dyCall {
                        i: U256::ZERO,
                        j: U256::from(1u64),
                        dx: units::decimal_multiplier(farm.token.decimals),
                    }
                    .abi_encode()
                    .into(),
                };
                vec![balances(0), balances(1), staked, supply, quotation]
            }
        }
    }
}

fn call_shape(farm: &FarmConfig) -> usize {
    match farm.kind {
        PoolKind::Classic => 4,
        PoolKind::Stable { .. } => 5,
    }
}

fn decode_snapshot(farm: &FarmConfig, results: &[Bytes]) -> Result<LiquiditySnapshot, BatchCallError> {
    Ok(match (farm.kind, results) {
        (PoolKind::Classic, [token, quote, staked, supply]) => LiquiditySnapshot {
            token_reserve: decode_uint::<ERC20::balanceOfCall>(token)?,
            quote_reserve: decode_uint::<ERC20::balanceOfCall>(quote)?,
            staked_lp: decode_uint::<ERC20::balanceOfCall>(staked)?,
            lp_total_supply: decode_uint::<ERC20::totalSupplyCall>(supply)?,
            stable_price: None,
        },
        (PoolKind::Stable { .. }, [token, quote, staked, supply, quotation]) => LiquiditySnapshot {
            token_reserve: decode_uint::<StableSwap::balancesCall>(token)?,
            quote_reserve: decode_uint::<StableSwap::balancesCall>(quote)?,
            staked_lp: decode_uint::<ERC20::balanceOfCall>(staked)?,
            lp_total_supply: decode_uint::<ERC20::totalSupplyCall>(supply)?,
            stable_price: Some(decode_uint::<StableSwap::get_dyCall>(quotation)?),
        },
        _ => {
            return Err(BatchCallError::ResultCount {
                expected: call_shape(farm),
                actual: results.len(),
            });
        }
    })
}

fn decode_uint<C>(data: &Bytes) -> Result<U256, BatchCallError>
where
    C: SolCall<Return = U256>,
{
    Ok(C::abi_decode_returns(data)?)
}
