//! Batched read-only contract calls through the canonical Multicall3
//! deployment.

use {
    alloy::{
        primitives::{Address, Bytes},
        providers::{DynProvider, Provider, ProviderBuilder},
        rpc::types::TransactionRequest,
        sol_types::SolCall,
    },
    async_trait::async_trait,
    contracts::Multicall3,
    thiserror::Error,
};

/// A single read-only sub-call of a batch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Call {
    pub to: Address,
    pub data: Bytes,
}

#[derive(Debug, Error)]
pub enum BatchCallError {
    #[error("batched call failed: {0}")]
    Transport(#[from] alloy::transports::TransportError),
    #[error("unable to decode batch response: {0}")]
    Decode(#[from] alloy::sol_types::Error),
    #[error("batch returned {actual} results, expected {expected}")]
    ResultCount { expected: usize, actual: usize },
}

/// Atomic execution of a batch of read-only calls. Implementations return
/// exactly one result per call, in call order, or fail the batch as a whole.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait BatchCalling: Send + Sync {
    async fn execute(&self, calls: Vec<Call>) -> Result<Vec<Bytes>, BatchCallError>;
}

/// Batch client backed by Multicall3's `aggregate`, which reverts the whole
/// batch whenever a single sub-call reverts.
pub struct Multicall {
    provider: DynProvider,
    address: Address,
}

impl Multicall {
    pub fn new(provider: DynProvider, address: Address) -> Self {
        Self { provider, address }
    }

    /// Connects to the canonical Multicall3 deployment shared by all
    /// supported chains.
    pub fn deployed(provider: DynProvider) -> Self {
        Self::new(provider, contracts::MULTICALL3)
    }
}

#[async_trait]
impl BatchCalling for Multicall {
    #[tracing::instrument(skip_all, fields(calls = calls.len()))]
    async fn execute(&self, calls: Vec<Call>) -> Result<Vec<Bytes>, BatchCallError> {
        let expected = calls.len();
        let aggregate = Multicall3::aggregateCall {
            calls: calls
                .into_iter()
                .map(|call| Multicall3::Call {
                    target: call.to,
                    callData: call.data,
                })
                .collect(),
        };
        let request = TransactionRequest::default()
            .to(self.address)
            .input(aggregate.abi_encode().into());
        let response = self.provider.call(request).await?;
        let aggregated = Multicall3::aggregateCall::abi_decode_returns(&response)?;
        if aggregated.returnData.len() != expected {
            return Err(BatchCallError::ResultCount {
                expected,
                actual: aggregated.returnData.len(),
            });
        }
        tracing::debug!(block = %aggregated.blockNumber, "batch executed");
        Ok(aggregated.returnData)
    }
}

/// Creates an HTTP provider for use with [`Multicall::deployed`].
pub fn provider(url: &str) -> anyhow::Result<DynProvider> {
    Ok(ProviderBuilder::new().connect_http(url.parse()?).erased())
}
