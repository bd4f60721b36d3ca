//! Static farm configuration as shipped with the exchange frontends.

use {
    alloy::primitives::{Address, address},
    contracts::chains,
    maplit::hashmap,
    serde::{Deserialize, Serialize},
    std::collections::HashMap,
};

/// One side of a farmed pair.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmToken {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

/// How a farm's liquidity lives on chain.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PoolKind {
    /// A constant product pair. Reserves are the pair's token balances.
    #[default]
    Classic,
    /// A pair backed by a stable swap contract. Reserves and the base token
    /// quotation are read from the swap, whose coin 0 must be the farm's
    /// base token and coin 1 its quote token.
    Stable { swap_address: Address },
}

impl PoolKind {
    pub fn is_classic(&self) -> bool {
        matches!(self, Self::Classic)
    }
}

/// A single entry of the static farm list.
///
/// Farms without a pool id exist only to feed pricing (helper pairs) and
/// carry no reward allocation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmConfig {
    /// Index of the farm's pool in the controller. Pool id 0 is a valid
    /// pool and distinct from having no pool id at all.
    #[serde(default)]
    pub pid: Option<u64>,
    pub lp_symbol: String,
    pub lp_address: Address,
    pub token: FarmToken,
    pub quote_token: FarmToken,
    #[serde(
        default,
        rename = "stableSwapAddress",
        with = "stable_swap_address",
        skip_serializing_if = "PoolKind::is_classic"
    )]
    pub kind: PoolKind,
}

impl FarmConfig {
    /// Identity of a farm within one chain's farm list. Helper pairs share
    /// the `None` pool id, so the pair address is part of the identity.
    pub fn id(&self) -> (Address, Option<u64>) {
        (self.lp_address, self.pid)
    }
}

/// Serializes [`PoolKind`] as the optional `stableSwapAddress` field used by
/// the farm list files.
mod stable_swap_address {
    use {
        super::PoolKind,
        alloy::primitives::Address,
        serde::{Deserialize, Deserializer, Serialize, Serializer},
    };

    pub fn serialize<S>(kind: &PoolKind, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match kind {
            PoolKind::Classic => serializer.serialize_none(),
            PoolKind::Stable { swap_address } => swap_address.serialize(serializer),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<PoolKind, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Address>::deserialize(deserializer)? {
            Some(swap_address) => PoolKind::Stable { swap_address },
            None => PoolKind::Classic,
        })
    }
}

/// The pair anchoring a chain's native token to a stable token, used to
/// express farm values in fiat.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceLp {
    pub address: Address,
    pub native_symbol: String,
    pub stable_symbol: String,
}

/// Reference pairs keyed by chain id.
#[derive(Clone, Debug, Default)]
pub struct ReferenceLps(HashMap<u64, ReferenceLp>);

impl ReferenceLps {
    pub fn new(table: HashMap<u64, ReferenceLp>) -> Self {
        Self(table)
    }

    /// The reference pairs of the production deployments. Chains whose
    /// deployment has no native/stable pair yet are absent.
    pub fn defaults() -> Self {
        fn lp(address: Address, native_symbol: &str, stable_symbol: &str) -> ReferenceLp {
            ReferenceLp {
                address,
                native_symbol: native_symbol.to_string(),
                stable_symbol: stable_symbol.to_string(),
            }
        }

        Self(hashmap! {
            chains::BITGERT => lp(
                address!("0x8e7dd0d762f60942e0bd05b1114d6cedf4435a18"),
                "WBRISE",
                "USDTi",
            ),
            chains::DOGECHAIN => lp(
                address!("0x95b9d21a77e91b8c4b7c57628e9fc7d34d1d7379"),
                "WDOGE",
                "USDT",
            ),
            chains::DOKEN => lp(
                address!("0x3ef68d91d420fecc9bbb1b95382f14a19de3f3bb"),
                "WDOKEN",
                "USDT",
            ),
            chains::XDC => lp(
                address!("0xe9450d66a493C3ae6eBC3Bb0B2B01a5107ea8bDb"),
                "WXDC",
                "USDT",
            ),
            chains::CORE => lp(
                address!("0x5ebAE3A840fF34B107D637c8Ed07C3D1D2017178"),
                "WCORE",
                "USDT",
            ),
            chains::XODEX => lp(
                address!("0xe3dd2db66c31b79ed7f4308a182262a904056a19"),
                "WXODEX",
                "USDT",
            ),
            chains::TELOS => lp(
                address!("0x86CA8345bDa0D6052E93f07BE4dcC680Af927d53"),
                "WTLOS",
                "USDT",
            ),
            chains::BASE => lp(
                address!("0xfCe2fcc39738DbCdFF2B4EfD9A0B142eC6BcE4AD"),
                "WETH",
                "USDT",
            ),
        })
    }

    pub fn get(&self, chain_id: u64) -> Option<&ReferenceLp> {
        self.0.get(&chain_id)
    }
}
