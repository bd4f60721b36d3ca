//! Inline contract bindings for the on-chain surface the farm pipeline reads.

use alloy::{
    primitives::{Address, address},
    sol,
};

sol! {
    /// The two ERC20 views needed to size a liquidity pair.
    interface ERC20 {
        function balanceOf(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);
    }

    /// The farm controller holding staked LP tokens and per-pool reward
    /// allocations.
    interface FarmController {
        function poolInfo(uint256 pid)
            external
            view
            returns (
                uint256 accRewardPerShare,
                uint256 lastRewardBlock,
                uint256 allocPoint,
                uint256 totalBoostedShare,
                bool isRegular
            );
        function poolLength() external view returns (uint256 pools);
        function totalRegularAllocPoint() external view returns (uint256);
        function totalSpecialAllocPoint() external view returns (uint256);
        function rewardPerBlock(bool isRegular) external view returns (uint256 amount);
    }

    /// Curve style swap contract backing stable pairs. Token indices follow
    /// the swap's own coin ordering.
    interface StableSwap {
        function balances(uint256 i) external view returns (uint256);
        function get_dy(uint256 i, uint256 j, uint256 dx) external view returns (uint256);
    }

    /// Multicall3's legacy `aggregate` entry point. Unlike `aggregate3` it
    /// reverts the whole batch when any sub-call reverts.
    interface Multicall3 {
        struct Call {
            address target;
            bytes callData;
        }

        function aggregate(Call[] calldata calls)
            external
            payable
            returns (uint256 blockNumber, bytes[] memory returnData);
    }
}

/// Canonical Multicall3 deployment, present at the same address on all
/// supported chains.
pub const MULTICALL3: Address = address!("0xcA11bde05977b3631167028862bE2a173976CA11");

/// Chain ids of the networks the exchange is deployed on.
pub mod chains {
    pub const BITGERT: u64 = 32520;
    pub const DOGECHAIN: u64 = 2000;
    pub const DOKEN: u64 = 61916;
    pub const FUSE: u64 = 122;
    pub const XDC: u64 = 50;
    pub const CORE: u64 = 1116;
    pub const XODEX: u64 = 2415;
    pub const TELOS: u64 = 40;
    pub const BASE: u64 = 8453;
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::sol_types::SolCall, hex_literal::hex};

    #[test]
    fn selectors_match_deployed_contracts() {
        assert_eq!(ERC20::balanceOfCall::SELECTOR, hex!("70a08231"));
        assert_eq!(ERC20::totalSupplyCall::SELECTOR, hex!("18160ddd"));
        assert_eq!(FarmController::poolInfoCall::SELECTOR, hex!("1526fe27"));
        assert_eq!(Multicall3::aggregateCall::SELECTOR, hex!("252dba42"));
    }
}
