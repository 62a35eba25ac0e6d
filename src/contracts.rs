//! Contract Definitions
//!
//! Solidity interface for the V2-style swap router, defined with
//! alloy's `sol!` macro. `#[sol(rpc)]` generates a contract instance
//! type usable with any alloy Provider.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IUniswapV2Router02 {
        function getAmountsOut(uint256 amountIn, address[] calldata path) external view returns (uint256[] memory amounts);
        function swapExactETHForTokens(uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) external payable returns (uint256[] memory amounts);
    }
}
