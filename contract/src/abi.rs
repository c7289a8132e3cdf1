//! Solidity interface of the Turing contract.

alloy_sol_types::sol! {
    function getCodinomes() external view returns (string[] memory);
    function codinomes(string memory name) external view returns (address);
    function balanceOf(address account) external view returns (uint256);
    function issueToken(string memory codinome, uint256 amount) external;
    function vote(string memory codinome, uint256 amount) external;
    function votingOn() external;
    function votingOff() external;
}
