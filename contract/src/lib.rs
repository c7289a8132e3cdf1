//! Binding for the deployed Turing token/voting contract.
//!
//! [`TokenContract`] is the uniform invocation surface the rest of the
//! client programs against:
//! - reads (`getCodinomes`, `codinomes`, `balanceOf`) return current state
//! - writes (`issueToken`, `vote`, `votingOn`, `votingOff`) return a
//!   [`PendingTx`] that must be confirmed before its effects count
//!
//! Amounts crossing this boundary are always base-unit [`TokenAmount`]s.
//!
//! [`TokenAmount`]: turing_types::TokenAmount

pub mod abi;
pub mod binding;
pub mod error;
pub mod json_rpc;

pub use binding::{PendingTx, TokenContract, TxReceipt, WriteCall};
pub use error::ContractError;
pub use json_rpc::JsonRpcContract;

/// Address of the Turing contract on a fresh local development chain.
pub const DEFAULT_CONTRACT_ADDRESS: turing_types::Address =
    alloy_primitives::address!("5FbDB2315678afecb367f032d93F642f64180aa3");
