//! Nullable infrastructure for deterministic testing.
//!
//! The wallet provider and the contract are external authorities, so both
//! sit behind traits. This crate provides in-memory implementations that:
//! - Return scripted, deterministic results
//! - Record every call for assertions
//! - Can hold confirmations open and inject failures on demand
//! - Never touch the network
//!
//! Usage: hand these to `turing-client` in place of the JSON-RPC types.

pub mod contract;
pub mod wallet;

pub use contract::{ContractCall, NullContract};
pub use wallet::{NullWallet, DEV_CHAIN_ID};
