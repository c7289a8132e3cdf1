//! Wallet provider gateway for the Turing token client.
//!
//! Provides the one step that must finish before anything else runs:
//! - Detecting a wallet provider (absent provider is a distinct outcome)
//! - Requesting account authorisation from it
//! - Checking the provider is on the expected network
//! - Producing the network-bound [`SignerContext`] the contract binding uses
//!
//! The [`JsonRpcTransport`] here is shared with the contract binding, which
//! talks to the same endpoint.

pub mod error;
pub mod gateway;
pub mod provider;
pub mod rpc;

pub use error::{ConnectError, RpcError};
pub use gateway::{Connection, ProviderGateway, SignerContext};
pub use provider::{JsonRpcWallet, WalletProvider};
pub use rpc::JsonRpcTransport;
