//! The wallet provider seam and its JSON-RPC implementation.

use async_trait::async_trait;
use std::time::Duration;
use turing_types::Address;

use crate::error::RpcError;
use crate::rpc::{parse_quantity, JsonRpcTransport};

/// An injected wallet provider (EIP-1193 style).
///
/// Implementations: [`JsonRpcWallet`] for a real endpoint, and the
/// `turing-nullables` wallet for tests.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet to authorise accounts for this session.
    ///
    /// May prompt the human; a refusal surfaces as an EIP-1193 4001 error.
    async fn request_accounts(&self) -> Result<Vec<Address>, RpcError>;

    /// The chain the provider is currently connected to.
    async fn chain_id(&self) -> Result<u64, RpcError>;
}

/// A wallet reached over HTTP JSON-RPC.
#[derive(Clone)]
pub struct JsonRpcWallet {
    transport: JsonRpcTransport,
}

impl JsonRpcWallet {
    pub fn new(transport: JsonRpcTransport) -> Self {
        Self { transport }
    }

    /// Detect a provider at `rpc_url`.
    ///
    /// `None` means no provider is available: no endpoint configured, or the
    /// HTTP client could not be built for it.
    pub fn detect(rpc_url: Option<&str>, timeout: Duration) -> Option<Self> {
        let url = rpc_url.map(str::trim).filter(|u| !u.is_empty())?;
        match JsonRpcTransport::new(url, timeout) {
            Ok(transport) => Some(Self::new(transport)),
            Err(e) => {
                tracing::warn!(%url, error = %e, "wallet provider unusable");
                None
            }
        }
    }

    pub fn transport(&self) -> &JsonRpcTransport {
        &self.transport
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, RpcError> {
        self.transport
            .request("eth_requestAccounts", serde_json::json!([]))
            .await
    }

    async fn chain_id(&self) -> Result<u64, RpcError> {
        let raw: String = self
            .transport
            .request("eth_chainId", serde_json::json!([]))
            .await?;
        parse_quantity(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_requires_an_endpoint() {
        assert!(JsonRpcWallet::detect(None, Duration::from_secs(1)).is_none());
        assert!(JsonRpcWallet::detect(Some("  "), Duration::from_secs(1)).is_none());
        let wallet = JsonRpcWallet::detect(Some("http://127.0.0.1:8545"), Duration::from_secs(1))
            .expect("endpoint configured");
        assert_eq!(wallet.transport().url(), "http://127.0.0.1:8545");
    }
}
