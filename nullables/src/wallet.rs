//! Nullable wallet provider: scripted authorisation outcomes.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use turing_types::Address;
use turing_wallet::error::USER_REJECTED_CODE;
use turing_wallet::{RpcError, WalletProvider};

/// Local development chain id.
pub const DEV_CHAIN_ID: u64 = 31337;

/// A wallet whose answer to `eth_requestAccounts` is fixed up front.
pub struct NullWallet {
    accounts: Result<Vec<Address>, RpcError>,
    chain_id: u64,
    requests: AtomicUsize,
}

impl NullWallet {
    /// Authorises `account` on the dev chain.
    pub fn authorizing(account: Address) -> Self {
        Self::scripted(Ok(vec![account]))
    }

    /// The human declines the authorisation prompt.
    pub fn rejecting() -> Self {
        Self::scripted(Err(RpcError::Rpc {
            code: USER_REJECTED_CODE,
            message: "User rejected the request.".into(),
        }))
    }

    /// The provider fails for a reason unrelated to the human.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::scripted(Err(RpcError::Transport(message.into())))
    }

    fn scripted(accounts: Result<Vec<Address>, RpcError>) -> Self {
        Self {
            accounts,
            chain_id: DEV_CHAIN_ID,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn on_chain(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// How many times authorisation was requested.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletProvider for NullWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, RpcError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.accounts.clone()
    }

    async fn chain_id(&self) -> Result<u64, RpcError> {
        Ok(self.chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_authorisation_requests() {
        let wallet = NullWallet::authorizing(Address::with_last_byte(9));
        assert_eq!(wallet.request_count(), 0);
        let accounts = wallet.request_accounts().await.unwrap();
        assert_eq!(accounts, vec![Address::with_last_byte(9)]);
        assert_eq!(wallet.request_count(), 1);
    }

    #[tokio::test]
    async fn rejecting_wallet_reports_user_rejection() {
        let err = NullWallet::rejecting().request_accounts().await.unwrap_err();
        assert!(err.is_user_rejection());
    }
}
