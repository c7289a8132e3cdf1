//! ProviderGateway: wallet detection and account authorisation.

use serde::Serialize;
use turing_types::Account;

use crate::error::ConnectError;
use crate::provider::WalletProvider;

/// The network-bound signing identity every write is sent from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SignerContext {
    pub account: Account,
    pub chain_id: u64,
}

/// Outcome of a successful [`ProviderGateway::connect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Connection {
    pub account: Account,
    pub signer: SignerContext,
}

/// Wraps the (possibly absent) wallet provider.
pub struct ProviderGateway<P> {
    provider: Option<P>,
    expected_chain_id: Option<u64>,
}

impl<P: WalletProvider> ProviderGateway<P> {
    /// `provider` is the result of detection; `None` when no wallet exists.
    pub fn new(provider: Option<P>) -> Self {
        Self {
            provider,
            expected_chain_id: None,
        }
    }

    /// Require the provider to be on `chain_id`; a mismatch is a provider error.
    pub fn with_expected_chain(mut self, chain_id: Option<u64>) -> Self {
        self.expected_chain_id = chain_id;
        self
    }

    pub fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    /// Authorise an account and derive the signing context.
    ///
    /// Nothing is retried: rejections and provider failures are returned to
    /// the caller, who may call `connect` again.
    pub async fn connect(&self) -> Result<Connection, ConnectError> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            tracing::warn!("no wallet provider detected");
            ConnectError::NoWalletProvider
        })?;

        let accounts = provider.request_accounts().await.map_err(|e| {
            let err = ConnectError::from(e);
            tracing::warn!(error = %err, "account authorisation failed");
            err
        })?;

        let address = accounts.first().copied().ok_or_else(|| {
            tracing::warn!("wallet authorised no accounts");
            ConnectError::UserRejected("wallet authorised no accounts".into())
        })?;

        let chain_id = provider.chain_id().await.map_err(|e| {
            tracing::warn!(error = %e, "failed to read provider chain id");
            ConnectError::Provider(e.to_string())
        })?;

        if let Some(expected) = self.expected_chain_id {
            if expected != chain_id {
                tracing::warn!(expected, actual = chain_id, "wallet on wrong network");
                return Err(ConnectError::Provider(format!(
                    "wallet is on chain {chain_id}, expected chain {expected}"
                )));
            }
        }

        let account = Account::new(address);
        tracing::info!(%account, chain_id, "wallet connected");

        Ok(Connection {
            account,
            signer: SignerContext { account, chain_id },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RpcError, USER_REJECTED_CODE};
    use async_trait::async_trait;
    use turing_types::Address;

    struct ScriptedProvider {
        accounts: Result<Vec<Address>, RpcError>,
        chain_id: u64,
    }

    #[async_trait]
    impl WalletProvider for ScriptedProvider {
        async fn request_accounts(&self) -> Result<Vec<Address>, RpcError> {
            self.accounts.clone()
        }

        async fn chain_id(&self) -> Result<u64, RpcError> {
            Ok(self.chain_id)
        }
    }

    fn provider(accounts: Result<Vec<Address>, RpcError>) -> ScriptedProvider {
        ScriptedProvider {
            accounts,
            chain_id: 31337,
        }
    }

    #[tokio::test]
    async fn missing_provider_is_reported() {
        let gateway = ProviderGateway::<ScriptedProvider>::new(None);
        assert_eq!(gateway.connect().await, Err(ConnectError::NoWalletProvider));
    }

    #[tokio::test]
    async fn first_authorised_account_is_used() {
        let a = Address::with_last_byte(1);
        let b = Address::with_last_byte(2);
        let gateway = ProviderGateway::new(Some(provider(Ok(vec![a, b]))));
        let conn = gateway.connect().await.unwrap();
        assert_eq!(conn.account.address(), a);
        assert_eq!(conn.signer.chain_id, 31337);
        assert_eq!(conn.signer.account, conn.account);
    }

    #[tokio::test]
    async fn rejection_is_user_rejected() {
        let gateway = ProviderGateway::new(Some(provider(Err(RpcError::Rpc {
            code: USER_REJECTED_CODE,
            message: "denied".into(),
        }))));
        assert!(matches!(
            gateway.connect().await,
            Err(ConnectError::UserRejected(_))
        ));
    }

    #[tokio::test]
    async fn empty_account_list_is_user_rejected() {
        let gateway = ProviderGateway::new(Some(provider(Ok(vec![]))));
        assert!(matches!(
            gateway.connect().await,
            Err(ConnectError::UserRejected(_))
        ));
    }

    #[tokio::test]
    async fn chain_mismatch_is_provider_error() {
        let gateway = ProviderGateway::new(Some(provider(Ok(vec![Address::with_last_byte(1)]))))
            .with_expected_chain(Some(1));
        assert!(matches!(
            gateway.connect().await,
            Err(ConnectError::Provider(_))
        ));
    }
}
