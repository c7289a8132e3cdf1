use std::time::Duration;
use thiserror::Error;
use turing_contract::ContractError;
use turing_types::{AmountError, TxHash};
use turing_wallet::ConnectError;

use crate::config::ConfigError;
use crate::ranking::ProjectionError;
use crate::session::OperationKind;

/// Why human input was refused before anything was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("no participant selected")]
    MissingName,

    #[error("no amount entered")]
    MissingAmount,

    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),
}

/// Why a submitted transaction never reached a successful confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfirmationError {
    #[error("{0}")]
    Failed(ContractError),

    #[error("not confirmed within {0:?}")]
    TimedOut(Duration),
}

/// Every failure a client operation can surface.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no wallet provider detected")]
    NoWalletProvider,

    #[error("wallet authorisation rejected: {0}")]
    UserRejected(String),

    #[error("wallet provider error: {0}")]
    Provider(String),

    #[error("missing input: {0}")]
    MissingInput(#[from] InputError),

    #[error("voting is disabled")]
    VotingDisabled,

    #[error("{0} is still in progress")]
    OperationInProgress(OperationKind),

    #[error("{operation} submission failed: {source}")]
    SubmitFailure {
        operation: OperationKind,
        source: ContractError,
    },

    #[error("{operation} confirmation failed: {source}")]
    ConfirmationFailure {
        operation: OperationKind,
        source: ConfirmationError,
    },

    #[error("{operation} confirmed in {tx_hash} but the ranking refresh failed: {source}")]
    Reconciliation {
        operation: OperationKind,
        tx_hash: TxHash,
        source: ProjectionError,
    },

    #[error("ranking update failed: {0}")]
    Projection(#[source] ProjectionError),

    #[error("failed to load roster: {0}")]
    RosterLoad(#[source] ContractError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// The single human-readable message the presentation layer shows.
    pub fn notice(&self) -> String {
        match self {
            ClientError::NoWalletProvider => "Wallet not found.".into(),
            ClientError::UserRejected(_) | ClientError::Provider(_) => {
                "Failed to connect to the wallet. Check the console.".into()
            }
            ClientError::MissingInput(_) => "Fill in all fields.".into(),
            ClientError::VotingDisabled => "Voting is currently disabled.".into(),
            ClientError::OperationInProgress(_) => {
                "Another operation is still processing.".into()
            }
            ClientError::SubmitFailure { operation, .. }
            | ClientError::ConfirmationFailure { operation, .. } => {
                operation.failure_notice().into()
            }
            ClientError::Reconciliation { operation, .. } => format!(
                "{} The ranking could not be refreshed and may be stale until the next refresh.",
                operation.success_notice()
            ),
            ClientError::Projection(_) => "Failed to update the ranking. Check the console.".into(),
            ClientError::RosterLoad(_) => "Failed to load codinomes. Check the console.".into(),
            ClientError::Config(_) => "Invalid client configuration.".into(),
        }
    }

    /// Whether the mutation took effect on-chain despite this error.
    pub fn is_degraded_success(&self) -> bool {
        matches!(self, ClientError::Reconciliation { .. })
    }
}

impl From<ConnectError> for ClientError {
    fn from(e: ConnectError) -> Self {
        match e {
            ConnectError::NoWalletProvider => ClientError::NoWalletProvider,
            ConnectError::UserRejected(msg) => ClientError::UserRejected(msg),
            ConnectError::Provider(msg) => ClientError::Provider(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconciliation_is_reported_as_degraded_success() {
        let err = ClientError::Reconciliation {
            operation: OperationKind::IssueTokens,
            tx_hash: TxHash::ZERO,
            source: ProjectionError::Roster(ContractError::Rejected("down".into())),
        };
        assert!(err.is_degraded_success());
        assert!(err.notice().starts_with("Tokens issued successfully!"));
        assert!(err.notice().contains("stale"));
    }

    #[test]
    fn failure_notices_name_the_operation() {
        let err = ClientError::SubmitFailure {
            operation: OperationKind::CastVote,
            source: ContractError::Declined("denied".into()),
        };
        assert_eq!(err.notice(), "Failed to vote. Check the console.");
        assert!(!err.is_degraded_success());
    }

    #[test]
    fn connect_errors_convert() {
        assert!(matches!(
            ClientError::from(ConnectError::NoWalletProvider),
            ClientError::NoWalletProvider
        ));
        assert!(matches!(
            ClientError::from(ConnectError::UserRejected("no".into())),
            ClientError::UserRejected(_)
        ));
    }

    #[test]
    fn input_errors_share_one_notice() {
        for input in [
            InputError::MissingName,
            InputError::MissingAmount,
            InputError::InvalidAmount(AmountError::Empty),
        ] {
            assert_eq!(ClientError::from(input).notice(), "Fill in all fields.");
        }
    }
}
