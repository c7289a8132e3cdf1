use thiserror::Error;
use turing_types::TxHash;
use turing_wallet::RpcError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("signature declined: {0}")]
    Declined(String),

    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    #[error("transaction {0} was dropped by the network")]
    Dropped(TxHash),

    #[error("undecodable contract response: {0}")]
    Decode(String),

    #[error("rpc failure: {0}")]
    Rpc(#[from] RpcError),
}

impl ContractError {
    /// Classify a failed write submission.
    pub fn from_submission(e: RpcError) -> Self {
        match e {
            e if e.is_user_rejection() => ContractError::Declined(e.to_string()),
            RpcError::Rpc { message, .. } => ContractError::Rejected(message),
            other => ContractError::Rpc(other),
        }
    }
}
