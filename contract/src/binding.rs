//! The contract invocation surface.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use turing_types::{Address, TokenAmount, TxHash};

use crate::error::ContractError;

/// A state-changing contract call, as submitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum WriteCall {
    IssueToken { name: String, amount: TokenAmount },
    Vote { name: String, amount: TokenAmount },
    VotingOn,
    VotingOff,
}

impl WriteCall {
    /// The contract function this call invokes.
    pub fn function(&self) -> &'static str {
        match self {
            WriteCall::IssueToken { .. } => "issueToken",
            WriteCall::Vote { .. } => "vote",
            WriteCall::VotingOn => "votingOn",
            WriteCall::VotingOff => "votingOff",
        }
    }
}

impl fmt::Display for WriteCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteCall::IssueToken { name, amount } | WriteCall::Vote { name, amount } => {
                write!(f, "{}({name:?}, {amount})", self.function())
            }
            _ => write!(f, "{}()", self.function()),
        }
    }
}

/// Handle to a submitted, not yet confirmed transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTx {
    pub hash: TxHash,
    pub call: WriteCall,
}

/// A transaction that made it into the canonical chain and succeeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
}

/// The deployed contract, bound to the session's signer.
///
/// Reads are side-effect free and may run concurrently in any order. Writes
/// return as soon as the transaction is accepted for broadcast; call
/// [`TokenContract::wait_for_confirmation`] before treating them as durable.
#[async_trait]
pub trait TokenContract: Send + Sync {
    /// `getCodinomes()`: the roster, in contract order.
    async fn list_participant_names(&self) -> Result<Vec<String>, ContractError>;

    /// `codinomes(name)`: the address registered for a name.
    async fn resolve_participant_address(&self, name: &str) -> Result<Address, ContractError>;

    /// `balanceOf(address)`.
    async fn balance_of(&self, address: Address) -> Result<TokenAmount, ContractError>;

    /// `issueToken(name, amount)`.
    async fn issue_tokens(
        &self,
        name: &str,
        amount: TokenAmount,
    ) -> Result<PendingTx, ContractError>;

    /// `vote(name, amount)`.
    async fn cast_vote(&self, name: &str, amount: TokenAmount)
        -> Result<PendingTx, ContractError>;

    /// `votingOn()`.
    async fn enable_voting(&self) -> Result<PendingTx, ContractError>;

    /// `votingOff()`.
    async fn disable_voting(&self) -> Result<PendingTx, ContractError>;

    /// Wait until `tx` is mined. No local timeout: callers that want one wrap
    /// this future themselves.
    async fn wait_for_confirmation(&self, tx: &PendingTx) -> Result<TxReceipt, ContractError>;

    /// Submit any [`WriteCall`] through the matching write operation.
    async fn submit(&self, call: &WriteCall) -> Result<PendingTx, ContractError> {
        match call {
            WriteCall::IssueToken { name, amount } => self.issue_tokens(name, *amount).await,
            WriteCall::Vote { name, amount } => self.cast_vote(name, *amount).await,
            WriteCall::VotingOn => self.enable_voting().await,
            WriteCall::VotingOff => self.disable_voting().await,
        }
    }
}
