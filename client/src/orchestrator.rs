//! TransactionOrchestrator: the single-flight state machine for writes.
//!
//! ```text
//! validate ─► Idle ─► Submitting ─► AwaitingConfirmation ─► Reconciling ─► Idle
//!                         │                  │
//!                         └──────► Failed ◄──┘ ─► Idle
//! ```
//!
//! Validation and the client-side voting check run before the pending slot
//! is taken, so refused input never blocks other operations. Once taken, the
//! slot is released on every exit path by [`PendingSlot`]'s `Drop`.

use serde::Serialize;
use std::sync::Mutex;
use std::time::Duration;
use tracing::Instrument;
use turing_contract::{PendingTx, TokenContract, TxReceipt, WriteCall};
use turing_types::TokenAmount;

use crate::error::{ClientError, ConfirmationError, InputError};
use crate::ranking::RankingProjector;
use crate::session::{self, OperationKind, Phase, SessionState};
use crate::tracing_spans::operation_span;

/// Human input for one mutating operation, as the presentation layer has it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationRequest {
    IssueTokens { name: String, amount: String },
    CastVote { name: String, amount: String },
    EnableVoting,
    DisableVoting,
}

impl OperationRequest {
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationRequest::IssueTokens { .. } => OperationKind::IssueTokens,
            OperationRequest::CastVote { .. } => OperationKind::CastVote,
            OperationRequest::EnableVoting => OperationKind::EnableVoting,
            OperationRequest::DisableVoting => OperationKind::DisableVoting,
        }
    }

    /// Check required fields and convert the amount to base units.
    ///
    /// This is the only place a human-decimal string becomes a
    /// [`TokenAmount`].
    pub fn validate(&self) -> Result<WriteCall, InputError> {
        match self {
            OperationRequest::IssueTokens { name, amount } => {
                let (name, amount) = named_amount(name, amount)?;
                Ok(WriteCall::IssueToken { name, amount })
            }
            OperationRequest::CastVote { name, amount } => {
                let (name, amount) = named_amount(name, amount)?;
                Ok(WriteCall::Vote { name, amount })
            }
            OperationRequest::EnableVoting => Ok(WriteCall::VotingOn),
            OperationRequest::DisableVoting => Ok(WriteCall::VotingOff),
        }
    }
}

fn named_amount(name: &str, amount: &str) -> Result<(String, TokenAmount), InputError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InputError::MissingName);
    }
    if amount.trim().is_empty() {
        return Err(InputError::MissingAmount);
    }
    Ok((name.to_string(), TokenAmount::parse_decimal(amount)?))
}

/// A confirmed and fully reconciled operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Confirmed {
    pub operation: OperationKind,
    pub receipt: TxReceipt,
}

impl Confirmed {
    pub fn notice(&self) -> &'static str {
        self.operation.success_notice()
    }
}

/// Occupancy of the session's pending slot. Dropping it returns the
/// machine to `Idle`.
struct PendingSlot<'a> {
    state: &'a Mutex<SessionState>,
}

impl<'a> PendingSlot<'a> {
    fn acquire(state: &'a Mutex<SessionState>, kind: OperationKind) -> Result<Self, ClientError> {
        let mut guard = session::lock(state);
        if let Some(current) = guard.pending_operation() {
            return Err(ClientError::OperationInProgress(current));
        }
        if kind == OperationKind::CastVote && !guard.voting_enabled() {
            return Err(ClientError::VotingDisabled);
        }
        guard
            .try_begin(kind)
            .map_err(ClientError::OperationInProgress)?;
        Ok(Self { state })
    }

    fn enter(&self, phase: Phase) {
        session::lock(self.state).set_phase(phase);
    }
}

impl Drop for PendingSlot<'_> {
    fn drop(&mut self) {
        session::lock(self.state).finish();
    }
}

pub struct TransactionOrchestrator<'a, C: ?Sized> {
    contract: &'a C,
    state: &'a Mutex<SessionState>,
    confirmation_timeout: Option<Duration>,
}

impl<'a, C: TokenContract + ?Sized> TransactionOrchestrator<'a, C> {
    pub(crate) fn new(
        contract: &'a C,
        state: &'a Mutex<SessionState>,
        confirmation_timeout: Option<Duration>,
    ) -> Self {
        Self {
            contract,
            state,
            confirmation_timeout,
        }
    }

    /// Run one mutating operation to completion.
    pub async fn execute(&self, request: OperationRequest) -> Result<Confirmed, ClientError> {
        let kind = request.kind();
        self.run(kind, request).instrument(operation_span(kind)).await
    }

    async fn run(
        &self,
        kind: OperationKind,
        request: OperationRequest,
    ) -> Result<Confirmed, ClientError> {
        let call = request.validate().map_err(|e| {
            tracing::warn!(error = %e, "input refused");
            ClientError::MissingInput(e)
        })?;

        let slot = PendingSlot::acquire(self.state, kind).map_err(|e| {
            tracing::warn!(error = %e, "operation refused");
            e
        })?;

        slot.enter(Phase::Submitting);
        let pending = match self.contract.submit(&call).await {
            Ok(pending) => pending,
            Err(source) => {
                slot.enter(Phase::Failed);
                tracing::warn!(%call, error = %source, "submission failed");
                return Err(ClientError::SubmitFailure {
                    operation: kind,
                    source,
                });
            }
        };

        slot.enter(Phase::AwaitingConfirmation);
        tracing::debug!(tx = %pending.hash, "awaiting confirmation");
        let receipt = match self.await_confirmation(&pending).await {
            Ok(receipt) => receipt,
            Err(source) => {
                slot.enter(Phase::Failed);
                tracing::warn!(tx = %pending.hash, error = %source, "confirmation failed");
                return Err(ClientError::ConfirmationFailure {
                    operation: kind,
                    source,
                });
            }
        };

        slot.enter(Phase::Reconciling);
        tracing::info!(tx = %receipt.tx_hash, block = receipt.block_number, "transaction confirmed");
        let projection = RankingProjector::new(self.contract).project().await;

        let outcome = {
            let mut state = session::lock(self.state);
            if let Some(enabled) = kind.voting_target() {
                state.set_voting_enabled(enabled);
            }
            match projection {
                Ok(projection) => {
                    state.commit_projection(projection);
                    Ok(Confirmed {
                        operation: kind,
                        receipt,
                    })
                }
                Err(source) => Err(ClientError::Reconciliation {
                    operation: kind,
                    tx_hash: receipt.tx_hash,
                    source,
                }),
            }
        };

        match &outcome {
            Ok(_) => tracing::info!("ranking reconciled"),
            Err(e) => tracing::error!(error = %e, "confirmed on-chain but ranking is stale"),
        }
        drop(slot);
        outcome
    }

    async fn await_confirmation(&self, pending: &PendingTx) -> Result<TxReceipt, ConfirmationError> {
        let wait = self.contract.wait_for_confirmation(pending);
        match self.confirmation_timeout {
            Some(limit) => tokio::time::timeout(limit, wait)
                .await
                .map_err(|_| ConfirmationError::TimedOut(limit))?
                .map_err(ConfirmationError::Failed),
            None => wait.await.map_err(ConfirmationError::Failed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(name: &str, amount: &str) -> OperationRequest {
        OperationRequest::IssueTokens {
            name: name.into(),
            amount: amount.into(),
        }
    }

    #[test]
    fn validation_converts_amount_once() {
        let call = issue(" Alpha ", "1.5").validate().unwrap();
        assert_eq!(
            call,
            WriteCall::IssueToken {
                name: "Alpha".into(),
                amount: TokenAmount::parse_decimal("1.5").unwrap(),
            }
        );
    }

    #[test]
    fn validation_requires_name_and_amount() {
        assert_eq!(issue("", "1").validate(), Err(InputError::MissingName));
        assert_eq!(issue("Alpha", " ").validate(), Err(InputError::MissingAmount));
        assert!(matches!(
            OperationRequest::CastVote {
                name: "Alpha".into(),
                amount: "lots".into()
            }
            .validate(),
            Err(InputError::InvalidAmount(_))
        ));
    }

    #[test]
    fn toggles_need_no_input() {
        assert_eq!(OperationRequest::EnableVoting.validate(), Ok(WriteCall::VotingOn));
        assert_eq!(OperationRequest::DisableVoting.validate(), Ok(WriteCall::VotingOff));
        assert_eq!(OperationRequest::DisableVoting.kind(), OperationKind::DisableVoting);
    }
}
