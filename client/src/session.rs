//! Session state: the single in-memory record of what the client knows.
//!
//! Read access is public. Every mutation is `pub(crate)` and only called
//! from the orchestrator's transition points and the client's read paths.

use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use turing_types::{Account, Participant, RankingEntry};

use crate::ranking::Projection;

/// A mutating operation that can occupy the pending slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    IssueTokens,
    CastVote,
    EnableVoting,
    DisableVoting,
}

impl OperationKind {
    /// Notice shown once the operation is confirmed.
    pub fn success_notice(&self) -> &'static str {
        match self {
            OperationKind::IssueTokens => "Tokens issued successfully!",
            OperationKind::CastVote => "Vote cast successfully!",
            OperationKind::EnableVoting => "Voting enabled successfully!",
            OperationKind::DisableVoting => "Voting disabled successfully!",
        }
    }

    /// Notice shown when the operation did not take effect.
    pub fn failure_notice(&self) -> &'static str {
        match self {
            OperationKind::IssueTokens => "Failed to issue tokens. Check the console.",
            OperationKind::CastVote => "Failed to vote. Check the console.",
            OperationKind::EnableVoting | OperationKind::DisableVoting => {
                "Failed to change the voting state. Check the console."
            }
        }
    }

    /// The voting flag a confirmed toggle establishes.
    pub fn voting_target(&self) -> Option<bool> {
        match self {
            OperationKind::EnableVoting => Some(true),
            OperationKind::DisableVoting => Some(false),
            _ => None,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::IssueTokens => "issue_tokens",
            OperationKind::CastVote => "cast_vote",
            OperationKind::EnableVoting => "enable_voting",
            OperationKind::DisableVoting => "disable_voting",
        };
        f.write_str(name)
    }
}

/// Where the transaction state machine currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    AwaitingConfirmation,
    Reconciling,
    Failed,
}

/// Everything the presentation layer renders, as one consistent copy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub account: Account,
    pub roster: Vec<Participant>,
    pub ranking: Vec<RankingEntry>,
    pub voting_enabled: bool,
    pub pending: bool,
    pub pending_operation: Option<OperationKind>,
    pub phase: Phase,
}

#[derive(Debug)]
pub struct SessionState {
    account: Account,
    roster: Vec<Participant>,
    ranking: Vec<RankingEntry>,
    voting_enabled: bool,
    pending: Option<OperationKind>,
    phase: Phase,
    /// Bumped on every ranking commit; reads that started before a commit
    /// are discarded.
    ranking_epoch: u64,
}

impl SessionState {
    pub(crate) fn new(account: Account, voting_enabled: bool) -> Self {
        Self {
            account,
            roster: Vec::new(),
            ranking: Vec::new(),
            voting_enabled,
            pending: None,
            phase: Phase::Idle,
            ranking_epoch: 0,
        }
    }

    pub fn account(&self) -> Account {
        self.account
    }

    pub fn roster(&self) -> &[Participant] {
        &self.roster
    }

    pub fn ranking(&self) -> &[RankingEntry] {
        &self.ranking
    }

    pub fn voting_enabled(&self) -> bool {
        self.voting_enabled
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_operation(&self) -> Option<OperationKind> {
        self.pending
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            account: self.account,
            roster: self.roster.clone(),
            ranking: self.ranking.clone(),
            voting_enabled: self.voting_enabled,
            pending: self.is_pending(),
            pending_operation: self.pending,
            phase: self.phase,
        }
    }

    // ── Pending slot ───────────────────────────────────────────────────

    /// Occupy the pending slot, or return the operation already holding it.
    pub(crate) fn try_begin(&mut self, kind: OperationKind) -> Result<(), OperationKind> {
        if let Some(current) = self.pending {
            return Err(current);
        }
        self.pending = Some(kind);
        self.phase = Phase::Idle;
        Ok(())
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn finish(&mut self) {
        self.pending = None;
        self.phase = Phase::Idle;
    }

    pub(crate) fn set_voting_enabled(&mut self, enabled: bool) {
        self.voting_enabled = enabled;
    }

    // ── Roster and ranking ─────────────────────────────────────────────

    pub(crate) fn ranking_epoch(&self) -> u64 {
        self.ranking_epoch
    }

    /// Replace the roster with `names`, keeping addresses already resolved.
    pub(crate) fn replace_roster(&mut self, names: Vec<String>) {
        let roster = names
            .into_iter()
            .map(|name| {
                let known = self
                    .roster
                    .iter()
                    .find(|p| p.name == name)
                    .and_then(|p| p.address);
                Participant {
                    name,
                    address: known,
                }
            })
            .collect();
        self.roster = roster;
    }

    /// Commit a post-confirmation projection unconditionally.
    pub(crate) fn commit_projection(&mut self, projection: Projection) {
        self.roster = projection.roster;
        self.ranking = projection.ranking;
        self.ranking_epoch += 1;
    }

    /// Commit a read-side projection if nothing was committed since
    /// `started_at`. Returns whether it was applied.
    pub(crate) fn commit_refresh(&mut self, started_at: u64, projection: Projection) -> bool {
        if self.ranking_epoch != started_at {
            return false;
        }
        self.commit_projection(projection);
        true
    }
}

/// Lock the session, recovering from poisoning: every mutation above leaves
/// the state consistent, so a panic elsewhere cannot corrupt it.
pub(crate) fn lock(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
