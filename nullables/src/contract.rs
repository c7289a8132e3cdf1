//! Nullable contract: an in-memory Turing contract that records every call.
//!
//! Writes are validated at submission (the way a node's gas estimation
//! rejects a doomed call) and take effect only when confirmed.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use turing_contract::{ContractError, PendingTx, TokenContract, TxReceipt, WriteCall};
use turing_types::{Address, TokenAmount, TxHash, U256};
use turing_wallet::SignerContext;

/// One call that reached the contract boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContractCall {
    ListNames,
    Resolve(String),
    BalanceOf(Address),
    Submit(WriteCall),
    Confirm(TxHash),
}

#[derive(Default)]
struct State {
    roster: Vec<(String, Address)>,
    balances: HashMap<Address, TokenAmount>,
    voting_on: bool,
    calls: Vec<ContractCall>,
    pending: HashMap<TxHash, WriteCall>,
    next_tx: u64,
    block_number: u64,
    failing_lookups: HashSet<String>,
    fail_roster: bool,
    reject_next_submit: Option<ContractError>,
    fail_next_confirmation: Option<ContractError>,
    bound_to: Option<SignerContext>,
}

/// An in-memory contract. Clones share state, so a test can keep one
/// handle while the client owns another.
#[derive(Clone)]
pub struct NullContract {
    state: Arc<Mutex<State>>,
    held: Arc<watch::Sender<bool>>,
}

impl NullContract {
    pub fn new() -> Self {
        let (held, _) = watch::channel(false);
        Self {
            state: Arc::new(Mutex::new(State {
                voting_on: true,
                ..State::default()
            })),
            held: Arc::new(held),
        }
    }

    /// A contract whose roster and balances (whole tokens) are given in order.
    pub fn with_roster(entries: &[(&str, u64)]) -> Self {
        let contract = Self::new();
        for (name, balance) in entries {
            contract.register(name, TokenAmount::from_tokens(*balance));
        }
        contract
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a participant with a deterministic address.
    pub fn register(&self, name: &str, balance: TokenAmount) -> Address {
        let mut state = self.state();
        let address = participant_address(state.roster.len());
        state.roster.push((name.to_string(), address));
        state.balances.insert(address, balance);
        address
    }

    /// Record the signer this handle was bound to and return a shared clone.
    pub fn bind(&self, signer: &SignerContext) -> Self {
        self.state().bound_to = Some(*signer);
        self.clone()
    }

    pub fn bound_to(&self) -> Option<SignerContext> {
        self.state().bound_to
    }

    // ── Scripting ──────────────────────────────────────────────────────

    /// Confirmations block until [`NullContract::release_confirmations`].
    pub fn hold_confirmations(&self) {
        self.held.send_replace(true);
    }

    pub fn release_confirmations(&self) {
        self.held.send_replace(false);
    }

    /// Every later lookup (address or balance) for `name` fails.
    pub fn fail_lookup(&self, name: &str) {
        self.state().failing_lookups.insert(name.to_string());
    }

    pub fn clear_failures(&self) {
        let mut state = self.state();
        state.failing_lookups.clear();
        state.fail_roster = false;
    }

    pub fn fail_roster(&self) {
        self.state().fail_roster = true;
    }

    pub fn reject_next_submit(&self, error: ContractError) {
        self.state().reject_next_submit = Some(error);
    }

    pub fn fail_next_confirmation(&self, error: ContractError) {
        self.state().fail_next_confirmation = Some(error);
    }

    /// Flip the on-chain voting flag behind the client's back.
    pub fn set_voting_on_chain(&self, on: bool) {
        self.state().voting_on = on;
    }

    // ── Inspection ─────────────────────────────────────────────────────

    pub fn calls(&self) -> Vec<ContractCall> {
        self.state().calls.clone()
    }

    pub fn submitted(&self) -> Vec<WriteCall> {
        self.state()
            .calls
            .iter()
            .filter_map(|c| match c {
                ContractCall::Submit(call) => Some(call.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn voting_on(&self) -> bool {
        self.state().voting_on
    }

    pub fn balance_of_name(&self, name: &str) -> Option<TokenAmount> {
        let state = self.state();
        let (_, address) = state.roster.iter().find(|(n, _)| n == name)?;
        state.balances.get(address).copied()
    }

    /// Sum of all balances; `None` if it does not fit in a `U256`.
    pub fn total_supply(&self) -> Option<TokenAmount> {
        self.state()
            .balances
            .values()
            .try_fold(TokenAmount::ZERO, |acc, b| acc.checked_add(*b))
    }

    pub fn pending_count(&self) -> usize {
        self.state().pending.len()
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn lookup(&self, state: &State, name: &str) -> Result<Address, ContractError> {
        if state.failing_lookups.contains(name) {
            return Err(ContractError::Rejected(format!("lookup of {name} failed")));
        }
        Ok(state
            .roster
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, a)| *a)
            .unwrap_or(Address::ZERO))
    }

    fn enqueue(&self, call: WriteCall) -> Result<PendingTx, ContractError> {
        let mut state = self.state();
        state.calls.push(ContractCall::Submit(call.clone()));

        if let Some(err) = state.reject_next_submit.take() {
            return Err(err);
        }
        match &call {
            WriteCall::IssueToken { name, .. } | WriteCall::Vote { name, .. }
                if !state.roster.iter().any(|(n, _)| n == name) =>
            {
                return Err(ContractError::Rejected(format!(
                    "execution reverted: unknown codinome {name}"
                )));
            }
            WriteCall::Vote { .. } if !state.voting_on => {
                return Err(ContractError::Rejected(
                    "execution reverted: voting is off".into(),
                ));
            }
            _ => {}
        }

        state.next_tx += 1;
        let hash = TxHash::from(U256::from(state.next_tx).to_be_bytes::<32>());
        state.pending.insert(hash, call.clone());
        Ok(PendingTx { hash, call })
    }

    fn apply(&self, hash: TxHash) -> Result<TxReceipt, ContractError> {
        let mut state = self.state();
        state.calls.push(ContractCall::Confirm(hash));

        let call = state
            .pending
            .remove(&hash)
            .ok_or(ContractError::Dropped(hash))?;
        if let Some(err) = state.fail_next_confirmation.take() {
            return Err(err);
        }

        match call {
            WriteCall::IssueToken { name, amount } | WriteCall::Vote { name, amount } => {
                // Scripted lookup failures only affect reads.
                let address = state
                    .roster
                    .iter()
                    .find(|(n, _)| *n == name)
                    .map(|(_, a)| *a)
                    .ok_or(ContractError::Reverted(hash))?;
                let balance = state.balances.entry(address).or_default();
                *balance = balance
                    .checked_add(amount)
                    .ok_or(ContractError::Reverted(hash))?;
            }
            WriteCall::VotingOn => state.voting_on = true,
            WriteCall::VotingOff => state.voting_on = false,
        }

        state.block_number += 1;
        Ok(TxReceipt {
            tx_hash: hash,
            block_number: state.block_number,
        })
    }
}

impl Default for NullContract {
    fn default() -> Self {
        Self::new()
    }
}

fn participant_address(index: usize) -> Address {
    Address::left_padding_from(&(index as u64 + 1).to_be_bytes())
}

#[async_trait]
impl TokenContract for NullContract {
    async fn list_participant_names(&self) -> Result<Vec<String>, ContractError> {
        let mut state = self.state();
        state.calls.push(ContractCall::ListNames);
        if state.fail_roster {
            return Err(ContractError::Rejected("getCodinomes failed".into()));
        }
        Ok(state.roster.iter().map(|(n, _)| n.clone()).collect())
    }

    async fn resolve_participant_address(&self, name: &str) -> Result<Address, ContractError> {
        let mut state = self.state();
        state.calls.push(ContractCall::Resolve(name.to_string()));
        self.lookup(&state, name)
    }

    async fn balance_of(&self, address: Address) -> Result<TokenAmount, ContractError> {
        let mut state = self.state();
        state.calls.push(ContractCall::BalanceOf(address));
        let failing = state
            .roster
            .iter()
            .any(|(n, a)| *a == address && state.failing_lookups.contains(n));
        if failing {
            return Err(ContractError::Rejected(format!("balanceOf({address}) failed")));
        }
        Ok(state.balances.get(&address).copied().unwrap_or_default())
    }

    async fn issue_tokens(
        &self,
        name: &str,
        amount: TokenAmount,
    ) -> Result<PendingTx, ContractError> {
        self.enqueue(WriteCall::IssueToken {
            name: name.to_string(),
            amount,
        })
    }

    async fn cast_vote(
        &self,
        name: &str,
        amount: TokenAmount,
    ) -> Result<PendingTx, ContractError> {
        self.enqueue(WriteCall::Vote {
            name: name.to_string(),
            amount,
        })
    }

    async fn enable_voting(&self) -> Result<PendingTx, ContractError> {
        self.enqueue(WriteCall::VotingOn)
    }

    async fn disable_voting(&self) -> Result<PendingTx, ContractError> {
        self.enqueue(WriteCall::VotingOff)
    }

    async fn wait_for_confirmation(&self, tx: &PendingTx) -> Result<TxReceipt, ContractError> {
        let mut held = self.held.subscribe();
        let released = held.wait_for(|h| !*h).await.is_ok();
        if !released {
            return Err(ContractError::Dropped(tx.hash));
        }
        self.apply(tx.hash)
    }
}
