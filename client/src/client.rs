//! The client session: one authorised account bound to one contract.

use std::sync::Mutex;
use std::time::Duration;
use tracing::Instrument;
use turing_contract::{JsonRpcContract, TokenContract};
use turing_types::{Account, Participant, RankingEntry};
use turing_wallet::{JsonRpcWallet, ProviderGateway, SignerContext, WalletProvider};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::orchestrator::{Confirmed, OperationRequest, TransactionOrchestrator};
use crate::ranking::RankingProjector;
use crate::session::{self, SessionSnapshot, SessionState};
use crate::tracing_spans::{connect_span, refresh_span};

/// A connected session. Exists only after authorisation succeeded, so every
/// contract call it makes is signed by a known account.
pub struct Client<C> {
    contract: C,
    state: Mutex<SessionState>,
    confirmation_timeout: Option<Duration>,
}

impl<C: TokenContract> Client<C> {
    /// Authorise through `gateway`, then bind the contract to the signer.
    ///
    /// `bind` runs only when authorisation succeeds.
    pub async fn connect<P, F>(
        gateway: &ProviderGateway<P>,
        config: &ClientConfig,
        bind: F,
    ) -> Result<Self, ClientError>
    where
        P: WalletProvider,
        F: FnOnce(&SignerContext) -> C,
    {
        let connection = gateway.connect().instrument(connect_span()).await?;
        let contract = bind(&connection.signer);
        Ok(Self::with_contract(contract, connection.account, config))
    }

    /// A session for `account` over an already-bound contract.
    pub fn with_contract(contract: C, account: Account, config: &ClientConfig) -> Self {
        tracing::info!(%account, voting_enabled = config.initial_voting_enabled, "session started");
        Self {
            contract,
            state: Mutex::new(SessionState::new(account, config.initial_voting_enabled)),
            confirmation_timeout: config.confirmation_timeout(),
        }
    }

    pub fn contract(&self) -> &C {
        &self.contract
    }

    pub fn account(&self) -> Account {
        session::lock(&self.state).account()
    }

    pub fn voting_enabled(&self) -> bool {
        session::lock(&self.state).voting_enabled()
    }

    pub fn is_pending(&self) -> bool {
        session::lock(&self.state).is_pending()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        session::lock(&self.state).snapshot()
    }

    // ── Reads ──────────────────────────────────────────────────────────

    /// Load the roster, then the ranking. Both are attempted; the first
    /// failure is returned.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let roster = self.load_roster().await.map(drop);
        let ranking = self.refresh_ranking().await.map(drop);
        roster.and(ranking)
    }

    /// Replace the roster with the contract's current list. On failure the
    /// previous roster is kept.
    pub async fn load_roster(&self) -> Result<Vec<Participant>, ClientError> {
        self.read_roster().instrument(refresh_span("roster")).await
    }

    /// Recompute the ranking. On failure the previous ranking is kept; a
    /// result overtaken by a newer commit is discarded.
    pub async fn refresh_ranking(&self) -> Result<Vec<RankingEntry>, ClientError> {
        self.read_ranking().instrument(refresh_span("ranking")).await
    }

    async fn read_roster(&self) -> Result<Vec<Participant>, ClientError> {
        let names = self.contract.list_participant_names().await.map_err(|e| {
            tracing::warn!(error = %e, "roster load failed");
            ClientError::RosterLoad(e)
        })?;

        let mut state = session::lock(&self.state);
        state.replace_roster(names);
        tracing::debug!(participants = state.roster().len(), "roster loaded");
        Ok(state.roster().to_vec())
    }

    async fn read_ranking(&self) -> Result<Vec<RankingEntry>, ClientError> {
        let started_at = session::lock(&self.state).ranking_epoch();

        let projection = RankingProjector::new(&self.contract)
            .project()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "ranking refresh failed");
                ClientError::Projection(e)
            })?;

        let mut state = session::lock(&self.state);
        if !state.commit_refresh(started_at, projection) {
            tracing::debug!("ranking committed during refresh, discarding older read");
        }
        Ok(state.ranking().to_vec())
    }

    // ── Writes ─────────────────────────────────────────────────────────

    /// `name` and `amount` are human input; `amount` is a decimal token
    /// quantity such as `"1.5"`.
    pub async fn issue_tokens(&self, name: &str, amount: &str) -> Result<Confirmed, ClientError> {
        self.execute(OperationRequest::IssueTokens {
            name: name.to_string(),
            amount: amount.to_string(),
        })
        .await
    }

    /// Refused with [`ClientError::VotingDisabled`] while voting is off,
    /// without reaching the contract.
    pub async fn cast_vote(&self, name: &str, amount: &str) -> Result<Confirmed, ClientError> {
        self.execute(OperationRequest::CastVote {
            name: name.to_string(),
            amount: amount.to_string(),
        })
        .await
    }

    pub async fn enable_voting(&self) -> Result<Confirmed, ClientError> {
        self.execute(OperationRequest::EnableVoting).await
    }

    pub async fn disable_voting(&self) -> Result<Confirmed, ClientError> {
        self.execute(OperationRequest::DisableVoting).await
    }

    pub async fn execute(&self, request: OperationRequest) -> Result<Confirmed, ClientError> {
        TransactionOrchestrator::new(&self.contract, &self.state, self.confirmation_timeout)
            .execute(request)
            .await
    }
}

impl Client<JsonRpcContract> {
    /// Detect the configured JSON-RPC wallet, authorise, and bind the
    /// contract at `config.contract_address` over the same endpoint.
    pub async fn connect_json_rpc(config: &ClientConfig) -> Result<Self, ClientError> {
        let wallet = JsonRpcWallet::detect(config.rpc_url.as_deref(), config.request_timeout());
        let gateway = ProviderGateway::new(wallet).with_expected_chain(config.chain_id);
        let connection = gateway.connect().instrument(connect_span()).await?;

        let transport = gateway
            .provider()
            .map(|wallet| wallet.transport().clone())
            .ok_or(ClientError::NoWalletProvider)?;
        let contract = JsonRpcContract::new(transport, config.contract_address, connection.signer)
            .with_poll_interval(config.poll_interval());
        tracing::info!(contract = %contract.address(), "contract bound");

        Ok(Self::with_contract(contract, connection.account, config))
    }
}
