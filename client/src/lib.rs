//! Turing token client core.
//!
//! Ties the wallet gateway and the contract binding into one session:
//! - [`Client`] owns the authorised account and the bound contract
//! - [`SessionState`] is the single record of roster, ranking, voting flag
//!   and the pending-operation slot
//! - [`RankingProjector`] derives the descending-balance ranking
//! - [`TransactionOrchestrator`] runs at most one write at a time through
//!   submit, confirm and reconcile
//!
//! Presentation layers read [`Client::snapshot`] and show
//! [`ClientError::notice`] / [`Confirmed::notice`].

pub mod client;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod ranking;
pub mod session;
pub mod tracing_spans;

pub use client::Client;
pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, ConfirmationError, InputError};
pub use orchestrator::{Confirmed, OperationRequest, TransactionOrchestrator};
pub use ranking::{Projection, ProjectionError, RankingProjector};
pub use session::{OperationKind, Phase, SessionSnapshot, SessionState};
