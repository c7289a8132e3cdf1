//! Pre-built [`tracing::Span`] constructors for client operations.
//!
//! Every suspend point in the client runs inside one of these, so traces
//! show which operation a wallet or contract call belonged to.

use tracing::{info_span, Span};

use crate::session::OperationKind;

/// Span covering one mutating operation from validation to reconciliation.
pub fn operation_span(kind: OperationKind) -> Span {
    info_span!("operation", kind = %kind)
}

/// Span covering one full ranking projection (roster + all lookups).
pub fn projection_span() -> Span {
    info_span!("projection")
}

/// Span covering a read-side refresh of roster or ranking.
pub fn refresh_span(what: &'static str) -> Span {
    info_span!("refresh", what)
}

/// Span covering wallet connection and contract binding.
pub fn connect_span() -> Span {
    info_span!("connect")
}
