//! # Domain Errors
//!
//! Error types for the cart reconciliation engine.
//!
//! Staleness is deliberately NOT an error: a superseded response is a
//! normal outcome of concurrent edits and is modeled as
//! [`Admission::Stale`](crate::algorithms::Admission) plus
//! [`MutationOutcome::Discarded`](super::MutationOutcome).

use thiserror::Error;

/// Cart panel error types.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Request failed in transit (network error, timeout surfaced by the
    /// transport, non-success status). Follows the rollback + forced
    /// refresh recovery path.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Response arrived but its payload could not be parsed or violates
    /// the cart consistency invariant. Treated exactly like a transport
    /// failure.
    #[error("Malformed cart payload: {0}")]
    MalformedPayload(String),

    /// Edit rejected locally before any request was issued (e.g. the
    /// target line no longer exists in the current snapshot). No
    /// optimistic delta is applied for a rejected edit.
    #[error("Invalid edit: {0}")]
    InvalidEdit(String),

    /// The panel has been torn down; the operation was ignored.
    #[error("Cart panel already disposed")]
    Disposed,
}

impl CartError {
    /// True for failures that trigger rollback + forced refresh.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CartError::Transport(_) | CartError::MalformedPayload(_)
        )
    }
}
