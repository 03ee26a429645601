//! # Sequence Gate
//!
//! Token issue and freshness admission. This is the engine's sole
//! mutual-exclusion mechanism: requests may overlap freely on the wire,
//! but only the freshest response is allowed to touch the snapshot.

use crate::domain::SequenceToken;

/// Admission verdict for an incoming response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// No response with a higher token has been applied; merge it.
    Fresh,
    /// Superseded by a later mutation's result; discard with no effect.
    Stale,
}

/// Issues strictly increasing tokens and tracks the highest one whose
/// response has been merged into the snapshot.
#[derive(Debug, Default)]
pub struct SequenceGate {
    /// Last issued raw token value. Tokens start at 1.
    last_issued: u64,
    /// Highest token whose response has been applied. 0 before any.
    latest_applied: u64,
}

impl SequenceGate {
    /// Create a fresh gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next token, strictly greater than all previously issued.
    pub fn issue(&mut self) -> SequenceToken {
        self.last_issued += 1;
        SequenceToken::from_raw(self.last_issued)
    }

    /// Decide whether a response stamped with `token` may still be
    /// merged. A response is fresh iff no response with a higher token
    /// has already been applied.
    pub fn admit(&self, token: SequenceToken) -> Admission {
        if token.value() >= self.latest_applied {
            Admission::Fresh
        } else {
            Admission::Stale
        }
    }

    /// Record that `token`'s response has been merged into the snapshot.
    pub fn record_applied(&mut self, token: SequenceToken) {
        debug_assert!(token.value() >= self.latest_applied);
        self.latest_applied = token.value();
    }

    /// Highest applied raw token value (for logging).
    pub fn latest_applied(&self) -> u64 {
        self.latest_applied
    }
}
