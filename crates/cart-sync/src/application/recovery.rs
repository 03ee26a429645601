//! # Error Recovery
//!
//! Rollback policy for failed mutations. The same path serves all four
//! mutation kinds; nothing is retried automatically.

use tracing::debug;

use crate::algorithms::Admission;
use crate::domain::PendingMutation;

use super::service::PanelState;

/// Restore the failed mutation's captured pre-edit snapshot.
///
/// Returns whether the displayed state changed. The rollback is skipped
/// when a response with a higher token has already been applied: that
/// wholesale replacement is newer truth than the captured snapshot, and
/// reinstating the capture would resurrect state the server has
/// superseded. The forced refresh that follows reconciles either way.
pub(crate) fn restore(state: &mut PanelState, pending: &PendingMutation) -> bool {
    match state.gate.admit(pending.token) {
        Admission::Fresh => {
            state.displayed = pending.rollback.clone();
            true
        }
        Admission::Stale => {
            debug!(
                "[cart-sync] Skipping rollback for token {}: newer state already applied",
                pending.token
            );
            false
        }
    }
}
