//! # Cart Panel Configuration

use serde::{Deserialize, Serialize};

/// Configuration for the cart panel service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CartPanelConfig {
    /// Refresh from the server when the panel opens. Visibility itself
    /// carries no cart semantics; this only keeps an opening panel from
    /// showing a cart another tab has since changed.
    pub refresh_on_open: bool,

    /// Force a refresh after a rollback, reconciling the case where a
    /// failed mutation partially succeeded server-side.
    pub refresh_after_rollback: bool,
}

impl Default for CartPanelConfig {
    fn default() -> Self {
        Self {
            refresh_on_open: true,
            refresh_after_rollback: true,
        }
    }
}

impl CartPanelConfig {
    /// Config for tests: opening stays cheap so scenarios script every
    /// network interaction explicitly.
    pub fn for_testing() -> Self {
        Self {
            refresh_on_open: false,
            refresh_after_rollback: true,
        }
    }
}
