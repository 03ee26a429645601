//! # Inbound Port
//!
//! The API the host surface (buttons, quantity steppers, the drawer
//! toggle) drives. The host never touches cart state directly; it only
//! calls these operations and consumes what the view sink receives.

use async_trait::async_trait;

use crate::domain::{CartError, CartView, MutationKind, MutationOutcome};

/// Cart panel API - inbound port.
#[async_trait]
pub trait CartPanelApi: Send + Sync {
    /// Issue an edit: optimistic feedback is presented before the first
    /// suspension point, then the result is reconciled against the
    /// server response.
    ///
    /// Never returns `Err`; every failure mode is a [`MutationOutcome`].
    async fn mutate(&self, kind: MutationKind) -> MutationOutcome;

    /// Pure read of the cart. A fresh response replaces the snapshot;
    /// a stale one (a mutation applied meanwhile) is discarded.
    async fn refresh(&self) -> Result<(), CartError>;

    /// Show the panel. Visibility carries no cart semantics, but opening
    /// refreshes by default so the shopper sees server truth.
    async fn open(&self);

    /// Hide the panel.
    fn close(&self);

    /// Current visibility.
    fn is_open(&self) -> bool;

    /// Render the currently displayed state.
    fn view(&self) -> CartView;

    /// Tear the panel down. Responses arriving after disposal are
    /// no-ops; further operations are rejected.
    fn dispose(&self);
}
