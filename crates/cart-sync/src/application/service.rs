//! # Cart Panel Service
//!
//! Orchestrates the mutation lifecycle: optimistic delta, token stamp,
//! request dispatch, gate-checked reconciliation, rollback on failure.
//!
//! Any number of `mutate` futures may be in flight at once; the shared
//! state sits behind one mutex that is never held across an await, and
//! the total ordering of effects comes from the sequence gate alone.
//! Repaints go out while that mutex is held, so the sink sees views in
//! exactly the order they were applied.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::algorithms::{optimistic, render::render, Admission, SequenceGate};
use crate::config::CartPanelConfig;
use crate::domain::{
    CartError, CartSnapshot, CartView, MutationKind, MutationOutcome, MutationState,
    PendingMutation,
};
use crate::ports::inbound::CartPanelApi;
use crate::ports::outbound::{CartPayload, CartService, ViewSink};

use super::recovery;

/// The single piece of mutable shared state.
pub(crate) struct PanelState {
    /// Last server-confirmed snapshot.
    pub(crate) confirmed: CartSnapshot,
    /// What the shopper currently sees: confirmed truth plus any
    /// unresolved optimistic deltas.
    pub(crate) displayed: CartSnapshot,
    /// Token issue and admission.
    pub(crate) gate: SequenceGate,
    /// False once the panel is torn down.
    pub(crate) live: bool,
    /// Panel visibility. No cart semantics.
    pub(crate) open: bool,
}

impl PanelState {
    pub(crate) fn new() -> Self {
        Self {
            confirmed: CartSnapshot::empty(),
            displayed: CartSnapshot::empty(),
            gate: SequenceGate::new(),
            live: true,
            open: false,
        }
    }
}

/// Cart panel service - implements the inbound [`CartPanelApi`].
pub struct CartPanelService<S: CartService, V: ViewSink> {
    /// Configuration.
    config: CartPanelConfig,
    /// Remote cart service (outbound port).
    service: Arc<S>,
    /// Presentation sink (outbound port).
    sink: Arc<V>,
    /// Shared state; never locked across an await point.
    state: Mutex<PanelState>,
}

impl<S: CartService, V: ViewSink> CartPanelService<S, V> {
    /// Create a panel over the given collaborators. The cart starts
    /// empty; the first `refresh` (or `open`) loads server truth.
    pub fn new(config: CartPanelConfig, service: Arc<S>, sink: Arc<V>) -> Self {
        Self {
            config,
            service,
            sink,
            state: Mutex::new(PanelState::new()),
        }
    }

    /// Last server-confirmed snapshot (test and host introspection).
    pub fn confirmed_snapshot(&self) -> CartSnapshot {
        self.lock().confirmed.clone()
    }

    /// Currently displayed snapshot, optimistic deltas included.
    pub fn displayed_snapshot(&self) -> CartSnapshot {
        self.lock().displayed.clone()
    }

    /// Tie panel liveness to the host surface's lifecycle: the returned
    /// disposer tears the panel down when dropped (or explicitly). The
    /// host's attach hook calls this; its detach hook drops the result.
    pub fn subscribe(self: &Arc<Self>) -> PanelSubscription<S, V> {
        PanelSubscription {
            panel: Arc::clone(self),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().expect("cart panel state poisoned")
    }

    fn mark_disposed(&self) {
        let mut state = self.lock();
        state.live = false;
        state.open = false;
    }

    /// Dispatch the request for an issued mutation.
    async fn send(&self, kind: &MutationKind) -> Result<CartPayload, CartError> {
        match kind {
            MutationKind::Add {
                variant_id,
                quantity,
            } => self.service.add_line(variant_id, *quantity).await,
            MutationKind::ChangeQuantity { line, quantity } => {
                self.service.change_quantity(*line, *quantity).await
            }
            // Removal is encoded as a quantity-0 change on the wire.
            MutationKind::Remove { line } => self.service.change_quantity(*line, 0).await,
            MutationKind::Clear => self.service.clear().await,
        }
    }

    /// Reconcile a resolved response against the gate.
    async fn resolve(
        &self,
        mut pending: PendingMutation,
        result: Result<CartPayload, CartError>,
    ) -> MutationOutcome {
        let snapshot = match result.and_then(CartSnapshot::try_from) {
            Ok(snapshot) => snapshot,
            Err(error) => return self.recover(pending, error).await,
        };

        {
            let mut state = self.lock();
            if !state.live {
                debug!(
                    "[cart-sync] Response for token {} arrived after teardown; ignoring",
                    pending.token
                );
                pending.finish(MutationState::Discarded);
                return MutationOutcome::Discarded;
            }
            match state.gate.admit(pending.token) {
                Admission::Stale => {
                    debug!(
                        "[cart-sync] Discarding stale response token={} (latest applied {})",
                        pending.token,
                        state.gate.latest_applied()
                    );
                    pending.finish(MutationState::Discarded);
                    return MutationOutcome::Discarded;
                }
                Admission::Fresh => {
                    // Wholesale replacement: the server payload is the
                    // single source of truth, optimistic guess discarded.
                    // The repaint happens under the lock so the admission
                    // verdict still holds when the sink sees the view.
                    state.gate.record_applied(pending.token);
                    state.confirmed = snapshot.clone();
                    state.displayed = snapshot;
                    self.sink.present(&render(&state.displayed));
                }
            }
        }
        info!(
            "[cart-sync] Applied {} mutation token={} correlation={}",
            pending.kind.label(),
            pending.token,
            pending.correlation_id
        );
        pending.finish(MutationState::Applied);
        MutationOutcome::Applied
    }

    /// Rollback + forced refresh for a failed mutation.
    async fn recover(&self, mut pending: PendingMutation, error: CartError) -> MutationOutcome {
        warn!(
            "[cart-sync] {} mutation token={} correlation={} failed: {}",
            pending.kind.label(),
            pending.token,
            pending.correlation_id,
            error
        );

        {
            let mut state = self.lock();
            if !state.live {
                pending.finish(MutationState::Discarded);
                return MutationOutcome::Discarded;
            }
            if recovery::restore(&mut state, &pending) {
                self.sink.present(&render(&state.displayed));
            }
        }
        pending.finish(MutationState::RolledBack);

        if self.config.refresh_after_rollback {
            if let Err(refresh_error) = self.refresh_now().await {
                warn!(
                    "[cart-sync] Post-rollback refresh failed: {}",
                    refresh_error
                );
            }
        }
        MutationOutcome::RolledBack
    }

    /// Token-stamped fetch of server truth. A slow read can never
    /// clobber the result of a newer edit.
    async fn refresh_now(&self) -> Result<(), CartError> {
        let token = {
            let mut state = self.lock();
            if !state.live {
                return Err(CartError::Disposed);
            }
            state.gate.issue()
        };

        let payload = self.service.fetch_cart().await?;
        let snapshot = CartSnapshot::try_from(payload)?;

        let applied = {
            let mut state = self.lock();
            if !state.live {
                return Err(CartError::Disposed);
            }
            match state.gate.admit(token) {
                Admission::Stale => {
                    debug!("[cart-sync] Discarding stale refresh token={}", token);
                    false
                }
                Admission::Fresh => {
                    state.gate.record_applied(token);
                    state.confirmed = snapshot.clone();
                    state.displayed = snapshot;
                    self.sink.present(&render(&state.displayed));
                    true
                }
            }
        };

        if applied {
            info!("[cart-sync] Refreshed cart, token={}", token);
        }
        Ok(())
    }
}

/// Disposer returned by [`CartPanelService::subscribe`].
///
/// Dropping it disposes the panel: in-flight responses become no-ops
/// and further operations are rejected.
pub struct PanelSubscription<S: CartService, V: ViewSink> {
    panel: Arc<CartPanelService<S, V>>,
}

impl<S: CartService, V: ViewSink> PanelSubscription<S, V> {
    /// Dispose explicitly (equivalent to dropping).
    pub fn dispose(self) {}
}

impl<S: CartService, V: ViewSink> Drop for PanelSubscription<S, V> {
    fn drop(&mut self) {
        self.panel.mark_disposed();
    }
}

#[async_trait]
impl<S: CartService + 'static, V: ViewSink + 'static> CartPanelApi for CartPanelService<S, V> {
    async fn mutate(&self, kind: MutationKind) -> MutationOutcome {
        // Optimistic phase: validate, project, present. Strictly
        // synchronous so the shopper sees feedback before any await.
        let mut pending = {
            let mut state = self.lock();
            if !state.live {
                return MutationOutcome::Rejected(CartError::Disposed);
            }
            let provisional = match optimistic::project(&state.displayed, &kind) {
                Ok(provisional) => provisional,
                Err(error) => {
                    debug!(
                        "[cart-sync] Rejected {} edit locally: {}",
                        kind.label(),
                        error
                    );
                    return MutationOutcome::Rejected(error);
                }
            };
            let rollback = std::mem::replace(&mut state.displayed, provisional);
            let token = state.gate.issue();
            // Presented under the lock: presentation order must match
            // application order, and a concurrently resolving response
            // could otherwise slot its repaint into the gap.
            self.sink.present(&render(&state.displayed));
            drop(state);
            PendingMutation::issue(token, kind, rollback)
        };
        debug!(
            "[cart-sync] Issued {} mutation token={} correlation={}",
            pending.kind.label(),
            pending.token,
            pending.correlation_id
        );

        pending.mark_awaiting();
        let result = self.send(&pending.kind).await;
        self.resolve(pending, result).await
    }

    async fn refresh(&self) -> Result<(), CartError> {
        self.refresh_now().await
    }

    async fn open(&self) {
        {
            let mut state = self.lock();
            if !state.live {
                return;
            }
            state.open = true;
        }
        if self.config.refresh_on_open {
            if let Err(error) = self.refresh_now().await {
                warn!("[cart-sync] Refresh on open failed: {}", error);
            }
        }
    }

    fn close(&self) {
        self.lock().open = false;
    }

    fn is_open(&self) -> bool {
        self.lock().open
    }

    fn view(&self) -> CartView {
        render(&self.lock().displayed)
    }

    fn dispose(&self) {
        self.mark_disposed();
    }
}
