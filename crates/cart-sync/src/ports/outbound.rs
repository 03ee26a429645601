//! # Outbound Ports
//!
//! Traits for the engine's external collaborators: the remote cart
//! service and the presentation sink. Wire payload types live here
//! because they are the contract of the service port.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::domain::{CartError, CartSnapshot, CartView, LineIndex, LineItem, VariantId};

/// One cart line as returned by the remote service.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinePayload {
    /// Variant identifier.
    pub variant_id: VariantId,
    /// Line quantity.
    pub quantity: u32,
    /// Unit price, integer minor currency units.
    pub unit_price: u64,
    /// Line total, integer minor currency units.
    pub line_total: u64,
    /// Display title.
    pub title: String,
    /// Display image reference.
    #[serde(default)]
    pub image_ref: Option<String>,
}

/// Full cart payload carried by every service response.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    /// Declared item count.
    pub item_count: u32,
    /// Declared total, integer minor currency units.
    pub total_price: u64,
    /// Lines in server order. Order defines 1-based line addressing.
    pub lines: Vec<LinePayload>,
}

impl CartPayload {
    /// Payload equivalent of a snapshot (used by simulated backends and
    /// test fixtures).
    pub fn from_snapshot(snapshot: &CartSnapshot) -> Self {
        Self {
            item_count: snapshot.item_count,
            total_price: snapshot.total_price_minor,
            lines: snapshot
                .lines
                .iter()
                .map(|line| LinePayload {
                    variant_id: line.variant_id.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price_minor,
                    line_total: line.line_total_minor,
                    title: line.title.clone(),
                    image_ref: line.image_ref.clone(),
                })
                .collect(),
        }
    }
}

impl TryFrom<CartPayload> for CartSnapshot {
    type Error = CartError;

    /// Ingest a payload, enforcing the consistency invariant. A payload
    /// whose declared totals disagree with its lines is malformed and
    /// follows the transport-failure recovery path.
    fn try_from(payload: CartPayload) -> Result<Self, Self::Error> {
        let lines = payload
            .lines
            .into_iter()
            .map(|line| LineItem {
                variant_id: line.variant_id,
                quantity: line.quantity,
                unit_price_minor: line.unit_price,
                line_total_minor: line.line_total,
                title: line.title,
                image_ref: line.image_ref,
            })
            .collect();
        CartSnapshot::from_parts(payload.item_count, payload.total_price, lines)
    }
}

/// Remote cart service - outbound port.
///
/// Four logical operations; every response carries the full cart, which
/// the engine treats as the single source of truth.
#[async_trait]
pub trait CartService: Send + Sync {
    /// `GET cart`.
    async fn fetch_cart(&self) -> Result<CartPayload, CartError>;

    /// `POST add {variantId, quantity}`.
    async fn add_line(&self, variant: &VariantId, quantity: u32)
        -> Result<CartPayload, CartError>;

    /// `POST changeQuantity {lineIndex, quantity}`. Quantity 0 is the
    /// wire encoding of a line removal.
    async fn change_quantity(
        &self,
        line: LineIndex,
        quantity: u32,
    ) -> Result<CartPayload, CartError>;

    /// `POST clear {}`.
    async fn clear(&self) -> Result<CartPayload, CartError>;
}

/// Presentation sink - outbound port.
///
/// Receives every repaint. `present` is synchronous so optimistic
/// feedback lands before the engine's first suspension point; a sink
/// must replace its previous contents with the given view, never append.
///
/// Called with the panel's internal state locked, which guarantees
/// repaints arrive in the order views were applied. Implementations
/// must return promptly and must not call back into the panel.
pub trait ViewSink: Send + Sync {
    /// Present a freshly rendered view.
    fn present(&self, view: &CartView);
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// A call observed by [`MockCartService`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedCall {
    /// `fetch_cart`.
    Fetch,
    /// `add_line`.
    Add {
        /// Requested variant.
        variant: VariantId,
        /// Requested quantity.
        quantity: u32,
    },
    /// `change_quantity` (quantity 0 encodes removal).
    ChangeQuantity {
        /// Wire line index.
        line: u32,
        /// Requested quantity.
        quantity: u32,
    },
    /// `clear`.
    Clear,
}

struct ScriptedResponse {
    response: Result<CartPayload, CartError>,
    release: Option<oneshot::Receiver<()>>,
}

/// Scripted cart service for tests.
///
/// Responses are consumed in call order. A held response does not
/// resolve until its release handle fires, which lets tests deliver
/// responses out of issue order deterministically.
#[derive(Default)]
pub struct MockCartService {
    script: Mutex<VecDeque<ScriptedResponse>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockCartService {
    /// Empty mock; any call fails as unscripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful response for the next unscripted call.
    pub fn push_ok(&self, payload: CartPayload) {
        self.script_mut().push_back(ScriptedResponse {
            response: Ok(payload),
            release: None,
        });
    }

    /// Script a successful response that is held until the returned
    /// sender fires (or is dropped).
    pub fn push_ok_held(&self, payload: CartPayload) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script_mut().push_back(ScriptedResponse {
            response: Ok(payload),
            release: Some(rx),
        });
        tx
    }

    /// Script a failure.
    pub fn push_err(&self, error: CartError) {
        self.script_mut().push_back(ScriptedResponse {
            response: Err(error),
            release: None,
        });
    }

    /// Calls observed so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    /// Number of scripted responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script_mut().len()
    }

    fn script_mut(&self) -> std::sync::MutexGuard<'_, VecDeque<ScriptedResponse>> {
        self.script.lock().expect("mock script poisoned")
    }

    async fn respond(&self, call: RecordedCall) -> Result<CartPayload, CartError> {
        let scripted = {
            self.calls.lock().expect("mock call log poisoned").push(call);
            self.script_mut().pop_front()
        };
        let Some(scripted) = scripted else {
            return Err(CartError::Transport(
                "unscripted call to mock cart service".to_string(),
            ));
        };
        if let Some(release) = scripted.release {
            // A dropped sender releases too; tests use that for teardown.
            let _ = release.await;
        }
        scripted.response
    }
}

#[async_trait]
impl CartService for MockCartService {
    async fn fetch_cart(&self) -> Result<CartPayload, CartError> {
        self.respond(RecordedCall::Fetch).await
    }

    async fn add_line(
        &self,
        variant: &VariantId,
        quantity: u32,
    ) -> Result<CartPayload, CartError> {
        self.respond(RecordedCall::Add {
            variant: variant.clone(),
            quantity,
        })
        .await
    }

    async fn change_quantity(
        &self,
        line: LineIndex,
        quantity: u32,
    ) -> Result<CartPayload, CartError> {
        self.respond(RecordedCall::ChangeQuantity {
            line: line.get(),
            quantity,
        })
        .await
    }

    async fn clear(&self) -> Result<CartPayload, CartError> {
        self.respond(RecordedCall::Clear).await
    }
}
