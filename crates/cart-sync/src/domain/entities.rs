//! # Domain Entities
//!
//! The server-confirmed cart state and the in-flight mutation record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::CartError;
use super::invariants::invariant_snapshot_consistent;
use super::value_objects::{
    LineIndex, MinorUnits, MutationKind, MutationState, SequenceToken, VariantId,
};

/// One cart row.
///
/// Lines are addressed positionally: the 1-based index of a line is its
/// position in the owning snapshot at render time, never a stored field.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    /// Variant on this line.
    pub variant_id: VariantId,
    /// Quantity, always positive (a quantity-0 line does not exist).
    pub quantity: u32,
    /// Unit price in minor units.
    pub unit_price_minor: MinorUnits,
    /// `unit_price_minor * quantity`, precomputed server-side.
    pub line_total_minor: MinorUnits,
    /// Display title, no invariant.
    pub title: String,
    /// Display image reference, no invariant.
    pub image_ref: Option<String>,
}

/// The cart as last confirmed by the server.
///
/// Immutable value: the only producers are payload ingestion and
/// [`CartSnapshot::empty`]. It is only ever replaced wholesale, never
/// patched in place, so concurrent readers always observe a consistent
/// snapshot (either the old one or the new one, never a mix).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartSnapshot {
    /// Sum of all line quantities.
    pub item_count: u32,
    /// Sum of all line totals, minor units.
    pub total_price_minor: MinorUnits,
    /// Lines in server-returned order. Order is significant: it defines
    /// line-index addressing.
    pub lines: Vec<LineItem>,
}

impl CartSnapshot {
    /// The empty cart.
    pub fn empty() -> Self {
        Self {
            item_count: 0,
            total_price_minor: 0,
            lines: Vec::new(),
        }
    }

    /// Build a snapshot from parts, enforcing the consistency invariant.
    ///
    /// # Errors
    /// `MalformedPayload` if the totals disagree with the line sums or a
    /// line total disagrees with `unit_price * quantity`.
    pub fn from_parts(
        item_count: u32,
        total_price_minor: MinorUnits,
        lines: Vec<LineItem>,
    ) -> Result<Self, CartError> {
        let snapshot = Self {
            item_count,
            total_price_minor,
            lines,
        };
        invariant_snapshot_consistent(&snapshot)?;
        Ok(snapshot)
    }

    /// Resolve a 1-based index against THIS snapshot.
    pub fn line_at(&self, index: LineIndex) -> Option<&LineItem> {
        self.lines.get(index.as_offset())
    }

    /// True when the cart holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Position of the first line holding `variant`, if any.
    pub fn line_index_of(&self, variant: &VariantId) -> Option<LineIndex> {
        self.lines
            .iter()
            .position(|line| &line.variant_id == variant)
            .map(LineIndex::from_offset)
    }
}

/// An issued edit whose server confirmation has not yet resolved.
///
/// Created when the optimistic delta is applied, destroyed when the
/// response is applied, discarded, or rolled back.
#[derive(Clone, Debug)]
pub struct PendingMutation {
    /// Token assigned at issue time, strictly increasing.
    pub token: SequenceToken,
    /// Correlation ID threaded through log lines for this mutation.
    pub correlation_id: Uuid,
    /// The edit being performed.
    pub kind: MutationKind,
    /// Exact displayed snapshot captured before the optimistic delta.
    /// Recovery restores this value verbatim; it never recomputes.
    pub rollback: CartSnapshot,
    /// Lifecycle state.
    pub state: MutationState,
}

impl PendingMutation {
    /// Record a freshly issued mutation.
    pub fn issue(token: SequenceToken, kind: MutationKind, rollback: CartSnapshot) -> Self {
        Self {
            token,
            correlation_id: Uuid::new_v4(),
            kind,
            rollback,
            state: MutationState::Issued,
        }
    }

    /// Transition to `AwaitingResponse` once the request is on the wire.
    pub fn mark_awaiting(&mut self) {
        self.state = MutationState::AwaitingResponse;
    }

    /// Enter a terminal state.
    pub fn finish(&mut self, state: MutationState) {
        debug_assert!(state.is_terminal());
        self.state = state;
    }
}
