//! # Domain Value Objects
//!
//! Immutable value types for cart reconciliation.

use serde::{Deserialize, Serialize};

use super::errors::CartError;

/// Prices are integer minor currency units (e.g. cents) throughout.
/// No floating point anywhere in the engine.
pub type MinorUnits = u64;

/// Opaque identifier of a purchasable variant.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct VariantId(String);

impl VariantId {
    /// Create a variant identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VariantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 1-based position of a line within one specific snapshot.
///
/// A `LineIndex` is valid ONLY against the snapshot it was rendered from:
/// removal and clearing shift subsequent indices, so it is never a stable
/// identifier across mutations.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct LineIndex(u32);

impl LineIndex {
    /// Create a line index. Fails for 0 (indices are 1-based).
    pub fn new(index: u32) -> Result<Self, CartError> {
        if index == 0 {
            return Err(CartError::InvalidEdit(
                "line indices are 1-based; 0 is not addressable".to_string(),
            ));
        }
        Ok(Self(index))
    }

    /// Index for the line at a zero-based offset.
    pub(crate) fn from_offset(offset: usize) -> Self {
        Self(offset as u32 + 1)
    }

    /// The 1-based index as sent on the wire.
    pub fn get(&self) -> u32 {
        self.0
    }

    /// Zero-based offset into a snapshot's line vector.
    pub fn as_offset(&self) -> usize {
        (self.0 - 1) as usize
    }
}

impl std::fmt::Display for LineIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic token stamped on every outbound request.
///
/// Tokens totally order the *effects* of concurrent requests: a response
/// is only merged if no response with a higher token got there first.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct SequenceToken(u64);

impl SequenceToken {
    /// Construct a token from its raw counter value.
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw counter value (for logging and ordering).
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SequenceToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four mutation kinds the cart service understands.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum MutationKind {
    /// Add a variant to the cart.
    Add {
        /// Variant to add.
        variant_id: VariantId,
        /// Requested quantity, must be positive.
        quantity: u32,
    },
    /// Set a line's quantity to a new positive value.
    ///
    /// Quantity 0 is rejected locally: removal is the explicit
    /// [`MutationKind::Remove`] action, never an implicit side effect of
    /// a decrement.
    ChangeQuantity {
        /// Target line within the current snapshot.
        line: LineIndex,
        /// New quantity, must be positive.
        quantity: u32,
    },
    /// Remove a line entirely.
    Remove {
        /// Target line within the current snapshot.
        line: LineIndex,
    },
    /// Empty the cart.
    Clear,
}

impl MutationKind {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            MutationKind::Add { .. } => "add",
            MutationKind::ChangeQuantity { .. } => "change-quantity",
            MutationKind::Remove { .. } => "remove",
            MutationKind::Clear => "clear",
        }
    }
}

/// Lifecycle state of one in-flight mutation.
///
/// `Issued -> AwaitingResponse -> { Applied | Discarded | RolledBack }`
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum MutationState {
    /// Optimistic delta applied, request not yet sent.
    Issued,
    /// Request sent, response pending.
    AwaitingResponse,
    /// Fresh response merged; snapshot replaced wholesale.
    Applied,
    /// Response superseded by a higher token; dropped with no effect.
    Discarded,
    /// Failed; optimistic delta reverted.
    RolledBack,
}

impl MutationState {
    /// Terminal states end the mutation's lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MutationState::Applied | MutationState::Discarded | MutationState::RolledBack
        )
    }
}

/// Resolution reported to the caller of `mutate`.
///
/// Failures never surface as `Err`: the panel's contract is that the
/// displayed cart eventually reflects server truth, not that every call
/// succeeds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Server confirmation merged; displayed state is server truth.
    Applied,
    /// Response was stale (a newer mutation's result already applied).
    Discarded,
    /// Request failed; pre-edit state restored and a refresh forced.
    RolledBack,
    /// Rejected locally before any request was issued.
    Rejected(CartError),
}

/// One visible row of the rendered cart.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartRow {
    /// 1-based position, valid against the view it belongs to.
    pub line_index: u32,
    /// Variant on this row.
    pub variant_id: VariantId,
    /// Display title.
    pub title: String,
    /// Optional display image reference.
    pub image_ref: Option<String>,
    /// Quantity on this row.
    pub quantity: u32,
    /// Unit price in minor units. Formatting is the sink's concern.
    pub unit_price_minor: MinorUnits,
    /// Row total in minor units.
    pub line_total_minor: MinorUnits,
}

/// Aggregate summary shown next to the line list.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartSummary {
    /// Total number of items across all lines.
    pub item_count: u32,
    /// Subtotal in minor units.
    pub subtotal_minor: MinorUnits,
}

/// View model handed to the presentation sink.
///
/// Rebuilt in full on every render; a sink must replace its previous
/// contents rather than append, and the view gives it no way to do
/// otherwise (rows always carry the complete list).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartView {
    /// Complete row list, replacing any previously presented rows.
    pub rows: Vec<CartRow>,
    /// Aggregate totals.
    pub summary: CartSummary,
    /// True when the cart holds no lines (empty-state rendering).
    pub is_empty: bool,
}
