//! # Domain Layer
//!
//! Entities, value objects, errors, and invariants for the cart panel.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod value_objects;

pub use entities::{CartSnapshot, LineItem, PendingMutation};
pub use errors::CartError;
pub use invariants::{invariant_line_consistent, invariant_snapshot_consistent, QUANTITY_FLOOR};
pub use value_objects::{
    CartRow, CartSummary, CartView, LineIndex, MinorUnits, MutationKind, MutationOutcome,
    MutationState, SequenceToken, VariantId,
};
