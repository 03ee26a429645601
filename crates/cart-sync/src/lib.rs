//! # Cart-Sync
//!
//! Optimistic reconciliation engine for a client-side shopping-cart
//! panel mirroring a server-authoritative cart.
//!
//! ## Purpose
//!
//! Keep the on-screen cart (line items, item count, subtotal) responsive
//! and truthful at the same time:
//! - every edit is applied optimistically before its request is sent,
//! - responses may resolve out of issue order and are admitted through a
//!   monotonic sequence gate, so a slow response can never clobber the
//!   result of a newer edit,
//! - failures roll back to the exact pre-edit state and force a refresh.
//!
//! ## Reconciliation rules
//!
//! | Event | Effect |
//! |-------|--------|
//! | Edit issued | Provisional totals presented synchronously, token stamped |
//! | Fresh response | Snapshot replaced wholesale with the server payload |
//! | Stale response | Discarded, no observable effect |
//! | Failure | Pre-edit snapshot restored, refresh forced |
//!
//! ## Module Structure
//!
//! ```text
//! cart-sync/
//! ├── domain/          # CartSnapshot, LineItem, PendingMutation, errors, invariants
//! ├── algorithms/      # Optimistic projection, sequence gate, renderer (pure)
//! ├── ports/           # API trait (inbound) + service/sink traits (outbound)
//! ├── application/     # CartPanelService orchestrating everything + recovery
//! ├── adapters/        # Simulated backend, buffered view sink
//! └── config.rs        # CartPanelConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{BufferedSink, InMemoryCartService};
pub use algorithms::{project, render, Admission, SequenceGate};
pub use application::{CartPanelService, PanelSubscription};
pub use config::CartPanelConfig;
pub use domain::{
    CartError, CartRow, CartSnapshot, CartSummary, CartView, LineIndex, LineItem, MinorUnits,
    MutationKind, MutationOutcome, MutationState, PendingMutation, SequenceToken, VariantId,
    QUANTITY_FLOOR,
};
pub use ports::{
    CartPanelApi, CartPayload, CartService, LinePayload, MockCartService, RecordedCall, ViewSink,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
