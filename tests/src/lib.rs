//! # Cart-Panel Test Suite
//!
//! Unified test crate for cross-module scenarios.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── reconciliation.rs   # Optimistic edits vs out-of-order confirmations
//!     ├── recovery.rs         # Rollback, forced refresh, server rejection
//!     └── consistency.rs      # Property tests: invariants over random edit scripts
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cart-tests
//! cargo test -p cart-tests integration::reconciliation::
//! ```

pub mod integration;
