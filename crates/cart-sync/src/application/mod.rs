//! # Application Layer
//!
//! The panel service orchestrating the mutation lifecycle, plus the
//! rollback policy it invokes on failure.

pub mod recovery;
pub mod service;

pub use service::{CartPanelService, PanelSubscription};
