//! # Ports
//!
//! API trait (inbound) + dependency traits (outbound), with mock
//! implementations for testing beside the outbound ports.

pub mod inbound;
pub mod outbound;

pub use inbound::CartPanelApi;
pub use outbound::{
    CartPayload, CartService, LinePayload, MockCartService, RecordedCall, ViewSink,
};
