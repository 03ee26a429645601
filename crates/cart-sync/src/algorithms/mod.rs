//! # Algorithms
//!
//! Pure, I/O-free logic: optimistic projection, sequence gating, and
//! view rendering. Everything here is deterministic and synchronous;
//! the application layer owns all suspension points.

pub mod optimistic;
pub mod render;
pub mod sequence;

pub use optimistic::project;
pub use render::render;
pub use sequence::{Admission, SequenceGate};
