//! # Adapters
//!
//! Concrete implementations of the outbound ports: a simulated
//! server-side cart and a view sink that buffers the latest repaint.

pub mod buffered_sink;
pub mod in_memory;

pub use buffered_sink::BufferedSink;
pub use in_memory::{CatalogEntry, InMemoryCartService};
