//! Buffered View Sink Adapter
//!
//! Retains the most recent view for the host to read back. Each
//! `present` replaces the previous view wholesale, matching the sink
//! contract.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::domain::CartView;
use crate::ports::outbound::ViewSink;

/// View sink that keeps the latest presented view and a repaint counter.
#[derive(Default)]
pub struct BufferedSink {
    last: Mutex<Option<CartView>>,
    presents: AtomicU64,
}

impl BufferedSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently presented view, if any repaint happened yet.
    pub fn last_view(&self) -> Option<CartView> {
        self.last.lock().expect("sink buffer poisoned").clone()
    }

    /// Number of repaints received.
    pub fn present_count(&self) -> u64 {
        self.presents.load(Ordering::SeqCst)
    }
}

impl ViewSink for BufferedSink {
    fn present(&self, view: &CartView) {
        *self.last.lock().expect("sink buffer poisoned") = Some(view.clone());
        self.presents.fetch_add(1, Ordering::SeqCst);
    }
}
