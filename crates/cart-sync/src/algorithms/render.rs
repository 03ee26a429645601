//! # Renderer
//!
//! Pure projection of a snapshot into the view model handed to the
//! presentation sink. Idempotent: the same snapshot always yields the
//! same view, and every render rebuilds the full row list so repeated
//! presentation can never accumulate duplicate rows.

use crate::domain::{CartRow, CartSnapshot, CartSummary, CartView};

/// Project a snapshot into a view model.
pub fn render(snapshot: &CartSnapshot) -> CartView {
    let rows = snapshot
        .lines
        .iter()
        .enumerate()
        .map(|(offset, line)| CartRow {
            line_index: offset as u32 + 1,
            variant_id: line.variant_id.clone(),
            title: line.title.clone(),
            image_ref: line.image_ref.clone(),
            quantity: line.quantity,
            unit_price_minor: line.unit_price_minor,
            line_total_minor: line.line_total_minor,
        })
        .collect();

    CartView {
        rows,
        summary: CartSummary {
            item_count: snapshot.item_count,
            subtotal_minor: snapshot.total_price_minor,
        },
        is_empty: snapshot.is_empty(),
    }
}
