//! # Domain Invariants
//!
//! Rules that must hold for every server-confirmed snapshot.
//!
//! Optimistic intermediate states may transiently violate the totals
//! invariant (an add of an unpriced variant bumps the item count before
//! the price is known); ingestion of a server payload never may.

use super::entities::{CartSnapshot, LineItem};
use super::errors::CartError;

/// Minimum quantity a line can be edited down to. Reaching 0 is modeled
/// as an explicit Remove, never as a quantity change.
pub const QUANTITY_FLOOR: u32 = 1;

/// Invariant: `line_total == unit_price * quantity` and quantity is
/// positive.
pub fn invariant_line_consistent(line: &LineItem) -> Result<(), CartError> {
    if line.quantity == 0 {
        return Err(CartError::MalformedPayload(format!(
            "line for variant {} has quantity 0",
            line.variant_id
        )));
    }

    let expected = line
        .unit_price_minor
        .checked_mul(line.quantity as u64)
        .ok_or_else(|| {
            CartError::MalformedPayload(format!(
                "line total overflows for variant {}",
                line.variant_id
            ))
        })?;

    if expected != line.line_total_minor {
        return Err(CartError::MalformedPayload(format!(
            "line total mismatch for variant {}: {} * {} != {}",
            line.variant_id, line.unit_price_minor, line.quantity, line.line_total_minor
        )));
    }
    Ok(())
}

/// Invariant: `item_count == sum(quantity)` and
/// `total_price == sum(line_total)`.
pub fn invariant_snapshot_consistent(snapshot: &CartSnapshot) -> Result<(), CartError> {
    let mut quantity_sum: u64 = 0;
    let mut total_sum: u64 = 0;

    for line in &snapshot.lines {
        invariant_line_consistent(line)?;
        quantity_sum += line.quantity as u64;
        total_sum = total_sum.checked_add(line.line_total_minor).ok_or_else(|| {
            CartError::MalformedPayload("cart total overflows minor units".to_string())
        })?;
    }

    if quantity_sum != snapshot.item_count as u64 {
        return Err(CartError::MalformedPayload(format!(
            "item count mismatch: declared {}, lines sum to {}",
            snapshot.item_count, quantity_sum
        )));
    }
    if total_sum != snapshot.total_price_minor {
        return Err(CartError::MalformedPayload(format!(
            "total price mismatch: declared {}, lines sum to {}",
            snapshot.total_price_minor, total_sum
        )));
    }
    Ok(())
}
