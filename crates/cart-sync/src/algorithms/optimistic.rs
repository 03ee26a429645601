//! # Optimistic Projection
//!
//! Pure computation of the provisional cart shown between a user edit
//! and its server confirmation. Integer minor-unit arithmetic only; the
//! caller captures the exact pre-edit snapshot for rollback, so nothing
//! here is ever recomputed on recovery.

use crate::domain::{CartError, CartSnapshot, MinorUnits, MutationKind, QUANTITY_FLOOR};

/// Shift a minor-unit total by a signed quantity delta at a unit price.
///
/// `provisional = current + d * p`, saturating at zero rather than
/// wrapping (a confirmed snapshot can never go negative; saturation only
/// matters for pathological provisional states, which the authoritative
/// replacement corrects).
fn shift_total(current: MinorUnits, delta: i64, unit_price: MinorUnits) -> MinorUnits {
    let magnitude = unit_price.saturating_mul(delta.unsigned_abs());
    if delta >= 0 {
        current.saturating_add(magnitude)
    } else {
        current.saturating_sub(magnitude)
    }
}

/// Shift an item count by a signed delta, saturating at zero.
fn shift_count(current: u32, delta: i64) -> u32 {
    if delta >= 0 {
        current.saturating_add(delta as u32)
    } else {
        current.saturating_sub(delta.unsigned_abs() as u32)
    }
}

/// Validate `kind` against the displayed snapshot and compute the
/// provisional snapshot to show until the server responds.
///
/// # Errors
/// `InvalidEdit` when the edit cannot be issued at all: the target line
/// is absent from the displayed snapshot, a requested quantity is below
/// the floor of 1, or an add requests nothing. A rejected edit applies
/// no delta and sends no request.
pub fn project(displayed: &CartSnapshot, kind: &MutationKind) -> Result<CartSnapshot, CartError> {
    match kind {
        MutationKind::Add {
            variant_id,
            quantity,
        } => {
            if *quantity == 0 {
                return Err(CartError::InvalidEdit(
                    "add requires a positive quantity".to_string(),
                ));
            }

            let mut provisional = displayed.clone();
            match displayed.line_index_of(variant_id) {
                Some(index) => {
                    // Variant already in the cart: a quantity bump with a
                    // known unit price.
                    let line = &mut provisional.lines[index.as_offset()];
                    let unit_price = line.unit_price_minor;
                    line.quantity = line.quantity.saturating_add(*quantity);
                    line.line_total_minor = unit_price.saturating_mul(line.quantity as u64);
                    provisional.total_price_minor =
                        shift_total(displayed.total_price_minor, *quantity as i64, unit_price);
                }
                None => {
                    // New variant: the unit price is unknown client-side,
                    // so only the item count moves provisionally. The
                    // authoritative replacement fills in the rest.
                }
            }
            provisional.item_count = shift_count(displayed.item_count, *quantity as i64);
            Ok(provisional)
        }

        MutationKind::ChangeQuantity { line, quantity } => {
            if *quantity < QUANTITY_FLOOR {
                return Err(CartError::InvalidEdit(
                    "quantity cannot go below 1; removal is the explicit remove action"
                        .to_string(),
                ));
            }
            let current = displayed
                .line_at(*line)
                .ok_or_else(|| CartError::InvalidEdit(format!("no line at index {line}")))?;

            let delta = *quantity as i64 - current.quantity as i64;
            let unit_price = current.unit_price_minor;

            let mut provisional = displayed.clone();
            {
                let target = &mut provisional.lines[line.as_offset()];
                target.quantity = *quantity;
                target.line_total_minor = unit_price.saturating_mul(*quantity as u64);
            }
            provisional.item_count = shift_count(displayed.item_count, delta);
            provisional.total_price_minor =
                shift_total(displayed.total_price_minor, delta, unit_price);
            Ok(provisional)
        }

        MutationKind::Remove { line } => {
            let current = displayed
                .line_at(*line)
                .ok_or_else(|| CartError::InvalidEdit(format!("no line at index {line}")))?;

            let delta = -(current.quantity as i64);
            let unit_price = current.unit_price_minor;

            let mut provisional = displayed.clone();
            provisional.lines.remove(line.as_offset());
            provisional.item_count = shift_count(displayed.item_count, delta);
            provisional.total_price_minor =
                shift_total(displayed.total_price_minor, delta, unit_price);
            Ok(provisional)
        }

        MutationKind::Clear => Ok(CartSnapshot::empty()),
    }
}
