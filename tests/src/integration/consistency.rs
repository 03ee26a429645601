//! # Consistency Properties
//!
//! Property tests over random edit scripts: once every response has
//! resolved, the displayed cart equals server truth and satisfies the
//! totals invariant; a failing edit restores the pre-edit state
//! bit-for-bit.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use cart_sync::domain::invariant_snapshot_consistent;
    use cart_sync::{
        project, BufferedSink, CartPanelApi, CartPanelConfig, CartPanelService, CartSnapshot,
        InMemoryCartService, LineIndex, LineItem, MutationKind, VariantId,
    };

    const VARIANTS: [(&str, u64); 3] = [("a", 500), ("b", 700), ("c", 1250)];

    #[derive(Clone, Debug)]
    enum Op {
        Add { variant: usize, quantity: u32 },
        Change { line: u32, quantity: u32 },
        Remove { line: u32 },
        Clear,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..VARIANTS.len(), 1..5u32)
                .prop_map(|(variant, quantity)| Op::Add { variant, quantity }),
            (1..4u32, 1..8u32).prop_map(|(line, quantity)| Op::Change { line, quantity }),
            (1..4u32).prop_map(|line| Op::Remove { line }),
            Just(Op::Clear),
        ]
    }

    fn kind_for(op: &Op) -> MutationKind {
        match op {
            Op::Add { variant, quantity } => MutationKind::Add {
                variant_id: VariantId::new(VARIANTS[*variant].0),
                quantity: *quantity,
            },
            Op::Change { line, quantity } => MutationKind::ChangeQuantity {
                line: LineIndex::new(*line).expect("positive"),
                quantity: *quantity,
            },
            Op::Remove { line } => MutationKind::Remove {
                line: LineIndex::new(*line).expect("positive"),
            },
            Op::Clear => MutationKind::Clear,
        }
    }

    fn stocked_panel() -> (
        Arc<InMemoryCartService>,
        CartPanelService<InMemoryCartService, BufferedSink>,
    ) {
        let backend = Arc::new(InMemoryCartService::new());
        for (variant, price) in VARIANTS {
            backend.stock(&VariantId::new(variant), format!("Item {variant}"), price, None);
        }
        let panel = CartPanelService::new(
            CartPanelConfig::for_testing(),
            Arc::clone(&backend),
            Arc::new(BufferedSink::new()),
        );
        (backend, panel)
    }

    fn line(variant: &str, quantity: u32, unit_price: u64) -> LineItem {
        LineItem {
            variant_id: VariantId::new(variant),
            quantity,
            unit_price_minor: unit_price,
            line_total_minor: unit_price * quantity as u64,
            title: format!("Item {variant}"),
            image_ref: None,
        }
    }

    proptest! {
        /// After an arbitrary resolved edit script, displayed state is
        /// server truth and the totals invariant holds.
        #[test]
        fn random_edit_scripts_converge(ops in proptest::collection::vec(op_strategy(), 0..12)) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("runtime");
            rt.block_on(async {
                let (backend, panel) = stocked_panel();
                for op in &ops {
                    // Rejected edits are fine; resolved ones must reconcile.
                    let _ = panel.mutate(kind_for(op)).await;
                }

                let displayed = panel.displayed_snapshot();
                assert!(invariant_snapshot_consistent(&displayed).is_ok());
                let server = CartSnapshot::try_from(backend.server_cart())
                    .expect("backend cart consistent");
                assert_eq!(displayed, server);
                assert_eq!(panel.confirmed_snapshot(), server);
            });
        }

        /// A failed edit restores the captured pre-edit snapshot exactly.
        #[test]
        fn failed_edit_restores_state_bit_for_bit(
            seed in proptest::collection::vec((0..VARIANTS.len(), 1..5u32), 1..4),
            op in op_strategy(),
        ) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("runtime");
            rt.block_on(async {
                let (backend, panel) = stocked_panel();
                for (variant, quantity) in &seed {
                    let _ = panel
                        .mutate(MutationKind::Add {
                            variant_id: VariantId::new(VARIANTS[*variant].0),
                            quantity: *quantity,
                        })
                        .await;
                }

                let before = panel.displayed_snapshot();
                backend.set_failing(true);
                let _ = panel.mutate(kind_for(&op)).await;

                // Rejected or rolled back, the displayed cart is unchanged
                // (the forced refresh failed too, leaving the restored state).
                assert_eq!(panel.displayed_snapshot(), before);
            });
        }

        /// The optimistic projection of a valid quantity change keeps the
        /// provisional snapshot internally consistent, and the formula
        /// `provisional = current + d * p` holds for the subtotal.
        #[test]
        fn projection_preserves_consistency(
            quantities in proptest::collection::vec(1..20u32, 1..4),
            target in 0..3usize,
            new_quantity in 1..25u32,
        ) {
            let lines: Vec<LineItem> = quantities
                .iter()
                .enumerate()
                .map(|(offset, quantity)| {
                    let (variant, price) = VARIANTS[offset % VARIANTS.len()];
                    line(&format!("{variant}{offset}"), *quantity, price)
                })
                .collect();
            let item_count: u32 = lines.iter().map(|l| l.quantity).sum();
            let total: u64 = lines.iter().map(|l| l.line_total_minor).sum();
            let snapshot = CartSnapshot::from_parts(item_count, total, lines)
                .expect("consistent fixture");

            let target = target % snapshot.lines.len();
            let index = LineIndex::new(target as u32 + 1).expect("positive");
            let old = &snapshot.lines[target];
            let delta = new_quantity as i64 - old.quantity as i64;
            let expected_total =
                (total as i64 + delta * old.unit_price_minor as i64) as u64;

            let provisional = project(
                &snapshot,
                &MutationKind::ChangeQuantity {
                    line: index,
                    quantity: new_quantity,
                },
            )
            .expect("valid edit");

            prop_assert!(invariant_snapshot_consistent(&provisional).is_ok());
            prop_assert_eq!(provisional.total_price_minor, expected_total);
            prop_assert_eq!(
                provisional.item_count as i64,
                item_count as i64 + delta
            );
        }
    }
}
