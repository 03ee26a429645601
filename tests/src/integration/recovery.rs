//! # Recovery Scenarios
//!
//! Failed and rejected mutations: rollback to the captured pre-edit
//! state, forced refresh, and server rejections that self-correct.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cart_sync::{
        BufferedSink, CartError, CartPanelApi, CartPanelConfig, CartPanelService, CartPayload,
        InMemoryCartService, LineIndex, MutationKind, MutationOutcome, RecordedCall, VariantId,
    };

    use crate::integration::fixtures::{one_line_payload, scripted_panel};

    fn idx(i: u32) -> LineIndex {
        LineIndex::new(i).expect("positive index")
    }

    /// Spec scenario: the increment request fails. The final state must
    /// equal the original (quantity 2, 1000, 2 items) and a forced
    /// refresh must have been issued afterwards.
    #[tokio::test]
    async fn failed_increment_restores_prior_totals_and_refreshes() {
        let (mock, sink, panel) = scripted_panel();
        mock.push_ok(one_line_payload(2, 500));
        panel.refresh().await.expect("seed");

        mock.push_err(CartError::Transport("connection reset".to_string()));
        mock.push_ok(one_line_payload(2, 500)); // the forced refresh

        let outcome = panel
            .mutate(MutationKind::ChangeQuantity {
                line: idx(1),
                quantity: 3,
            })
            .await;

        assert_eq!(outcome, MutationOutcome::RolledBack);
        let snapshot = panel.displayed_snapshot();
        assert_eq!(snapshot.item_count, 2);
        assert_eq!(snapshot.total_price_minor, 1000);
        assert_eq!(snapshot.lines[0].quantity, 2);

        // Mutation request, then the forced refresh.
        assert_eq!(
            mock.calls(),
            vec![
                RecordedCall::Fetch,
                RecordedCall::ChangeQuantity {
                    line: 1,
                    quantity: 3
                },
                RecordedCall::Fetch,
            ]
        );
        assert_eq!(mock.remaining(), 0);
        let view = sink.last_view().expect("presented");
        assert_eq!(view.summary.subtotal_minor, 1000);
    }

    /// The forced refresh reconciles a mutation that partially succeeded
    /// server-side despite a client-visible error.
    #[tokio::test]
    async fn refresh_after_failure_picks_up_partial_server_effect() {
        let (mock, _sink, panel) = scripted_panel();
        mock.push_ok(one_line_payload(2, 500));
        panel.refresh().await.expect("seed");

        mock.push_err(CartError::Transport("timeout".to_string()));
        // Server actually applied the change before the timeout.
        mock.push_ok(one_line_payload(3, 500));

        let outcome = panel
            .mutate(MutationKind::ChangeQuantity {
                line: idx(1),
                quantity: 3,
            })
            .await;

        assert_eq!(outcome, MutationOutcome::RolledBack);
        // Displayed state ends on server truth, not the rolled-back guess.
        assert_eq!(panel.displayed_snapshot().item_count, 3);
        assert_eq!(panel.confirmed_snapshot().total_price_minor, 1500);
    }

    /// An inventory-capped add "succeeds" with a different cart than
    /// requested; the authoritative payload overrides the optimistic
    /// guess with no error surfaced.
    #[tokio::test]
    async fn server_rejection_self_corrects() {
        let backend = Arc::new(InMemoryCartService::new());
        backend.stock(&VariantId::new("ltd"), "Limited run print", 2500, Some(1));
        let sink = Arc::new(BufferedSink::new());
        let panel = CartPanelService::new(
            CartPanelConfig::for_testing(),
            Arc::clone(&backend),
            Arc::clone(&sink),
        );

        let outcome = panel
            .mutate(MutationKind::Add {
                variant_id: VariantId::new("ltd"),
                quantity: 5,
            })
            .await;

        // Applied, not an error: the server capped the quantity at 1.
        assert_eq!(outcome, MutationOutcome::Applied);
        let snapshot = panel.confirmed_snapshot();
        assert_eq!(snapshot.item_count, 1);
        assert_eq!(snapshot.total_price_minor, 2500);
        let view = sink.last_view().expect("presented");
        assert_eq!(view.rows[0].quantity, 1);
    }

    /// Every failure stays local: `mutate` reports an outcome, never a
    /// hard error, and the panel remains usable afterwards.
    #[tokio::test]
    async fn panel_remains_usable_after_backend_outage() {
        let backend = Arc::new(InMemoryCartService::new());
        backend.stock(&VariantId::new("tea"), "Loose-leaf tea", 500, None);
        let sink = Arc::new(BufferedSink::new());
        let panel = CartPanelService::new(
            CartPanelConfig::for_testing(),
            Arc::clone(&backend),
            Arc::clone(&sink),
        );

        backend.set_failing(true);
        let outcome = panel
            .mutate(MutationKind::Add {
                variant_id: VariantId::new("tea"),
                quantity: 1,
            })
            .await;
        assert_eq!(outcome, MutationOutcome::RolledBack);
        assert!(panel.displayed_snapshot().is_empty());

        backend.set_failing(false);
        let outcome = panel
            .mutate(MutationKind::Add {
                variant_id: VariantId::new("tea"),
                quantity: 1,
            })
            .await;
        assert_eq!(outcome, MutationOutcome::Applied);
        assert_eq!(panel.confirmed_snapshot().item_count, 1);
    }

    /// A malformed payload is recoverable exactly like a transport error.
    #[tokio::test]
    async fn malformed_payload_rolls_back() {
        let (mock, _sink, panel) = scripted_panel();
        mock.push_ok(one_line_payload(2, 500));
        panel.refresh().await.expect("seed");

        let mut corrupt = one_line_payload(3, 500);
        corrupt.item_count = 99;
        mock.push_ok(corrupt);
        mock.push_ok(one_line_payload(2, 500));

        let outcome = panel
            .mutate(MutationKind::ChangeQuantity {
                line: idx(1),
                quantity: 3,
            })
            .await;

        assert_eq!(outcome, MutationOutcome::RolledBack);
        assert_eq!(panel.displayed_snapshot().item_count, 2);
    }

    /// Payloads decode from the camelCase wire shape; one whose declared
    /// totals contradict its lines rolls back like any other failure.
    #[tokio::test]
    async fn inconsistent_wire_payload_rolls_back() {
        let (mock, _sink, panel) = scripted_panel();
        let seed: CartPayload = serde_json::from_value(serde_json::json!({
            "itemCount": 2,
            "totalPrice": 1000,
            "lines": [{
                "variantId": "a",
                "quantity": 2,
                "unitPrice": 500,
                "lineTotal": 1000,
                "title": "Item a",
            }]
        }))
        .expect("wire shape");
        mock.push_ok(seed);
        panel.refresh().await.expect("seed");
        assert_eq!(panel.confirmed_snapshot().total_price_minor, 1000);

        // Declared total disagrees with the single line.
        let corrupt: CartPayload = serde_json::from_value(serde_json::json!({
            "itemCount": 3,
            "totalPrice": 9,
            "lines": [{
                "variantId": "a",
                "quantity": 3,
                "unitPrice": 500,
                "lineTotal": 1500,
                "title": "Item a",
            }]
        }))
        .expect("wire shape");
        mock.push_ok(corrupt);
        mock.push_ok(one_line_payload(2, 500));

        let outcome = panel
            .mutate(MutationKind::ChangeQuantity {
                line: idx(1),
                quantity: 3,
            })
            .await;

        assert_eq!(outcome, MutationOutcome::RolledBack);
        assert_eq!(panel.displayed_snapshot().total_price_minor, 1000);
    }

    /// Rejected edits never reach the wire and apply no delta.
    #[tokio::test]
    async fn rejected_edit_is_purely_local() {
        let (mock, sink, panel) = scripted_panel();
        mock.push_ok(one_line_payload(2, 500));
        panel.refresh().await.expect("seed");
        let presents = sink.present_count();

        // Decrement below the floor of 1 must be a local no-op.
        let outcome = panel
            .mutate(MutationKind::ChangeQuantity {
                line: idx(1),
                quantity: 0,
            })
            .await;

        assert!(matches!(
            outcome,
            MutationOutcome::Rejected(CartError::InvalidEdit(_))
        ));
        assert_eq!(sink.present_count(), presents);
        assert_eq!(mock.calls(), vec![RecordedCall::Fetch]);
    }
}
