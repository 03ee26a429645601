//! Cross-module scenarios exercising the full mutation lifecycle.

pub mod consistency;
pub mod recovery;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use cart_sync::{
        BufferedSink, CartPanelConfig, CartPanelService, CartPayload, CartSnapshot, LineItem,
        MinorUnits, MockCartService, VariantId,
    };

    /// Panel wired to a scripted mock service.
    pub fn scripted_panel() -> (
        Arc<MockCartService>,
        Arc<BufferedSink>,
        CartPanelService<MockCartService, BufferedSink>,
    ) {
        let mock = Arc::new(MockCartService::new());
        let sink = Arc::new(BufferedSink::new());
        let panel = CartPanelService::new(
            CartPanelConfig::for_testing(),
            Arc::clone(&mock),
            Arc::clone(&sink),
        );
        (mock, sink, panel)
    }

    /// A cart with a single line: `quantity` of variant "a" at `unit_price`.
    pub fn one_line_payload(quantity: u32, unit_price: MinorUnits) -> CartPayload {
        CartPayload::from_snapshot(
            &CartSnapshot::from_parts(
                quantity,
                unit_price * quantity as u64,
                vec![line("a", quantity, unit_price)],
            )
            .expect("consistent fixture"),
        )
    }

    pub fn line(variant: &str, quantity: u32, unit_price: MinorUnits) -> LineItem {
        LineItem {
            variant_id: VariantId::new(variant),
            quantity,
            unit_price_minor: unit_price,
            line_total_minor: unit_price * quantity as u64,
            title: format!("Item {variant}"),
            image_ref: None,
        }
    }
}
