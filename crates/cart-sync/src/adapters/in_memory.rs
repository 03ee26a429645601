//! In-Memory Cart Service Adapter
//!
//! A simulated server-side cart implementing the [`CartService`] port.
//! It enforces per-variant inventory caps the way a real backend would:
//! the request "succeeds" but the returned cart differs from what was
//! asked for, and the returned cart is authoritative. Used by the
//! scenario tests and as a demo backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{CartError, LineIndex, MinorUnits, VariantId};
use crate::ports::outbound::{CartPayload, CartService, LinePayload};

/// One purchasable variant known to the simulated backend.
#[derive(Clone, Debug)]
pub struct CatalogEntry {
    /// Display title.
    pub title: String,
    /// Unit price in minor units.
    pub unit_price_minor: MinorUnits,
    /// Maximum quantity the backend will sell, if limited.
    pub inventory_cap: Option<u32>,
}

#[derive(Clone, Debug)]
struct ServerLine {
    variant: String,
    quantity: u32,
}

/// Simulated server-authoritative cart.
#[derive(Default)]
pub struct InMemoryCartService {
    catalog: Mutex<HashMap<String, CatalogEntry>>,
    cart: Mutex<Vec<ServerLine>>,
    fail_requests: AtomicBool,
}

impl InMemoryCartService {
    /// Empty backend with an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variant the backend can sell.
    pub fn stock(
        &self,
        variant: &VariantId,
        title: impl Into<String>,
        unit_price_minor: MinorUnits,
        inventory_cap: Option<u32>,
    ) {
        self.catalog.lock().expect("catalog poisoned").insert(
            variant.as_str().to_string(),
            CatalogEntry {
                title: title.into(),
                unit_price_minor,
                inventory_cap,
            },
        );
    }

    /// Make every subsequent request fail with a transport error.
    pub fn set_failing(&self, failing: bool) {
        self.fail_requests.store(failing, Ordering::SeqCst);
    }

    /// The backend's current cart, as a payload.
    pub fn server_cart(&self) -> CartPayload {
        let cart = self.cart.lock().expect("cart poisoned");
        self.payload_for(&cart)
    }

    fn check_transport(&self) -> Result<(), CartError> {
        if self.fail_requests.load(Ordering::SeqCst) {
            return Err(CartError::Transport(
                "simulated backend unavailable".to_string(),
            ));
        }
        Ok(())
    }

    fn payload_for(&self, cart: &[ServerLine]) -> CartPayload {
        let catalog = self.catalog.lock().expect("catalog poisoned");
        let mut item_count: u32 = 0;
        let mut total: MinorUnits = 0;
        let lines = cart
            .iter()
            .filter_map(|line| {
                let entry = catalog.get(&line.variant)?;
                let line_total = entry.unit_price_minor * line.quantity as u64;
                item_count += line.quantity;
                total += line_total;
                Some(LinePayload {
                    variant_id: VariantId::new(line.variant.clone()),
                    quantity: line.quantity,
                    unit_price: entry.unit_price_minor,
                    line_total,
                    title: entry.title.clone(),
                    image_ref: None,
                })
            })
            .collect();
        CartPayload {
            item_count,
            total_price: total,
            lines,
        }
    }

    fn capped_quantity(&self, variant: &str, requested: u32) -> u32 {
        let catalog = self.catalog.lock().expect("catalog poisoned");
        match catalog.get(variant).and_then(|entry| entry.inventory_cap) {
            Some(cap) if requested > cap => {
                debug!(
                    "[cart-sync] Backend capped {} at {} (requested {})",
                    variant, cap, requested
                );
                cap
            }
            _ => requested,
        }
    }
}

#[async_trait]
impl CartService for InMemoryCartService {
    async fn fetch_cart(&self) -> Result<CartPayload, CartError> {
        self.check_transport()?;
        Ok(self.server_cart())
    }

    async fn add_line(
        &self,
        variant: &VariantId,
        quantity: u32,
    ) -> Result<CartPayload, CartError> {
        self.check_transport()?;
        if !self
            .catalog
            .lock()
            .expect("catalog poisoned")
            .contains_key(variant.as_str())
        {
            return Err(CartError::Transport(format!(
                "unknown variant: {variant}"
            )));
        }

        let mut cart = self.cart.lock().expect("cart poisoned");
        match cart
            .iter_mut()
            .find(|line| line.variant == variant.as_str())
        {
            Some(line) => {
                let requested = line.quantity.saturating_add(quantity);
                line.quantity = self.capped_quantity(&line.variant, requested);
            }
            None => {
                let capped = self.capped_quantity(variant.as_str(), quantity);
                cart.push(ServerLine {
                    variant: variant.as_str().to_string(),
                    quantity: capped,
                });
            }
        }
        Ok(self.payload_for(&cart))
    }

    async fn change_quantity(
        &self,
        line: LineIndex,
        quantity: u32,
    ) -> Result<CartPayload, CartError> {
        self.check_transport()?;

        let mut cart = self.cart.lock().expect("cart poisoned");
        let offset = line.as_offset();
        if offset >= cart.len() {
            return Err(CartError::Transport(format!(
                "no cart line at index {line}"
            )));
        }

        if quantity == 0 {
            cart.remove(offset);
        } else {
            let variant = cart[offset].variant.clone();
            cart[offset].quantity = self.capped_quantity(&variant, quantity);
        }
        Ok(self.payload_for(&cart))
    }

    async fn clear(&self) -> Result<CartPayload, CartError> {
        self.check_transport()?;
        let mut cart = self.cart.lock().expect("cart poisoned");
        cart.clear();
        Ok(self.payload_for(&cart))
    }
}
