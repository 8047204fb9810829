//! Availability reconciliation.
//!
//! Carts hold snapshots that drift from live product state. Before a cart is
//! trusted for pricing or checkout, this engine prunes lines that are no
//! longer purchasable and refreshes the name/price snapshots of the rest.
//! An item referencing a vanished product is removed, not reported as an
//! error: upstream inconsistency is expected here and healing it is the
//! engine's whole job.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use souk_commerce::cart::Cart;
use souk_commerce::catalog::ProductRecord;
use souk_commerce::ids::{BuyerId, CartId, CartItemId, ProductId};
use souk_commerce::CommerceError;
use tracing::{debug, info};

use crate::providers::ProductProvider;
use crate::store::{CartLocks, CartStore};

/// Re-validates cart contents against live product state.
pub struct AvailabilityReconciler {
    store: Arc<dyn CartStore>,
    products: Arc<dyn ProductProvider>,
    locks: Arc<CartLocks>,
}

impl AvailabilityReconciler {
    /// Create a new reconciler.
    pub fn new(
        store: Arc<dyn CartStore>,
        products: Arc<dyn ProductProvider>,
        locks: Arc<CartLocks>,
    ) -> Self {
        Self {
            store,
            products,
            locks,
        }
    }

    /// Prune and refresh the cart, returning the reconciled aggregate.
    ///
    /// Removal rules, applied in order per item: product missing, off-shelf,
    /// not approved, zero stock. Items whose live stock is positive but
    /// below the stored quantity are retained as-is; only zero stock
    /// removes. Idempotent while product state holds still.
    pub async fn reconcile(
        &self,
        buyer_id: &BuyerId,
        cart_id: &CartId,
    ) -> Result<Cart, CommerceError> {
        let _guard = self.locks.acquire(cart_id).await;

        let mut cart = self.load_open_owned(buyer_id, cart_id).await?;
        if cart.is_empty() {
            return Ok(cart);
        }

        let product_ids: Vec<ProductId> = {
            let mut seen = HashSet::new();
            cart.items
                .iter()
                .filter(|item| seen.insert(item.product_id.clone()))
                .map(|item| item.product_id.clone())
                .collect()
        };
        let records = self.products.find_by_ids(&product_ids).await?;
        let by_id: HashMap<&ProductId, &ProductRecord> =
            records.iter().map(|r| (&r.id, r)).collect();

        // Pass 1: collect removals with the first matching rule.
        let mut removals: Vec<(CartItemId, &'static str)> = Vec::new();
        for item in &cart.items {
            let reason = match by_id.get(&item.product_id) {
                None => Some("missing"),
                Some(record) if !record.on_shelf => Some("off_shelf"),
                Some(record) if !record.approved => Some("unapproved"),
                Some(record) if record.stock == 0 => Some("out_of_stock"),
                Some(_) => None,
            };
            if let Some(reason) = reason {
                removals.push((item.id.clone(), reason));
            }
        }
        for (item_id, reason) in &removals {
            cart.remove_item(item_id);
            debug!(cart_id = %cart_id, cart_item_id = %item_id, reason, "pruned cart item");
        }

        // Pass 2: refresh snapshots of everything that survived.
        let mut refreshed = 0usize;
        for item in &mut cart.items {
            if let Some(record) = by_id.get(&item.product_id) {
                if item.snapshot.refresh_from(record) {
                    refreshed += 1;
                    debug!(
                        cart_id = %cart_id,
                        cart_item_id = %item.id,
                        product_id = %item.product_id,
                        "refreshed item snapshot"
                    );
                }
            }
        }
        if refreshed > 0 {
            cart.touch();
        }

        self.store.save(&cart).await?;
        if !removals.is_empty() || refreshed > 0 {
            info!(
                buyer_id = %buyer_id,
                cart_id = %cart_id,
                removed = removals.len(),
                refreshed,
                "cart reconciled"
            );
        }
        Ok(cart)
    }

    async fn load_open_owned(
        &self,
        buyer_id: &BuyerId,
        cart_id: &CartId,
    ) -> Result<Cart, CommerceError> {
        let cart = self
            .store
            .find(cart_id)
            .await?
            .ok_or_else(|| CommerceError::CartNotFound(cart_id.to_string()))?;
        if !cart.is_owned_by(buyer_id) {
            return Err(CommerceError::NotCartOwner {
                cart_id: cart_id.to_string(),
                buyer_id: buyer_id.to_string(),
            });
        }
        if !cart.is_open() {
            return Err(CommerceError::CartAlreadyCheckedOut(cart_id.to_string()));
        }
        Ok(cart)
    }
}
