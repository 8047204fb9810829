//! Cart aggregate service.

use std::sync::Arc;

use souk_commerce::cart::Cart;
use souk_commerce::ids::{BuyerId, CartId, OrderId};
use souk_commerce::CommerceError;
use tracing::{debug, info};

use crate::store::{CartLocks, CartStore};

/// Finds, creates, and closes buyer carts.
pub struct CartService {
    store: Arc<dyn CartStore>,
    locks: Arc<CartLocks>,
}

impl CartService {
    /// Create a new cart service.
    pub fn new(store: Arc<dyn CartStore>, locks: Arc<CartLocks>) -> Self {
        Self { store, locks }
    }

    /// Return the buyer's open cart, creating an empty one if none exists.
    ///
    /// Idempotent: repeated calls with no intervening checkout return the
    /// same cart.
    pub async fn find_or_create_open(&self, buyer_id: &BuyerId) -> Result<Cart, CommerceError> {
        let cart = self.store.find_or_create_open(buyer_id).await?;
        debug!(buyer_id = %buyer_id, cart_id = %cart.id, "resolved open cart");
        Ok(cart)
    }

    /// Return the cart only if it belongs to the buyer.
    pub async fn find_owned(
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
        Ok(cart)
    }

    /// Mark the buyer's cart as checked out, recording the order if given.
    ///
    /// The next [`find_or_create_open`](Self::find_or_create_open) for the
    /// buyer yields a new, empty cart.
    pub async fn set_checkout_done(
        &self,
        buyer_id: &BuyerId,
        cart_id: &CartId,
        order_id: Option<OrderId>,
    ) -> Result<(), CommerceError> {
        let _guard = self.locks.acquire(cart_id).await;

        let mut cart = self.find_owned(buyer_id, cart_id).await?;
        cart.mark_checked_out(order_id)?;
        self.store.save(&cart).await?;

        info!(
            buyer_id = %buyer_id,
            cart_id = %cart_id,
            order_id = cart.order_id.as_ref().map(|id| id.as_str()),
            "cart checked out"
        );
        Ok(())
    }
}
