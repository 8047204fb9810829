//! Cart item service.
//!
//! All mutations run inside the cart's advisory lock: the stock comparison
//! and the write it guards must not interleave with another mutation of the
//! same cart. Product lookups happen before taking the lock; stock is
//! read-only to this core, so the fetch does not need to be serialized.

use std::sync::Arc;

use souk_commerce::cart::{Cart, ItemSnapshot};
use souk_commerce::catalog::ProductRecord;
use souk_commerce::ids::{BuyerId, CartId, CartItemId, ProductId};
use souk_commerce::CommerceError;
use tracing::debug;

use crate::config::CartConfig;
use crate::providers::ProductProvider;
use crate::store::{CartLocks, CartStore};

/// Adds, resizes, and removes cart line items.
pub struct CartItemService {
    store: Arc<dyn CartStore>,
    products: Arc<dyn ProductProvider>,
    locks: Arc<CartLocks>,
    config: Arc<CartConfig>,
}

impl CartItemService {
    /// Create a new cart item service.
    pub fn new(
        store: Arc<dyn CartStore>,
        products: Arc<dyn ProductProvider>,
        locks: Arc<CartLocks>,
        config: Arc<CartConfig>,
    ) -> Self {
        Self {
            store,
            products,
            locks,
            config,
        }
    }

    /// Add a product to the cart, merging into an existing line for the
    /// same product.
    ///
    /// The stock check runs against the merged total, so topping up an
    /// existing line cannot slip past the product's available stock.
    /// Returns the updated cart.
    pub async fn add_item(
        &self,
        buyer_id: &BuyerId,
        cart_id: &CartId,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<Cart, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        let record = self.fetch_product(product_id).await?;

        let _guard = self.locks.acquire(cart_id).await;
        let mut cart = self.load_open_owned(buyer_id, cart_id).await?;

        let merged = cart
            .quantity_of(product_id)
            .checked_add(quantity)
            .ok_or(CommerceError::Overflow)?;
        self.check_limits(&record, merged)?;

        cart.add_item(
            product_id.clone(),
            record.shop_id.clone(),
            ItemSnapshot::of(&record),
            quantity,
        )?;
        self.store.save(&cart).await?;

        debug!(
            buyer_id = %buyer_id,
            cart_id = %cart_id,
            product_id = %product_id,
            quantity = merged,
            "item added to cart"
        );
        Ok(cart)
    }

    /// Overwrite a line's quantity.
    ///
    /// Price and name snapshots are left untouched; refreshing them is the
    /// availability reconciler's job. Returns the updated cart.
    pub async fn update_quantity(
        &self,
        buyer_id: &BuyerId,
        cart_id: &CartId,
        cart_item_id: &CartItemId,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<Cart, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        let record = self.fetch_product(product_id).await?;

        let _guard = self.locks.acquire(cart_id).await;
        let mut cart = self.load_open_owned(buyer_id, cart_id).await?;

        let item = cart
            .get_item(cart_item_id)
            .ok_or_else(|| CommerceError::CartItemNotFound(cart_item_id.to_string()))?;
        if &item.product_id != product_id {
            return Err(CommerceError::CartItemNotFound(cart_item_id.to_string()));
        }
        self.check_limits(&record, quantity)?;

        cart.update_quantity(cart_item_id, quantity)?;
        self.store.save(&cart).await?;

        debug!(
            buyer_id = %buyer_id,
            cart_id = %cart_id,
            cart_item_id = %cart_item_id,
            quantity,
            "item quantity updated"
        );
        Ok(cart)
    }

    /// Remove a line from the cart.
    ///
    /// Emptying the cart leaves the cart itself in place.
    pub async fn remove_item(
        &self,
        buyer_id: &BuyerId,
        cart_id: &CartId,
        cart_item_id: &CartItemId,
    ) -> Result<(), CommerceError> {
        let _guard = self.locks.acquire(cart_id).await;
        let mut cart = self.load_open_owned(buyer_id, cart_id).await?;

        if !cart.remove_item(cart_item_id) {
            return Err(CommerceError::CartItemNotFound(cart_item_id.to_string()));
        }
        self.store.save(&cart).await?;

        debug!(
            buyer_id = %buyer_id,
            cart_id = %cart_id,
            cart_item_id = %cart_item_id,
            "item removed from cart"
        );
        Ok(())
    }

    async fn fetch_product(&self, product_id: &ProductId) -> Result<ProductRecord, CommerceError> {
        let records = self
            .products
            .find_by_ids(std::slice::from_ref(product_id))
            .await?;
        records
            .into_iter()
            .find(|r| &r.id == product_id)
            .ok_or_else(|| CommerceError::ProductNotFound(product_id.to_string()))
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

    fn check_limits(&self, record: &ProductRecord, quantity: i64) -> Result<(), CommerceError> {
        if quantity > self.config.max_quantity_per_item {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                self.config.max_quantity_per_item,
            ));
        }
        if !record.can_fulfill(quantity) {
            return Err(CommerceError::StockExceeded {
                product_id: record.id.to_string(),
                requested: quantity,
                available: record.stock,
            });
        }
        Ok(())
    }
}
