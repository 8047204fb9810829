//! Cart and cart item types.

use crate::cart::ItemSnapshot;
use crate::error::CommerceError;
use crate::ids::{BuyerId, CartId, CartItemId, OrderId, ProductId, ShopId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A buyer-owned shopping cart.
///
/// A cart transitions once from open to checked-out; the store layer
/// guarantees at most one open cart per buyer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Unique cart identifier.
    pub id: CartId,
    /// Owning buyer.
    pub buyer_id: BuyerId,
    /// Items in the cart.
    pub items: Vec<CartItem>,
    /// Whether checkout has completed for this cart.
    pub checked_out: bool,
    /// Order created at checkout, if any.
    pub order_id: Option<OrderId>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Cart {
    /// Create a new open, empty cart for a buyer.
    pub fn new(buyer_id: BuyerId) -> Self {
        let now = current_timestamp();
        Self {
            id: CartId::generate(),
            buyer_id,
            items: Vec::new(),
            checked_out: false,
            order_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this cart can still be mutated.
    pub fn is_open(&self) -> bool {
        !self.checked_out
    }

    /// Whether this cart belongs to the given buyer.
    pub fn is_owned_by(&self, buyer_id: &BuyerId) -> bool {
        &self.buyer_id == buyer_id
    }

    /// Add an item to the cart.
    ///
    /// If a line for the same product already exists its quantity is
    /// incremented rather than creating a duplicate line; the snapshot taken
    /// at first add is kept. Stock and ceiling validation happen in the item
    /// service, which sees the live product record.
    ///
    /// Returns the ID of the created or merged line.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        shop_id: ShopId,
        snapshot: ItemSnapshot,
        quantity: i64,
    ) -> Result<CartItemId, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            let merged = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            existing.quantity = merged;
            self.updated_at = current_timestamp();
            return Ok(existing.id.clone());
        }

        let item = CartItem::new(product_id, shop_id, snapshot, quantity);
        let id = item.id.clone();
        self.items.push(item);
        self.updated_at = current_timestamp();
        Ok(id)
    }

    /// Overwrite an item's quantity.
    pub fn update_quantity(
        &mut self,
        item_id: &CartItemId,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        let item = self
            .items
            .iter_mut()
            .find(|i| &i.id == item_id)
            .ok_or_else(|| CommerceError::CartItemNotFound(item_id.to_string()))?;
        item.quantity = quantity;
        self.updated_at = current_timestamp();
        Ok(())
    }

    /// Remove an item from the cart. Returns true if a line was removed.
    ///
    /// Removing the last item leaves an empty cart in place.
    pub fn remove_item(&mut self, item_id: &CartItemId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.id != item_id);
        let removed = self.items.len() < len_before;
        if removed {
            self.updated_at = current_timestamp();
        }
        removed
    }

    /// Mark this cart as checked out, optionally recording the order.
    pub fn mark_checked_out(&mut self, order_id: Option<OrderId>) -> Result<(), CommerceError> {
        if self.checked_out {
            return Err(CommerceError::CartAlreadyCheckedOut(self.id.to_string()));
        }
        self.checked_out = true;
        self.order_id = order_id;
        self.updated_at = current_timestamp();
        Ok(())
    }

    /// Bump the updated-at timestamp after an out-of-band mutation, such as
    /// a snapshot refresh during reconciliation.
    pub fn touch(&mut self) {
        self.updated_at = current_timestamp();
    }

    /// Get an item by ID.
    pub fn get_item(&self, item_id: &CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.id == item_id)
    }

    /// Get an item by product ID.
    pub fn get_item_by_product(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    /// Current quantity of a product in the cart (0 if absent).
    pub fn quantity_of(&self, product_id: &ProductId) -> i64 {
        self.get_item_by_product(product_id)
            .map(|i| i.quantity)
            .unwrap_or(0)
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Get number of unique lines.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Merchandise subtotal from the stored snapshots.
    ///
    /// Note that this is distinct from the shipping-fee subtotal the
    /// free-shipping policy compares against.
    pub fn subtotal(&self, currency: Currency) -> Result<Money, CommerceError> {
        let mut total = Money::zero(currency);
        for item in &self.items {
            let line = item.line_subtotal().ok_or(CommerceError::Overflow)?;
            total = total.try_add(&line).ok_or_else(|| {
                CommerceError::CurrencyMismatch {
                    expected: currency.code().to_string(),
                    got: line.currency.code().to_string(),
                }
            })?;
        }
        Ok(total)
    }
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Unique line item identifier.
    pub id: CartItemId,
    /// Product being purchased.
    pub product_id: ProductId,
    /// Selling shop (denormalized for shipping grouping).
    pub shop_id: ShopId,
    /// Name/price snapshot taken when the item was added.
    pub snapshot: ItemSnapshot,
    /// Quantity.
    pub quantity: i64,
}

impl CartItem {
    /// Create a new line item.
    pub fn new(
        product_id: ProductId,
        shop_id: ShopId,
        snapshot: ItemSnapshot,
        quantity: i64,
    ) -> Self {
        Self {
            id: CartItemId::generate(),
            product_id,
            shop_id,
            snapshot,
            quantity,
        }
    }

    /// Line subtotal (snapshot unit price x quantity). None on overflow.
    pub fn line_subtotal(&self) -> Option<Money> {
        self.snapshot.unit_price.try_multiply(self.quantity)
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
