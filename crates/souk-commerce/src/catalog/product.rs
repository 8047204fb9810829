//! Live product view.

use crate::ids::{ProductId, ShippingProfileId, ShopId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Physical dimensions of a product.
///
/// Weight is expressed in whatever mass unit the shop's weight-based
/// shipping fee is priced against; fee math multiplies it literally with no
/// unit conversion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Dimensions {
    /// Shipping weight per unit.
    pub weight: f64,
}

impl Dimensions {
    /// Create dimensions with the given unit weight.
    pub fn with_weight(weight: f64) -> Self {
        Self { weight }
    }
}

/// The current state of a product as reported by the catalog.
///
/// Read-only from the cart core's perspective: stock is decremented at order
/// placement, approval and shelf state are managed by seller/ops workflows.
/// Cart items store an [`ItemSnapshot`](crate::cart::ItemSnapshot) of the
/// name and price seen here; reconciliation re-reads this record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    /// Unique product identifier.
    pub id: ProductId,
    /// Selling shop.
    pub shop_id: ShopId,
    /// Current display name.
    pub name: String,
    /// Current unit price.
    pub price: Money,
    /// Units currently in stock.
    pub stock: i64,
    /// Whether the product is listed for sale.
    pub on_shelf: bool,
    /// Whether the product has passed marketplace approval.
    pub approved: bool,
    /// Shipping profile used to price this product's shipping, if any.
    pub shipping_profile_id: Option<ShippingProfileId>,
    /// Physical dimensions.
    pub dimensions: Dimensions,
}

impl ProductRecord {
    /// Create a record that is on-shelf and approved, with no shipping
    /// profile and zero weight.
    pub fn new(
        id: ProductId,
        shop_id: ShopId,
        name: impl Into<String>,
        price: Money,
        stock: i64,
    ) -> Self {
        Self {
            id,
            shop_id,
            name: name.into(),
            price,
            stock,
            on_shelf: true,
            approved: true,
            shipping_profile_id: None,
            dimensions: Dimensions::default(),
        }
    }

    /// Set the shipping profile.
    pub fn with_shipping_profile(mut self, profile_id: ShippingProfileId) -> Self {
        self.shipping_profile_id = Some(profile_id);
        self
    }

    /// Set the unit weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.dimensions = Dimensions::with_weight(weight);
        self
    }

    /// Check if the product can currently be purchased at all.
    pub fn is_purchasable(&self) -> bool {
        self.on_shelf && self.approved && self.stock > 0
    }

    /// Check if a specific quantity is in stock.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}
