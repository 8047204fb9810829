//! Marketplace domain types and logic for Souk.
//!
//! This crate provides the buyer-facing commerce core of a multi-seller
//! marketplace:
//!
//! - **Cart**: a buyer-owned cart with price/name-snapshotting line items
//! - **Catalog**: the live product view carts are validated against
//! - **Shipping**: per-shop fee models, free-shipping policies, and the
//!   cart-level shipping quote
//!
//! # Example
//!
//! ```rust,ignore
//! use souk_commerce::prelude::*;
//!
//! // Open a cart and add a line item snapshotted from the live product
//! let mut cart = Cart::new(BuyerId::new("buyer-1"));
//! cart.add_item(
//!     ProductId::new("prod-1"),
//!     ShopId::new("shop-1"),
//!     ItemSnapshot::new("Ceramic Mug", Money::new(1299, Currency::USD)),
//!     2,
//! );
//!
//! // Quote shipping across all selling shops
//! let quote = quote_cart(&cart.items, &products, &profiles, &policies, Currency::USD)?;
//! println!("Shipping: {}", quote.cart_total.display());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod shipping;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Cart
    pub use crate::cart::{Cart, CartItem, ItemSnapshot};

    // Catalog
    pub use crate::catalog::{Dimensions, ProductRecord};

    // Shipping
    pub use crate::shipping::{
        quote_cart, quote_shop, FeeType, ItemShippingLine, ShippingProfile, ShippingQuote,
        ShopShippingPolicy, ShopShippingQuote,
    };
}
