//! Cart-level shipping quote.
//!
//! A deliberate two-pass algorithm: group cart lines by selling shop, then
//! fold each shop's lines into a per-shop quote. Keeping the per-shop fold
//! as its own function makes the free-shipping collapse testable per shop.

use std::collections::HashMap;

use crate::cart::CartItem;
use crate::catalog::ProductRecord;
use crate::error::CommerceError;
use crate::ids::{ProductId, ShippingProfileId, ShopId};
use crate::money::{Currency, Money};
use crate::shipping::{ShippingProfile, ShopShippingPolicy};
use serde::{Deserialize, Serialize};

/// One cart line's contribution to a shop's shipping fee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemShippingLine {
    /// Product shipped.
    pub product_id: ProductId,
    /// Product name from the cart line's snapshot.
    pub product_name: String,
    /// Quantity shipped.
    pub quantity: i64,
    /// This line's fee before any free-shipping collapse.
    pub fee: Money,
}

/// Shipping breakdown for a single shop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShopShippingQuote {
    /// The selling shop.
    pub shop_id: ShopId,
    /// Per-line fees, in cart order.
    pub lines: Vec<ItemShippingLine>,
    /// The shop's shipping fee after applying its free-shipping policy.
    pub total_fee: Money,
    /// The shop's free-shipping threshold, echoed for display.
    pub free_shipping_threshold: Option<Money>,
}

/// Shipping breakdown for a whole cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingQuote {
    /// Sum of all shops' total fees.
    pub cart_total: Money,
    /// Per-shop breakdowns.
    pub shops: HashMap<ShopId, ShopShippingQuote>,
}

impl ShippingQuote {
    /// An empty quote in the given currency.
    pub fn empty(currency: Currency) -> Self {
        Self {
            cart_total: Money::zero(currency),
            shops: HashMap::new(),
        }
    }

    /// Breakdown for one shop, if it sells anything in the cart.
    pub fn shop(&self, shop_id: &ShopId) -> Option<&ShopShippingQuote> {
        self.shops.get(shop_id)
    }
}

/// Fold one shop's cart lines into its shipping quote.
///
/// Lines whose product record or shipping profile is missing contribute a
/// zero fee; a vanished product is reconciliation's problem, not a quoting
/// error. After the fold, the shop's free-shipping policy may collapse the
/// accumulated fee to zero.
pub fn quote_shop(
    shop_id: ShopId,
    items: &[&CartItem],
    products: &HashMap<ProductId, ProductRecord>,
    profiles: &HashMap<ShippingProfileId, ShippingProfile>,
    policy: Option<&ShopShippingPolicy>,
    currency: Currency,
) -> Result<ShopShippingQuote, CommerceError> {
    let mut lines = Vec::with_capacity(items.len());
    let mut total_fee = Money::zero(currency);

    for item in items {
        let profile = products
            .get(&item.product_id)
            .and_then(|record| record.shipping_profile_id.as_ref())
            .and_then(|profile_id| profiles.get(profile_id));

        let fee = match profile {
            Some(profile) => {
                let unit_weight = products
                    .get(&item.product_id)
                    .map(|record| record.dimensions.weight)
                    .unwrap_or(0.0);
                profile.line_fee(item.quantity, unit_weight)?
            }
            None => Money::zero(currency),
        };

        if fee.currency != total_fee.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: total_fee.currency.code().to_string(),
                got: fee.currency.code().to_string(),
            });
        }
        total_fee = total_fee.try_add(&fee).ok_or(CommerceError::Overflow)?;

        lines.push(ItemShippingLine {
            product_id: item.product_id.clone(),
            product_name: item.snapshot.product_name.clone(),
            quantity: item.quantity,
            fee,
        });
    }

    let free_shipping_threshold = policy.and_then(|p| p.free_shipping_threshold);
    if let Some(policy) = policy {
        if policy.collapses(&total_fee) {
            total_fee = Money::zero(currency);
        }
    }

    Ok(ShopShippingQuote {
        shop_id,
        lines,
        total_fee,
        free_shipping_threshold,
    })
}

/// Quote shipping for a whole cart.
///
/// Pass one groups lines by selling shop; pass two folds each shop with
/// [`quote_shop`] and sums the per-shop totals into the cart total.
pub fn quote_cart(
    items: &[CartItem],
    products: &HashMap<ProductId, ProductRecord>,
    profiles: &HashMap<ShippingProfileId, ShippingProfile>,
    policies: &HashMap<ShopId, ShopShippingPolicy>,
    currency: Currency,
) -> Result<ShippingQuote, CommerceError> {
    // Pass 1: group by shop, preserving cart order within each shop.
    let mut by_shop: HashMap<ShopId, Vec<&CartItem>> = HashMap::new();
    for item in items {
        by_shop.entry(item.shop_id.clone()).or_default().push(item);
    }

    // Pass 2: per-shop fold, then aggregate.
    let mut quote = ShippingQuote::empty(currency);
    for (shop_id, shop_items) in by_shop {
        let shop_quote = quote_shop(
            shop_id.clone(),
            &shop_items,
            products,
            profiles,
            policies.get(&shop_id),
            currency,
        )?;
        quote.cart_total = quote
            .cart_total
            .try_add(&shop_quote.total_fee)
            .ok_or(CommerceError::Overflow)?;
        quote.shops.insert(shop_id, shop_quote);
    }

    Ok(quote)
}
