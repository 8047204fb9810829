//! Per-shop free-shipping policies.

use crate::ids::ShopId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A shop's free-shipping configuration.
///
/// The threshold is compared against the shop's accumulated *shipping-fee*
/// subtotal, not the merchandise subtotal. That is the behavior the upstream
/// checkout flow has always exhibited, so it is kept verbatim here even
/// though a spend-amount threshold would be the conventional reading; see
/// DESIGN.md before changing it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShopShippingPolicy {
    /// The shop this policy belongs to.
    pub shop_id: ShopId,
    /// Fee amount at or above which the shop's shipping collapses to zero.
    pub free_shipping_threshold: Option<Money>,
    /// The shop's settlement currency.
    pub currency: Currency,
}

impl ShopShippingPolicy {
    /// Create a policy with no free-shipping threshold.
    pub fn new(shop_id: ShopId, currency: Currency) -> Self {
        Self {
            shop_id,
            free_shipping_threshold: None,
            currency,
        }
    }

    /// Set the free-shipping threshold.
    pub fn with_threshold(mut self, threshold: Money) -> Self {
        self.free_shipping_threshold = Some(threshold);
        self
    }

    /// Whether an accumulated shipping-fee subtotal qualifies for free
    /// shipping under this policy.
    pub fn collapses(&self, fee_subtotal: &Money) -> bool {
        match &self.free_shipping_threshold {
            Some(threshold) => {
                fee_subtotal.currency == threshold.currency
                    && fee_subtotal.amount_cents >= threshold.amount_cents
            }
            None => false,
        }
    }
}
