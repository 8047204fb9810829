//! Shipping fee service.
//!
//! Gathers everything the pure quote algorithm needs in three batch
//! provider calls, one per provider, then delegates to
//! [`souk_commerce::shipping::quote_cart`]. Callers are expected to
//! reconcile the cart immediately before quoting; no transactional snapshot
//! spans the two operations.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use souk_commerce::cart::Cart;
use souk_commerce::catalog::ProductRecord;
use souk_commerce::ids::{ProductId, ShippingProfileId, ShopId};
use souk_commerce::shipping::{quote_cart, ShippingProfile, ShippingQuote, ShopShippingPolicy};
use souk_commerce::CommerceError;
use tracing::debug;

use crate::config::CartConfig;
use crate::providers::{ProductProvider, ShippingProfileProvider, ShopPolicyProvider};

/// Computes the per-shop shipping breakdown for a cart.
pub struct ShippingFeeService {
    products: Arc<dyn ProductProvider>,
    profiles: Arc<dyn ShippingProfileProvider>,
    policies: Arc<dyn ShopPolicyProvider>,
    config: Arc<CartConfig>,
}

impl ShippingFeeService {
    /// Create a new shipping fee service.
    pub fn new(
        products: Arc<dyn ProductProvider>,
        profiles: Arc<dyn ShippingProfileProvider>,
        policies: Arc<dyn ShopPolicyProvider>,
        config: Arc<CartConfig>,
    ) -> Self {
        Self {
            products,
            profiles,
            policies,
            config,
        }
    }

    /// Quote shipping for a fully-loaded cart.
    pub async fn quote(&self, cart: &Cart) -> Result<ShippingQuote, CommerceError> {
        if cart.is_empty() {
            return Ok(ShippingQuote::empty(self.config.currency));
        }

        let product_ids: Vec<ProductId> = distinct(cart.items.iter().map(|i| i.product_id.clone()));
        let records = self.products.find_by_ids(&product_ids).await?;
        let products_by_id: HashMap<ProductId, ProductRecord> =
            records.into_iter().map(|r| (r.id.clone(), r)).collect();

        let profile_ids: Vec<ShippingProfileId> = distinct(
            products_by_id
                .values()
                .filter_map(|r| r.shipping_profile_id.clone()),
        );
        let profiles_by_id: HashMap<ShippingProfileId, ShippingProfile> = if profile_ids.is_empty()
        {
            HashMap::new()
        } else {
            self.profiles
                .find_by_ids(&profile_ids)
                .await?
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect()
        };

        let shop_ids: Vec<ShopId> = distinct(cart.items.iter().map(|i| i.shop_id.clone()));
        let policies_by_shop: HashMap<ShopId, ShopShippingPolicy> = self
            .policies
            .find_by_shop_ids(&shop_ids)
            .await?
            .into_iter()
            .map(|p| (p.shop_id.clone(), p))
            .collect();

        let quote = quote_cart(
            &cart.items,
            &products_by_id,
            &profiles_by_id,
            &policies_by_shop,
            self.config.currency,
        )?;
        debug!(
            cart_id = %cart.id,
            shops = quote.shops.len(),
            total = %quote.cart_total,
            "quoted cart shipping"
        );
        Ok(quote)
    }
}

fn distinct<T: std::hash::Hash + Eq + Clone>(iter: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    iter.filter(|item| seen.insert(item.clone())).collect()
}
