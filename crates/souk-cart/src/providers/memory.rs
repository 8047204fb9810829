//! In-memory provider backends.
//!
//! Reference implementations of the provider traits over tokio-guarded maps.
//! Production deployments put the catalog and seller services behind the
//! same traits; these back the test suites and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use souk_commerce::catalog::ProductRecord;
use souk_commerce::ids::{ProductId, ShippingProfileId, ShopId};
use souk_commerce::money::Money;
use souk_commerce::shipping::{ShippingProfile, ShopShippingPolicy};
use tokio::sync::RwLock;

use crate::providers::{
    ProductProvider, ProviderError, ShippingProfileProvider, ShopPolicyProvider,
};

/// In-memory product catalog.
#[derive(Default)]
pub struct MemoryCatalog {
    records: RwLock<HashMap<ProductId, ProductRecord>>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a product record.
    pub async fn upsert(&self, record: ProductRecord) {
        self.records.write().await.insert(record.id.clone(), record);
    }

    /// Delete a product record.
    pub async fn remove(&self, id: &ProductId) {
        self.records.write().await.remove(id);
    }

    /// Overwrite a product's stock level.
    pub async fn set_stock(&self, id: &ProductId, stock: i64) {
        if let Some(record) = self.records.write().await.get_mut(id) {
            record.stock = stock;
        }
    }

    /// Overwrite a product's price.
    pub async fn set_price(&self, id: &ProductId, price: Money) {
        if let Some(record) = self.records.write().await.get_mut(id) {
            record.price = price;
        }
    }

    /// Rename a product.
    pub async fn set_name(&self, id: &ProductId, name: impl Into<String>) {
        if let Some(record) = self.records.write().await.get_mut(id) {
            record.name = name.into();
        }
    }

    /// Put a product on or off the shelf.
    pub async fn set_on_shelf(&self, id: &ProductId, on_shelf: bool) {
        if let Some(record) = self.records.write().await.get_mut(id) {
            record.on_shelf = on_shelf;
        }
    }

    /// Grant or revoke marketplace approval.
    pub async fn set_approved(&self, id: &ProductId, approved: bool) {
        if let Some(record) = self.records.write().await.get_mut(id) {
            record.approved = approved;
        }
    }
}

#[async_trait]
impl ProductProvider for MemoryCatalog {
    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<ProductRecord>, ProviderError> {
        let records = self.records.read().await;
        Ok(ids.iter().filter_map(|id| records.get(id).cloned()).collect())
    }
}

/// In-memory shipping profile registry.
#[derive(Default)]
pub struct MemoryShippingProfiles {
    profiles: RwLock<HashMap<ShippingProfileId, ShippingProfile>>,
}

impl MemoryShippingProfiles {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a profile.
    pub async fn upsert(&self, profile: ShippingProfile) {
        self.profiles.write().await.insert(profile.id.clone(), profile);
    }
}

#[async_trait]
impl ShippingProfileProvider for MemoryShippingProfiles {
    async fn find_by_ids(
        &self,
        ids: &[ShippingProfileId],
    ) -> Result<Vec<ShippingProfile>, ProviderError> {
        let profiles = self.profiles.read().await;
        Ok(ids.iter().filter_map(|id| profiles.get(id).cloned()).collect())
    }
}

/// In-memory shop shipping policy registry.
#[derive(Default)]
pub struct MemoryShopPolicies {
    policies: RwLock<HashMap<ShopId, ShopShippingPolicy>>,
}

impl MemoryShopPolicies {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a shop's policy.
    pub async fn upsert(&self, policy: ShopShippingPolicy) {
        self.policies.write().await.insert(policy.shop_id.clone(), policy);
    }

    /// Drop a shop's free-shipping threshold, keeping the policy row.
    pub async fn clear_threshold(&self, shop_id: &ShopId) {
        if let Some(policy) = self.policies.write().await.get_mut(shop_id) {
            policy.free_shipping_threshold = None;
        }
    }
}

#[async_trait]
impl ShopPolicyProvider for MemoryShopPolicies {
    async fn find_by_shop_ids(
        &self,
        shop_ids: &[ShopId],
    ) -> Result<Vec<ShopShippingPolicy>, ProviderError> {
        let policies = self.policies.read().await;
        Ok(shop_ids
            .iter()
            .filter_map(|id| policies.get(id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use souk_commerce::money::Currency;

    #[tokio::test]
    async fn test_catalog_returns_only_known_ids() {
        let catalog = MemoryCatalog::new();
        catalog
            .upsert(ProductRecord::new(
                ProductId::new("p1"),
                ShopId::new("s1"),
                "Mug",
                Money::new(1299, Currency::USD),
                3,
            ))
            .await;

        let found = catalog
            .find_by_ids(&[ProductId::new("p1"), ProductId::new("ghost")])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, ProductId::new("p1"));
    }

    #[tokio::test]
    async fn test_catalog_mutators() {
        let catalog = MemoryCatalog::new();
        catalog
            .upsert(ProductRecord::new(
                ProductId::new("p1"),
                ShopId::new("s1"),
                "Mug",
                Money::new(1299, Currency::USD),
                3,
            ))
            .await;

        catalog.set_stock(&ProductId::new("p1"), 0).await;
        catalog.set_on_shelf(&ProductId::new("p1"), false).await;

        let found = catalog.find_by_ids(&[ProductId::new("p1")]).await.unwrap();
        assert_eq!(found[0].stock, 0);
        assert!(!found[0].on_shelf);
        assert!(!found[0].is_purchasable());
    }

    #[tokio::test]
    async fn test_policies_clear_threshold() {
        let policies = MemoryShopPolicies::new();
        policies
            .upsert(
                ShopShippingPolicy::new(ShopId::new("s1"), Currency::USD)
                    .with_threshold(Money::new(2000, Currency::USD)),
            )
            .await;

        policies.clear_threshold(&ShopId::new("s1")).await;
        let found = policies
            .find_by_shop_ids(&[ShopId::new("s1")])
            .await
            .unwrap();
        assert_eq!(found[0].free_shipping_threshold, None);
    }
}
