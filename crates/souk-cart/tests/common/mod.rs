//! Shared wiring for the integration suites: all services over the
//! in-memory store and providers.

use std::sync::Arc;

use souk_cart::config::CartConfig;
use souk_cart::providers::memory::{MemoryCatalog, MemoryShippingProfiles, MemoryShopPolicies};
use souk_cart::service::{
    AvailabilityReconciler, CartItemService, CartService, ShippingFeeService,
};
use souk_cart::store::{CartLocks, CartStore, MemoryCartStore};
use souk_commerce::catalog::ProductRecord;
use souk_commerce::ids::{ProductId, ShippingProfileId, ShopId};
use souk_commerce::money::{Currency, Money};
use souk_commerce::shipping::{FeeType, ShippingProfile};

pub const USD: Currency = Currency::USD;

pub struct Harness {
    pub store: Arc<MemoryCartStore>,
    pub catalog: Arc<MemoryCatalog>,
    pub profiles: Arc<MemoryShippingProfiles>,
    pub policies: Arc<MemoryShopPolicies>,
    pub carts: CartService,
    pub items: CartItemService,
    pub reconciler: AvailabilityReconciler,
    pub shipping: ShippingFeeService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(CartConfig::new())
    }

    pub fn with_config(config: CartConfig) -> Self {
        let store = Arc::new(MemoryCartStore::new());
        let catalog = Arc::new(MemoryCatalog::new());
        let profiles = Arc::new(MemoryShippingProfiles::new());
        let policies = Arc::new(MemoryShopPolicies::new());
        let locks = Arc::new(CartLocks::new());
        let config = Arc::new(config);

        let store_dyn: Arc<dyn CartStore> = store.clone();
        let carts = CartService::new(store_dyn.clone(), locks.clone());
        let items = CartItemService::new(
            store_dyn.clone(),
            catalog.clone(),
            locks.clone(),
            config.clone(),
        );
        let reconciler =
            AvailabilityReconciler::new(store_dyn.clone(), catalog.clone(), locks.clone());
        let shipping = ShippingFeeService::new(
            catalog.clone(),
            profiles.clone(),
            policies.clone(),
            config.clone(),
        );

        Self {
            store,
            catalog,
            profiles,
            policies,
            carts,
            items,
            reconciler,
            shipping,
        }
    }

    /// Seed a plain product: on shelf, approved, no shipping profile.
    pub async fn seed_product(&self, id: &str, shop: &str, price_cents: i64, stock: i64) {
        self.catalog
            .upsert(ProductRecord::new(
                ProductId::new(id),
                ShopId::new(shop),
                id.to_string(),
                Money::new(price_cents, USD),
                stock,
            ))
            .await;
    }

    /// Seed a product wired to a shipping profile, with a unit weight.
    pub async fn seed_shippable(
        &self,
        id: &str,
        shop: &str,
        profile: &str,
        weight: f64,
        stock: i64,
    ) {
        self.catalog
            .upsert(
                ProductRecord::new(
                    ProductId::new(id),
                    ShopId::new(shop),
                    id.to_string(),
                    Money::new(1000, USD),
                    stock,
                )
                .with_shipping_profile(ShippingProfileId::new(profile))
                .with_weight(weight),
            )
            .await;
    }

    pub async fn seed_profile(&self, id: &str, fee_type: FeeType, cents: i64) {
        self.profiles
            .upsert(ShippingProfile::new(
                ShippingProfileId::new(id),
                fee_type,
                Money::new(cents, USD),
            ))
            .await;
    }
}
