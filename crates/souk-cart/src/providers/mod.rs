//! Upstream data providers.
//!
//! The cart core never owns product, profile, or policy data; it reads them
//! through these batch lookup traits. Each operation makes at most one round
//! trip per provider, so latency stays bounded as carts grow.

pub mod memory;

use async_trait::async_trait;
use souk_commerce::catalog::ProductRecord;
use souk_commerce::ids::{ProductId, ShippingProfileId, ShopId};
use souk_commerce::shipping::{ShippingProfile, ShopShippingPolicy};
use souk_commerce::CommerceError;
use thiserror::Error;

/// Errors from upstream providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The provider did not answer in time.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The provider answered with data this core cannot interpret.
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl From<ProviderError> for CommerceError {
    fn from(e: ProviderError) -> Self {
        CommerceError::Provider(e.to_string())
    }
}

/// Batch lookup of live product state.
///
/// Unknown IDs are silently absent from the result; callers decide whether a
/// missing product is an error (adding to cart) or a removal signal
/// (reconciliation).
#[async_trait]
pub trait ProductProvider: Send + Sync {
    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<ProductRecord>, ProviderError>;
}

/// Batch lookup of shipping fee profiles.
#[async_trait]
pub trait ShippingProfileProvider: Send + Sync {
    async fn find_by_ids(
        &self,
        ids: &[ShippingProfileId],
    ) -> Result<Vec<ShippingProfile>, ProviderError>;
}

/// Batch lookup of per-shop shipping policies.
#[async_trait]
pub trait ShopPolicyProvider: Send + Sync {
    async fn find_by_shop_ids(
        &self,
        shop_ids: &[ShopId],
    ) -> Result<Vec<ShopShippingPolicy>, ProviderError>;
}
