//! Service configuration.
//!
//! Built once at process start and handed to the services that need it;
//! nothing in this crate reads configuration from ambient state at call
//! time.

use serde::{Deserialize, Serialize};
use souk_commerce::money::Currency;

/// Default per-line quantity ceiling.
pub const DEFAULT_MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// Configuration for the cart services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartConfig {
    /// Deployment currency; carts and quotes are denominated in it.
    pub currency: Currency,
    /// Maximum quantity a single cart line may hold.
    pub max_quantity_per_item: i64,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            currency: Currency::USD,
            max_quantity_per_item: DEFAULT_MAX_QUANTITY_PER_ITEM,
        }
    }
}

impl CartConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the deployment currency.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Set the per-line quantity ceiling.
    pub fn with_max_quantity_per_item(mut self, max: i64) -> Self {
        self.max_quantity_per_item = max;
        self
    }

    /// Build a configuration from `SOUK_CURRENCY` and
    /// `SOUK_MAX_QUANTITY_PER_ITEM`, falling back to defaults for unset or
    /// unparseable values.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(code) = std::env::var("SOUK_CURRENCY") {
            if let Some(currency) = Currency::from_code(&code) {
                config.currency = currency;
            }
        }
        if let Ok(max) = std::env::var("SOUK_MAX_QUANTITY_PER_ITEM") {
            if let Ok(max) = max.parse::<i64>() {
                if max > 0 {
                    config.max_quantity_per_item = max;
                }
            }
        }
        config
    }
}
