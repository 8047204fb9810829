//! Price/name snapshot embedded in a cart line item.
//!
//! A cart line stores the product name and unit price as they were when the
//! buyer added the item. The live product record is the other half of this
//! duality; availability reconciliation is the only writer of the snapshot
//! after creation.

use crate::catalog::ProductRecord;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// The name/price view of a product captured at add-to-cart time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemSnapshot {
    /// Product name as displayed when the item was added.
    pub product_name: String,
    /// Unit price as charged when the item was added.
    pub unit_price: Money,
}

impl ItemSnapshot {
    /// Create a snapshot from raw parts.
    pub fn new(product_name: impl Into<String>, unit_price: Money) -> Self {
        Self {
            product_name: product_name.into(),
            unit_price,
        }
    }

    /// Capture a snapshot of a live product record.
    pub fn of(record: &ProductRecord) -> Self {
        Self {
            product_name: record.name.clone(),
            unit_price: record.price,
        }
    }

    /// Whether this snapshot still matches the live record.
    pub fn matches(&self, record: &ProductRecord) -> bool {
        self.product_name == record.name && self.unit_price == record.price
    }

    /// Overwrite the snapshot with the live record's name and price.
    ///
    /// Returns true if anything actually changed.
    pub fn refresh_from(&mut self, record: &ProductRecord) -> bool {
        if self.matches(record) {
            return false;
        }
        self.product_name = record.name.clone();
        self.unit_price = record.price;
        true
    }
}
