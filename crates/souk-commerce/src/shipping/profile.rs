//! Shipping fee profiles.

use crate::error::CommerceError;
use crate::ids::ShippingProfileId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// How a shipping profile charges for a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeType {
    /// Charged once per cart line, regardless of quantity.
    Flat,
    /// Charged per unit.
    PerItem,
    /// Charged per unit of shipping weight.
    ByWeight,
    /// Never charged.
    Free,
}

impl FeeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeType::Flat => "flat",
            FeeType::PerItem => "per_item",
            FeeType::ByWeight => "by_weight",
            FeeType::Free => "free",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "flat" => Some(FeeType::Flat),
            "per_item" => Some(FeeType::PerItem),
            "by_weight" => Some(FeeType::ByWeight),
            "free" => Some(FeeType::Free),
            _ => None,
        }
    }
}

/// A named fee policy attached to products by their seller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingProfile {
    /// Unique profile identifier.
    pub id: ShippingProfileId,
    /// Fee model.
    pub fee_type: FeeType,
    /// Fee amount; its meaning depends on `fee_type`. Ignored for `Free`.
    pub fee_amount: Money,
}

impl ShippingProfile {
    /// Create a new profile.
    pub fn new(id: ShippingProfileId, fee_type: FeeType, fee_amount: Money) -> Self {
        Self {
            id,
            fee_type,
            fee_amount,
        }
    }

    /// Check if this profile never charges.
    pub fn is_free(&self) -> bool {
        self.fee_type == FeeType::Free
    }

    /// Compute the shipping fee contribution of one cart line.
    ///
    /// `unit_weight` is the product's shipping weight per unit, multiplied
    /// literally against the per-weight fee amount (no unit conversion).
    pub fn line_fee(&self, quantity: i64, unit_weight: f64) -> Result<Money, CommerceError> {
        let zero = Money::zero(self.fee_amount.currency);
        if quantity <= 0 {
            return Ok(zero);
        }
        match self.fee_type {
            FeeType::Free => Ok(zero),
            FeeType::Flat => Ok(self.fee_amount),
            FeeType::PerItem => self
                .fee_amount
                .try_multiply(quantity)
                .ok_or(CommerceError::Overflow),
            FeeType::ByWeight => self
                .fee_amount
                .try_scale(unit_weight * quantity as f64)
                .ok_or(CommerceError::Overflow),
        }
    }
}
