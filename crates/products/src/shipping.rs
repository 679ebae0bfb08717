//! Shipping rules derived from variant weight and dimensions.

use catalog_core::{
    Address, DEFAULT_VOLUMETRIC_DIVISOR, DimensionUnit, DomainError, DomainResult,
};
use rust_decimal::Decimal;

use crate::variant::ProductVariant;

/// Billable weight above which a parcel ships as freight.
pub const FREIGHT_WEIGHT_KG: Decimal = Decimal::from_parts(70, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingPolicy {
    volumetric_divisor: Decimal,
    domestic_country: String,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            volumetric_divisor: DEFAULT_VOLUMETRIC_DIVISOR,
            domestic_country: "US".to_string(),
        }
    }
}

impl ShippingPolicy {
    pub fn new(volumetric_divisor: Decimal, domestic_country: &str) -> DomainResult<Self> {
        if volumetric_divisor <= Decimal::ZERO {
            return Err(DomainError::validation("volumetric_divisor", "must be positive"));
        }
        let country = domestic_country.trim();
        if country.is_empty() {
            return Err(DomainError::validation("domestic_country", "is required"));
        }

        Ok(Self {
            volumetric_divisor,
            domestic_country: country.to_uppercase(),
        })
    }

    pub fn volumetric_divisor(&self) -> Decimal {
        self.volumetric_divisor
    }

    pub fn domestic_country(&self) -> &str {
        &self.domestic_country
    }

    /// Volumetric weight in kg, computed on the centimetre form of the
    /// variant's dimensions.
    pub fn volumetric_weight(&self, variant: &ProductVariant) -> DomainResult<Option<Decimal>> {
        variant
            .dimensions()
            .map(|d| {
                d.convert_to(DimensionUnit::Centimeters)?
                    .volumetric_weight(self.volumetric_divisor)
            })
            .transpose()
    }

    /// The greater of actual and volumetric weight; `None` when the variant
    /// carries neither.
    pub fn billable_weight(&self, variant: &ProductVariant) -> DomainResult<Option<Decimal>> {
        let volumetric = self.volumetric_weight(variant)?;
        Ok(match (variant.weight_kg(), volumetric) {
            (Some(actual), Some(volumetric)) => Some(actual.max(volumetric)),
            (actual, volumetric) => actual.or(volumetric),
        })
    }

    pub fn is_domestic(&self, address: &Address) -> bool {
        address.is_domestic(&self.domestic_country)
    }

    pub fn requires_freight(&self, variant: &ProductVariant) -> DomainResult<bool> {
        if variant.is_oversized() {
            return Ok(true);
        }
        Ok(self
            .billable_weight(variant)?
            .is_some_and(|w| w > FREIGHT_WEIGHT_KG))
    }
}
