//! Product variants: the sellable SKUs of a product.

use catalog_core::{
    DomainError, DomainResult, Dimensions, Entity, EntityMeta, FieldValue, Money, Record,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::ids::VariantId;

const SKU_MAX: usize = 64;

/// Per-variant stock ceiling. Product totals over any realistic number of
/// variants stay within `i64`.
pub const MAX_STOCK: i64 = i32::MAX as i64;

/// Input for [`ProductVariant::new`].
#[derive(Debug, Clone)]
pub struct NewVariant {
    pub sku: String,
    pub price: Money,
    pub cost_price: Money,
    pub compare_at_price: Option<Money>,
    pub dimensions: Option<Dimensions>,
    /// Shipping weight in kilograms.
    pub weight_kg: Option<Decimal>,
    pub stock: i64,
}

impl NewVariant {
    pub fn new(sku: impl Into<String>, price: Money, cost_price: Money) -> Self {
        Self {
            sku: sku.into(),
            price,
            cost_price,
            compare_at_price: None,
            dimensions: None,
            weight_kg: None,
            stock: 0,
        }
    }

    pub fn with_compare_at_price(mut self, compare_at: Money) -> Self {
        self.compare_at_price = Some(compare_at);
        self
    }

    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn with_weight_kg(mut self, weight_kg: Decimal) -> Self {
        self.weight_kg = Some(weight_kg);
        self
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }
}

/// A sellable variant. Mutated only through its owning product aggregate.
///
/// Serialize-only: a variant is built through [`ProductVariant::new`], never
/// from a payload.
#[derive(Debug, Clone, Serialize)]
pub struct ProductVariant {
    meta: EntityMeta<VariantId>,
    sku: String,
    price: Money,
    compare_at_price: Option<Money>,
    cost_price: Money,
    dimensions: Option<Dimensions>,
    weight_kg: Option<Decimal>,
    stock: i64,
    active: bool,
}

impl ProductVariant {
    pub fn new(input: NewVariant) -> DomainResult<Self> {
        let sku = input.sku.trim().to_uppercase();
        if sku.is_empty() {
            return Err(DomainError::validation("sku", "is required"));
        }
        if sku.chars().count() > SKU_MAX {
            return Err(DomainError::validation(
                "sku",
                format!("cannot exceed {SKU_MAX} characters"),
            ));
        }

        if !input.cost_price.same_currency(&input.price) {
            return Err(DomainError::currency_mismatch(
                input.price.currency(),
                input.cost_price.currency(),
            ));
        }
        if let Some(compare_at) = &input.compare_at_price {
            check_compare_at(&input.price, compare_at)?;
        }
        if let Some(weight) = input.weight_kg {
            if weight <= Decimal::ZERO {
                return Err(DomainError::validation("weight_kg", "must be positive"));
            }
        }
        check_stock(input.stock)?;

        Ok(Self {
            meta: EntityMeta::new(VariantId::new()),
            sku,
            price: input.price,
            compare_at_price: input.compare_at_price,
            cost_price: input.cost_price,
            dimensions: input.dimensions,
            weight_kg: input.weight_kg,
            stock: input.stock,
            active: true,
        })
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn price(&self) -> &Money {
        &self.price
    }

    pub fn compare_at_price(&self) -> Option<&Money> {
        self.compare_at_price.as_ref()
    }

    pub fn cost_price(&self) -> &Money {
        &self.cost_price
    }

    pub fn dimensions(&self) -> Option<&Dimensions> {
        self.dimensions.as_ref()
    }

    pub fn weight_kg(&self) -> Option<Decimal> {
        self.weight_kg
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    pub fn is_oversized(&self) -> bool {
        self.dimensions.as_ref().is_some_and(Dimensions::is_oversized)
    }

    /// On sale when a compare-at price is set above the current price.
    pub fn is_on_sale(&self) -> bool {
        self.compare_at_price
            .as_ref()
            .is_some_and(|c| c.amount() > self.price.amount())
    }

    /// Price minus cost. Negative when the variant sells at a loss.
    pub fn margin(&self) -> Decimal {
        self.price.amount() - self.cost_price.amount()
    }

    /// Margin as a percentage of price; `None` for a free variant.
    pub fn margin_percentage(&self) -> Option<Decimal> {
        if self.price.is_zero() {
            return None;
        }
        Some(self.margin() / self.price.amount() * Decimal::ONE_HUNDRED)
    }

    pub(crate) fn set_stock(&mut self, stock: i64) -> DomainResult<i64> {
        check_stock(stock)?;
        let previous = std::mem::replace(&mut self.stock, stock);
        self.meta.mark_updated();
        Ok(previous)
    }

    pub(crate) fn set_price(&mut self, price: Money) -> DomainResult<Money> {
        if !price.same_currency(&self.price) {
            return Err(DomainError::currency_mismatch(self.price.currency(), price.currency()));
        }
        if let Some(compare_at) = &self.compare_at_price {
            check_compare_at(&price, compare_at)?;
        }
        let previous = std::mem::replace(&mut self.price, price);
        self.meta.mark_updated();
        Ok(previous)
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
        self.meta.mark_updated();
    }
}

fn check_stock(stock: i64) -> DomainResult<()> {
    if stock < 0 {
        return Err(DomainError::validation("stock", "cannot be negative"));
    }
    if stock > MAX_STOCK {
        return Err(DomainError::validation(
            "stock",
            format!("cannot exceed {MAX_STOCK}"),
        ));
    }
    Ok(())
}

fn check_compare_at(price: &Money, compare_at: &Money) -> DomainResult<()> {
    if !compare_at.same_currency(price) {
        return Err(DomainError::currency_mismatch(price.currency(), compare_at.currency()));
    }
    if compare_at.amount() <= price.amount() {
        return Err(DomainError::validation(
            "compare_at_price",
            "must be greater than price",
        ));
    }
    Ok(())
}

impl Entity for ProductVariant {
    type Id = VariantId;

    fn meta(&self) -> &EntityMeta<VariantId> {
        &self.meta
    }
}

impl Record for ProductVariant {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => self.id().to_string().into(),
            "sku" => self.sku.as_str().into(),
            "price" => self.price.amount().into(),
            "currency" => self.price.currency().into(),
            "compare_at_price" => self.compare_at_price.as_ref().map(Money::amount).into(),
            "cost_price" => self.cost_price.amount().into(),
            "weight_kg" => self.weight_kg.into(),
            "stock" => self.stock.into(),
            "is_active" => self.active.into(),
            "is_oversized" => self.is_oversized().into(),
            _ => FieldValue::Null,
        }
    }
}
