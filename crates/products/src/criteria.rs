//! Leaf criteria over products and variants.
//!
//! Each criterion states one condition twice: as an in-memory check and as a
//! [`QueryPredicate`] over the columns of the matching [`Record`] impl. The
//! two must agree for every candidate.
//!
//! ```ignore
//! let spec = Specification::leaf(ProductHasStatus(ProductStatus::Published))
//!     & Specification::leaf(ProductMinAverageRating(Rating::from_stars(4)?));
//! let hits = spec.filter(&products);
//! ```

use catalog_core::{Criterion, Money, QueryPredicate, Rating};

use crate::ids::{BrandId, CategoryId};
use crate::product::{ProductAggregate, ProductStatus};
use crate::variant::ProductVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductHasStatus(pub ProductStatus);

impl Criterion<ProductAggregate> for ProductHasStatus {
    fn is_satisfied_by(&self, product: &ProductAggregate) -> bool {
        product.status() == self.0
    }

    fn to_predicate(&self) -> QueryPredicate {
        QueryPredicate::eq("status", self.0.as_str())
    }

    fn describe(&self) -> String {
        format!("status = {}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductIsFeatured;

impl Criterion<ProductAggregate> for ProductIsFeatured {
    fn is_satisfied_by(&self, product: &ProductAggregate) -> bool {
        product.is_featured()
    }

    fn to_predicate(&self) -> QueryPredicate {
        QueryPredicate::eq("is_featured", true)
    }

    fn describe(&self) -> String {
        "featured".into()
    }
}

/// Average approved rating at least the given value. Unrated products never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductMinAverageRating(pub Rating);

impl Criterion<ProductAggregate> for ProductMinAverageRating {
    fn is_satisfied_by(&self, product: &ProductAggregate) -> bool {
        product.average_rating().is_some_and(|r| r >= self.0)
    }

    fn to_predicate(&self) -> QueryPredicate {
        QueryPredicate::ge("average_rating", self.0.value())
    }

    fn describe(&self) -> String {
        format!("average_rating >= {}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductInBrand(pub BrandId);

impl Criterion<ProductAggregate> for ProductInBrand {
    fn is_satisfied_by(&self, product: &ProductAggregate) -> bool {
        product.brand_id() == Some(self.0)
    }

    fn to_predicate(&self) -> QueryPredicate {
        QueryPredicate::eq("brand_id", self.0.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductInCategory(pub CategoryId);

impl Criterion<ProductAggregate> for ProductInCategory {
    fn is_satisfied_by(&self, product: &ProductAggregate) -> bool {
        product.category_id() == Some(self.0)
    }

    fn to_predicate(&self) -> QueryPredicate {
        QueryPredicate::eq("category_id", self.0.to_string())
    }
}

/// Exact name match, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductNamed(pub String);

impl Criterion<ProductAggregate> for ProductNamed {
    fn is_satisfied_by(&self, product: &ProductAggregate) -> bool {
        product.name().to_uppercase() == self.0.to_uppercase()
    }

    fn to_predicate(&self) -> QueryPredicate {
        QueryPredicate::eq_ignore_case("name", self.0.clone())
    }

    fn describe(&self) -> String {
        format!("name ~= {:?}", self.0)
    }
}

/// Price in the same currency and no higher than the bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPriceAtMost(pub Money);

impl Criterion<ProductVariant> for VariantPriceAtMost {
    fn is_satisfied_by(&self, variant: &ProductVariant) -> bool {
        variant.price().same_currency(&self.0) && variant.price().amount() <= self.0.amount()
    }

    fn to_predicate(&self) -> QueryPredicate {
        QueryPredicate::eq("currency", self.0.currency())
            .and(QueryPredicate::le("price", self.0.amount()))
    }

    fn describe(&self) -> String {
        format!("price <= {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPriceAtLeast(pub Money);

impl Criterion<ProductVariant> for VariantPriceAtLeast {
    fn is_satisfied_by(&self, variant: &ProductVariant) -> bool {
        variant.price().same_currency(&self.0) && variant.price().amount() >= self.0.amount()
    }

    fn to_predicate(&self) -> QueryPredicate {
        QueryPredicate::eq("currency", self.0.currency())
            .and(QueryPredicate::ge("price", self.0.amount()))
    }

    fn describe(&self) -> String {
        format!("price >= {}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantInStock;

impl Criterion<ProductVariant> for VariantInStock {
    fn is_satisfied_by(&self, variant: &ProductVariant) -> bool {
        variant.stock() > 0
    }

    fn to_predicate(&self) -> QueryPredicate {
        QueryPredicate::gt("stock", 0i64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantIsActive;

impl Criterion<ProductVariant> for VariantIsActive {
    fn is_satisfied_by(&self, variant: &ProductVariant) -> bool {
        variant.is_active()
    }

    fn to_predicate(&self) -> QueryPredicate {
        QueryPredicate::eq("is_active", true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantIsOversized;

impl Criterion<ProductVariant> for VariantIsOversized {
    fn is_satisfied_by(&self, variant: &ProductVariant) -> bool {
        variant.is_oversized()
    }

    fn to_predicate(&self) -> QueryPredicate {
        QueryPredicate::eq("is_oversized", true)
    }
}
