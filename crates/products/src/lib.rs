//! Catalog domain: products, variants, reviews, inventory units, brands and
//! categories, plus the criteria and shipping rules built on them.
//!
//! Pure domain logic (no IO, no storage). Aggregates queue events; the
//! persistence layer decides when they are published.

pub mod catalog;
pub mod criteria;
pub mod ids;
pub mod inventory;
pub mod product;
pub mod review;
pub mod shipping;
pub mod slug;
pub mod variant;

pub use catalog::{Brand, Category};
pub use criteria::{
    ProductHasStatus, ProductInBrand, ProductInCategory, ProductIsFeatured,
    ProductMinAverageRating, ProductNamed, VariantInStock, VariantIsActive, VariantIsOversized,
    VariantPriceAtLeast, VariantPriceAtMost,
};
pub use ids::{BrandId, CategoryId, InventoryItemId, ProductId, ReviewId, ReviewerId, VariantId};
pub use inventory::{
    InventoryItem, InventoryMovement, InventoryStatus, ItemCondition, MovementType, ReceivedUnit,
};
pub use product::{NewProduct, ProductAggregate, ProductEvent, ProductStatus};
pub use review::{NewReview, Review, ReviewStatus};
pub use shipping::{FREIGHT_WEIGHT_KG, ShippingPolicy};
pub use slug::slugify;
pub use variant::{MAX_STOCK, NewVariant, ProductVariant};
