//! Product aggregate: the consistency boundary for variants, reviews and stock.
//!
//! Every mutation validates first, then changes state, stamps `updated_at`
//! and queues a [`ProductEvent`]. Nothing is published from here; the
//! persistence boundary drains the queue after a successful save.

use catalog_core::{
    AggregateRoot, DomainError, DomainResult, Entity, EntityMeta, FieldValue, Money,
    PendingEvents, Rating, Record,
};
use catalog_events::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

use crate::ids::{BrandId, CategoryId, ProductId, ReviewId, ReviewerId, VariantId};
use crate::review::{NewReview, Review, ReviewStatus};
use crate::slug::name_and_slug;
use crate::variant::{NewVariant, ProductVariant};

const NAME_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 5000;

/// Product status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Draft,
    Published,
    Archived,
    Deleted,
    OutOfStock,
    Discontinued,
}

impl ProductStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Published => "published",
            ProductStatus::Archived => "archived",
            ProductStatus::Deleted => "deleted",
            ProductStatus::OutOfStock => "out_of_stock",
            ProductStatus::Discontinued => "discontinued",
        }
    }

    /// Visible in the storefront (possibly without stock).
    pub fn is_listed(self) -> bool {
        matches!(self, ProductStatus::Published | ProductStatus::OutOfStock)
    }
}

impl core::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProductEvent {
    Created {
        metadata: EventMetadata,
        product_id: ProductId,
        name: String,
        slug: String,
    },
    Renamed {
        metadata: EventMetadata,
        product_id: ProductId,
        name: String,
        slug: String,
    },
    FeaturedChanged {
        metadata: EventMetadata,
        product_id: ProductId,
        featured: bool,
    },
    Published {
        metadata: EventMetadata,
        product_id: ProductId,
    },
    Archived {
        metadata: EventMetadata,
        product_id: ProductId,
    },
    Discontinued {
        metadata: EventMetadata,
        product_id: ProductId,
    },
    Deleted {
        metadata: EventMetadata,
        product_id: ProductId,
    },
    WentOutOfStock {
        metadata: EventMetadata,
        product_id: ProductId,
    },
    BackInStock {
        metadata: EventMetadata,
        product_id: ProductId,
    },
    VariantAdded {
        metadata: EventMetadata,
        product_id: ProductId,
        variant_id: VariantId,
        sku: String,
        price: Money,
    },
    VariantActivationChanged {
        metadata: EventMetadata,
        product_id: ProductId,
        variant_id: VariantId,
        active: bool,
    },
    VariantPriceChanged {
        metadata: EventMetadata,
        product_id: ProductId,
        variant_id: VariantId,
        previous: Money,
        price: Money,
    },
    StockUpdated {
        metadata: EventMetadata,
        product_id: ProductId,
        variant_id: VariantId,
        previous: i64,
        quantity: i64,
    },
    ReviewAdded {
        metadata: EventMetadata,
        product_id: ProductId,
        review_id: ReviewId,
        reviewer_id: ReviewerId,
        rating: Rating,
    },
    ReviewModerated {
        metadata: EventMetadata,
        product_id: ProductId,
        review_id: ReviewId,
        status: ReviewStatus,
    },
    ReviewVoted {
        metadata: EventMetadata,
        product_id: ProductId,
        review_id: ReviewId,
        helpful: bool,
    },
}

impl ProductEvent {
    pub fn product_id(&self) -> ProductId {
        match self {
            ProductEvent::Created { product_id, .. }
            | ProductEvent::Renamed { product_id, .. }
            | ProductEvent::FeaturedChanged { product_id, .. }
            | ProductEvent::Published { product_id, .. }
            | ProductEvent::Archived { product_id, .. }
            | ProductEvent::Discontinued { product_id, .. }
            | ProductEvent::Deleted { product_id, .. }
            | ProductEvent::WentOutOfStock { product_id, .. }
            | ProductEvent::BackInStock { product_id, .. }
            | ProductEvent::VariantAdded { product_id, .. }
            | ProductEvent::VariantActivationChanged { product_id, .. }
            | ProductEvent::VariantPriceChanged { product_id, .. }
            | ProductEvent::StockUpdated { product_id, .. }
            | ProductEvent::ReviewAdded { product_id, .. }
            | ProductEvent::ReviewModerated { product_id, .. }
            | ProductEvent::ReviewVoted { product_id, .. } => *product_id,
        }
    }
}

impl DomainEvent for ProductEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProductEvent::Created { .. } => "catalog.product.created",
            ProductEvent::Renamed { .. } => "catalog.product.renamed",
            ProductEvent::FeaturedChanged { .. } => "catalog.product.featured_changed",
            ProductEvent::Published { .. } => "catalog.product.published",
            ProductEvent::Archived { .. } => "catalog.product.archived",
            ProductEvent::Discontinued { .. } => "catalog.product.discontinued",
            ProductEvent::Deleted { .. } => "catalog.product.deleted",
            ProductEvent::WentOutOfStock { .. } => "catalog.product.out_of_stock",
            ProductEvent::BackInStock { .. } => "catalog.product.back_in_stock",
            ProductEvent::VariantAdded { .. } => "catalog.variant.added",
            ProductEvent::VariantActivationChanged { .. } => "catalog.variant.activation_changed",
            ProductEvent::VariantPriceChanged { .. } => "catalog.variant.price_changed",
            ProductEvent::StockUpdated { .. } => "catalog.variant.stock_updated",
            ProductEvent::ReviewAdded { .. } => "catalog.review.added",
            ProductEvent::ReviewModerated { .. } => "catalog.review.moderated",
            ProductEvent::ReviewVoted { .. } => "catalog.review.voted",
        }
    }

    fn metadata(&self) -> &EventMetadata {
        match self {
            ProductEvent::Created { metadata, .. }
            | ProductEvent::Renamed { metadata, .. }
            | ProductEvent::FeaturedChanged { metadata, .. }
            | ProductEvent::Published { metadata, .. }
            | ProductEvent::Archived { metadata, .. }
            | ProductEvent::Discontinued { metadata, .. }
            | ProductEvent::Deleted { metadata, .. }
            | ProductEvent::WentOutOfStock { metadata, .. }
            | ProductEvent::BackInStock { metadata, .. }
            | ProductEvent::VariantAdded { metadata, .. }
            | ProductEvent::VariantActivationChanged { metadata, .. }
            | ProductEvent::VariantPriceChanged { metadata, .. }
            | ProductEvent::StockUpdated { metadata, .. }
            | ProductEvent::ReviewAdded { metadata, .. }
            | ProductEvent::ReviewModerated { metadata, .. }
            | ProductEvent::ReviewVoted { metadata, .. } => metadata,
        }
    }
}

/// Input for [`ProductAggregate::create`].
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub brand_id: Option<BrandId>,
    pub category_id: Option<CategoryId>,
    pub tags: Vec<String>,
}

impl NewProduct {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Aggregate root: Product.
#[derive(Debug, Clone)]
pub struct ProductAggregate {
    meta: EntityMeta<ProductId>,
    name: String,
    slug: String,
    description: Option<String>,
    brand_id: Option<BrandId>,
    category_id: Option<CategoryId>,
    status: ProductStatus,
    featured: bool,
    tags: Vec<String>,
    variants: Vec<ProductVariant>,
    reviews: Vec<Review>,
    version: u64,
    pending: PendingEvents<ProductEvent>,
}

impl ProductAggregate {
    /// Create a draft product and queue its `Created` event.
    pub fn create(input: NewProduct) -> DomainResult<Self> {
        Self::create_with_id(ProductId::new(), input)
    }

    pub fn create_with_id(id: ProductId, input: NewProduct) -> DomainResult<Self> {
        let (name, slug) = name_and_slug(&input.name, NAME_MAX)?;
        let description = normalize_description(input.description.as_deref())?;

        let mut tags: Vec<String> = input
            .tags
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        tags.sort();
        tags.dedup();

        let mut product = Self {
            meta: EntityMeta::new(id),
            name: name.clone(),
            slug: slug.clone(),
            description,
            brand_id: input.brand_id,
            category_id: input.category_id,
            status: ProductStatus::Draft,
            featured: false,
            tags,
            variants: Vec::new(),
            reviews: Vec::new(),
            version: 0,
            pending: PendingEvents::new(),
        };
        product.pending.record(ProductEvent::Created {
            metadata: EventMetadata::new(),
            product_id: id,
            name,
            slug,
        });
        Ok(product)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn brand_id(&self) -> Option<BrandId> {
        self.brand_id
    }

    pub fn category_id(&self) -> Option<CategoryId> {
        self.category_id
    }

    pub fn status(&self) -> ProductStatus {
        self.status
    }

    pub fn is_featured(&self) -> bool {
        self.featured
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn variants(&self) -> &[ProductVariant] {
        &self.variants
    }

    pub fn variant(&self, id: VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| *v.id() == id)
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn review(&self, id: ReviewId) -> Option<&Review> {
        self.reviews.iter().find(|r| *r.id() == id)
    }

    pub fn approved_reviews(&self) -> impl Iterator<Item = &Review> {
        self.reviews.iter().filter(|r| r.is_approved())
    }

    /// Mean rating of approved reviews; `None` until one is approved.
    pub fn average_rating(&self) -> Option<Rating> {
        let ratings: Vec<Rating> = self.approved_reviews().map(Review::rating).collect();
        Rating::average(&ratings)
    }

    /// Stock across active variants.
    pub fn total_stock(&self) -> DomainResult<i64> {
        self.variants
            .iter()
            .filter(|v| v.is_active())
            .try_fold(0i64, |total, v| total.checked_add(v.stock()))
            .ok_or_else(|| DomainError::validation("stock", "total overflows"))
    }

    /// Lowest and highest price among active variants.
    pub fn price_range(&self) -> Option<(Money, Money)> {
        let mut prices = self
            .variants
            .iter()
            .filter(|v| v.is_active())
            .map(ProductVariant::price);
        let first = prices.next()?;
        let (low, high) = prices.fold((first, first), |(low, high), price| {
            (
                if price.amount() < low.amount() { price } else { low },
                if price.amount() > high.amount() { price } else { high },
            )
        });
        Some((low.clone(), high.clone()))
    }

    pub fn is_available(&self) -> bool {
        self.status == ProductStatus::Published && self.total_stock().is_ok_and(|t| t > 0)
    }

    pub fn rename(&mut self, name: &str) -> DomainResult<()> {
        self.ensure_mutable()?;
        let (name, slug) = name_and_slug(name, NAME_MAX)?;
        if name == self.name {
            return Ok(());
        }

        self.name = name.clone();
        self.slug = slug.clone();
        let product_id = *self.id();
        self.record(ProductEvent::Renamed {
            metadata: EventMetadata::new(),
            product_id,
            name,
            slug,
        });
        Ok(())
    }

    pub fn set_featured(&mut self, featured: bool) -> DomainResult<()> {
        self.ensure_mutable()?;
        if featured == self.featured {
            return Ok(());
        }

        self.featured = featured;
        let product_id = *self.id();
        self.record(ProductEvent::FeaturedChanged {
            metadata: EventMetadata::new(),
            product_id,
            featured,
        });
        Ok(())
    }

    /// Publish requires at least one active variant. A product without stock
    /// is published straight into `OutOfStock`.
    pub fn publish(&mut self) -> DomainResult<()> {
        self.ensure_mutable()?;
        match self.status {
            ProductStatus::Discontinued => {
                return Err(DomainError::invariant(
                    "discontinued products cannot be published",
                ));
            }
            ProductStatus::Published | ProductStatus::OutOfStock => {
                return Err(DomainError::invariant("product is already published"));
            }
            ProductStatus::Draft | ProductStatus::Archived | ProductStatus::Deleted => {}
        }
        if !self.variants.iter().any(ProductVariant::is_active) {
            return Err(DomainError::invariant(
                "a product needs an active variant to be published",
            ));
        }

        self.status = ProductStatus::Published;
        let product_id = *self.id();
        self.record(ProductEvent::Published {
            metadata: EventMetadata::new(),
            product_id,
        });
        self.sync_stock_status()
    }

    pub fn archive(&mut self) -> DomainResult<()> {
        self.ensure_mutable()?;
        if self.status == ProductStatus::Archived {
            return Err(DomainError::invariant("product is already archived"));
        }

        self.status = ProductStatus::Archived;
        let product_id = *self.id();
        self.record(ProductEvent::Archived {
            metadata: EventMetadata::new(),
            product_id,
        });
        Ok(())
    }

    pub fn discontinue(&mut self) -> DomainResult<()> {
        self.ensure_mutable()?;
        if self.status == ProductStatus::Discontinued {
            return Err(DomainError::invariant("product is already discontinued"));
        }

        self.status = ProductStatus::Discontinued;
        let product_id = *self.id();
        self.record(ProductEvent::Discontinued {
            metadata: EventMetadata::new(),
            product_id,
        });
        Ok(())
    }

    /// Soft delete. A deleted product rejects every further mutation.
    pub fn delete(&mut self) -> DomainResult<()> {
        self.ensure_mutable()?;

        self.status = ProductStatus::Deleted;
        let product_id = *self.id();
        self.record(ProductEvent::Deleted {
            metadata: EventMetadata::new(),
            product_id,
        });
        Ok(())
    }

    /// Add a variant. SKUs are unique within the product and every variant is
    /// priced in the same currency.
    pub fn add_variant(&mut self, input: NewVariant) -> DomainResult<VariantId> {
        self.ensure_mutable()?;
        let variant = ProductVariant::new(input)?;

        if self.variants.iter().any(|v| v.sku() == variant.sku()) {
            return Err(DomainError::conflict(format!(
                "sku {} already exists on product {}",
                variant.sku(),
                self.id()
            )));
        }
        if let Some(existing) = self.variants.first() {
            if !existing.price().same_currency(variant.price()) {
                return Err(DomainError::currency_mismatch(
                    existing.price().currency(),
                    variant.price().currency(),
                ));
            }
        }

        let variant_id = *variant.id();
        let event = ProductEvent::VariantAdded {
            metadata: EventMetadata::new(),
            product_id: *self.id(),
            variant_id,
            sku: variant.sku().to_string(),
            price: variant.price().clone(),
        };
        self.variants.push(variant);
        self.record(event);
        self.sync_stock_status()?;
        Ok(variant_id)
    }

    pub fn set_variant_active(&mut self, variant_id: VariantId, active: bool) -> DomainResult<()> {
        self.ensure_mutable()?;
        let variant = self.variant_mut(variant_id)?;
        if variant.is_active() == active {
            return Ok(());
        }
        variant.set_active(active);

        let product_id = *self.id();
        self.record(ProductEvent::VariantActivationChanged {
            metadata: EventMetadata::new(),
            product_id,
            variant_id,
            active,
        });
        self.sync_stock_status()
    }

    /// Set a variant's stock level. Moves a published product to
    /// `OutOfStock` when total stock reaches zero, and back when it recovers.
    pub fn update_stock(&mut self, variant_id: VariantId, quantity: i64) -> DomainResult<()> {
        self.ensure_mutable()?;
        if quantity < 0 {
            return Err(DomainError::validation("quantity", "cannot be negative"));
        }
        let previous = self.variant_mut(variant_id)?.set_stock(quantity)?;

        let product_id = *self.id();
        self.record(ProductEvent::StockUpdated {
            metadata: EventMetadata::new(),
            product_id,
            variant_id,
            previous,
            quantity,
        });
        self.sync_stock_status()
    }

    pub fn change_variant_price(&mut self, variant_id: VariantId, price: Money) -> DomainResult<()> {
        self.ensure_mutable()?;
        let previous = self.variant_mut(variant_id)?.set_price(price.clone())?;

        let product_id = *self.id();
        self.record(ProductEvent::VariantPriceChanged {
            metadata: EventMetadata::new(),
            product_id,
            variant_id,
            previous,
            price,
        });
        Ok(())
    }

    /// Add a pending review. Each reviewer may review a product once.
    pub fn add_review(&mut self, input: NewReview) -> DomainResult<ReviewId> {
        self.ensure_mutable()?;
        if self.reviews.iter().any(|r| r.reviewer_id() == input.reviewer_id) {
            return Err(DomainError::conflict(format!(
                "reviewer {} has already reviewed product {}",
                input.reviewer_id,
                self.id()
            )));
        }
        let review = Review::new(input)?;

        let review_id = *review.id();
        let event = ProductEvent::ReviewAdded {
            metadata: EventMetadata::new(),
            product_id: *self.id(),
            review_id,
            reviewer_id: review.reviewer_id(),
            rating: review.rating(),
        };
        self.reviews.push(review);
        self.record(event);
        Ok(review_id)
    }

    pub fn approve_review(&mut self, review_id: ReviewId) -> DomainResult<()> {
        self.moderate_review(review_id, ReviewStatus::Approved)
    }

    pub fn reject_review(&mut self, review_id: ReviewId) -> DomainResult<()> {
        self.moderate_review(review_id, ReviewStatus::Rejected)
    }

    pub fn vote_on_review(&mut self, review_id: ReviewId, helpful: bool) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.review_mut(review_id)?.vote(helpful);

        let product_id = *self.id();
        self.record(ProductEvent::ReviewVoted {
            metadata: EventMetadata::new(),
            product_id,
            review_id,
            helpful,
        });
        Ok(())
    }

    fn moderate_review(&mut self, review_id: ReviewId, status: ReviewStatus) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.review_mut(review_id)?.moderate(status)?;

        let product_id = *self.id();
        self.record(ProductEvent::ReviewModerated {
            metadata: EventMetadata::new(),
            product_id,
            review_id,
            status,
        });
        Ok(())
    }

    fn ensure_mutable(&self) -> DomainResult<()> {
        if self.status == ProductStatus::Deleted {
            return Err(DomainError::invariant(format!(
                "product {} has been deleted",
                self.id()
            )));
        }
        Ok(())
    }

    fn variant_mut(&mut self, id: VariantId) -> DomainResult<&mut ProductVariant> {
        self.variants
            .iter_mut()
            .find(|v| *v.id() == id)
            .ok_or_else(DomainError::not_found)
    }

    fn review_mut(&mut self, id: ReviewId) -> DomainResult<&mut Review> {
        self.reviews
            .iter_mut()
            .find(|r| *r.id() == id)
            .ok_or_else(DomainError::not_found)
    }

    fn record(&mut self, event: ProductEvent) {
        self.meta.mark_updated();
        self.pending.record(event);
    }

    fn sync_stock_status(&mut self) -> DomainResult<()> {
        let total = self.total_stock()?;
        let product_id = *self.id();
        match self.status {
            ProductStatus::Published if total == 0 => {
                self.status = ProductStatus::OutOfStock;
                self.record(ProductEvent::WentOutOfStock {
                    metadata: EventMetadata::new(),
                    product_id,
                });
            }
            ProductStatus::OutOfStock if total > 0 => {
                self.status = ProductStatus::Published;
                self.record(ProductEvent::BackInStock {
                    metadata: EventMetadata::new(),
                    product_id,
                });
            }
            _ => {}
        }
        Ok(())
    }
}

fn normalize_description(description: Option<&str>) -> DomainResult<Option<String>> {
    match description.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) if text.chars().count() > DESCRIPTION_MAX => Err(DomainError::validation(
            "description",
            format!("cannot exceed {DESCRIPTION_MAX} characters"),
        )),
        Some(text) => Ok(Some(text.to_string())),
    }
}

impl Entity for ProductAggregate {
    type Id = ProductId;

    fn meta(&self) -> &EntityMeta<ProductId> {
        &self.meta
    }
}

impl AggregateRoot for ProductAggregate {
    type Event = ProductEvent;

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    fn pending_events(&self) -> &PendingEvents<ProductEvent> {
        &self.pending
    }

    fn pending_events_mut(&mut self) -> &mut PendingEvents<ProductEvent> {
        &mut self.pending
    }
}

impl Record for ProductAggregate {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => self.id().to_string().into(),
            "name" => self.name.as_str().into(),
            "slug" => self.slug.as_str().into(),
            "status" => self.status.as_str().into(),
            "is_featured" => self.featured.into(),
            "brand_id" => self.brand_id.map(|id| id.to_string()).into(),
            "category_id" => self.category_id.map(|id| id.to_string()).into(),
            "average_rating" => self.average_rating().map(|r| r.value()).into(),
            "total_stock" => match self.total_stock() {
                Ok(total) => total.into(),
                Err(_) => FieldValue::Null,
            },
            "variant_count" => (self.variants.len() as i64).into(),
            _ => FieldValue::Null,
        }
    }
}
