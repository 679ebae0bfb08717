//! Brands and categories: the entities products are filed under.

use catalog_core::{DomainError, DomainResult, Entity, EntityMeta, Rating};
use serde::Serialize;

use crate::ids::{BrandId, CategoryId};
use crate::slug::name_and_slug;

const NAME_MAX: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub struct Brand {
    meta: EntityMeta<BrandId>,
    name: String,
    slug: String,
    description: Option<String>,
    active: bool,
    featured: bool,
    average_rating: Rating,
    product_count: u32,
}

impl Brand {
    pub fn new(name: &str) -> DomainResult<Self> {
        let (name, slug) = name_and_slug(name, NAME_MAX)?;
        Ok(Self {
            meta: EntityMeta::new(BrandId::new()),
            name,
            slug,
            description: None,
            active: true,
            featured: false,
            average_rating: Rating::ZERO,
            product_count: 0,
        })
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

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_featured(&self) -> bool {
        self.featured
    }

    pub fn average_rating(&self) -> Rating {
        self.average_rating
    }

    pub fn product_count(&self) -> u32 {
        self.product_count
    }

    pub fn rename(&mut self, name: &str) -> DomainResult<()> {
        let (name, slug) = name_and_slug(name, NAME_MAX)?;
        self.name = name;
        self.slug = slug;
        self.meta.mark_updated();
        Ok(())
    }

    pub fn describe(&mut self, description: &str) {
        let trimmed = description.trim();
        self.description = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self.meta.mark_updated();
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.meta.mark_updated();
    }

    pub fn set_featured(&mut self, featured: bool) {
        self.featured = featured;
        self.meta.mark_updated();
    }

    pub fn record_product_added(&mut self) {
        self.product_count = self.product_count.saturating_add(1);
        self.meta.mark_updated();
    }

    pub fn update_average_rating(&mut self, rating: Rating) {
        self.average_rating = rating;
        self.meta.mark_updated();
    }
}

impl Entity for Brand {
    type Id = BrandId;

    fn meta(&self) -> &EntityMeta<BrandId> {
        &self.meta
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    meta: EntityMeta<CategoryId>,
    name: String,
    slug: String,
    parent_id: Option<CategoryId>,
    display_order: i32,
    active: bool,
}

impl Category {
    pub fn root(name: &str) -> DomainResult<Self> {
        Self::new(name, None)
    }

    pub fn new(name: &str, parent_id: Option<CategoryId>) -> DomainResult<Self> {
        let (name, slug) = name_and_slug(name, NAME_MAX)?;
        Ok(Self {
            meta: EntityMeta::new(CategoryId::new()),
            name,
            slug,
            parent_id,
            display_order: 0,
            active: true,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn parent_id(&self) -> Option<CategoryId> {
        self.parent_id
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn display_order(&self) -> i32 {
        self.display_order
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn rename(&mut self, name: &str) -> DomainResult<()> {
        let (name, slug) = name_and_slug(name, NAME_MAX)?;
        self.name = name;
        self.slug = slug;
        self.meta.mark_updated();
        Ok(())
    }

    /// Re-parent the category. A category cannot be its own parent; deeper
    /// cycles need the whole tree and are checked by the caller.
    pub fn move_under(&mut self, parent_id: Option<CategoryId>) -> DomainResult<()> {
        if parent_id == Some(*self.id()) {
            return Err(DomainError::invariant("a category cannot be its own parent"));
        }
        self.parent_id = parent_id;
        self.meta.mark_updated();
        Ok(())
    }

    pub fn set_display_order(&mut self, order: i32) {
        self.display_order = order;
        self.meta.mark_updated();
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.meta.mark_updated();
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn meta(&self) -> &EntityMeta<CategoryId> {
        &self.meta
    }
}
