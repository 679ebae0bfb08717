//! Customer reviews.

use catalog_core::{DomainError, DomainResult, Entity, EntityMeta, Rating};
use serde::{Deserialize, Serialize};

use crate::ids::{ReviewId, ReviewerId};

const TITLE_MAX: usize = 200;
const CONTENT_MAX: usize = 5000;
const REVIEWER_NAME_MAX: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

/// Input for [`Review::new`].
#[derive(Debug, Clone)]
pub struct NewReview {
    pub reviewer_id: ReviewerId,
    pub reviewer_name: String,
    pub rating: Rating,
    pub title: String,
    pub content: String,
    pub verified_purchase: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Review {
    meta: EntityMeta<ReviewId>,
    reviewer_id: ReviewerId,
    reviewer_name: String,
    rating: Rating,
    title: String,
    content: String,
    verified_purchase: bool,
    status: ReviewStatus,
    helpful_count: u32,
    unhelpful_count: u32,
}

fn bounded(value: &str, field: &'static str, max: usize) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(field, "is required"));
    }
    if trimmed.chars().count() > max {
        return Err(DomainError::validation(
            field,
            format!("cannot exceed {max} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

impl Review {
    /// New reviews start out pending moderation.
    pub fn new(input: NewReview) -> DomainResult<Self> {
        Ok(Self {
            meta: EntityMeta::new(ReviewId::new()),
            reviewer_id: input.reviewer_id,
            reviewer_name: bounded(&input.reviewer_name, "reviewer_name", REVIEWER_NAME_MAX)?,
            rating: input.rating,
            title: bounded(&input.title, "title", TITLE_MAX)?,
            content: bounded(&input.content, "content", CONTENT_MAX)?,
            verified_purchase: input.verified_purchase,
            status: ReviewStatus::Pending,
            helpful_count: 0,
            unhelpful_count: 0,
        })
    }

    pub fn reviewer_id(&self) -> ReviewerId {
        self.reviewer_id
    }

    pub fn reviewer_name(&self) -> &str {
        &self.reviewer_name
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_verified_purchase(&self) -> bool {
        self.verified_purchase
    }

    pub fn status(&self) -> ReviewStatus {
        self.status
    }

    pub fn is_approved(&self) -> bool {
        self.status == ReviewStatus::Approved
    }

    pub fn helpful_count(&self) -> u32 {
        self.helpful_count
    }

    pub fn unhelpful_count(&self) -> u32 {
        self.unhelpful_count
    }

    /// A review counts as helpful once helpful votes outnumber unhelpful ones.
    pub fn is_helpful(&self) -> bool {
        self.helpful_count > self.unhelpful_count
    }

    pub(crate) fn vote(&mut self, helpful: bool) {
        if helpful {
            self.helpful_count = self.helpful_count.saturating_add(1);
        } else {
            self.unhelpful_count = self.unhelpful_count.saturating_add(1);
        }
        self.meta.mark_updated();
    }

    pub(crate) fn moderate(&mut self, outcome: ReviewStatus) -> DomainResult<()> {
        if self.status != ReviewStatus::Pending {
            return Err(DomainError::invariant(format!(
                "review {} has already been moderated",
                self.id()
            )));
        }
        if outcome == ReviewStatus::Pending {
            return Err(DomainError::invariant("moderation must approve or reject"));
        }
        self.status = outcome;
        self.meta.mark_updated();
        Ok(())
    }
}

impl Entity for Review {
    type Id = ReviewId;

    fn meta(&self) -> &EntityMeta<ReviewId> {
        &self.meta
    }
}
