use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A fact recorded by an aggregate mutation.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **uniquely identified** (`event_id`), so a publisher can tell two
///   occurrences of the same change apart
/// - queued on the aggregate until the persistence boundary drains them
pub trait DomainEvent: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "catalog.product.published").
    fn event_type(&self) -> &'static str;

    fn metadata(&self) -> &EventMetadata;

    fn event_id(&self) -> Uuid {
        self.metadata().event_id
    }

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc> {
        self.metadata().occurred_at
    }
}

/// Identity + timestamp carried by every domain event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventMetadata {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(occurred_at: DateTime<Utc>) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            occurred_at,
        }
    }
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self::new()
    }
}
