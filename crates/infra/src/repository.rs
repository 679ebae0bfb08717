//! In-memory aggregate repository: the commit boundary for pending events.
//!
//! ```text
//! save(aggregate, expected)
//!   ↓
//! 1. Version check (optimistic concurrency)
//!      ✗ → rollback: nothing stored, pending events stay on the aggregate
//!   ↓
//! 2. Bump version, drain pending events, store snapshot
//!   ↓
//! 3. Publish drained events in recording order
//!      ✗ → the failed event and everything after it go back on the aggregate
//! ```
//!
//! Events are published only after the state they describe has been stored.

use std::collections::HashMap;
use std::sync::RwLock;

use catalog_core::{AggregateRoot, DomainError, ExpectedVersion, QueryPredicate, Record, Specification};
use catalog_events::EventBus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("optimistic concurrency check failed: expected {expected:?}, found {actual}")]
    Concurrency {
        expected: ExpectedVersion,
        actual: u64,
    },

    #[error("repository lock poisoned")]
    Poisoned,

    /// The commit succeeded but publication stopped part-way. `published`
    /// events went out; the `unpublished` rest are pending on the aggregate
    /// again, so the next save publishes them.
    #[error(
        "event publication failed after commit ({published} published, {unpublished} requeued): {reason}"
    )]
    Publish {
        published: usize,
        unpublished: usize,
        reason: String,
    },
}

/// Snapshot store keyed by aggregate id, publishing through `B`.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug)]
pub struct InMemoryRepository<A: AggregateRoot, B> {
    rows: RwLock<HashMap<A::Id, A>>,
    bus: B,
}

impl<A, B> InMemoryRepository<A, B>
where
    A: AggregateRoot + Clone,
    B: EventBus<A::Event>,
{
    pub fn new(bus: B) -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            bus,
        }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Commit `aggregate` and publish its pending events.
    ///
    /// On success the aggregate carries its new version and an empty event
    /// queue. On a version conflict nothing changes, so the caller may reload,
    /// reapply and retry. If publication fails the commit stands and the
    /// unpublished events are requeued in order.
    pub fn save(
        &self,
        aggregate: &mut A,
        expected: ExpectedVersion,
    ) -> Result<u64, RepositoryError> {
        let id = aggregate.id().clone();

        let (version, events) = {
            let mut rows = self.rows.write().map_err(|_| RepositoryError::Poisoned)?;
            let actual = rows.get(&id).map_or(0, AggregateRoot::version);

            if !expected.matches(actual) {
                tracing::warn!(
                    aggregate_id = ?id,
                    ?expected,
                    actual,
                    pending = aggregate.pending_events().len(),
                    "save rolled back on version conflict"
                );
                return Err(RepositoryError::Concurrency { expected, actual });
            }

            let version = actual + 1;
            aggregate.set_version(version);
            let events = aggregate.take_pending_events();
            rows.insert(id.clone(), aggregate.clone());
            (version, events)
        };

        tracing::info!(aggregate_id = ?id, version, events = events.len(), "aggregate committed");

        let mut failure = None;
        for (index, event) in events.iter().enumerate() {
            tracing::debug!(aggregate_id = ?id, version, ?event, "publishing event");
            if let Err(err) = self.bus.publish(event.clone()) {
                failure = Some((index, err.to_string()));
                break;
            }
        }

        let Some((published, reason)) = failure else {
            return Ok(version);
        };

        let unpublished = events.len() - published;
        for event in events.into_iter().skip(published) {
            aggregate.pending_events_mut().record(event);
        }
        tracing::warn!(
            aggregate_id = ?id,
            version,
            published,
            unpublished,
            %reason,
            "event publication failed; unpublished events requeued"
        );
        Err(RepositoryError::Publish {
            published,
            unpublished,
            reason,
        })
    }

    /// The last committed snapshot, if any.
    pub fn load(&self, id: &A::Id) -> Result<Option<A>, RepositoryError> {
        let rows = self.rows.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(rows.get(id).cloned())
    }

    /// Like [`load`](Self::load), but a missing aggregate is `DomainError::NotFound`.
    pub fn get(&self, id: &A::Id) -> Result<A, RepositoryError> {
        self.load(id)?
            .ok_or_else(|| RepositoryError::Domain(DomainError::not_found()))
    }

    /// Snapshots satisfying `spec`, evaluated in memory. Order is unspecified.
    pub fn find(&self, spec: &Specification<A>) -> Result<Vec<A>, RepositoryError> {
        let rows = self.rows.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(rows
            .values()
            .filter(|a| spec.is_satisfied_by(a))
            .cloned()
            .collect())
    }

    /// Snapshots matching a storage-side predicate. Order is unspecified.
    pub fn query(&self, predicate: &QueryPredicate) -> Result<Vec<A>, RepositoryError>
    where
        A: Record,
    {
        let rows = self.rows.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(rows
            .values()
            .filter(|a| predicate.evaluate(*a))
            .cloned()
            .collect())
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
