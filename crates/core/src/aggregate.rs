//! Aggregate roots: consistency boundary + pending domain events.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};

/// Ordered queue of domain events recorded by an aggregate but not yet published.
///
/// Mutation methods append synchronously; the persistence boundary drains the
/// queue with [`PendingEvents::take_all`] after a successful save. Draining
/// requires `&mut self`, so it is exclusive with concurrent appends for any
/// caller that shares the aggregate behind a lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEvents<E> {
    events: Vec<E>,
}

impl<E> Default for PendingEvents<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> PendingEvents<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: E) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.events.iter()
    }

    /// Return every pending event in recording order and leave the queue empty.
    pub fn take_all(&mut self) -> Vec<E> {
        std::mem::take(&mut self.events)
    }
}

/// Aggregate root marker + minimal interface.
///
/// An aggregate is an [`Entity`] that owns the pending events of its cluster.
pub trait AggregateRoot: Entity {
    type Event: Clone + core::fmt::Debug;

    /// Monotonically increasing version of the persisted state.
    ///
    /// Bumped by the persistence boundary on every successful save.
    fn version(&self) -> u64;

    /// Record the version assigned by a successful save.
    fn set_version(&mut self, version: u64);

    fn pending_events(&self) -> &PendingEvents<Self::Event>;

    fn pending_events_mut(&mut self) -> &mut PendingEvents<Self::Event>;

    /// Drain all pending events. A second call without an intervening
    /// mutation returns an empty vector.
    fn take_pending_events(&mut self) -> Vec<Self::Event> {
        self.pending_events_mut().take_all()
    }
}

/// Optimistic concurrency expectation for an aggregate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (useful for idempotent commands, migrations, etc.).
    Any,
    /// Require the aggregate to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityMeta;
    use crate::EntityId;

    #[derive(Debug, Clone, PartialEq)]
    enum CartEvent {
        ItemAdded(String),
    }

    #[derive(Debug, Clone)]
    struct Cart {
        meta: EntityMeta<EntityId>,
        items: Vec<String>,
        version: u64,
        pending: PendingEvents<CartEvent>,
    }

    impl Cart {
        fn add(&mut self, item: &str) {
            self.items.push(item.to_string());
            self.meta.mark_updated();
            self.pending.record(CartEvent::ItemAdded(item.to_string()));
        }
    }

    impl Entity for Cart {
        type Id = EntityId;

        fn meta(&self) -> &EntityMeta<EntityId> {
            &self.meta
        }
    }

    impl AggregateRoot for Cart {
        type Event = CartEvent;

        fn version(&self) -> u64 {
            self.version
        }

        fn set_version(&mut self, version: u64) {
            self.version = version;
        }

        fn pending_events(&self) -> &PendingEvents<CartEvent> {
            &self.pending
        }

        fn pending_events_mut(&mut self) -> &mut PendingEvents<CartEvent> {
            &mut self.pending
        }
    }

    fn cart() -> Cart {
        Cart {
            meta: EntityMeta::new(EntityId::new()),
            items: vec![],
            version: 0,
            pending: PendingEvents::new(),
        }
    }

    #[test]
    fn drain_returns_events_in_recording_order() {
        let mut cart = cart();
        cart.add("a");
        cart.add("b");

        let drained = cart.take_pending_events();
        assert_eq!(
            drained,
            vec![
                CartEvent::ItemAdded("a".into()),
                CartEvent::ItemAdded("b".into())
            ]
        );
        assert_eq!(cart.items.len(), 2);
    }

    #[test]
    fn second_drain_without_mutation_is_empty() {
        let mut cart = cart();
        cart.add("a");

        assert_eq!(cart.take_pending_events().len(), 1);
        assert!(cart.take_pending_events().is_empty());
    }

    #[test]
    fn events_recorded_after_drain_are_kept() {
        let mut cart = cart();
        cart.add("a");
        let _ = cart.take_pending_events();
        cart.add("b");
        assert_eq!(cart.pending_events().len(), 1);
    }

    #[test]
    fn expected_version_check() {
        assert!(ExpectedVersion::Any.check(7).is_ok());
        assert!(ExpectedVersion::Exact(3).check(3).is_ok());
        assert!(matches!(
            ExpectedVersion::Exact(2).check(3),
            Err(DomainError::Conflict(_))
        ));
    }
}
