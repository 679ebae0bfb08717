//! Entity trait: identity + continuity across state changes.
//!
//! Entities are compared by identifier only. That comparison is spelled
//! [`Entity::same_identity_as`] (or via the [`ByIdentity`] wrapper when a
//! collection needs `Eq + Hash`), never through `PartialEq` on the entity
//! itself, so it cannot be confused with value-object equality.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity and lifecycle timestamps owned by every entity.
///
/// The identifier and creation time are fixed at construction; `updated_at`
/// only changes through [`EntityMeta::mark_updated`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMeta<Id> {
    id: Id,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl<Id> EntityMeta<Id> {
    pub fn new(id: Id) -> Self {
        Self::new_at(id, Utc::now())
    }

    /// Construct with an explicit creation time (deterministic tests).
    pub fn new_at(id: Id, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            updated_at: None,
        }
    }

    /// Rehydrate previously persisted metadata.
    pub fn with_timestamps(
        id: Id,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn creation_time(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn mark_updated(&mut self) {
        self.mark_updated_at(Utc::now());
    }

    pub fn mark_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }
}

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn meta(&self) -> &EntityMeta<Self::Id>;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id {
        self.meta().id()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.meta().creation_time()
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.meta().updated_at()
    }

    /// Identity equality: true iff both entities carry the same identifier,
    /// whatever their other fields hold.
    fn same_identity_as(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

/// Wrapper giving an entity `Eq + Hash` by identifier, for sets and map keys.
#[derive(Debug, Clone)]
pub struct ByIdentity<E>(pub E);

impl<E: Entity> PartialEq for ByIdentity<E> {
    fn eq(&self, other: &Self) -> bool {
        self.0.same_identity_as(&other.0)
    }
}

impl<E: Entity> Eq for ByIdentity<E> {}

impl<E: Entity> core::hash::Hash for ByIdentity<E> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.0.id().hash(state);
    }
}

impl<E> ByIdentity<E> {
    pub fn into_inner(self) -> E {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntityId;
    use std::collections::HashSet;

    #[derive(Debug, Clone)]
    struct Warehouse {
        meta: EntityMeta<EntityId>,
        name: String,
    }

    impl Entity for Warehouse {
        type Id = EntityId;

        fn meta(&self) -> &EntityMeta<EntityId> {
            &self.meta
        }
    }

    #[test]
    fn same_identifier_means_same_entity_regardless_of_fields() {
        let id = EntityId::new();
        let a = Warehouse { meta: EntityMeta::new(id), name: "North".into() };
        let b = Warehouse { meta: EntityMeta::new(id), name: "South".into() };
        assert!(a.same_identity_as(&b));
        assert_ne!(a.name, b.name);
    }

    #[test]
    fn different_identifiers_are_different_entities() {
        let a = Warehouse { meta: EntityMeta::new(EntityId::new()), name: "North".into() };
        let b = Warehouse { meta: EntityMeta::new(EntityId::new()), name: "North".into() };
        assert!(!a.same_identity_as(&b));
    }

    #[test]
    fn by_identity_deduplicates_independent_loads() {
        let id = EntityId::new();
        let mut set = HashSet::new();
        set.insert(ByIdentity(Warehouse { meta: EntityMeta::new(id), name: "v1".into() }));
        set.insert(ByIdentity(Warehouse { meta: EntityMeta::new(id), name: "v2".into() }));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn mark_updated_is_the_only_way_updated_at_changes() {
        let mut meta = EntityMeta::new(EntityId::new());
        assert!(meta.updated_at().is_none());
        let created = meta.creation_time();

        let at = created + chrono::Duration::seconds(5);
        meta.mark_updated_at(at);
        assert_eq!(meta.updated_at(), Some(at));
        assert_eq!(meta.creation_time(), created);
    }
}
