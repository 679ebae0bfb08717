//! `catalog-core`: domain foundation building blocks for the product catalog.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! self-validating value objects, entity/aggregate identity, and the
//! composable specification engine.

pub mod address;
pub mod aggregate;
pub mod dimensions;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod rating;
pub mod specification;
pub mod value_object;

pub use address::{Address, AddressFields, AddressType};
pub use aggregate::{AggregateRoot, ExpectedVersion, PendingEvents};
pub use dimensions::{DimensionUnit, Dimensions, DEFAULT_VOLUMETRIC_DIVISOR, MAX_COMPONENT};
pub use entity::{ByIdentity, Entity, EntityMeta};
pub use error::{DomainError, DomainResult};
pub use id::EntityId;
pub use money::Money;
pub use rating::Rating;
pub use specification::{
    Always, CompareOp, Criterion, FieldValue, QueryPredicate, Record, Specification, SqlFilter,
    sql_identifier,
};
pub use value_object::{EqualityComponent, ValueObject};
