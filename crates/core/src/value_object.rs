//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.
//!
//! Each value object exposes an ordered, finite sequence of [`EqualityComponent`]s.
//! Equality and hashing are generic functions over that sequence
//! ([`structurally_equal`], [`structural_hash`]) rather than hand-rolled per type;
//! [`impl_structural_equality!`](crate::impl_structural_equality) wires them into
//! `PartialEq`, `Eq` and `Hash`.
//!
//! ## Value Object vs Entity
//!
//! - **Value Object**: No identity (two value objects with same components are equal)
//! - **Entity**: Has identity (two entities with same ID are the same entity, see
//!   [`Entity::same_identity_as`](crate::Entity::same_identity_as))
//!
//! The two comparisons are deliberately separate: entities do not implement
//! `PartialEq` through this module.

use core::hash::{Hash, Hasher};

use rust_decimal::Decimal;

/// One comparable atom of a value object's identity-free state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EqualityComponent {
    Decimal(Decimal),
    Integer(i64),
    Text(String),
    /// A fieldless enum discriminant, by its stable name.
    Tag(&'static str),
}

impl From<Decimal> for EqualityComponent {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<i64> for EqualityComponent {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<String> for EqualityComponent {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for EqualityComponent {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Value objects are **immutable** and **compared by value**.
///
/// To "modify" a value object, create a new one with the new values; every
/// constructor validates, so an instance is valid for its whole lifetime.
///
/// ## Usage Pattern
///
/// ```ignore
/// #[derive(Debug, Clone)]
/// struct Money {
///     amount: Decimal,
///     currency: String,
/// }
///
/// impl ValueObject for Money {
///     fn equality_components(&self) -> Vec<EqualityComponent> {
///         vec![self.amount.into(), self.currency.clone().into()]
///     }
/// }
///
/// impl_structural_equality!(Money);
/// ```
pub trait ValueObject: Clone + core::fmt::Debug {
    /// The ordered components that define this value.
    fn equality_components(&self) -> Vec<EqualityComponent>;
}

/// Component-wise equality of two value objects of the same type.
pub fn structurally_equal<V: ValueObject>(left: &V, right: &V) -> bool {
    left.equality_components() == right.equality_components()
}

/// Feed a value object's components into `state`.
///
/// Consistent with [`structurally_equal`]: equal components hash identically
/// (`Decimal` hashes its normalized form, so `1.0` and `1.00` agree).
pub fn structural_hash<V: ValueObject, H: Hasher>(value: &V, state: &mut H) {
    let components = value.equality_components();
    components.len().hash(state);
    for component in &components {
        component.hash(state);
    }
}

/// Implement `PartialEq`, `Eq` and `Hash` for a [`ValueObject`] via its
/// equality components.
#[macro_export]
macro_rules! impl_structural_equality {
    ($t:ty) => {
        impl PartialEq for $t {
            fn eq(&self, other: &Self) -> bool {
                $crate::value_object::structurally_equal(self, other)
            }
        }

        impl Eq for $t {}

        impl core::hash::Hash for $t {
            fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
                $crate::value_object::structural_hash(self, state)
            }
        }
    };
}
