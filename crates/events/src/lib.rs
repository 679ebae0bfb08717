//! Domain events and their distribution.
//!
//! Aggregates queue [`DomainEvent`]s; after a successful save the persistence
//! boundary publishes them on an [`EventBus`].

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::{DomainEvent, EventMetadata};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
