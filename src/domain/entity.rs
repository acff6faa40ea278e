//! Domain Layer - Core Entity Traits
//!
//! Every persisted entity has a unique ID and is thread-safe.
//! Entities that can be reordered by an administrator also expose an
//! integer position.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone {
    /// The type of the entity's unique identifier
    type Id: Copy + Eq + std::hash::Hash + std::fmt::Debug + Send + Sync;

    /// Returns the entity's unique identifier
    fn id(&self) -> Self::Id;

    /// Assigns the identifier handed out by a store on insert
    fn set_id(&mut self, id: Self::Id);
}

/// An entity with a display rank inside its sibling group.
///
/// The group itself is not part of the trait: callers decide what a
/// partition is by passing a predicate to the position engine.
pub trait Orderable: Entity {
    fn position(&self) -> i32;

    fn set_position(&mut self, position: i32);
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Any read or write failure reported by a store
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(kind: &str, id: impl std::fmt::Debug) -> Self {
        DomainError::NotFound(format!("{} {:?} not found", kind, id))
    }
}
