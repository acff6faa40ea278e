//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;
use crate::domain::{Entity, Orderable, DomainResult};

/// Predicate over stored items, supplied by the caller per query
pub type Filter<'a, T> = &'a (dyn Fn(&T) -> bool + Send + Sync);

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type.
/// All operations are async to support various backends.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Create a new entity, returning it with its assigned ID
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// List all entities
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID
    async fn delete(&self, id: T::Id) -> DomainResult<()>;
}

/// Store operations needed by the position engine
#[async_trait]
pub trait OrderableRepository<T: Orderable>: Repository<T> {
    /// Entities matching `filter`, in no particular order
    async fn query(&self, filter: Filter<'_, T>) -> DomainResult<Vec<T>> {
        let all = self.list().await?;
        Ok(all.into_iter().filter(|entity| filter(entity)).collect())
    }

    /// Persist two changed entities as one unit of work.
    ///
    /// Backends with transactions should override this so that either both
    /// rows change or neither does.
    async fn update_pair(&self, first: &T, second: &T) -> DomainResult<()> {
        self.update(first).await?;
        self.update(second).await?;
        Ok(())
    }
}
