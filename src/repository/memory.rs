//! In-Memory Repository
//!
//! Map-backed implementation for entities with `u32` IDs. Used for the
//! small reference lists of the checkout (countries, card types), baskets,
//! orders, and as a test double for the position engine.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, Entity, Orderable};
use super::traits::{Filter, OrderableRepository, Repository};

pub struct MemoryRepository<T> {
    items: Mutex<BTreeMap<u32, T>>,
}

impl<T: Entity<Id = u32>> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(BTreeMap::new()),
        }
    }

    /// Repository pre-filled with entities that already carry IDs
    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items: Mutex::new(items.into_iter().map(|item| (item.id(), item)).collect()),
        }
    }

    /// Copy of every stored entity, ordered by ID
    pub async fn snapshot(&self) -> Vec<T> {
        self.items.lock().await.values().cloned().collect()
    }
}

impl<T: Entity<Id = u32>> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity<Id = u32>> Repository<T> for MemoryRepository<T> {
    async fn create(&self, entity: &T) -> DomainResult<T> {
        let mut items = self.items.lock().await;

        let mut created = entity.clone();
        if created.id() == 0 {
            let next = match items.keys().next_back() {
                Some(last) => last.checked_add(1).ok_or_else(|| {
                    DomainError::Conflict("No free id after u32::MAX".to_string())
                })?,
                None => 1,
            };
            created.set_id(next);
        } else if items.contains_key(&created.id()) {
            return Err(DomainError::Conflict(format!(
                "Entity {} already exists",
                created.id()
            )));
        }

        items.insert(created.id(), created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<T>> {
        Ok(self.items.lock().await.get(&id).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<T>> {
        Ok(self.items.lock().await.values().cloned().collect())
    }

    async fn update(&self, entity: &T) -> DomainResult<T> {
        let mut items = self.items.lock().await;
        match items.get_mut(&entity.id()) {
            Some(slot) => {
                *slot = entity.clone();
                Ok(entity.clone())
            }
            None => Err(DomainError::not_found("Entity", entity.id())),
        }
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        self.items
            .lock()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Entity", id))
    }
}

#[async_trait]
impl<T: Orderable<Id = u32>> OrderableRepository<T> for MemoryRepository<T> {
    async fn query(&self, filter: Filter<'_, T>) -> DomainResult<Vec<T>> {
        let items = self.items.lock().await;
        Ok(items.values().filter(|item| filter(*item)).cloned().collect())
    }

    async fn update_pair(&self, first: &T, second: &T) -> DomainResult<()> {
        let mut items = self.items.lock().await;
        for entity in [first, second] {
            if !items.contains_key(&entity.id()) {
                return Err(DomainError::not_found("Entity", entity.id()));
            }
        }
        items.insert(first.id(), first.clone());
        items.insert(second.id(), second.clone());
        Ok(())
    }
}
