//! Position Engine
//!
//! Assigns positions to new items and moves items one place up or down
//! inside their partition by swapping with the nearest neighbour.
//!
//! Positions inside a partition are unique but not necessarily contiguous,
//! so neighbours are always found by comparing positions, never by adding
//! or subtracting one. Nothing is cached: every call re-reads the store.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::domain::{DomainError, DomainResult, Orderable};
use crate::repository::OrderableRepository;

/// Which way a move goes in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards lower positions
    Up,
    /// Towards higher positions
    Down,
}

/// Result of a move request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome<T> {
    /// Positions of the two items were exchanged and persisted
    Swapped { moved: T, neighbour: T },
    /// The item is already first (up) or last (down) in its partition
    AtBoundary,
}

impl<T> MoveOutcome<T> {
    pub fn is_swapped(&self) -> bool {
        matches!(self, MoveOutcome::Swapped { .. })
    }
}

/// Position one past the highest of `positions`, or 0 when there are none.
///
/// `None` when the highest position is already `i32::MAX`.
pub fn next_position(positions: impl IntoIterator<Item = i32>) -> Option<i32> {
    match positions.into_iter().max() {
        Some(max) => max.checked_add(1),
        None => Some(0),
    }
}

/// Closest item of `partition` strictly before (Up) or after (Down) `target`
pub fn nearest_neighbour<'p, T: Orderable>(
    target: &T,
    partition: &'p [T],
    direction: Direction,
) -> Option<&'p T> {
    let others = partition.iter().filter(|item| item.id() != target.id());
    match direction {
        Direction::Up => others
            .filter(|item| item.position() < target.position())
            .max_by_key(|item| item.position()),
        Direction::Down => others
            .filter(|item| item.position() > target.position())
            .min_by_key(|item| item.position()),
    }
}

/// Position engine over one store of orderable entities
pub struct OrderableService<T, R> {
    repo: Arc<R>,
    _entity: PhantomData<fn() -> T>,
}

impl<T, R> Clone for OrderableService<T, R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T, R> OrderableService<T, R>
where
    T: Orderable,
    R: OrderableRepository<T>,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            _entity: PhantomData,
        }
    }

    /// Next free position when the whole collection is one partition
    pub async fn next_position(&self) -> DomainResult<i32> {
        self.next_position_where(&|_: &T| true).await
    }

    /// Next free position inside the partition selected by `constraint`
    pub async fn next_position_where(
        &self,
        constraint: &(dyn Fn(&T) -> bool + Send + Sync),
    ) -> DomainResult<i32> {
        let partition = self.repo.query(constraint).await?;
        next_position(partition.iter().map(|item| item.position())).ok_or_else(|| {
            DomainError::Conflict("Partition has no free position after i32::MAX".to_string())
        })
    }

    /// Start a move of the item with `id`.
    ///
    /// Without `constrained_by` the whole collection is the partition.
    pub fn move_item(&self, id: T::Id) -> PositionMove<'_, T, R> {
        PositionMove {
            service: self,
            id,
            constraint: Box::new(|_: &T| true),
        }
    }
}

/// A pending move, built by [`OrderableService::move_item`]
pub struct PositionMove<'a, T: Orderable, R> {
    service: &'a OrderableService<T, R>,
    id: T::Id,
    constraint: Box<dyn Fn(&T) -> bool + Send + Sync + 'a>,
}

impl<'a, T, R> PositionMove<'a, T, R>
where
    T: Orderable + 'a,
    R: OrderableRepository<T>,
{
    /// Restrict the partition to items satisfying `predicate`.
    ///
    /// Repeated calls narrow the partition further.
    pub fn constrained_by<F>(self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'a,
    {
        let previous = self.constraint;
        Self {
            service: self.service,
            id: self.id,
            constraint: Box::new(move |item: &T| previous(item) && predicate(item)),
        }
    }

    /// Swap with the nearest item above
    pub async fn up_one(self) -> DomainResult<MoveOutcome<T>> {
        self.shift(Direction::Up).await
    }

    /// Swap with the nearest item below
    pub async fn down_one(self) -> DomainResult<MoveOutcome<T>> {
        self.shift(Direction::Down).await
    }

    pub async fn shift(self, direction: Direction) -> DomainResult<MoveOutcome<T>> {
        let repo = &self.service.repo;

        let target = repo
            .find_by_id(self.id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Item {:?} not found", self.id)))?;

        if !(self.constraint)(&target) {
            return Err(DomainError::InvalidInput(format!(
                "Item {:?} is outside the partition it was asked to move in",
                self.id
            )));
        }

        let partition = repo.query(&*self.constraint).await?;

        let neighbour = match nearest_neighbour(&target, &partition, direction) {
            Some(neighbour) => neighbour.clone(),
            None => {
                log::debug!("Item {:?} already at {:?} boundary", self.id, direction);
                return Ok(MoveOutcome::AtBoundary);
            }
        };

        let mut moved = target;
        let mut neighbour = neighbour;
        let moved_from = moved.position();
        moved.set_position(neighbour.position());
        neighbour.set_position(moved_from);

        repo.update_pair(&moved, &neighbour).await?;

        log::info!(
            "Moved item {:?} {:?}: position {} -> {}, swapped with {:?}",
            moved.id(),
            direction,
            moved_from,
            moved.position(),
            neighbour.id()
        );

        Ok(MoveOutcome::Swapped { moved, neighbour })
    }
}
