//! Ordering Layer
//!
//! The position engine shared by every orderable entity type. Callers
//! describe the sibling group (partition) of each call with a predicate,
//! so categories, products and countries all use the same code.

mod position;


pub use position::{
    nearest_neighbour, next_position, Direction, MoveOutcome, OrderableService, PositionMove,
};
