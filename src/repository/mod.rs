//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod memory;
mod category_repo;
mod product_repo;


pub use traits::{Filter, OrderableRepository, Repository};
pub use db::{init_db, DbState, SharedConnection};
pub use memory::MemoryRepository;
pub use category_repo::CategoryRepository;
pub use product_repo::ProductRepository;
