//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO storage dependencies (only serde and thiserror).

mod entity;
mod category;
mod product;
mod order;

pub use entity::{Entity, Orderable, DomainError, DomainResult};
pub use category::{alphabetical, Category, CategoryNode, ROOT_CATEGORY_ID};
pub use product::Product;
pub use order::{Basket, BasketItem, Card, CardType, Contact, Country, Order};
