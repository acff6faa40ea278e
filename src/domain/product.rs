//! Product Entity
//!
//! Products belong to exactly one category and are ordered within it.

use serde::{Deserialize, Serialize};
use super::entity::{Entity, Orderable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub description: Option<String>,
    /// Owning category; products are ordered among their category's products
    pub category_id: u32,
    /// Price in minor currency units
    pub price: i64,
    pub position: i32,
    pub is_active: bool,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl Product {
    pub fn new(id: u32, name: String, category_id: u32, price: i64, position: i32) -> Self {
        Self {
            id,
            name,
            description: None,
            category_id,
            price,
            position,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Entity for Product {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn set_id(&mut self, id: Self::Id) {
        self.id = id;
    }
}

impl Orderable for Product {
    fn position(&self) -> i32 {
        self.position
    }

    fn set_position(&mut self, position: i32) {
        self.position = position;
    }
}
