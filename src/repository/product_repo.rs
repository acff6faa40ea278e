//! Product Repository
//!
//! SQLite-backed implementation of Repository<Product>.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{DomainError, DomainResult, Product};
use super::db::{inserted_id, now_millis, ready, ready_mut, SharedConnection};
use super::traits::{Filter, OrderableRepository, Repository};

const SELECT_PRODUCT: &str = "SELECT id, name, description, category_id, price, position, is_active, created_at, updated_at FROM products";

/// SQLite implementation of Product repository
#[derive(Clone)]
pub struct ProductRepository {
    conn: SharedConnection,
}

impl ProductRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Repository<Product> for ProductRepository {
    async fn create(&self, entity: &Product) -> DomainResult<Product> {
        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let now = now_millis();
        conn.execute(
            "INSERT INTO products (name, description, category_id, price, position, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                entity.name,
                entity.description,
                entity.category_id,
                entity.price,
                entity.position,
                entity.is_active,
                now,
                now
            ],
        )?;

        let mut product = entity.clone();
        product.id = inserted_id(conn)?;
        product.created_at = Some(now);
        product.updated_at = Some(now);
        Ok(product)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Product>> {
        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let product = conn
            .query_row(
                &format!("{} WHERE id = ?", SELECT_PRODUCT),
                params![id],
                row_to_product,
            )
            .optional()?;
        Ok(product)
    }

    async fn list(&self) -> DomainResult<Vec<Product>> {
        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY category_id, position ASC, id",
            SELECT_PRODUCT
        ))?;
        let rows = stmt.query_map([], row_to_product)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    async fn update(&self, entity: &Product) -> DomainResult<Product> {
        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let now = now_millis();
        let changed = conn.execute(
            "UPDATE products SET name = ?, description = ?, category_id = ?, price = ?, position = ?, is_active = ?, updated_at = ? WHERE id = ?",
            params![
                entity.name,
                entity.description,
                entity.category_id,
                entity.price,
                entity.position,
                entity.is_active,
                now,
                entity.id
            ],
        )?;
        if changed == 0 {
            return Err(DomainError::not_found("Product", entity.id));
        }

        let mut product = entity.clone();
        product.updated_at = Some(now);
        Ok(product)
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let changed = conn.execute("DELETE FROM products WHERE id = ?", params![id])?;
        if changed == 0 {
            return Err(DomainError::not_found("Product", id));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderableRepository<Product> for ProductRepository {
    async fn query(&self, filter: Filter<'_, Product>) -> DomainResult<Vec<Product>> {
        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let mut stmt = conn.prepare(&format!("{} ORDER BY position, id", SELECT_PRODUCT))?;
        let rows = stmt.query_map([], row_to_product)?;

        let mut partition = Vec::new();
        for row in rows {
            let product = row?;
            if filter(&product) {
                partition.push(product);
            }
        }
        Ok(partition)
    }

    async fn update_pair(&self, first: &Product, second: &Product) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = ready_mut(&mut guard)?;

        let now = now_millis();
        let tx = conn.transaction()?;
        for product in [first, second] {
            let changed = tx.execute(
                "UPDATE products SET position = ?, updated_at = ? WHERE id = ?",
                params![product.position, now, product.id],
            )?;
            if changed == 0 {
                return Err(DomainError::not_found("Product", product.id));
            }
        }
        tx.commit()?;
        Ok(())
    }
}

/// Convert a database row to Product
fn row_to_product(row: &rusqlite::Row) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        category_id: row.get(3)?,
        price: row.get(4)?,
        position: row.get(5)?,
        is_active: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
