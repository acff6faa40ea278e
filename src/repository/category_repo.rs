//! Category Repository
//!
//! SQLite-backed implementation of Repository<Category>.
//! Positions are only ever written by whole-row updates or by
//! `update_pair`, never renumbered in bulk.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{Category, DomainError, DomainResult, ROOT_CATEGORY_ID};
use super::db::{inserted_id, now_millis, ready, ready_mut, SharedConnection};
use super::traits::{Filter, OrderableRepository, Repository};

const SELECT_CATEGORY: &str = "SELECT id, name, parent_id, position FROM categories";

/// SQLite implementation of Category repository
#[derive(Clone)]
pub struct CategoryRepository {
    conn: SharedConnection,
}

impl CategoryRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// The category every tree hangs off
    pub async fn root(&self) -> DomainResult<Category> {
        self.find_by_id(ROOT_CATEGORY_ID)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", ROOT_CATEGORY_ID))
    }

}

#[async_trait]
impl Repository<Category> for CategoryRepository {
    async fn create(&self, entity: &Category) -> DomainResult<Category> {
        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let now = now_millis();
        conn.execute(
            "INSERT INTO categories (name, parent_id, position, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            params![entity.name, entity.parent_id, entity.position, now, now],
        )?;

        let mut category = entity.clone();
        category.id = inserted_id(conn)?;
        Ok(category)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Category>> {
        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let category = conn
            .query_row(
                &format!("{} WHERE id = ?", SELECT_CATEGORY),
                params![id],
                row_to_category,
            )
            .optional()?;
        Ok(category)
    }

    async fn list(&self) -> DomainResult<Vec<Category>> {
        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY parent_id NULLS FIRST, position ASC, id",
            SELECT_CATEGORY
        ))?;
        let rows = stmt.query_map([], row_to_category)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    async fn update(&self, entity: &Category) -> DomainResult<Category> {
        if entity.id == ROOT_CATEGORY_ID && entity.parent_id.is_some() {
            return Err(DomainError::InvalidInput(
                "The root category cannot have a parent".to_string(),
            ));
        }
        if entity.parent_id == Some(entity.id) {
            return Err(DomainError::InvalidInput(
                "A category cannot be its own parent".to_string(),
            ));
        }

        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let changed = conn.execute(
            "UPDATE categories SET name = ?, parent_id = ?, position = ?, updated_at = ? WHERE id = ?",
            params![entity.name, entity.parent_id, entity.position, now_millis(), entity.id],
        )?;
        if changed == 0 {
            return Err(DomainError::not_found("Category", entity.id));
        }

        Ok(entity.clone())
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        if id == ROOT_CATEGORY_ID {
            return Err(DomainError::InvalidInput(
                "The root category cannot be deleted".to_string(),
            ));
        }

        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let children: i64 = conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE parent_id = ?",
            params![id],
            |row| row.get(0),
        )?;
        if children > 0 {
            return Err(DomainError::Conflict(format!(
                "Category {} still has child categories",
                id
            )));
        }

        // Siblings keep their positions; gaps are allowed
        let changed = conn.execute("DELETE FROM categories WHERE id = ?", params![id])?;
        if changed == 0 {
            return Err(DomainError::not_found("Category", id));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderableRepository<Category> for CategoryRepository {
    /// Rows outside the partition are dropped as they are read
    async fn query(&self, filter: Filter<'_, Category>) -> DomainResult<Vec<Category>> {
        let guard = self.conn.lock().await;
        let conn = ready(&guard)?;

        let mut stmt = conn.prepare(&format!("{} ORDER BY position, id", SELECT_CATEGORY))?;
        let rows = stmt.query_map([], row_to_category)?;

        let mut partition = Vec::new();
        for row in rows {
            let category = row?;
            if filter(&category) {
                partition.push(category);
            }
        }
        Ok(partition)
    }

    async fn update_pair(&self, first: &Category, second: &Category) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = ready_mut(&mut guard)?;

        let now = now_millis();
        let tx = conn.transaction()?;
        for category in [first, second] {
            let changed = tx.execute(
                "UPDATE categories SET position = ?, updated_at = ? WHERE id = ?",
                params![category.position, now, category.id],
            )?;
            if changed == 0 {
                // Dropping the transaction rolls back the first update
                return Err(DomainError::not_found("Category", category.id));
            }
        }
        tx.commit()?;
        Ok(())
    }
}

/// Convert a database row to Category
fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        parent_id: row.get(2)?,
        position: row.get(3)?,
    })
}
