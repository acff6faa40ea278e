//! Category Entity
//!
//! Categories form a tree below a single root. Siblings share a parent and
//! are ordered by position.

use serde::{Deserialize, Serialize};
use super::entity::{Entity, Orderable};

/// Identifier of the root category created by the schema migration
pub const ROOT_CATEGORY_ID: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Category {
    /// Unique identifier (0 until inserted)
    pub id: u32,
    pub name: String,
    /// Parent category (None = root)
    pub parent_id: Option<u32>,
    /// Position within siblings
    pub position: i32,
}

impl Category {
    pub fn new(id: u32, name: String, parent_id: Option<u32>, position: i32) -> Self {
        Self {
            id,
            name,
            parent_id,
            position,
        }
    }

    /// Unsaved category placed under `parent_id`
    pub fn new_child(parent_id: u32, position: i32) -> Self {
        Self {
            id: 0,
            name: String::new(),
            parent_id: Some(parent_id),
            position,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether `other` is a sibling of this category
    pub fn shares_parent_with(&self, other: &Category) -> bool {
        self.parent_id == other.parent_id
    }
}

impl Entity for Category {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn set_id(&mut self, id: Self::Id) {
        self.id = id;
    }
}

impl Orderable for Category {
    fn position(&self) -> i32 {
        self.position
    }

    fn set_position(&mut self, position: i32) {
        self.position = position;
    }
}

/// A category with its children in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Build the subtree under `root_id` from a flat list.
    ///
    /// Returns None when `root_id` is not in the list.
    pub fn build(root_id: u32, categories: &[Category]) -> Option<CategoryNode> {
        let root = categories.iter().find(|c| c.id == root_id)?.clone();
        Some(Self::grow(root, categories))
    }

    fn grow(category: Category, categories: &[Category]) -> CategoryNode {
        let mut children: Vec<&Category> = categories
            .iter()
            .filter(|c| c.parent_id == Some(category.id) && c.id != category.id)
            .collect();
        children.sort_by_key(|c| (c.position, c.id));

        let children = children
            .into_iter()
            .map(|c| Self::grow(c.clone(), categories))
            .collect();

        CategoryNode { category, children }
    }

    /// Depth-first list of every category in the subtree
    pub fn flatten(&self) -> Vec<&Category> {
        let mut out = vec![&self.category];
        for child in &self.children {
            out.extend(child.flatten());
        }
        out
    }
}

/// Sort categories by name, case-insensitively
pub fn alphabetical(mut categories: Vec<Category>) -> Vec<Category> {
    categories.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then(a.id.cmp(&b.id))
    });
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(id: u32, name: &str, parent: Option<u32>, position: i32) -> Category {
        Category::new(id, name.to_string(), parent, position)
    }

    #[test]
    fn test_new_child() {
        let child = Category::new_child(ROOT_CATEGORY_ID, 4);
        assert_eq!(child.id(), 0);
        assert_eq!(child.parent_id, Some(ROOT_CATEGORY_ID));
        assert_eq!(child.position(), 4);
        assert!(!child.is_root());
    }

    #[test]
    fn test_tree_orders_children_by_position() {
        let categories = vec![
            cat(1, "root", None, 0),
            cat(2, "Shirts", Some(1), 5),
            cat(3, "Hats", Some(1), 1),
            cat(4, "Caps", Some(3), 0),
        ];

        let tree = CategoryNode::build(1, &categories).unwrap();
        let names: Vec<&str> = tree.children.iter().map(|n| n.category.name.as_str()).collect();
        assert_eq!(names, vec!["Hats", "Shirts"]);
        assert_eq!(tree.children[0].children[0].category.name, "Caps");
        assert_eq!(tree.flatten().len(), 4);
    }

    #[test]
    fn test_tree_missing_root() {
        assert!(CategoryNode::build(9, &[cat(1, "root", None, 0)]).is_none());
    }

    #[test]
    fn test_alphabetical() {
        let sorted = alphabetical(vec![
            cat(2, "shirts", Some(1), 0),
            cat(3, "Hats", Some(1), 1),
            cat(4, "Aprons", Some(1), 2),
        ]);
        let names: Vec<&str> = sorted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Aprons", "Hats", "shirts"]);
    }
}
