//! Category Administration
//!
//! Lists the category tree, edits categories and reorders siblings.
//! Every reorder is scoped to the siblings of the category being moved.

use std::sync::Arc;

use crate::binder::{FormData, ValidatingBinder};
use crate::domain::{alphabetical, Category, CategoryNode, DomainError, DomainResult, ROOT_CATEGORY_ID};
use crate::ordering::{Direction, OrderableService};
use crate::repository::OrderableRepository;
use super::view::{ShopViewData, ViewResult};

pub struct CategoryController<R> {
    categories: Arc<R>,
    orderable: OrderableService<Category, R>,
}

impl<R: OrderableRepository<Category>> CategoryController<R> {
    pub fn new(categories: Arc<R>) -> Self {
        Self {
            orderable: OrderableService::new(categories.clone()),
            categories,
        }
    }

    /// The whole tree below the root, siblings in position order
    pub async fn index(&self) -> DomainResult<ViewResult> {
        let all = self.categories.list().await?;
        let tree = CategoryNode::build(ROOT_CATEGORY_ID, &all)
            .ok_or_else(|| DomainError::not_found("Category", ROOT_CATEGORY_ID))?;
        Ok(ViewResult::new(
            "Index",
            ShopViewData::default().with_category_tree(tree),
        ))
    }

    /// Blank category under `parent_id`, placed after its last sibling
    pub async fn new_category(&self, parent_id: u32) -> DomainResult<ViewResult> {
        let position = self.next_position_under(Some(parent_id)).await?;
        let category = Category::new_child(parent_id, position);
        Ok(ViewResult::new(
            "Edit",
            self.edit_view_data().await?.with_category(category),
        ))
    }

    pub async fn edit(&self, id: u32) -> DomainResult<ViewResult> {
        let category = self.load(id).await?;
        Ok(ViewResult::new(
            "Edit",
            self.edit_view_data().await?.with_category(category),
        ))
    }

    /// Save the submitted form. `category_id == 0` creates a new category.
    ///
    /// Validation failures re-render the edit view with the message.
    pub async fn update(&self, category_id: u32, form: &FormData) -> DomainResult<ViewResult> {
        let (mut category, previous_parent) = if category_id == 0 {
            (Category::default(), None)
        } else {
            let existing = self.load(category_id).await?;
            let parent = existing.parent_id;
            (existing, parent)
        };

        if let Err(validation) = ValidatingBinder::update_from(&mut category, form, "category") {
            return self.edit_with_error(category, validation.to_string()).await;
        }

        if let Some(message) = self.check_parent(&category).await? {
            return self.edit_with_error(category, message).await;
        }

        if category_id == 0 || category.parent_id != previous_parent {
            category.position = self.next_position_under(category.parent_id).await?;
        }

        let saved = if category_id == 0 {
            self.categories.create(&category).await
        } else {
            self.categories.update(&category).await
        };

        match saved {
            Ok(category) => {
                log::info!("Saved category {} '{}'", category.id, category.name);
                Ok(ViewResult::new(
                    "Edit",
                    self.edit_view_data()
                        .await?
                        .with_category(category)
                        .with_message("The category has been saved"),
                ))
            }
            Err(DomainError::InvalidInput(message)) => self.edit_with_error(category, message).await,
            Err(err) => Err(err),
        }
    }

    pub async fn move_up(&self, id: u32) -> DomainResult<ViewResult> {
        self.move_this(id, Direction::Up).await
    }

    pub async fn move_down(&self, id: u32) -> DomainResult<ViewResult> {
        self.move_this(id, Direction::Down).await
    }

    async fn move_this(&self, id: u32, direction: Direction) -> DomainResult<ViewResult> {
        let category = self.load(id).await?;
        self.orderable
            .move_item(id)
            .constrained_by(move |c: &Category| c.shares_parent_with(&category))
            .shift(direction)
            .await?;
        self.index().await
    }

    async fn next_position_under(&self, parent: Option<u32>) -> DomainResult<i32> {
        self.orderable
            .next_position_where(&move |c: &Category| c.parent_id == parent)
            .await
    }

    async fn load(&self, id: u32) -> DomainResult<Category> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", id))
    }

    /// Reject parents that do not exist or sit below the category itself
    async fn check_parent(&self, category: &Category) -> DomainResult<Option<String>> {
        let Some(parent_id) = category.parent_id else {
            return Ok(None);
        };
        if self.categories.find_by_id(parent_id).await?.is_none() {
            return Ok(Some(format!("Parent category {} does not exist", parent_id)));
        }
        if category.id == 0 {
            return Ok(None);
        }

        let all = self.categories.list().await?;
        let below_itself = CategoryNode::build(category.id, &all)
            .map(|subtree| subtree.flatten().iter().any(|c| c.id == parent_id))
            .unwrap_or(false);
        if below_itself {
            return Ok(Some("A category cannot be moved below itself".to_string()));
        }
        Ok(None)
    }

    async fn edit_with_error(&self, category: Category, message: String) -> DomainResult<ViewResult> {
        Ok(ViewResult::new(
            "Edit",
            self.edit_view_data()
                .await?
                .with_category(category)
                .with_error_message(message),
        ))
    }

    /// Every category alphabetically, for the parent picker
    async fn edit_view_data(&self) -> DomainResult<ShopViewData> {
        let all = self.categories.list().await?;
        Ok(ShopViewData::default().with_categories(alphabetical(all)))
    }
}
