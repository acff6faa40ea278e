//! Product Ordering
//!
//! Products are ordered inside their category; moving one never touches
//! the products of another category.

use std::sync::Arc;

use crate::domain::{DomainError, DomainResult, Product};
use crate::ordering::{Direction, OrderableService};
use crate::repository::OrderableRepository;
use super::view::{ShopViewData, ViewResult};

pub struct ProductController<R> {
    products: Arc<R>,
    orderable: OrderableService<Product, R>,
}

impl<R: OrderableRepository<Product>> ProductController<R> {
    pub fn new(products: Arc<R>) -> Self {
        Self {
            orderable: OrderableService::new(products.clone()),
            products,
        }
    }

    /// Products of one category in display order
    pub async fn index(&self, category_id: u32) -> DomainResult<ViewResult> {
        let mut products = self
            .products
            .query(&move |p: &Product| p.category_id == category_id)
            .await?;
        products.sort_by_key(|p| (p.position, p.id));
        Ok(ViewResult::new(
            "Products",
            ShopViewData::default().with_products(products),
        ))
    }

    pub async fn new_product(&self, category_id: u32) -> DomainResult<ViewResult> {
        let position = self.next_position_in(category_id).await?;
        let product = Product::new(0, String::new(), category_id, 0, position);
        Ok(ViewResult::new(
            "EditProduct",
            ShopViewData::default().with_product(product),
        ))
    }

    /// Insert a product after the last one of its category
    pub async fn insert(&self, product: Product) -> DomainResult<Product> {
        if product.name.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "You must enter a name for the product".to_string(),
            ));
        }
        let mut product = product;
        product.position = self.next_position_in(product.category_id).await?;
        let created = self.products.create(&product).await?;
        log::info!(
            "Created product {} in category {} at position {}",
            created.id,
            created.category_id,
            created.position
        );
        Ok(created)
    }

    pub async fn move_up(&self, id: u32) -> DomainResult<ViewResult> {
        self.move_this(id, Direction::Up).await
    }

    pub async fn move_down(&self, id: u32) -> DomainResult<ViewResult> {
        self.move_this(id, Direction::Down).await
    }

    async fn move_this(&self, id: u32, direction: Direction) -> DomainResult<ViewResult> {
        let product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Product", id))?;
        let category_id = product.category_id;
        self.orderable
            .move_item(id)
            .constrained_by(move |p: &Product| p.category_id == category_id)
            .shift(direction)
            .await?;
        self.index(category_id).await
    }

    async fn next_position_in(&self, category_id: u32) -> DomainResult<i32> {
        self.orderable
            .next_position_where(&move |p: &Product| p.category_id == category_id)
            .await
    }
}
