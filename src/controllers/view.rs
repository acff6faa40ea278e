//! View Models
//!
//! What a controller action hands to the view layer: a view name and the
//! data it renders. Rendering itself happens elsewhere.

use serde::Serialize;

use crate::domain::{CardType, Category, CategoryNode, Country, Order, Product};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShopViewData {
    pub category: Option<Category>,
    pub category_tree: Option<CategoryNode>,
    pub categories: Vec<Category>,
    pub product: Option<Product>,
    pub products: Vec<Product>,
    pub order: Option<Order>,
    pub countries: Vec<Country>,
    pub card_types: Vec<CardType>,
    pub message: Option<String>,
    pub error_message: Option<String>,
}

impl ShopViewData {
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_category_tree(mut self, tree: CategoryNode) -> Self {
        self.category_tree = Some(tree);
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.product = Some(product);
        self
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = products;
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_countries(mut self, countries: Vec<Country>) -> Self {
        self.countries = countries;
        self
    }

    pub fn with_card_types(mut self, card_types: Vec<CardType>) -> Self {
        self.card_types = card_types;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewResult {
    pub view_name: &'static str,
    pub data: ShopViewData,
}

impl ViewResult {
    pub fn new(view_name: &'static str, data: ShopViewData) -> Self {
        Self { view_name, data }
    }
}
