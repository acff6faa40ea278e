//! Suteki Shop Catalog Core
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - ordering: Position engine for sibling reordering
//! - binder: Form field binding and validation
//! - controllers: Admin and checkout actions

use std::path::PathBuf;
use std::sync::Arc;

pub mod domain;
pub mod repository;
pub mod ordering;
pub mod binder;
pub mod controllers;
pub mod config;

pub use config::ShopConfig;

use controllers::{CategoryController, ProductController};
use domain::DomainResult;
use repository::{init_db, CategoryRepository, DbState, ProductRepository};

/// Application state shared across requests
pub struct AppState {
    pub db_state: DbState,
    pub db_path: PathBuf,
    pub categories: Arc<CategoryRepository>,
    pub products: Arc<ProductRepository>,
}

impl AppState {
    pub fn category_controller(&self) -> CategoryController<CategoryRepository> {
        CategoryController::new(self.categories.clone())
    }

    pub fn product_controller(&self) -> ProductController<ProductRepository> {
        ProductController::new(self.products.clone())
    }
}

/// Start logging, open the database and build the repositories
pub async fn bootstrap(config: &ShopConfig) -> DomainResult<AppState> {
    if let Err(e) = rolling_logger::init_logger(&config.log_dir, &config.app_name) {
        eprintln!(
            "[{}] Logger init failed: {}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            e
        );
    }

    let db_path = config.db_path();
    let db_state = match init_db(&db_path).await {
        Ok(state) => state,
        Err(e) => {
            let _ = rolling_logger::error(&format!("DB init failed: {}", e));
            return Err(e);
        }
    };
    let _ = rolling_logger::info("DB init success");

    Ok(AppState {
        categories: Arc::new(CategoryRepository::new(db_state.connection())),
        products: Arc::new(ProductRepository::new(db_state.connection())),
        db_path,
        db_state,
    })
}
