//! Controllers Layer
//!
//! Thin orchestration between submitted requests, the repositories and the
//! position engine. Each action returns the view to render.

mod view;
mod category_ctl;
mod product_ctl;
mod order_ctl;

#[cfg(test)]
mod tests;

pub use view::{ShopViewData, ViewResult};
pub use category_ctl::CategoryController;
pub use product_ctl::ProductController;
pub use order_ctl::OrderController;
