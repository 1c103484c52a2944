//! HTTP layer for bookmarks-rs.
//!
//! This crate provides the browser-facing surface:
//!
//! - **Endpoints**: HTML pages and AJAX toggle handlers
//! - **Extractors**: Authentication and request-origin checks
//! - **Middleware**: Bearer-token authentication
//! - **Render**: Escape-correct HTML page builders
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod render;
pub mod response;

pub use endpoints::router;
