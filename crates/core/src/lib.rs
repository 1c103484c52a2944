//! Core business logic for bookmarks-rs.

pub mod services;

pub use services::*;
