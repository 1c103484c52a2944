//! HTTP endpoints.

mod account;
mod dashboard;
mod images;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(dashboard::router())
        .merge(account::router())
        .merge(users::router())
        .merge(images::router())
}
