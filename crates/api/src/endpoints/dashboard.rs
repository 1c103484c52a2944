//! Dashboard endpoint.

use axum::{Router, extract::State, response::Html, routing::get};
use bookmarks_common::AppResult;

use crate::{extractors::AuthUser, middleware::AppState, render};

/// The viewer's activity-feed dashboard.
async fn dashboard(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Html<String>> {
    let feed = state.action_service.dashboard_feed(&user.id).await?;
    Ok(Html(render::dashboard_page(&user.username, &feed)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}
