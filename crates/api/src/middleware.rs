//! API middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use bookmarks_core::{AccountService, ActionService, ContactService, ImageService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// Registration, profile editing and authentication.
    pub account_service: AccountService,
    /// Follow/unfollow toggles over the social graph.
    pub contact_service: ContactService,
    /// Activity log and dashboard feed assembly.
    pub action_service: ActionService,
    /// Image bookmarking and like toggles.
    pub image_service: ImageService,
}

/// Authentication middleware.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Try to extract token from header
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        // Authenticate user by token
        if let Ok(user) = state.account_service.authenticate_by_token(token).await {
            req.extensions_mut().insert(user);
        }
    }

    next.run(req).await
}
