//! User listing, detail and follow-toggle endpoints.

use axum::{
    Json, Router,
    extract::{Form, Path, State},
    response::Html,
    routing::{get, post},
};
use bookmarks_common::{AppError, AppResult};
use serde::Deserialize;

use crate::{
    extractors::{AuthUser, MaybeAuthUser, RequireAjax},
    middleware::AppState,
    render,
    response::{ToggleResponse, toggle_response},
};

/// List active users.
async fn list_users(State(state): State<AppState>) -> AppResult<Html<String>> {
    let users = state.account_service.list_users().await?;
    Ok(Html(render::user_list_page(&users)))
}

/// A user's detail page: their bookmarks, follower count, follow state.
async fn user_detail(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Html<String>> {
    let user = state.account_service.get_active_by_username(&username).await?;
    let images = state.image_service.list_by_user(&user.id).await?;
    let followers = state.contact_service.count_followers(&user.id).await?;

    // The follow button only renders for a signed-in viewer looking at
    // someone else's page.
    let is_following = match viewer {
        Some(ref v) if v.id != user.id => {
            Some(state.contact_service.is_following(&v.id, &user.id).await?)
        }
        _ => None,
    };

    Ok(Html(render::user_detail_page(
        &user,
        &images,
        followers,
        is_following,
    )))
}

/// Toggle form fields. Missing values are reported through the status
/// payload, not as a transport error.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

/// Follow/unfollow toggle (AJAX only).
async fn follow_toggle(
    _: RequireAjax,
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Form(form): Form<ToggleForm>,
) -> Json<ToggleResponse> {
    let (Some(id), Some(action)) = (form.id, form.action) else {
        return Json(ToggleResponse::error());
    };

    let result = match action.as_str() {
        "follow" => state.contact_service.follow(&user.id, &id).await,
        "unfollow" => state.contact_service.unfollow(&user.id, &id).await,
        other => Err(AppError::BadRequest(format!("Unknown action: {other}"))),
    };

    toggle_response("follow", result)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/follow", post(follow_toggle))
        .route("/users/{username}", get(user_detail))
}
