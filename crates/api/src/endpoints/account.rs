//! Account endpoints (registration, login, profile editing).

use axum::{
    Json, Router,
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use bookmarks_common::{AppError, AppResult};
use bookmarks_core::{EditProfileInput, RegisterInput};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, render};

/// Registration form fields.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

/// Show the registration form.
async fn register_form() -> Html<String> {
    Html(render::register_form_page("", &[]))
}

/// Handle a registration submission.
///
/// Validation failures re-render the form with every error reported; no
/// partial state is persisted.
async fn register_submit(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> AppResult<Html<String>> {
    let username = form.username.clone();
    let result = state
        .account_service
        .register(RegisterInput {
            username: form.username,
            password: form.password,
            password_confirm: form.password_confirm,
        })
        .await;

    match result {
        Ok(user) => Ok(Html(render::register_done_page(&user.username))),
        Err(AppError::Validation(msg) | AppError::BadRequest(msg)) => {
            let errors: Vec<String> = msg.split("; ").map(ToString::to_string).collect();
            Ok(Html(render::register_form_page(&username, &errors)))
        }
        Err(e) => Err(e),
    }
}

/// Login form fields.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Login response carrying the bearer token the client holds.
#[derive(Serialize)]
pub struct LoginResponse {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Sign in to an existing account.
async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Json<LoginResponse>> {
    let user = state
        .account_service
        .authenticate(&form.username, &form.password)
        .await?;

    Ok(Json(LoginResponse {
        id: user.id,
        username: user.username,
        token: user.token.unwrap_or_default(),
    }))
}

/// Query flag set after a successful profile save (flash message).
#[derive(Debug, Deserialize)]
pub struct EditQuery {
    #[serde(default)]
    pub updated: Option<u8>,
}

/// Show the profile edit form.
async fn edit_form(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<EditQuery>,
) -> AppResult<Html<String>> {
    let profile = state.account_service.profile(&user.id).await?;
    let flash = query
        .updated
        .map(|_| "Profile updated successfully!");

    Ok(Html(render::profile_edit_page(&user, &profile, flash, &[])))
}

/// Profile edit form fields. Blank inputs are treated as "leave unchanged".
#[derive(Debug, Deserialize)]
pub struct EditProfileForm {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Handle a profile edit submission.
///
/// All-or-nothing: both sub-forms validate before either entity is touched,
/// and every error is reported together.
async fn edit_submit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Form(form): Form<EditProfileForm>,
) -> AppResult<Response> {
    let input = EditProfileInput {
        first_name: none_if_empty(form.first_name),
        last_name: none_if_empty(form.last_name),
        email: none_if_empty(form.email),
        date_of_birth: none_if_empty(form.date_of_birth),
        photo_url: none_if_empty(form.photo_url),
    };

    match state.account_service.edit_profile(&user.id, input).await {
        Ok(_) => Ok(Redirect::to("/account/edit?updated=1").into_response()),
        Err(AppError::Validation(msg)) => {
            let errors: Vec<String> = msg.split("; ").map(ToString::to_string).collect();
            let profile = state.account_service.profile(&user.id).await?;
            Ok(Html(render::profile_edit_page(
                &user,
                &profile,
                Some("Profile updating failed!"),
                &errors,
            ))
            .into_response())
        }
        Err(e) => Err(e),
    }
}

/// Deactivation response.
#[derive(Serialize)]
pub struct DeactivateResponse {
    pub ok: bool,
}

/// Deactivate the viewer's account.
///
/// The row is kept (actions and bookmarks stay resolvable); the account
/// just drops out of listings and can no longer authenticate.
async fn deactivate(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DeactivateResponse>> {
    state.account_service.deactivate(&user.id).await?;
    Ok(Json(DeactivateResponse { ok: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_form).post(register_submit))
        .route("/login", post(login))
        .route("/account/edit", get(edit_form).post(edit_submit))
        .route("/account/deactivate", post(deactivate))
}
