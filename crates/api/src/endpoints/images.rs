//! Image bookmarking, detail, like-toggle and listing endpoints.

use axum::{
    Json, Router,
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use bookmarks_common::{AppError, AppResult};
use bookmarks_core::CreateImageInput;
use serde::Deserialize;

use crate::{
    endpoints::users::ToggleForm,
    extractors::{AuthUser, IsAjax, MaybeAuthUser, RequireAjax},
    middleware::AppState,
    render,
    response::{ToggleResponse, toggle_response},
};

/// Bookmarklet prefill parameters for the create form.
#[derive(Debug, Deserialize)]
pub struct CreatePrefill {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Show the bookmark-an-image form, optionally prefilled.
async fn create_form(
    AuthUser(_user): AuthUser,
    Query(prefill): Query<CreatePrefill>,
) -> Html<String> {
    Html(render::image_create_page(
        prefill.url.as_deref().unwrap_or(""),
        prefill.title.as_deref().unwrap_or(""),
        &[],
    ))
}

/// Image creation form fields.
#[derive(Debug, Deserialize)]
pub struct CreateImageForm {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Handle a bookmark submission; redirects to the new image's detail page.
async fn create_submit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Form(form): Form<CreateImageForm>,
) -> AppResult<Response> {
    let url = form.url.clone();
    let title = form.title.clone();

    let result = state
        .image_service
        .create(
            &user.id,
            CreateImageInput {
                url: form.url,
                title: form.title,
                description: form.description.filter(|d| !d.trim().is_empty()),
            },
        )
        .await;

    match result {
        Ok(image) => Ok(Redirect::to(&format!("/images/{}/{}", image.id, image.slug)).into_response()),
        Err(AppError::Validation(msg)) => {
            let errors: Vec<String> = msg.split("; ").map(ToString::to_string).collect();
            Ok(Html(render::image_create_page(&url, &title, &errors)).into_response())
        }
        Err(e) => Err(e),
    }
}

/// An image's detail page. The ID and slug must both match.
async fn image_detail(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path((id, slug)): Path<(String, String)>,
) -> AppResult<Html<String>> {
    let image = state.image_service.get(&id, &slug).await?;
    let owner = state.account_service.get(&image.user_id).await?;

    let liked = match viewer {
        Some(ref v) => Some(state.image_service.has_liked(&v.id, &image.id).await?),
        None => None,
    };

    Ok(Html(render::image_detail_page(&image, &owner.username, liked)))
}

/// Like/unlike toggle (AJAX only).
async fn like_toggle(
    _: RequireAjax,
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Form(form): Form<ToggleForm>,
) -> Json<ToggleResponse> {
    let (Some(id), Some(action)) = (form.id, form.action) else {
        return Json(ToggleResponse::error());
    };

    let result = match action.as_str() {
        "like" => state.image_service.like(&user.id, &id).await,
        "unlike" => state.image_service.unlike(&user.id, &id).await,
        other => Err(AppError::BadRequest(format!("Unknown action: {other}"))),
    };

    toggle_response("like", result)
}

/// Image list query parameters. The page number arrives as an arbitrary
/// string and fails open.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page: Option<String>,
}

/// One page of the image list, most-liked-first, 8 per page.
///
/// Fail-open pagination: a non-integer page value is treated as page 1. A
/// page past the end returns an empty fragment for partial (AJAX) fetches
/// and the last valid page for full page loads.
async fn list_images(
    IsAjax(is_ajax): IsAjax,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Response> {
    let requested = query
        .page
        .as_deref()
        .and_then(|p| p.parse::<u64>().ok())
        .unwrap_or(1);

    let mut page = state.image_service.list_page(requested).await?;

    if page.items.is_empty() && page.page > page.total_pages {
        if is_ajax {
            return Ok(Html(String::new()).into_response());
        }
        page = state.image_service.list_page(page.total_pages).await?;
    }

    let fragment = render::image_list_fragment(&page.items);
    if is_ajax {
        Ok(Html(fragment).into_response())
    } else {
        Ok(Html(render::image_list_page(&fragment, page.page, page.has_next())).into_response())
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/images", get(list_images))
        .route("/images/create", get(create_form).post(create_submit))
        .route("/images/like", post(like_toggle))
        .route("/images/{id}/{slug}", get(image_detail))
}
