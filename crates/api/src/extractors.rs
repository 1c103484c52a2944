//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use bookmarks_db::entities::user;

/// Authenticated user extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get user from request extensions (set by auth middleware)
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

/// Optional authenticated user extractor.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<user::Model>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<user::Model>().cloned()))
    }
}

/// Whether the request is a partial (AJAX) fetch, signaled via the
/// `X-Requested-With: XMLHttpRequest` header.
fn is_ajax(parts: &Parts) -> bool {
    parts
        .headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
}

/// Extractor that rejects non-AJAX requests.
///
/// Toggle endpoints only serve script-driven clients; a plain navigation
/// hitting them is a client error.
#[derive(Debug, Clone, Copy)]
pub struct RequireAjax;

impl<S> FromRequestParts<S> for RequireAjax
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if is_ajax(parts) {
            Ok(Self)
        } else {
            Err((StatusCode::BAD_REQUEST, "AJAX request required"))
        }
    }
}

/// Infallible request-origin marker: partial (AJAX) fetch vs full page load.
#[derive(Debug, Clone, Copy)]
pub struct IsAjax(pub bool);

impl<S> FromRequestParts<S> for IsAjax
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(is_ajax(parts)))
    }
}
