//! API response types.

use axum::Json;
use bookmarks_common::AppResult;
use serde::Serialize;

/// Two-value status payload returned by the AJAX toggle endpoints.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub status: &'static str,
}

impl ToggleResponse {
    /// Success status.
    #[must_use]
    pub const fn ok() -> Self {
        Self { status: "ok" }
    }

    /// Generic error status. The wire contract carries no detail.
    #[must_use]
    pub const fn error() -> Self {
        Self { status: "error" }
    }
}

/// Collapse a toggle outcome onto the two-value status contract.
///
/// The error variant (not-found vs invalid input vs anything else) is kept
/// visible in the logs even though the response does not distinguish them.
pub fn toggle_response(kind: &str, result: AppResult<()>) -> Json<ToggleResponse> {
    match result {
        Ok(()) => Json(ToggleResponse::ok()),
        Err(e) => {
            if e.is_server_error() {
                tracing::error!(error = %e, code = e.error_code(), toggle = kind, "Toggle failed");
            } else {
                tracing::debug!(error = %e, code = e.error_code(), toggle = kind, "Toggle rejected");
            }
            Json(ToggleResponse::error())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookmarks_common::AppError;

    #[test]
    fn test_toggle_response_collapses_errors() {
        let ok = toggle_response("like", Ok(()));
        assert_eq!(ok.status, "ok");

        let err = toggle_response("like", Err(AppError::ImageNotFound("x".to_string())));
        assert_eq!(err.status, "error");

        let err = toggle_response("follow", Err(AppError::Validation("bad".to_string())));
        assert_eq!(err.status, "error");
    }
}
