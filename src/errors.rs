use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Failure taxonomy of the authentication core.
///
/// `ExpiredToken` and `InvalidToken` are distinguished internally (they log
/// differently) but collapse to the same 401 response at the boundary, so a
/// caller cannot probe why a token was rejected.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("username or password is incorrect")]
    AuthenticationFailed,

    #[error("token has expired")]
    ExpiredToken,

    #[error("invalid token")]
    InvalidToken,

    #[error("could not validate credentials")]
    Unauthenticated,

    #[error("insufficient role for this operation")]
    Forbidden,

    #[error("database error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_type, code, msg) = match &self {
            AuthError::InvalidArgument(reason) => {
                tracing::warn!("invalid argument: {}", reason);
                (
                    StatusCode::BAD_REQUEST,
                    "invalid_request_error",
                    "invalid_argument",
                    reason.clone(),
                )
            }
            AuthError::AuthenticationFailed => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "authentication_failed",
                "username or password is incorrect".to_string(),
            ),
            // Deliberately the same body as InvalidToken; the precise kind
            // is only recorded in logs at the verification site.
            AuthError::ExpiredToken | AuthError::InvalidToken | AuthError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "unauthenticated",
                "could not validate credentials".to_string(),
            ),
            AuthError::Forbidden => (
                StatusCode::FORBIDDEN,
                "permission_error",
                "forbidden",
                "insufficient role for this operation".to_string(),
            ),
            AuthError::Store(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal_server_error",
                    "internal server error".to_string(),
                )
            }
            AuthError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal_server_error",
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "message": msg,
                "type": error_type,
                "code": code,
            }
        }));

        let mut response = (status, body).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert("www-authenticate", HeaderValue::from_static("Bearer"));
        }

        response
    }
}
