use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// ApiError
///
/// The full error taxonomy of the service. Known-shape client errors
/// (`InvalidCredentials`, `NotFound`, the token failures) are raised directly
/// by the managers and must never be masked as `Store`; `Store` covers every
/// unexpected persistence failure and is always preceded by a rollback of the
/// operation's transaction.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Submitted login credentials do not match the configured admin pair.
    #[error("Invalid Credentials")]
    InvalidCredentials,

    /// No usable bearer credential on a protected request.
    #[error("Not authenticated")]
    Unauthorized,

    /// The token's signature is valid but its expiry has passed.
    #[error("Token has expired")]
    ExpiredToken,

    /// The token is malformed or its signature does not verify.
    #[error("Invalid token")]
    InvalidToken,

    /// Authenticated, but the role does not permit the operation.
    #[error("Admins Only")]
    Forbidden,

    /// The requested row does not exist.
    #[error("Article not found")]
    NotFound,

    /// Signing a fresh token failed. Practically unreachable with HS256,
    /// but surfaced as a server error rather than a panic.
    #[error("Could not issue token")]
    TokenIssue(#[source] jsonwebtoken::errors::Error),

    /// The lazy admin-row insert failed during login.
    #[error("Could not create admin user")]
    AdminProvisioning(#[source] sqlx::Error),

    /// Any other persistence failure, carrying the driver's message.
    #[error("{0}")]
    Store(#[from] sqlx::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized | ApiError::ExpiredToken | ApiError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::TokenIssue(_) | ApiError::AdminProvisioning(_) | ApiError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            match &self {
                ApiError::TokenIssue(e) => tracing::error!("token signing failed: {:?}", e),
                ApiError::AdminProvisioning(e) => {
                    tracing::error!("admin provisioning failed: {:?}", e)
                }
                ApiError::Store(e) => tracing::error!("store error: {:?}", e),
                _ => {}
            }
        }

        // The `detail` key matches what frontend clients of this API consume.
        let body = Json(json!({ "detail": self.to_string() }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_covers_taxonomy() {
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::ExpiredToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Store(sqlx::Error::PoolClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_error_carries_underlying_message() {
        let err = ApiError::Store(sqlx::Error::PoolClosed);
        assert!(!err.to_string().is_empty());
    }
}
