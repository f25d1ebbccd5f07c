//! Authentication error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Terminal rejection reasons produced by the auth extractor.
///
/// Everything except `Internal` is a client-facing 401. Store and
/// signing failures stay `Internal` so auth rejections and infra
/// failures remain distinguishable in logs and monitoring.
#[derive(Debug)]
pub enum AuthErrorKind {
    /// No bearer credential was presented.
    NoToken,
    /// The presented access token has expired.
    TokenExpired,
    /// The token failed verification; carries the verifier's detail.
    InvalidToken(String),
    /// The verified token names an account that no longer exists.
    AccountNotFound,
    /// Unexpected store failure; the original message is passed through.
    Internal(String),
}

/// API authentication error with JSON response conversion.
#[derive(Debug)]
pub struct ApiAuthError(pub AuthErrorKind);

impl ApiAuthError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            AuthErrorKind::NoToken
            | AuthErrorKind::TokenExpired
            | AuthErrorKind::InvalidToken(_)
            | AuthErrorKind::AccountNotFound => StatusCode::UNAUTHORIZED,
            AuthErrorKind::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match &self.0 {
            AuthErrorKind::NoToken => "No auth token, access denied".to_string(),
            AuthErrorKind::TokenExpired => "Token expired".to_string(),
            AuthErrorKind::InvalidToken(detail) => format!("Invalid token: {}", detail),
            AuthErrorKind::AccountNotFound => "No account for token".to_string(),
            AuthErrorKind::Internal(msg) => msg.clone(),
        }
    }
}

impl From<AuthErrorKind> for ApiAuthError {
    fn from(kind: AuthErrorKind) -> Self {
        Self(kind)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiAuthError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
