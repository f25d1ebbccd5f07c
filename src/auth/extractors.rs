//! Axum extractor for bearer-token authentication.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use tracing::error;

use super::errors::{ApiAuthError, AuthErrorKind};
use super::state::HasAuthBackend;
use super::types::AuthenticatedAccount;
use crate::jwt::TokenError;

/// Extract the bearer credential from the Authorization header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Core authentication sequence. Three stages, terminal failures only:
/// extract the bearer token, verify it, resolve the owning account.
async fn authenticate_request<S>(
    parts: &Parts,
    state: &S,
) -> Result<AuthenticatedAccount, AuthErrorKind>
where
    S: HasAuthBackend + Send + Sync,
{
    let token = bearer_token(&parts.headers).ok_or(AuthErrorKind::NoToken)?;

    let claims = state.keys().verify_access_token(token).map_err(|e| match e {
        TokenError::Expired => AuthErrorKind::TokenExpired,
        other => AuthErrorKind::InvalidToken(other.to_string()),
    })?;

    // The token is stateless; the account still has to exist.
    state
        .db()
        .accounts()
        .get_by_uuid(&claims.sub)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to resolve account for token");
            AuthErrorKind::Internal(e.to_string())
        })?
        .ok_or(AuthErrorKind::AccountNotFound)?;

    Ok(AuthenticatedAccount {
        claims,
        token: token.to_string(),
    })
}

/// Extractor for API endpoints that require authentication.
/// Verifies the presented access token and resolves its account.
pub struct Auth(pub AuthenticatedAccount);

impl<S> FromRequestParts<S> for Auth
where
    S: HasAuthBackend + Send + Sync,
{
    type Rejection = ApiAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authenticate_request(parts, state)
            .await
            .map(Auth)
            .map_err(ApiAuthError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(
            bearer_token(&headers_with("Bearer abc.def.ghi")),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn test_missing_or_malformed_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers_with("Basic abc")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
    }
}
