//! JWT token generation and validation.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::db::AccountRole;

/// Access token duration: 1 day
pub const ACCESS_TOKEN_DURATION_SECS: u64 = 24 * 60 * 60;

/// Refresh token duration: 30 days
pub const REFRESH_TOKEN_DURATION_SECS: u64 = 30 * 24 * 60 * 60;

/// Claims carried by both access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (account UUID)
    pub sub: String,
    /// Account email
    pub email: String,
    /// Account display name
    pub name: String,
    /// Account role
    pub role: AccountRole,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// A freshly issued access/refresh token pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signing and verification keys for both token kinds.
///
/// Access and refresh tokens use distinct secrets, so a refresh token can
/// never be presented where an access token is expected. The keys are
/// explicit configuration passed in at construction; nothing here touches
/// storage.
#[derive(Clone)]
pub struct TokenKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
}

/// Identity fields baked into issued tokens.
pub struct TokenSubject<'a> {
    pub account_uuid: &'a str,
    pub email: &'a str,
    pub name: &'a str,
    pub role: AccountRole,
}

impl TokenKeys {
    /// Create token keys from the two signing secrets.
    pub fn new(access_secret: &[u8], refresh_secret: &[u8]) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(access_secret),
            access_decoding: DecodingKey::from_secret(access_secret),
            refresh_encoding: EncodingKey::from_secret(refresh_secret),
            refresh_decoding: DecodingKey::from_secret(refresh_secret),
        }
    }

    /// Issue a fresh access/refresh token pair for an account.
    ///
    /// Rotation always replaces both tokens; there is no incremental
    /// renewal. The caller is responsible for persisting the pair onto
    /// the account record.
    pub fn issue_pair(&self, subject: &TokenSubject<'_>) -> Result<TokenPair, TokenError> {
        let now = unix_now()?;

        let access_token = encode_claims(
            &self.access_encoding,
            subject,
            now,
            ACCESS_TOKEN_DURATION_SECS,
        )?;
        let refresh_token = encode_claims(
            &self.refresh_encoding,
            subject,
            now,
            REFRESH_TOKEN_DURATION_SECS,
        )?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Validate and decode an access token.
    pub fn verify_access_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
        verify(token, &self.access_decoding)
    }

    /// Validate and decode a refresh token.
    pub fn verify_refresh_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
        verify(token, &self.refresh_decoding)
    }
}

fn unix_now() -> Result<u64, TokenError> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| TokenError::TimeError)?
        .as_secs())
}

fn encode_claims(
    key: &EncodingKey,
    subject: &TokenSubject<'_>,
    now: u64,
    duration: u64,
) -> Result<String, TokenError> {
    let claims = TokenClaims {
        sub: subject.account_uuid.to_string(),
        email: subject.email.to_string(),
        name: subject.name.to_string(),
        role: subject.role,
        iat: now,
        exp: now + duration,
    };
    jsonwebtoken::encode(&Header::default(), &claims, key).map_err(TokenError::Encoding)
}

fn verify(token: &str, key: &DecodingKey) -> Result<TokenClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let token_data = jsonwebtoken::decode::<TokenClaims>(token, key, &validation).map_err(|e| {
        // Expiry is split out: the refresh flow treats it differently
        // from a bad signature or garbled token.
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(e),
        }
    })?;

    Ok(token_data.claims)
}

/// Errors that can occur during token operations.
#[derive(Debug)]
pub enum TokenError {
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
    /// Token has expired
    Expired,
    /// Token failed verification for any reason other than expiry
    Invalid(jsonwebtoken::errors::Error),
    /// System time error
    TimeError,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            TokenError::Expired => write!(f, "Token expired"),
            TokenError::Invalid(e) => write!(f, "Token verification failed: {}", e),
            TokenError::TimeError => write!(f, "System time error"),
        }
    }
}

impl std::error::Error for TokenError {}
