//! Authenticated identity attached to the request.

use crate::jwt::TokenClaims;

/// Identity extracted from a verified access token whose account was
/// resolved in storage.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    /// Claims from the verified access token. `sub` is the account UUID.
    pub claims: TokenClaims,
    /// The token exactly as presented in the Authorization header.
    pub token: String,
}

impl AuthenticatedAccount {
    /// UUID of the authenticated account.
    pub fn account_uuid(&self) -> &str {
        &self.claims.sub
    }
}
