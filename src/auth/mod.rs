//! Bearer-token authentication for API requests.
//!
//! Dual-token system: access tokens (1 day) authenticate every request
//! statelessly; refresh tokens (30 days) are exchanged for a fresh pair
//! once the access token has expired. The current pair is stored inline
//! on the account record.

mod errors;
mod extractors;
mod state;
mod types;

pub use errors::{ApiAuthError, AuthErrorKind};
pub use extractors::{Auth, bearer_token};
pub use state::HasAuthBackend;
pub use types::AuthenticatedAccount;
