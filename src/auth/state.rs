//! Authentication state trait and macro.

use crate::db::Database;
use crate::jwt::TokenKeys;

/// Trait for state types that provide database and token-key access for
/// authentication.
pub trait HasAuthBackend {
    fn keys(&self) -> &TokenKeys;
    fn db(&self) -> &Database;
}

/// Macro to implement `HasAuthBackend` for state structs with the
/// standard fields.
///
/// The struct must have these fields:
/// - `keys: Arc<TokenKeys>`
/// - `db: Database`
#[macro_export]
macro_rules! impl_has_auth_backend {
    ($state_type:ty) => {
        impl $crate::auth::HasAuthBackend for $state_type {
            fn keys(&self) -> &$crate::jwt::TokenKeys {
                &self.keys
            }
            fn db(&self) -> &$crate::db::Database {
                &self.db
            }
        }
    };
}
