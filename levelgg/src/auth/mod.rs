//! Caller identity: verification of identity-provider access tokens.
//!
//! ## Example
//!
//! ```
//! use levelgg::auth::AuthManager;
//! use uuid::Uuid;
//!
//! let auth = AuthManager::new("0123456789abcdef0123456789abcdef".to_string());
//! let player = Uuid::new_v4();
//! let token = auth.issue_access_token(player).unwrap();
//! assert_eq!(auth.verify_access_token(&token).unwrap().sub, player);
//! ```

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{AuthError, AuthResult};
pub use manager::AuthManager;
pub use models::AccessTokenClaims;
