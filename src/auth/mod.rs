pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};

use crate::models::UserView;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::{AdminOnly, AuthMiddleware};
pub use password::{BcryptHasher, PasswordError, PasswordHasher};
pub use token::{Claims, TokenError, TokenService};

/// Response structure after a successful login.
/// Contains the JWT access token and the sanitized user.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The JWT for session authentication.
    pub token: String,
    /// The authenticated user, without password material.
    pub user: UserView,
}
