use log::{debug, info, warn};
use std::sync::{Arc, OnceLock};
use uuid::Uuid;

use crate::auth::password::PasswordHasher;
use crate::auth::token::TokenService;
use crate::auth::AuthResponse;
use crate::error::DomainError;
use crate::models::user::parse_user_id;
use crate::models::{Credentials, NewUser, Role, User, UserView};
use crate::repository::{StoreError, UserRepository};

pub const MIN_PASSWORD_CHARS: usize = 8;

/// Hashed on first use so unknown usernames still pay for a bcrypt comparison.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-users";

/// Registration, login and promotion rules.
///
/// Registration reads the user count and then inserts, without holding
/// anything in between. Two concurrent first registrations can therefore both
/// see an empty store and both become admin. Closing that requires a
/// serializing guard in the store.
pub struct UserUseCase {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<TokenService>,
    decoy_hash: OnceLock<Option<String>>,
}

impl UserUseCase {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            decoy_hash: OnceLock::new(),
        }
    }

    /// Registers a new user. The very first user in an empty store becomes admin.
    pub async fn register(&self, input: NewUser) -> Result<UserView, DomainError> {
        if input.username.is_empty() {
            return Err(DomainError::EmptyField("username"));
        }
        if input.password.is_empty() {
            return Err(DomainError::EmptyField("password"));
        }
        if input.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(DomainError::PasswordTooShort);
        }

        if self.users.find_by_username(&input.username).await?.is_some() {
            debug!("Registration rejected, username {} is taken", input.username);
            return Err(DomainError::UserExists);
        }

        let password_hash = self.hasher.hash(&input.password)?;

        let mut role = Role::User;
        if self.users.count().await? == 0 {
            role = Role::Admin;
        }

        let user = User {
            id: Uuid::new_v4(),
            username: input.username,
            password_hash,
            role,
        };

        match self.users.create_user(&user).await {
            Ok(()) => {}
            Err(StoreError::Duplicate) => return Err(DomainError::UserExists),
            Err(e) => return Err(e.into()),
        }

        if role == Role::Admin {
            info!("Registered first user {} ({}) as admin", user.username, user.id);
        } else {
            info!("Registered user {} ({})", user.username, user.id);
        }
        Ok(UserView::from(&user))
    }

    /// Checks credentials and issues a token.
    ///
    /// Unknown usernames and wrong passwords both yield `InvalidCredentials`.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, DomainError> {
        if credentials.username.is_empty() || credentials.password.is_empty() {
            return Err(DomainError::EmptyField("username and password"));
        }

        let user = match self.users.find_by_username(&credentials.username).await? {
            Some(user) => user,
            None => {
                self.burn_decoy_verification(&credentials.password);
                warn!("Login failed for {}", credentials.username);
                return Err(DomainError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(&user.password_hash, &credentials.password) {
            warn!("Login failed for {}", credentials.username);
            return Err(DomainError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(&user.id.to_string(), &user.username, user.role.as_str())?;

        info!("User {} logged in", user.username);
        Ok(AuthResponse {
            token,
            user: UserView::from(&user),
        })
    }

    /// Grants the admin role. Promoting an admin again is not an error.
    pub async fn promote_to_admin(&self, user_id: &str) -> Result<(), DomainError> {
        if user_id.is_empty() {
            return Err(DomainError::EmptyField("user ID"));
        }
        let id = parse_user_id(user_id)?;

        if self.users.find_by_id(id).await?.is_none() {
            return Err(DomainError::UserNotFound);
        }

        match self.users.update_role(id, Role::Admin).await {
            Ok(()) => {
                info!("Promoted user {} to admin", id);
                Ok(())
            }
            Err(StoreError::NotFound) => Err(DomainError::UserNotFound),
            Err(e) => Err(e.into()),
        }
    }

    fn burn_decoy_verification(&self, password: &str) {
        let decoy = self
            .decoy_hash
            .get_or_init(|| self.hasher.hash(DECOY_PASSWORD).ok());
        if let Some(hash) = decoy {
            let _ = self.hasher.verify(hash, password);
        }
    }
}
