use bcrypt::{hash, verify, DEFAULT_COST};

/// bcrypt only looks at the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    #[error("password length exceeds 72 bytes")]
    TooLong,
    #[error("failed to hash password: {0}")]
    Hashing(String),
}

/// One-way salted hashing of credentials.
pub trait PasswordHasher: Send + Sync {
    /// Hashes `password` with a fresh random salt.
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Returns true iff `plain` matches `hashed`. A malformed hash never matches.
    fn verify(&self, hashed: &str, plain: &str) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong);
        }
        hash(password, self.cost).map_err(|e| PasswordError::Hashing(e.to_string()))
    }

    fn verify(&self, hashed: &str, plain: &str) -> bool {
        // bcrypt would truncate to 72 bytes; nothing longer can have been hashed.
        if plain.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        verify(plain, hashed).unwrap_or(false)
    }
}
