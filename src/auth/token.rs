use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Lifetime of an issued token.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Represents the claims encoded within a JWT.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Identifier of the authenticated user.
    #[serde(rename = "userId")]
    pub user_id: String,
    pub username: String,
    /// Role at the time of issuance (`user` or `admin`).
    pub role: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("JWT secret must be set")]
    MissingSecret,
    #[error("userID cannot be empty")]
    EmptyUserId,
    #[error("username cannot be empty")]
    EmptyUsername,
    #[error("role cannot be empty")]
    EmptyRole,
    #[error("token cannot be empty")]
    EmptyToken,
    #[error("token signature is invalid")]
    SignatureInvalid,
    #[error("token is expired")]
    Expired,
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("failed to generate token: {0}")]
    Signing(String),
}

impl TokenError {
    /// True for failures caused by the presented token rather than by the service.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            TokenError::EmptyToken
                | TokenError::SignatureInvalid
                | TokenError::Expired
                | TokenError::Malformed(_)
        )
    }
}

/// Issues and verifies HS256-signed identity tokens.
///
/// The signing secret is fixed at construction and only read afterwards, so a
/// single instance can be shared across workers behind an `Arc`.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Builds a service signing with `secret`.
    ///
    /// Returns `TokenError::MissingSecret` if `secret` is empty.
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is judged against the verification instant, without grace.
        validation.leeway = 0;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Generates a token for the given identity, expiring in 24 hours.
    pub fn issue(&self, user_id: &str, username: &str, role: &str) -> Result<String, TokenError> {
        if user_id.is_empty() {
            return Err(TokenError::EmptyUserId);
        }
        if username.is_empty() {
            return Err(TokenError::EmptyUsername);
        }
        if role.is_empty() {
            return Err(TokenError::EmptyRole);
        }

        let now = Utc::now();
        let expiration = now
            .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
            .ok_or_else(|| TokenError::Signing("expiration overflow".into()))?;

        let claims = Claims {
            user_id: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        self.sign(&claims)
    }

    /// Signs arbitrary claims with this service's key.
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verifies signature and expiry and returns the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        if token.is_empty() {
            return Err(TokenError::EmptyToken);
        }

        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::InvalidSignature
                | JwtErrorKind::InvalidAlgorithm
                | JwtErrorKind::InvalidAlgorithmName => TokenError::SignatureInvalid,
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SECRET: &str = "test_secret_for_gen_verify";

    fn service() -> TokenService {
        TokenService::new(SECRET).unwrap()
    }

    fn claims_expiring_at(exp: i64) -> Claims {
        Claims {
            user_id: "5f9b1c1e-4a7d-4f6e-9a43-2f6d0c1b7e11".into(),
            username: "alice".into(),
            role: "user".into(),
            exp: exp as usize,
            iat: (exp - 3600) as usize,
        }
    }

    #[test]
    fn test_missing_secret() {
        assert!(matches!(TokenService::new(""), Err(TokenError::MissingSecret)));
    }

    #[test]
    fn test_token_generation_and_verification() {
        let token = service().issue("user-1", "alice", "admin").unwrap();
        let claims = service().verify(&token).unwrap();

        assert_eq!(claims.user_id, "user-1");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn test_token_expires_in_24_hours() {
        let before = Utc::now().timestamp();
        let token = service().issue("user-1", "alice", "user").unwrap();
        let claims = service().verify(&token).unwrap();

        let expected = before + TOKEN_TTL_HOURS * 3600;
        assert!((claims.exp as i64 - expected).abs() <= 2);
    }

    #[test]
    fn test_issue_rejects_empty_fields() {
        assert_eq!(service().issue("", "alice", "user"), Err(TokenError::EmptyUserId));
        assert_eq!(service().issue("user-1", "", "user"), Err(TokenError::EmptyUsername));
        assert_eq!(service().issue("user-1", "alice", ""), Err(TokenError::EmptyRole));
    }

    #[test]
    fn test_empty_token() {
        assert_eq!(service().verify(""), Err(TokenError::EmptyToken));
    }

    #[test]
    fn test_token_expiration() {
        let expired_at = Utc::now().timestamp() - 2 * 3600;
        let expired_token = service().sign(&claims_expiring_at(expired_at)).unwrap();

        assert_eq!(service().verify(&expired_token), Err(TokenError::Expired));
    }

    #[test]
    fn test_token_expired_one_second_ago() {
        let expired_token = service()
            .sign(&claims_expiring_at(Utc::now().timestamp() - 1))
            .unwrap();

        assert_eq!(service().verify(&expired_token), Err(TokenError::Expired));
    }

    #[test]
    fn test_invalid_token_signature() {
        let other = TokenService::new("a_completely_different_secret").unwrap();
        let token = other.issue("user-1", "mallory", "admin").unwrap();

        assert_eq!(service().verify(&token), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn test_wrong_algorithm_is_rejected() {
        let claims = claims_expiring_at(Utc::now().timestamp() + 3600);
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(service().verify(&token), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn test_malformed_token() {
        assert!(matches!(
            service().verify("not-a-token"),
            Err(TokenError::Malformed(_))
        ));
    }
}
