use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Lifetime of an issued token.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Represents the claims encoded within a JWT.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's identifier.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Issues and verifies HS256 bearer tokens.
///
/// The secret is optional so the server can start without one. Issuing or
/// verifying a token without a secret fails with `AppError::Configuration`.
#[derive(Clone)]
pub struct TokenService {
    secret: Option<String>,
}

impl TokenService {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    fn secret(&self) -> Result<&[u8], AppError> {
        self.secret
            .as_deref()
            .map(str::as_bytes)
            .ok_or_else(|| AppError::Configuration("JWT_SECRET not set".into()))
    }

    /// Generates a token for `user_id` that expires 24 hours from now.
    pub fn issue(&self, user_id: &str) -> Result<String, AppError> {
        self.issue_at(user_id, Utc::now())
    }

    pub(crate) fn issue_at(&self, user_id: &str, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let secret = self.secret()?;
        let claims = Claims {
            sub: user_id.to_owned(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies the signature and expiry of `token` and returns its claims.
    ///
    /// Expiry is checked without leeway.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let secret = self.secret()?;
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)?;
        Ok(data.claims)
    }
}
