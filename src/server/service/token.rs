//! Bearer token issuing and verification.
//!
//! Tokens are HS256 JWTs carrying the user id and role, valid for 30 days. The role claim
//! is informational: the auth guard always re-reads the role from storage.

use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::Role;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::server::{
    error::{auth::AuthError, AppError},
    model::enum_name,
};

const TOKEN_LIFETIME_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Signs a token for a user.
    ///
    /// # Returns
    /// - `Ok(String)` - Encoded token
    /// - `Err(AppError::JwtErr)` - Signing failed
    pub fn issue(&self, user_id: i32, role: Role) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            id: user_id,
            role: enum_name(&role),
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_LIFETIME_DAYS)).timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Verifies signature and expiry.
    ///
    /// # Returns
    /// - `Ok(Claims)` - Valid token
    /// - `Err(AuthError::InvalidToken)` - Bad signature, malformed or expired
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let service = TokenService::new("test-secret");
        let token = service.issue(42, Role::Instructor).unwrap();

        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.id, 42);
        assert_eq!(claims.role, "instructor");
        assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_DAYS * 24 * 60 * 60);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = TokenService::new("one").issue(1, Role::Student).unwrap();

        assert!(matches!(
            TokenService::new("two").verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = TokenService::new("test-secret");
        let past = Utc::now() - Duration::days(31);
        let claims = Claims {
            id: 1,
            role: "student".to_string(),
            iat: past.timestamp(),
            exp: (past + Duration::days(TOKEN_LIFETIME_DAYS)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &service.encoding).unwrap();

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(TokenService::new("s").verify("not-a-token").is_err());
    }
}
