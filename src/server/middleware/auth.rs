use axum::http::{header::AUTHORIZATION, HeaderMap};
use entity::sea_orm_active_enums::Role;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::user::UserRepository,
    error::{auth::AuthError, AppError},
    model::{admin::Capability, enum_name, user::User},
    service::token::TokenService,
};

pub enum Permission {
    /// The caller's stored role must be one of these.
    Roles(&'static [Role]),
    /// Admins pass; sub-admins must hold the capability; every other role is refused.
    Capability(Capability),
}

/// Resolves the bearer token of a request to a stored user and checks access rules.
pub struct AuthGuard<'a> {
    db: &'a DatabaseConnection,
    tokens: &'a TokenService,
    headers: &'a HeaderMap,
}

impl<'a> AuthGuard<'a> {
    pub fn new(db: &'a DatabaseConnection, tokens: &'a TokenService, headers: &'a HeaderMap) -> Self {
        Self { db, tokens, headers }
    }

    /// Authenticates the caller and applies every permission in order.
    ///
    /// The role is always read from storage, never from the token claims.
    ///
    /// # Returns
    /// - `Ok(User)` - The authenticated caller
    /// - `Err(AuthError::MissingToken | InvalidToken | UserNotFound)` - 401
    /// - `Err(AuthError::RoleNotAllowed | MissingPermission | InsufficientRole)` - 403
    pub async fn require(&self, permissions: &[Permission]) -> Result<User, AppError> {
        let token = bearer_token(self.headers).ok_or(AuthError::MissingToken)?;
        let claims = self.tokens.verify(token)?;

        let user_repo = UserRepository::new(self.db);
        let Some(user) = user_repo.find_by_id(claims.id).await? else {
            return Err(AuthError::UserNotFound.into());
        };

        for permission in permissions {
            match permission {
                Permission::Roles(roles) => {
                    if !roles.contains(&user.role) {
                        return Err(AuthError::RoleNotAllowed(enum_name(&user.role)).into());
                    }
                }
                Permission::Capability(capability) => match user.role {
                    Role::Admin => {}
                    Role::SubAdmin => {
                        if !user_repo.has_permission(user.id, capability.as_str()).await? {
                            return Err(AuthError::MissingPermission(
                                capability.as_str().to_string(),
                            )
                            .into());
                        }
                    }
                    _ => return Err(AuthError::InsufficientRole.into()),
                },
            }
        }

        Ok(user)
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn reads_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
    }

    #[test]
    fn rejects_other_schemes_and_empty_tokens() {
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer   ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
