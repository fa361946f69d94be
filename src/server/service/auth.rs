//! Registration, login and self-service account updates.
//!
//! Passwords are stored as Argon2 hashes and never leave the data layer. Every successful
//! registration, login or account update returns a freshly signed bearer token.

use chrono::Utc;
use entity::sea_orm_active_enums::Role;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::user::UserRepository,
    error::{auth::AuthError, AppError},
    model::{
        parse_enum,
        user::{
            next_streak, CreateUserParams, RegisterParams, UpdateOwnAccountParams,
            UpdateUserParams, User,
        },
    },
    service::{mailer::Mailer, token::TokenService},
    util::{
        parse::{is_valid_email, normalize_email},
        password::{hash_password, verify_password, MIN_PASSWORD_LENGTH},
    },
};

/// Roles that may be chosen at public registration.
const SELF_SERVICE_ROLES: [Role; 3] = [Role::Student, Role::Parent, Role::Instructor];

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
    tokens: &'a TokenService,
    mailer: &'a Mailer,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a DatabaseConnection, tokens: &'a TokenService, mailer: &'a Mailer) -> Self {
        Self { db, tokens, mailer }
    }

    /// Registers a new account and signs a token for it.
    ///
    /// The role defaults to `student`; administrative roles are rejected. A welcome email
    /// is sent when mail is configured, and delivery failures are only logged.
    ///
    /// # Arguments
    /// - `params` - Name, email, password and optional role
    ///
    /// # Returns
    /// - `Ok((User, String))` - Created user and its token
    /// - `Err(AppError::BadRequest)` - Validation failed or the email is taken
    pub async fn register(&self, params: RegisterParams) -> Result<(User, String), AppError> {
        let full_name = params.full_name.trim().to_string();
        let email = normalize_email(&params.email);

        if full_name.is_empty() {
            return Err(AppError::BadRequest("Full name required".to_string()));
        }
        if !is_valid_email(&email) {
            return Err(AppError::BadRequest("Valid email required".to_string()));
        }
        validate_password(&params.password)?;

        let role = match params.role.as_deref().filter(|r| !r.is_empty()) {
            Some(raw) => {
                let role: Role = parse_enum("role", raw)?;
                if !SELF_SERVICE_ROLES.contains(&role) {
                    return Err(AppError::BadRequest(format!("Invalid role: {}", raw)));
                }
                role
            }
            None => Role::Student,
        };

        let user_repo = UserRepository::new(self.db);
        if user_repo.email_exists(&email).await? {
            return Err(AppError::BadRequest("User already exists".to_string()));
        }

        let user = user_repo
            .create(CreateUserParams {
                full_name,
                email,
                password_hash: hash_password(&params.password)?,
                role,
                phone: params.phone,
                address: None,
            })
            .await?;

        tracing::info!("Registered user {} as {:?}", user.id, user.role);

        self.mailer.send_welcome(&user.email, &user.full_name).await;

        let token = self.tokens.issue(user.id, user.role)?;

        Ok((user, token))
    }

    /// Verifies credentials, advances the login streak and signs a token.
    ///
    /// # Returns
    /// - `Ok((User, String))` - User with the updated streak and its token
    /// - `Err(AuthError::InvalidCredentials)` - Unknown email or wrong password
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AppError> {
        let user_repo = UserRepository::new(self.db);

        let Some((mut user, password_hash)) = user_repo
            .find_credentials_by_email(&normalize_email(email))
            .await?
        else {
            return Err(AuthError::InvalidCredentials.into());
        };

        if !verify_password(password, &password_hash) {
            return Err(AuthError::InvalidCredentials.into());
        }

        let now = Utc::now();
        let streak = next_streak(
            user.streak_days,
            user.last_login_date.map(|d| d.date_naive()),
            now.date_naive(),
        );
        user_repo.record_login(user.id, streak, now).await?;

        user.streak_days = streak;
        user.last_login_date = Some(now);

        let token = self.tokens.issue(user.id, user.role)?;

        Ok((user, token))
    }

    pub async fn profile(&self, user_id: i32) -> Result<User, AppError> {
        UserRepository::new(self.db)
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Applies a partial update to the caller's own account and re-signs a token.
    ///
    /// Address fields are merged into the stored address object. A changed email must
    /// be valid and unused.
    ///
    /// # Returns
    /// - `Ok((User, String))` - Updated user and a new token
    /// - `Err(AppError::NotFound)` - The account no longer exists
    /// - `Err(AppError::BadRequest)` - Invalid email, taken email or short password
    pub async fn update_account(
        &self,
        user_id: i32,
        params: UpdateOwnAccountParams,
    ) -> Result<(User, String), AppError> {
        let user_repo = UserRepository::new(self.db);
        let current = self.profile(user_id).await?;

        let email = match params.email {
            Some(raw) => {
                let email = normalize_email(&raw);
                if !is_valid_email(&email) {
                    return Err(AppError::BadRequest("Valid email required".to_string()));
                }
                if email != current.email && user_repo.email_exists(&email).await? {
                    return Err(AppError::BadRequest("Email already in use".to_string()));
                }
                Some(email)
            }
            None => None,
        };

        let password_hash = match params.password {
            Some(password) => {
                validate_password(&password)?;
                Some(hash_password(&password)?)
            }
            None => None,
        };

        let address = params
            .address
            .map(|incoming| merge_objects(current.address.clone(), incoming));

        let user = user_repo
            .update(
                user_id,
                UpdateUserParams {
                    full_name: params.full_name,
                    email,
                    password_hash,
                    phone: params.phone,
                    avatar: params.avatar,
                    address,
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let token = self.tokens.issue(user.id, user.role)?;

        Ok((user, token))
    }
}

pub(crate) fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} chars",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Shallow merge of two JSON objects; `incoming` wins. Non-objects replace outright.
fn merge_objects(current: Option<serde_json::Value>, incoming: serde_json::Value) -> serde_json::Value {
    match (current, incoming) {
        (Some(serde_json::Value::Object(mut base)), serde_json::Value::Object(patch)) => {
            base.extend(patch);
            serde_json::Value::Object(base)
        }
        (_, incoming) => incoming,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn address_merge_keeps_existing_keys() {
        let merged = merge_objects(
            Some(json!({ "city": "Pune", "zip": "411001" })),
            json!({ "zip": "411002" }),
        );

        assert_eq!(merged, json!({ "city": "Pune", "zip": "411002" }));
    }

    #[test]
    fn address_merge_without_existing_object() {
        assert_eq!(merge_objects(None, json!({ "a": 1 })), json!({ "a": 1 }));
    }
}
