//! User factory for creating test user entities.
//!
//! Provides factory methods for creating users of any role with sensible defaults.
//! The factory supports customization through a builder pattern.

use crate::factory::helpers::next_id;
use chrono::Utc;
use entity::sea_orm_active_enums::{Role, UserStatus};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test users with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::user::UserFactory;
///
/// let user = UserFactory::new(&db)
///     .full_name("Asha Rao")
///     .role(Role::Parent)
///     .build()
///     .await?;
/// ```
pub struct UserFactory<'a> {
    db: &'a DatabaseConnection,
    full_name: String,
    email: String,
    password_hash: String,
    role: Role,
    status: UserStatus,
}

impl<'a> UserFactory<'a> {
    /// Creates a new UserFactory with default values.
    ///
    /// Defaults:
    /// - full_name: `"User {id}"` where id is auto-incremented
    /// - email: `"user{id}@kavyalearn.test"`
    /// - password_hash: a placeholder that never verifies
    /// - role: `student`
    /// - status: `active`
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    ///
    /// # Returns
    /// - `UserFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            full_name: format!("User {}", id),
            email: format!("user{}@kavyalearn.test", id),
            password_hash: "unusable".to_string(),
            role: Role::Student,
            status: UserStatus::Active,
        }
    }

    /// Sets the display name.
    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    /// Sets the email address. Stored as given, callers pass lower-case.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets a pre-computed password hash.
    pub fn password_hash(mut self, password_hash: impl Into<String>) -> Self {
        self.password_hash = password_hash.into();
        self
    }

    /// Sets the role.
    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Sets the account status.
    pub fn status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    /// Builds and inserts the user entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::user::Model)` - Created user entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::user::Model, DbErr> {
        let now = Utc::now();
        entity::user::ActiveModel {
            id: ActiveValue::NotSet,
            full_name: ActiveValue::Set(self.full_name),
            email: ActiveValue::Set(self.email),
            password_hash: ActiveValue::Set(self.password_hash),
            role: ActiveValue::Set(self.role),
            status: ActiveValue::Set(self.status),
            phone: ActiveValue::Set(None),
            bio: ActiveValue::Set(None),
            location: ActiveValue::Set(None),
            avatar: ActiveValue::Set(None),
            address: ActiveValue::Set(None),
            streak_days: ActiveValue::Set(0),
            last_login_date: ActiveValue::Set(None),
            total_hours_learned: ActiveValue::Set(0.0),
            weekly_attended: ActiveValue::Set(0),
            weekly_study_hours: ActiveValue::Set(0.0),
            weekly_upcoming: ActiveValue::Set(0),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a student with default values.
///
/// Shorthand for `UserFactory::new(db).build().await`.
pub async fn create_user(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).build().await
}

/// Creates a user with the given role.
///
/// # Arguments
/// - `db` - Database connection
/// - `role` - Role of the new user
///
/// # Returns
/// - `Ok(entity::user::Model)` - Created user entity
/// - `Err(DbErr)` - Database error during insert
pub async fn create_user_with_role(
    db: &DatabaseConnection,
    role: Role,
) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).role(role).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use entity::prelude::*;

    #[tokio::test]
    async fn creates_user_with_defaults() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_table(User).build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let user = create_user(db).await?;

        assert!(user.email.ends_with("@kavyalearn.test"));
        assert_eq!(user.role, Role::Student);
        assert_eq!(user.status, UserStatus::Active);
        assert_eq!(user.streak_days, 0);

        Ok(())
    }

    #[tokio::test]
    async fn creates_user_with_custom_values() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_table(User).build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let user = UserFactory::new(db)
            .full_name("Meera Iyer")
            .email("meera@kavyalearn.test")
            .role(Role::SubAdmin)
            .status(UserStatus::Inactive)
            .build()
            .await?;

        assert_eq!(user.full_name, "Meera Iyer");
        assert_eq!(user.email, "meera@kavyalearn.test");
        assert_eq!(user.role, Role::SubAdmin);
        assert_eq!(user.status, UserStatus::Inactive);

        Ok(())
    }

    #[tokio::test]
    async fn creates_multiple_unique_users() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_table(User).build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let user1 = create_user(db).await?;
        let user2 = create_user(db).await?;

        assert_ne!(user1.email, user2.email);
        assert_ne!(user1.id, user2.id);

        Ok(())
    }
}
