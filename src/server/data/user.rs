//! User data repository for database operations.
//!
//! This module provides the `UserRepository` for managing account records, their
//! sub-admin permission rows and the learning counters kept on the user row. Entity
//! models are converted to `User` domain models at this boundary; the password hash is
//! only ever returned by `find_credentials_by_email`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::Role;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::user::{
    CreateUserParams, UpdateUserParams, User, UserFilter, WeeklyStats,
};

/// Repository providing database operations for user management.
///
/// Generic over the connection so the same methods run on a pooled connection or
/// inside a transaction.
pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// - `db` - Database connection or open transaction
    ///
    /// # Returns
    /// - `UserRepository` - New repository instance
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a new account with zeroed counters.
    ///
    /// The email is lower-cased before insert. Fails with a unique constraint error
    /// when the email is already registered.
    ///
    /// # Arguments
    /// - `params` - Name, email, password hash, role and optional contact details
    ///
    /// # Returns
    /// - `Ok(User)` - The created user
    /// - `Err(DbErr)` - Database error during insert
    pub async fn create(&self, params: CreateUserParams) -> Result<User, DbErr> {
        let now = Utc::now();
        let entity = entity::user::ActiveModel {
            full_name: ActiveValue::Set(params.full_name),
            email: ActiveValue::Set(params.email.trim().to_lowercase()),
            password_hash: ActiveValue::Set(params.password_hash),
            role: ActiveValue::Set(params.role),
            status: ActiveValue::Set(entity::sea_orm_active_enums::UserStatus::Active),
            phone: ActiveValue::Set(params.phone),
            bio: ActiveValue::Set(None),
            location: ActiveValue::Set(None),
            avatar: ActiveValue::Set(None),
            address: ActiveValue::Set(params.address),
            streak_days: ActiveValue::Set(0),
            last_login_date: ActiveValue::Set(None),
            total_hours_learned: ActiveValue::Set(0.0),
            weekly_attended: ActiveValue::Set(0),
            weekly_study_hours: ActiveValue::Set(0.0),
            weekly_upcoming: ActiveValue::Set(0),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(User::from_entity(entity))
    }

    /// Finds a user by ID.
    ///
    /// # Returns
    /// - `Ok(Some(User))` - User found
    /// - `Ok(None)` - No user with that ID
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find_by_id(id).one(self.db).await?;

        Ok(entity.map(User::from_entity))
    }

    /// Finds a user by email, compared lower-cased.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity))
    }

    /// Finds a user together with their stored password hash for login.
    ///
    /// # Returns
    /// - `Ok(Some((User, String)))` - User and password hash
    /// - `Ok(None)` - Email not registered
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.db)
            .await?;

        Ok(entity.map(|e| {
            let hash = e.password_hash.clone();
            (User::from_entity(e), hash)
        }))
    }

    /// Fetches users by a set of IDs in a single query.
    ///
    /// # Returns
    /// - `Ok(HashMap<i32, User>)` - Users keyed by ID; missing IDs are absent
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<HashMap<i32, User>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = entity::prelude::User::find()
            .filter(entity::user::Column::Id.is_in(ids.iter().copied()))
            .all(self.db)
            .await?;

        Ok(users
            .into_iter()
            .map(|u| (u.id, User::from_entity(u)))
            .collect())
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email.trim().to_lowercase()))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Applies a partial update. Only `Some` fields are written.
    ///
    /// # Returns
    /// - `Ok(Some(User))` - Updated user
    /// - `Ok(None)` - No user with that ID
    /// - `Err(DbErr)` - Database error during update
    pub async fn update(&self, id: i32, params: UpdateUserParams) -> Result<Option<User>, DbErr> {
        let Some(entity) = entity::prelude::User::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let mut active = entity.into_active_model();
        if let Some(full_name) = params.full_name {
            active.full_name = ActiveValue::Set(full_name);
        }
        if let Some(email) = params.email {
            active.email = ActiveValue::Set(email.trim().to_lowercase());
        }
        if let Some(password_hash) = params.password_hash {
            active.password_hash = ActiveValue::Set(password_hash);
        }
        if let Some(role) = params.role {
            active.role = ActiveValue::Set(role);
        }
        if let Some(status) = params.status {
            active.status = ActiveValue::Set(status);
        }
        if let Some(phone) = params.phone {
            active.phone = ActiveValue::Set(Some(phone));
        }
        if let Some(bio) = params.bio {
            active.bio = ActiveValue::Set(Some(bio));
        }
        if let Some(location) = params.location {
            active.location = ActiveValue::Set(Some(location));
        }
        if let Some(avatar) = params.avatar {
            active.avatar = ActiveValue::Set(Some(avatar));
        }
        if let Some(address) = params.address {
            active.address = ActiveValue::Set(Some(address));
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let entity = active.update(self.db).await?;

        Ok(Some(User::from_entity(entity)))
    }

    /// Records a login: stamps the login time and stores the recomputed streak.
    pub async fn record_login(
        &self,
        id: i32,
        streak_days: i32,
        at: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        let Some(entity) = entity::prelude::User::find_by_id(id).one(self.db).await? else {
            return Ok(());
        };

        let mut active = entity.into_active_model();
        active.streak_days = ActiveValue::Set(streak_days);
        active.last_login_date = ActiveValue::Set(Some(at));
        active.update(self.db).await?;

        Ok(())
    }

    /// Adds study hours to the user's lifetime total.
    pub async fn add_hours_learned(&self, id: i32, hours: f64) -> Result<(), DbErr> {
        let Some(entity) = entity::prelude::User::find_by_id(id).one(self.db).await? else {
            return Ok(());
        };

        let total = entity.total_hours_learned + hours;
        let mut active = entity.into_active_model();
        active.total_hours_learned = ActiveValue::Set(total);
        active.updated_at = ActiveValue::Set(Utc::now());
        active.update(self.db).await?;

        Ok(())
    }

    pub async fn set_weekly_stats(
        &self,
        id: i32,
        stats: WeeklyStats,
    ) -> Result<Option<User>, DbErr> {
        let Some(entity) = entity::prelude::User::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let mut active = entity.into_active_model();
        active.weekly_attended = ActiveValue::Set(stats.attended);
        active.weekly_study_hours = ActiveValue::Set(stats.study_hours);
        active.weekly_upcoming = ActiveValue::Set(stats.upcoming);
        active.updated_at = ActiveValue::Set(Utc::now());
        let entity = active.update(self.db).await?;

        Ok(Some(User::from_entity(entity)))
    }

    /// Deletes a user. Child rows follow the foreign key cascades.
    ///
    /// # Returns
    /// - `Ok(true)` - A row was deleted
    /// - `Ok(false)` - No user with that ID
    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::User::delete_by_id(id).exec(self.db).await?;

        Ok(result.rows_affected > 0)
    }

    /// Lists users matching the filter, newest first.
    ///
    /// # Arguments
    /// - `filter` - Optional role, status and name/email search
    /// - `offset` - Rows to skip
    /// - `limit` - Maximum rows to return
    ///
    /// # Returns
    /// - `Ok((Vec<User>, u64))` - Page of users and total matching count
    /// - `Err(DbErr)` - Database error during query
    pub async fn list(
        &self,
        filter: &UserFilter,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<User>, u64), DbErr> {
        let mut condition = Condition::all();
        if let Some(role) = filter.role {
            condition = condition.add(entity::user::Column::Role.eq(role));
        }
        if let Some(status) = filter.status {
            condition = condition.add(entity::user::Column::Status.eq(status));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            condition = condition.add(
                Condition::any()
                    .add(entity::user::Column::FullName.contains(search))
                    .add(entity::user::Column::Email.contains(search.to_lowercase())),
            );
        }

        let query = entity::prelude::User::find().filter(condition);
        let total = query.clone().count(self.db).await?;
        let users = query
            .order_by_desc(entity::user::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db)
            .await?;

        Ok((users.into_iter().map(User::from_entity).collect(), total))
    }

    /// Lists every user holding `role`, newest first.
    pub async fn list_by_role(&self, role: Role) -> Result<Vec<User>, DbErr> {
        let users = entity::prelude::User::find()
            .filter(entity::user::Column::Role.eq(role))
            .order_by_desc(entity::user::Column::CreatedAt)
            .all(self.db)
            .await?;

        Ok(users.into_iter().map(User::from_entity).collect())
    }

    pub async fn count_by_role(&self, role: Role) -> Result<u64, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::Role.eq(role))
            .count(self.db)
            .await
    }

    /// Returns the capability names held by a user.
    pub async fn permissions(&self, user_id: i32) -> Result<Vec<String>, DbErr> {
        let rows = entity::prelude::UserPermission::find()
            .filter(entity::user_permission::Column::UserId.eq(user_id))
            .order_by_asc(entity::user_permission::Column::Permission)
            .all(self.db)
            .await?;

        Ok(rows.into_iter().map(|r| r.permission).collect())
    }

    pub async fn has_permission(&self, user_id: i32, permission: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::UserPermission::find()
            .filter(entity::user_permission::Column::UserId.eq(user_id))
            .filter(entity::user_permission::Column::Permission.eq(permission))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Replaces the permission set of a user.
    ///
    /// Duplicate names in `permissions` are written once.
    pub async fn set_permissions(&self, user_id: i32, permissions: &[String]) -> Result<(), DbErr> {
        entity::prelude::UserPermission::delete_many()
            .filter(entity::user_permission::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;

        let mut seen: Vec<&str> = Vec::with_capacity(permissions.len());
        for permission in permissions {
            if seen.contains(&permission.as_str()) {
                continue;
            }
            seen.push(permission);

            entity::user_permission::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                permission: ActiveValue::Set(permission.clone()),
                ..Default::default()
            }
            .insert(self.db)
            .await?;
        }

        Ok(())
    }
}
