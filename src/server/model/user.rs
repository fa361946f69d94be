//! User domain models and parameters.
//!
//! Provides the authenticated user model shared by every gate and service, along with
//! parameter types for account creation and partial profile updates.

use chrono::{DateTime, NaiveDate, Utc};
use entity::sea_orm_active_enums::{Role, UserStatus};

use crate::{
    model::{
        api::UserSummaryDto,
        user::{
            AuthUserDto, ProfileSummaryDto, StreakDto, UserDto, UserProfileDto, WeeklyStatsDto,
        },
    },
    server::model::enum_name,
};

/// Account with profile and learning counters.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub full_name: String,
    /// Always lower-cased.
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar: Option<String>,
    pub address: Option<serde_json::Value>,
    pub streak_days: i32,
    pub last_login_date: Option<DateTime<Utc>>,
    pub total_hours_learned: f64,
    pub weekly_stats: WeeklyStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Converts an entity model to a user domain model at the repository boundary.
    ///
    /// The password hash never leaves the data layer.
    pub fn from_entity(entity: entity::user::Model) -> Self {
        Self {
            id: entity.id,
            full_name: entity.full_name,
            email: entity.email,
            role: entity.role,
            status: entity.status,
            phone: entity.phone,
            bio: entity.bio,
            location: entity.location,
            avatar: entity.avatar,
            address: entity.address,
            streak_days: entity.streak_days,
            last_login_date: entity.last_login_date,
            total_hours_learned: entity.total_hours_learned,
            weekly_stats: WeeklyStats {
                attended: entity.weekly_attended,
                study_hours: entity.weekly_study_hours,
                upcoming: entity.weekly_upcoming,
            },
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn into_dto(self) -> UserDto {
        UserDto {
            id: self.id,
            full_name: self.full_name,
            email: self.email,
            role: enum_name(&self.role),
            status: enum_name(&self.status),
            phone: self.phone,
            bio: self.bio,
            location: self.location,
            avatar: self.avatar,
            address: self.address,
            streak_days: self.streak_days,
            last_login_date: self.last_login_date,
            total_hours_learned: self.total_hours_learned,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn to_summary(&self) -> UserSummaryDto {
        UserSummaryDto {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
        }
    }

    /// Pairs the user with a freshly signed token.
    pub fn into_auth_dto(self, token: String) -> AuthUserDto {
        AuthUserDto {
            id: self.id,
            full_name: self.full_name,
            email: self.email,
            role: enum_name(&self.role),
            token,
        }
    }

    pub fn into_profile_summary(self) -> ProfileSummaryDto {
        ProfileSummaryDto {
            id: self.id,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            role: enum_name(&self.role),
            avatar: self.avatar,
            created_at: self.created_at,
        }
    }

    pub fn into_profile_dto(self, stats: ProfileStats) -> UserProfileDto {
        UserProfileDto {
            id: self.id,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            location: self.location,
            bio: self.bio,
            role: enum_name(&self.role),
            created_at: self.created_at,
            avatar: self.avatar,
            streak_days: self.streak_days,
            stats: stats.into_dto(),
        }
    }

    pub fn streak_dto(&self) -> StreakDto {
        StreakDto {
            streak_days: self.streak_days,
            last_login_date: self.last_login_date,
        }
    }
}

/// Self-reported counters for the current week.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeeklyStats {
    pub attended: i32,
    pub study_hours: f64,
    pub upcoming: i32,
}

impl WeeklyStats {
    pub fn into_dto(self) -> WeeklyStatsDto {
        WeeklyStatsDto {
            attended: self.attended,
            study_hours: self.study_hours,
            upcoming: self.upcoming,
        }
    }

    pub fn from_dto(dto: WeeklyStatsDto) -> Self {
        Self {
            attended: dto.attended.max(0),
            study_hours: if dto.study_hours.is_finite() {
                dto.study_hours
            } else {
                0.0
            },
            upcoming: dto.upcoming.max(0),
        }
    }
}

/// Computes the login streak after a login on `today`.
///
/// First login starts at 0, a second login the same day keeps the streak, a login on
/// the following day extends it by one and any longer gap restarts it at 1.
///
/// # Arguments
/// - `current` - Streak stored on the user
/// - `last_login` - Calendar day of the previous login, if any
/// - `today` - Calendar day of this login
pub fn next_streak(current: i32, last_login: Option<NaiveDate>, today: NaiveDate) -> i32 {
    match last_login {
        None => 0,
        Some(last) if last == today => current,
        Some(last) if last.succ_opt() == Some(today) => current + 1,
        Some(_) => 1,
    }
}

/// Self-service registration input. The role is validated by the auth service.
#[derive(Debug, Clone)]
pub struct RegisterParams {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
    pub phone: Option<String>,
}

impl RegisterParams {
    pub fn from_dto(dto: crate::model::user::RegisterDto) -> Self {
        Self {
            full_name: dto.full_name,
            email: dto.email,
            password: dto.password,
            role: dto.role,
            phone: None,
        }
    }
}

/// Partial update of the caller's own account. Empty strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct UpdateOwnAccountParams {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub address: Option<serde_json::Value>,
    pub password: Option<String>,
}

impl UpdateOwnAccountParams {
    pub fn from_dto(dto: crate::model::user::UpdateAuthProfileDto) -> Self {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            full_name: present(dto.full_name),
            email: present(dto.email),
            phone: present(dto.phone),
            avatar: present(dto.avatar),
            address: dto.address,
            password: present(dto.password),
        }
    }
}

/// Learning counters shown on the profile page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileStats {
    pub total_courses: u64,
    pub hours_learned: f64,
    pub achievements_count: u64,
    /// Rounded mean completion across enrolled courses.
    pub average_score: i32,
}

impl ProfileStats {
    pub fn into_dto(self) -> crate::model::user::ProfileStatsDto {
        crate::model::user::ProfileStatsDto {
            total_courses: self.total_courses,
            hours_learned: self.hours_learned,
            achievements_count: self.achievements_count,
            average_score: self.average_score,
        }
    }
}

/// Parameters for inserting a new account.
#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub full_name: String,
    /// Lower-cased by the repository before insert.
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<serde_json::Value>,
}

/// Partial update of an account. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserParams {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar: Option<String>,
    pub address: Option<serde_json::Value>,
}

/// Filters for the administrative user listing.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
    /// Case-insensitive substring over name and email.
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    #[test]
    fn first_login_starts_at_zero() {
        assert_eq!(next_streak(0, None, day(5)), 0);
    }

    #[test]
    fn same_day_login_keeps_streak() {
        assert_eq!(next_streak(3, Some(day(5)), day(5)), 3);
    }

    #[test]
    fn next_day_login_extends_streak() {
        assert_eq!(next_streak(3, Some(day(4)), day(5)), 4);
    }

    #[test]
    fn gap_restarts_streak() {
        assert_eq!(next_streak(7, Some(day(1)), day(5)), 1);
    }
}
