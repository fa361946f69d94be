use sea_orm::entity::prelude::*;

use crate::sea_orm_active_enums::{Role, UserStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub full_name: String,
    /// Stored lower-cased.
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub status: UserStatus,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar: Option<String>,
    pub address: Option<Json>,
    pub streak_days: i32,
    pub last_login_date: Option<DateTimeUtc>,
    pub total_hours_learned: f64,
    pub weekly_attended: i32,
    pub weekly_study_hours: f64,
    pub weekly_upcoming: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_permission::Entity")]
    UserPermission,
    #[sea_orm(has_many = "super::user_course::Entity")]
    UserCourse,
    #[sea_orm(has_many = "super::achievement::Entity")]
    Achievement,
}

impl Related<super::user_permission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserPermission.def()
    }
}

impl Related<super::user_course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserCourse.def()
    }
}

impl Related<super::achievement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Achievement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
