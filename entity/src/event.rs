use sea_orm::entity::prelude::*;

use crate::sea_orm_active_enums::{EventStatus, EventType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub instructor_id: i32,
    pub event_type: EventType,
    pub date: DateTimeUtc,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub max_students: i32,
    pub status: EventStatus,
    pub course_id: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::InstructorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Instructor,
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Course,
    #[sea_orm(has_many = "super::event_student::Entity")]
    EventStudent,
}

impl Related<super::event_student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventStudent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
