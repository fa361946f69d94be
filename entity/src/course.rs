use sea_orm::entity::prelude::*;

use crate::sea_orm_active_enums::CourseLevel;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "course")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub instructor_id: i32,
    pub thumbnail: String,
    pub price: f64,
    pub duration: String,
    pub level: CourseLevel,
    pub category: String,
    /// Mean of all review ratings, 0 when unreviewed.
    pub rating: f64,
    pub is_published: bool,
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
    #[sea_orm(has_many = "super::lesson::Entity")]
    Lesson,
    #[sea_orm(has_many = "super::course_review::Entity")]
    CourseReview,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instructor.def()
    }
}

impl Related<super::lesson::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lesson.def()
    }
}

impl Related<super::course_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseReview.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
