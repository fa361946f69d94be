use sea_orm::entity::prelude::*;

/// Lesson completed within a `user_course`, unique per pair.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_course_lesson")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_course_id: i32,
    pub lesson_id: i32,
    pub completed_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_course::Entity",
        from = "Column::UserCourseId",
        to = "super::user_course::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    UserCourse,
    #[sea_orm(
        belongs_to = "super::lesson::Entity",
        from = "Column::LessonId",
        to = "super::lesson::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Lesson,
}

impl Related<super::user_course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserCourse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
