pub use sea_orm_migration::prelude::*;

mod m20260105_000001_create_user_table;
mod m20260105_000002_create_user_permission_table;
mod m20260105_000003_create_parent_child_table;
mod m20260105_000004_create_course_table;
mod m20260105_000005_create_course_review_table;
mod m20260105_000006_create_course_student_table;
mod m20260105_000007_create_lesson_table;
mod m20260105_000008_create_quiz_table;
mod m20260105_000009_create_quiz_question_table;
mod m20260105_000010_create_quiz_attempt_table;
mod m20260105_000011_create_assignment_table;
mod m20260106_000012_create_event_table;
mod m20260106_000013_create_event_student_table;
mod m20260106_000014_create_payment_table;
mod m20260106_000015_create_enrollment_table;
mod m20260106_000016_create_user_course_table;
mod m20260106_000017_create_user_course_lesson_table;
mod m20260107_000018_create_achievement_table;
mod m20260107_000019_create_activity_log_table;
mod m20260107_000020_create_feature_flag_table;
mod m20260107_000021_create_announcement_table;
mod m20260107_000022_create_ai_interaction_table;
mod m20260112_000023_add_quiz_to_lesson;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_000001_create_user_table::Migration),
            Box::new(m20260105_000002_create_user_permission_table::Migration),
            Box::new(m20260105_000003_create_parent_child_table::Migration),
            Box::new(m20260105_000004_create_course_table::Migration),
            Box::new(m20260105_000005_create_course_review_table::Migration),
            Box::new(m20260105_000006_create_course_student_table::Migration),
            Box::new(m20260105_000007_create_lesson_table::Migration),
            Box::new(m20260105_000008_create_quiz_table::Migration),
            Box::new(m20260105_000009_create_quiz_question_table::Migration),
            Box::new(m20260105_000010_create_quiz_attempt_table::Migration),
            Box::new(m20260105_000011_create_assignment_table::Migration),
            Box::new(m20260106_000012_create_event_table::Migration),
            Box::new(m20260106_000013_create_event_student_table::Migration),
            Box::new(m20260106_000014_create_payment_table::Migration),
            Box::new(m20260106_000015_create_enrollment_table::Migration),
            Box::new(m20260106_000016_create_user_course_table::Migration),
            Box::new(m20260106_000017_create_user_course_lesson_table::Migration),
            Box::new(m20260107_000018_create_achievement_table::Migration),
            Box::new(m20260107_000019_create_activity_log_table::Migration),
            Box::new(m20260107_000020_create_feature_flag_table::Migration),
            Box::new(m20260107_000021_create_announcement_table::Migration),
            Box::new(m20260107_000022_create_ai_interaction_table::Migration),
            Box::new(m20260112_000023_add_quiz_to_lesson::Migration),
        ]
    }
}
