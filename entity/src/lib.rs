//! SeaORM entities for the learning platform.

pub mod prelude;

pub mod achievement;
pub mod activity_log;
pub mod ai_interaction;
pub mod announcement;
pub mod assignment;
pub mod course;
pub mod course_review;
pub mod course_student;
pub mod enrollment;
pub mod event;
pub mod event_student;
pub mod feature_flag;
pub mod lesson;
pub mod parent_child;
pub mod payment;
pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_question;
pub mod sea_orm_active_enums;
pub mod user;
pub mod user_course;
pub mod user_course_lesson;
pub mod user_permission;
