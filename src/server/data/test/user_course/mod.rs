use crate::server::data::user_course::UserCourseRepository;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod add_completed_lesson;
mod ensure;
