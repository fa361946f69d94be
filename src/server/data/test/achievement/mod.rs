use crate::server::{data::achievement::AchievementRepository, model::achievement::CreateAchievementParams};
use entity::sea_orm_active_enums::AchievementType;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod has_course_completion;
mod leaderboard;

fn award(user_id: i32, points: i32) -> CreateAchievementParams {
    CreateAchievementParams {
        user_id,
        title: "Quiz Ace".to_string(),
        description: "Scored full marks".to_string(),
        achievement_type: AchievementType::AssessmentScore,
        points,
        course_id: None,
        icon: "trophy".to_string(),
    }
}
