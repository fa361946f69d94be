use sea_orm::DatabaseConnection;

use crate::{
    model::achievement::LeaderboardEntryDto,
    server::{
        data::{
            achievement::AchievementRepository, course::CourseRepository, user::UserRepository,
        },
        error::AppError,
        model::{
            achievement::{Achievement, CreateAchievementParams},
            user::User,
        },
    },
};

pub const RECENT_LIMIT: u64 = 5;
pub const LEADERBOARD_SIZE: usize = 10;

pub struct AchievementService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AchievementService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Awards an achievement to a user.
    ///
    /// # Returns
    /// - `Ok(Achievement)` - The stored award
    /// - `Err(AppError::NotFound)` - Recipient or course does not exist
    pub async fn create(&self, params: CreateAchievementParams) -> Result<Achievement, AppError> {
        UserRepository::new(self.db)
            .find_by_id(params.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        if let Some(course_id) = params.course_id {
            CourseRepository::new(self.db)
                .find_by_id(course_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
        }

        let achievement = AchievementRepository::new(self.db).create(params).await?;

        tracing::info!(
            "Achievement {} '{}' awarded to user {}",
            achievement.id,
            achievement.title,
            achievement.user_id
        );

        Ok(achievement)
    }

    /// The caller's achievements, newest first, with course titles.
    pub async fn mine(&self, user_id: i32) -> Result<Vec<Achievement>, AppError> {
        let achievements = AchievementRepository::new(self.db)
            .find_by_user(user_id)
            .await?;

        self.attach_refs(achievements, false).await
    }

    /// The five most recently earned achievements across all users.
    pub async fn recent(&self) -> Result<Vec<Achievement>, AppError> {
        let achievements = AchievementRepository::new(self.db)
            .recent(RECENT_LIMIT)
            .await?;

        self.attach_refs(achievements, true).await
    }

    pub async fn points(&self, user_id: i32) -> Result<i64, AppError> {
        Ok(AchievementRepository::new(self.db)
            .total_points(user_id)
            .await?)
    }

    /// Top users by total points with their summaries attached.
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntryDto>, AppError> {
        let ranked = AchievementRepository::new(self.db)
            .leaderboard(LEADERBOARD_SIZE)
            .await?;

        let user_ids: Vec<i32> = ranked.iter().map(|(id, _)| *id).collect();
        let users = UserRepository::new(self.db).find_by_ids(&user_ids).await?;

        Ok(ranked
            .into_iter()
            .map(|(user_id, total_points)| LeaderboardEntryDto {
                user: users.get(&user_id).map(User::to_summary),
                total_points,
            })
            .collect())
    }

    async fn attach_refs(
        &self,
        achievements: Vec<Achievement>,
        with_users: bool,
    ) -> Result<Vec<Achievement>, AppError> {
        let course_ids: Vec<i32> = achievements.iter().filter_map(|a| a.course_id).collect();
        let courses = CourseRepository::new(self.db)
            .find_by_ids(&course_ids)
            .await?;

        let users = if with_users {
            let user_ids: Vec<i32> = achievements.iter().map(|a| a.user_id).collect();
            UserRepository::new(self.db).find_by_ids(&user_ids).await?
        } else {
            Default::default()
        };

        Ok(achievements
            .into_iter()
            .map(|a| {
                let user = users.get(&a.user_id).map(User::to_summary);
                let course = a
                    .course_id
                    .and_then(|id| courses.get(&id))
                    .map(|c| c.to_ref());
                a.with_refs(user, course)
            })
            .collect())
    }
}
