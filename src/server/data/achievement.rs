use chrono::Utc;
use entity::sea_orm_active_enums::AchievementType;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::achievement::{Achievement, CreateAchievementParams};

pub struct AchievementRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AchievementRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, params: CreateAchievementParams) -> Result<Achievement, DbErr> {
        let now = Utc::now();
        let entity = entity::achievement::ActiveModel {
            user_id: ActiveValue::Set(params.user_id),
            title: ActiveValue::Set(params.title),
            description: ActiveValue::Set(params.description),
            achievement_type: ActiveValue::Set(params.achievement_type),
            points: ActiveValue::Set(params.points),
            course_id: ActiveValue::Set(params.course_id),
            icon: ActiveValue::Set(params.icon),
            date_earned: ActiveValue::Set(now),
            created_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Achievement::from_entity(entity))
    }

    /// Whether the user already holds the completion award for a course.
    pub async fn has_course_completion(&self, user_id: i32, course_id: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::Achievement::find()
            .filter(entity::achievement::Column::UserId.eq(user_id))
            .filter(entity::achievement::Column::CourseId.eq(course_id))
            .filter(
                entity::achievement::Column::AchievementType.eq(AchievementType::CourseCompletion),
            )
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Achievements of a user, most recently earned first.
    pub async fn find_by_user(&self, user_id: i32) -> Result<Vec<Achievement>, DbErr> {
        self.recent_by_user(user_id, None).await
    }

    /// The most recent achievements of a user, optionally capped.
    pub async fn recent_by_user(
        &self,
        user_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<Achievement>, DbErr> {
        let mut query = entity::prelude::Achievement::find()
            .filter(entity::achievement::Column::UserId.eq(user_id))
            .order_by_desc(entity::achievement::Column::DateEarned)
            .order_by_desc(entity::achievement::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let achievements = query.all(self.db).await?;

        Ok(achievements.into_iter().map(Achievement::from_entity).collect())
    }

    /// The newest achievements across every user.
    pub async fn recent(&self, limit: u64) -> Result<Vec<Achievement>, DbErr> {
        let achievements = entity::prelude::Achievement::find()
            .order_by_desc(entity::achievement::Column::DateEarned)
            .order_by_desc(entity::achievement::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?;

        Ok(achievements.into_iter().map(Achievement::from_entity).collect())
    }

    pub async fn count_by_user(&self, user_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Achievement::find()
            .filter(entity::achievement::Column::UserId.eq(user_id))
            .count(self.db)
            .await
    }

    /// Sum of points earned by a user.
    pub async fn total_points(&self, user_id: i32) -> Result<i64, DbErr> {
        let total: Option<Option<i64>> = entity::prelude::Achievement::find()
            .select_only()
            .column_as(entity::achievement::Column::Points.sum(), "total")
            .filter(entity::achievement::Column::UserId.eq(user_id))
            .into_tuple()
            .one(self.db)
            .await?;

        Ok(total.flatten().unwrap_or(0))
    }

    /// Users ranked by total points, highest first.
    ///
    /// Ties are broken by user ID so the order is stable.
    ///
    /// # Arguments
    /// - `limit` - Number of users to return
    ///
    /// # Returns
    /// - `Ok(Vec<(user_id, total_points)>)` - Ranked users
    /// - `Err(DbErr)` - Database error
    pub async fn leaderboard(&self, limit: usize) -> Result<Vec<(i32, i64)>, DbErr> {
        let points = entity::achievement::Column::Points;

        entity::prelude::Achievement::find()
            .select_only()
            .column(entity::achievement::Column::UserId)
            .column_as(points.sum(), "total")
            .group_by(entity::achievement::Column::UserId)
            .order_by_desc(points.sum())
            .order_by_asc(entity::achievement::Column::UserId)
            .limit(limit as u64)
            .into_tuple()
            .all(self.db)
            .await
    }

    /// Detaches achievements from a course that is being deleted.
    pub async fn clear_course(&self, course_id: i32) -> Result<(), DbErr> {
        let achievements = entity::prelude::Achievement::find()
            .filter(entity::achievement::Column::CourseId.eq(course_id))
            .all(self.db)
            .await?;

        for achievement in achievements {
            let mut active = achievement.into_active_model();
            active.course_id = ActiveValue::Set(None);
            active.update(self.db).await?;
        }

        Ok(())
    }
}
