use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::course::CourseReview;

pub struct CourseReviewRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CourseReviewRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        course_id: i32,
        user_id: i32,
        rating: i32,
        comment: Option<String>,
    ) -> Result<CourseReview, DbErr> {
        let entity = entity::course_review::ActiveModel {
            course_id: ActiveValue::Set(course_id),
            user_id: ActiveValue::Set(user_id),
            rating: ActiveValue::Set(rating),
            comment: ActiveValue::Set(comment),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(CourseReview::from_entity(entity))
    }

    pub async fn exists(&self, course_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::CourseReview::find()
            .filter(entity::course_review::Column::CourseId.eq(course_id))
            .filter(entity::course_review::Column::UserId.eq(user_id))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Reviews of a course, oldest first.
    pub async fn find_by_course(&self, course_id: i32) -> Result<Vec<CourseReview>, DbErr> {
        let reviews = entity::prelude::CourseReview::find()
            .filter(entity::course_review::Column::CourseId.eq(course_id))
            .order_by_asc(entity::course_review::Column::CreatedAt)
            .all(self.db)
            .await?;

        Ok(reviews.into_iter().map(CourseReview::from_entity).collect())
    }

    /// Mean rating of a course, 0 when it has no reviews.
    pub async fn average_rating(&self, course_id: i32) -> Result<f64, DbErr> {
        let ratings: Vec<i32> = entity::prelude::CourseReview::find()
            .filter(entity::course_review::Column::CourseId.eq(course_id))
            .all(self.db)
            .await?
            .into_iter()
            .map(|r| r.rating)
            .collect();

        if ratings.is_empty() {
            return Ok(0.0);
        }

        Ok(ratings.iter().map(|r| *r as f64).sum::<f64>() / ratings.len() as f64)
    }

    pub async fn delete_by_course(&self, course_id: i32) -> Result<(), DbErr> {
        entity::prelude::CourseReview::delete_many()
            .filter(entity::course_review::Column::CourseId.eq(course_id))
            .exec(self.db)
            .await?;

        Ok(())
    }
}
