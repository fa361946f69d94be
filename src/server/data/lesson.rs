//! Lesson data repository.
//!
//! Lessons are always listed in `order_index` order, which is also the order a course
//! presents them in.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::lesson::{CreateLessonParams, Lesson, UpdateLessonParams};

pub struct LessonRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> LessonRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, params: CreateLessonParams) -> Result<Lesson, DbErr> {
        let now = Utc::now();
        let entity = entity::lesson::ActiveModel {
            course_id: ActiveValue::Set(params.course_id),
            title: ActiveValue::Set(params.title),
            description: ActiveValue::Set(params.description),
            content: ActiveValue::Set(params.content),
            video_url: ActiveValue::Set(params.video_url),
            duration: ActiveValue::Set(params.duration),
            resources: ActiveValue::Set(params.resources),
            order_index: ActiveValue::Set(params.order_index),
            quiz_id: ActiveValue::Set(params.quiz_id),
            is_published: ActiveValue::Set(params.is_published),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Lesson::from_entity(entity))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Lesson>, DbErr> {
        let entity = entity::prelude::Lesson::find_by_id(id).one(self.db).await?;

        Ok(entity.map(Lesson::from_entity))
    }

    /// Lessons of a course ordered by `order_index`, then ID.
    pub async fn find_by_course(&self, course_id: i32) -> Result<Vec<Lesson>, DbErr> {
        let lessons = entity::prelude::Lesson::find()
            .filter(entity::lesson::Column::CourseId.eq(course_id))
            .order_by_asc(entity::lesson::Column::OrderIndex)
            .order_by_asc(entity::lesson::Column::Id)
            .all(self.db)
            .await?;

        Ok(lessons.into_iter().map(Lesson::from_entity).collect())
    }

    /// Lessons, optionally limited to one course, in presentation order.
    pub async fn list(&self, course_id: Option<i32>) -> Result<Vec<Lesson>, DbErr> {
        let mut query = entity::prelude::Lesson::find();
        if let Some(course_id) = course_id {
            query = query.filter(entity::lesson::Column::CourseId.eq(course_id));
        }

        let lessons = query
            .order_by_asc(entity::lesson::Column::OrderIndex)
            .order_by_asc(entity::lesson::Column::Id)
            .all(self.db)
            .await?;

        Ok(lessons.into_iter().map(Lesson::from_entity).collect())
    }

    /// Lessons for many courses at once, keyed by course and ordered.
    pub async fn find_by_courses(
        &self,
        course_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<Lesson>>, DbErr> {
        let mut map: HashMap<i32, Vec<Lesson>> = HashMap::new();
        if course_ids.is_empty() {
            return Ok(map);
        }

        let lessons = entity::prelude::Lesson::find()
            .filter(entity::lesson::Column::CourseId.is_in(course_ids.iter().copied()))
            .order_by_asc(entity::lesson::Column::OrderIndex)
            .order_by_asc(entity::lesson::Column::Id)
            .all(self.db)
            .await?;

        for lesson in lessons {
            map.entry(lesson.course_id)
                .or_default()
                .push(Lesson::from_entity(lesson));
        }

        Ok(map)
    }

    pub async fn count_by_course(&self, course_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Lesson::find()
            .filter(entity::lesson::Column::CourseId.eq(course_id))
            .count(self.db)
            .await
    }

    pub async fn update(
        &self,
        id: i32,
        params: UpdateLessonParams,
    ) -> Result<Option<Lesson>, DbErr> {
        let Some(entity) = entity::prelude::Lesson::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let mut active = entity.into_active_model();
        if let Some(title) = params.title {
            active.title = ActiveValue::Set(title);
        }
        if let Some(description) = params.description {
            active.description = ActiveValue::Set(description);
        }
        if let Some(content) = params.content {
            active.content = ActiveValue::Set(content);
        }
        if let Some(video_url) = params.video_url {
            active.video_url = ActiveValue::Set(Some(video_url));
        }
        if let Some(duration) = params.duration {
            active.duration = ActiveValue::Set(duration);
        }
        if let Some(resources) = params.resources {
            active.resources = ActiveValue::Set(resources);
        }
        if let Some(order_index) = params.order_index {
            active.order_index = ActiveValue::Set(order_index);
        }
        if let Some(quiz_id) = params.quiz_id {
            active.quiz_id = ActiveValue::Set(Some(quiz_id));
        }
        if let Some(is_published) = params.is_published {
            active.is_published = ActiveValue::Set(is_published);
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let entity = active.update(self.db).await?;

        Ok(Some(Lesson::from_entity(entity)))
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Lesson::delete_by_id(id).exec(self.db).await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete_by_course(&self, course_id: i32) -> Result<(), DbErr> {
        entity::prelude::Lesson::delete_many()
            .filter(entity::lesson::Column::CourseId.eq(course_id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Detaches a deleted quiz from every lesson that referenced it.
    pub async fn clear_quiz(&self, quiz_id: i32) -> Result<(), DbErr> {
        entity::prelude::Lesson::update_many()
            .col_expr(entity::lesson::Column::QuizId, Expr::value(Option::<i32>::None))
            .filter(entity::lesson::Column::QuizId.eq(quiz_id))
            .exec(self.db)
            .await?;

        Ok(())
    }
}
