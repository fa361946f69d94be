//! Course data repository for database operations.
//!
//! This module provides the `CourseRepository` for catalog records and the
//! `CourseStudentRepository` for the set of students enrolled in each course. Reviews
//! live in `course_review`.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::course::{Course, CourseFilter, CreateCourseParams, UpdateCourseParams};

pub struct CourseRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CourseRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a new course with a zero rating.
    ///
    /// # Arguments
    /// - `params` - Course fields with the owning instructor
    ///
    /// # Returns
    /// - `Ok(Course)` - The created course
    /// - `Err(DbErr)` - Database error during insert
    pub async fn create(&self, params: CreateCourseParams) -> Result<Course, DbErr> {
        let now = Utc::now();
        let entity = entity::course::ActiveModel {
            title: ActiveValue::Set(params.title),
            description: ActiveValue::Set(params.description),
            instructor_id: ActiveValue::Set(params.instructor_id),
            thumbnail: ActiveValue::Set(params.thumbnail),
            price: ActiveValue::Set(params.price),
            duration: ActiveValue::Set(params.duration),
            level: ActiveValue::Set(params.level),
            category: ActiveValue::Set(params.category),
            rating: ActiveValue::Set(0.0),
            is_published: ActiveValue::Set(params.is_published),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Course::from_entity(entity))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Course>, DbErr> {
        let entity = entity::prelude::Course::find_by_id(id).one(self.db).await?;

        Ok(entity.map(Course::from_entity))
    }

    /// Fetches courses by a set of IDs in a single query.
    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<HashMap<i32, Course>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let courses = entity::prelude::Course::find()
            .filter(entity::course::Column::Id.is_in(ids.iter().copied()))
            .all(self.db)
            .await?;

        Ok(courses
            .into_iter()
            .map(|c| (c.id, Course::from_entity(c)))
            .collect())
    }

    /// Gets one page of courses matching the filter, newest first.
    ///
    /// # Arguments
    /// - `filter` - Keyword over title and description, category and instructor
    /// - `page` - Zero-indexed page number
    /// - `per_page` - Number of courses per page
    ///
    /// # Returns
    /// - `Ok((Vec<Course>, u64))` - Courses for the page and total matching count
    /// - `Err(DbErr)` - Database error during query
    pub async fn get_paginated(
        &self,
        filter: &CourseFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Course>, u64), DbErr> {
        let paginator = entity::prelude::Course::find()
            .filter(Self::condition(filter))
            .order_by_desc(entity::course::Column::CreatedAt)
            .order_by_desc(entity::course::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let courses = paginator.fetch_page(page).await?;

        Ok((courses.into_iter().map(Course::from_entity).collect(), total))
    }

    /// Lists courses by offset and limit, newest first.
    pub async fn list(
        &self,
        filter: &CourseFilter,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Course>, u64), DbErr> {
        let query = entity::prelude::Course::find().filter(Self::condition(filter));
        let total = query.clone().count(self.db).await?;
        let courses = query
            .order_by_desc(entity::course::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db)
            .await?;

        Ok((courses.into_iter().map(Course::from_entity).collect(), total))
    }

    pub async fn find_by_instructor(&self, instructor_id: i32) -> Result<Vec<Course>, DbErr> {
        let courses = entity::prelude::Course::find()
            .filter(entity::course::Column::InstructorId.eq(instructor_id))
            .order_by_desc(entity::course::Column::CreatedAt)
            .all(self.db)
            .await?;

        Ok(courses.into_iter().map(Course::from_entity).collect())
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        entity::prelude::Course::find().count(self.db).await
    }

    /// Applies a partial update. Only `Some` fields are written.
    ///
    /// # Returns
    /// - `Ok(Some(Course))` - Updated course
    /// - `Ok(None)` - No course with that ID
    /// - `Err(DbErr)` - Database error during update
    pub async fn update(
        &self,
        id: i32,
        params: UpdateCourseParams,
    ) -> Result<Option<Course>, DbErr> {
        let Some(entity) = entity::prelude::Course::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let mut active = entity.into_active_model();
        if let Some(title) = params.title {
            active.title = ActiveValue::Set(title);
        }
        if let Some(description) = params.description {
            active.description = ActiveValue::Set(description);
        }
        if let Some(category) = params.category {
            active.category = ActiveValue::Set(category);
        }
        if let Some(level) = params.level {
            active.level = ActiveValue::Set(level);
        }
        if let Some(price) = params.price {
            active.price = ActiveValue::Set(price);
        }
        if let Some(duration) = params.duration {
            active.duration = ActiveValue::Set(duration);
        }
        if let Some(thumbnail) = params.thumbnail {
            active.thumbnail = ActiveValue::Set(thumbnail);
        }
        if let Some(is_published) = params.is_published {
            active.is_published = ActiveValue::Set(is_published);
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let entity = active.update(self.db).await?;

        Ok(Some(Course::from_entity(entity)))
    }

    pub async fn set_rating(&self, id: i32, rating: f64) -> Result<(), DbErr> {
        let Some(entity) = entity::prelude::Course::find_by_id(id).one(self.db).await? else {
            return Ok(());
        };

        let mut active = entity.into_active_model();
        active.rating = ActiveValue::Set(rating);
        active.updated_at = ActiveValue::Set(Utc::now());
        active.update(self.db).await?;

        Ok(())
    }

    /// Deletes a course row. Callers clear dependent rows first.
    ///
    /// # Returns
    /// - `Ok(true)` - A row was deleted
    /// - `Ok(false)` - No course with that ID
    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Course::delete_by_id(id).exec(self.db).await?;

        Ok(result.rows_affected > 0)
    }

    fn condition(filter: &CourseFilter) -> Condition {
        let mut condition = Condition::all();
        if let Some(keyword) = filter.keyword.as_deref().filter(|k| !k.is_empty()) {
            condition = condition.add(
                Condition::any()
                    .add(entity::course::Column::Title.contains(keyword))
                    .add(entity::course::Column::Description.contains(keyword)),
            );
        }
        if let Some(category) = filter.category.as_deref() {
            condition = condition.add(entity::course::Column::Category.eq(category));
        }
        if let Some(instructor_id) = filter.instructor_id {
            condition = condition.add(entity::course::Column::InstructorId.eq(instructor_id));
        }
        condition
    }
}

/// Repository for the students-in-course set.
pub struct CourseStudentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CourseStudentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Adds a student to a course unless already present.
    ///
    /// # Returns
    /// - `Ok(true)` - Row inserted
    /// - `Ok(false)` - Student was already in the set
    /// - `Err(DbErr)` - Database error
    pub async fn add(&self, course_id: i32, user_id: i32) -> Result<bool, DbErr> {
        if self.contains(course_id, user_id).await? {
            return Ok(false);
        }

        entity::course_student::ActiveModel {
            course_id: ActiveValue::Set(course_id),
            user_id: ActiveValue::Set(user_id),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(true)
    }

    pub async fn contains(&self, course_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::CourseStudent::find()
            .filter(entity::course_student::Column::CourseId.eq(course_id))
            .filter(entity::course_student::Column::UserId.eq(user_id))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    pub async fn remove(&self, course_id: i32, user_id: i32) -> Result<(), DbErr> {
        entity::prelude::CourseStudent::delete_many()
            .filter(entity::course_student::Column::CourseId.eq(course_id))
            .filter(entity::course_student::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Student IDs of a course in enrollment order.
    pub async fn student_ids(&self, course_id: i32) -> Result<Vec<i32>, DbErr> {
        let rows = entity::prelude::CourseStudent::find()
            .filter(entity::course_student::Column::CourseId.eq(course_id))
            .order_by_asc(entity::course_student::Column::Id)
            .all(self.db)
            .await?;

        Ok(rows.into_iter().map(|r| r.user_id).collect())
    }

    /// Student IDs for many courses at once, keyed by course.
    pub async fn student_ids_by_course(
        &self,
        course_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<i32>>, DbErr> {
        let mut map: HashMap<i32, Vec<i32>> = HashMap::new();
        if course_ids.is_empty() {
            return Ok(map);
        }

        let rows = entity::prelude::CourseStudent::find()
            .filter(entity::course_student::Column::CourseId.is_in(course_ids.iter().copied()))
            .order_by_asc(entity::course_student::Column::Id)
            .all(self.db)
            .await?;

        for row in rows {
            map.entry(row.course_id).or_default().push(row.user_id);
        }

        Ok(map)
    }

    pub async fn delete_by_course(&self, course_id: i32) -> Result<(), DbErr> {
        entity::prelude::CourseStudent::delete_many()
            .filter(entity::course_student::Column::CourseId.eq(course_id))
            .exec(self.db)
            .await?;

        Ok(())
    }
}
