//! Event data repository.
//!
//! Events carry their enrolled students as `event_student` rows; every read attaches
//! them so capacity checks see the current set.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::EventStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Select,
};

use crate::server::model::event::{CreateEventParams, Event, UpdateEventParams};

pub struct EventRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EventRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, params: CreateEventParams) -> Result<Event, DbErr> {
        let now = Utc::now();
        let entity = entity::event::ActiveModel {
            title: ActiveValue::Set(params.title),
            instructor_id: ActiveValue::Set(params.instructor_id),
            event_type: ActiveValue::Set(params.event_type),
            date: ActiveValue::Set(params.date),
            start_time: ActiveValue::Set(params.start_time),
            end_time: ActiveValue::Set(params.end_time),
            location: ActiveValue::Set(params.location),
            max_students: ActiveValue::Set(params.max_students),
            status: ActiveValue::Set(EventStatus::Scheduled),
            course_id: ActiveValue::Set(params.course_id),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Event::from_entity(entity, Vec::new()))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Event>, DbErr> {
        let Some(entity) = entity::prelude::Event::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let enrolled = entity::prelude::EventStudent::find()
            .filter(entity::event_student::Column::EventId.eq(id))
            .order_by_asc(entity::event_student::Column::Id)
            .all(self.db)
            .await?;

        Ok(Some(Event::from_entity(entity, enrolled)))
    }

    /// Every event ordered by date.
    pub async fn list(&self) -> Result<Vec<Event>, DbErr> {
        self.load(entity::prelude::Event::find().order_by_asc(entity::event::Column::Date))
            .await
    }

    /// Events the user teaches or is enrolled in, ordered by date.
    pub async fn find_for_user(&self, user_id: i32) -> Result<Vec<Event>, DbErr> {
        let enrolled_ids: Vec<i32> = entity::prelude::EventStudent::find()
            .filter(entity::event_student::Column::UserId.eq(user_id))
            .all(self.db)
            .await?
            .into_iter()
            .map(|e| e.event_id)
            .collect();

        self.load(
            entity::prelude::Event::find()
                .filter(
                    Condition::any()
                        .add(entity::event::Column::InstructorId.eq(user_id))
                        .add(entity::event::Column::Id.is_in(enrolled_ids)),
                )
                .order_by_asc(entity::event::Column::Date),
        )
        .await
    }

    /// Scheduled events dated at or after `now`, soonest first.
    pub async fn upcoming(&self, now: DateTime<Utc>, limit: u64) -> Result<Vec<Event>, DbErr> {
        self.load(
            entity::prelude::Event::find()
                .filter(entity::event::Column::Status.eq(EventStatus::Scheduled))
                .filter(entity::event::Column::Date.gte(now))
                .order_by_asc(entity::event::Column::Date)
                .limit(limit),
        )
        .await
    }

    pub async fn update(&self, id: i32, params: UpdateEventParams) -> Result<Option<Event>, DbErr> {
        let Some(entity) = entity::prelude::Event::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let mut active = entity.into_active_model();
        if let Some(title) = params.title {
            active.title = ActiveValue::Set(title);
        }
        if let Some(event_type) = params.event_type {
            active.event_type = ActiveValue::Set(event_type);
        }
        if let Some(date) = params.date {
            active.date = ActiveValue::Set(date);
        }
        if let Some(start_time) = params.start_time {
            active.start_time = ActiveValue::Set(start_time);
        }
        if let Some(end_time) = params.end_time {
            active.end_time = ActiveValue::Set(end_time);
        }
        if let Some(location) = params.location {
            active.location = ActiveValue::Set(location);
        }
        if let Some(max_students) = params.max_students {
            active.max_students = ActiveValue::Set(max_students);
        }
        if let Some(status) = params.status {
            active.status = ActiveValue::Set(status);
        }
        if let Some(course_id) = params.course_id {
            active.course_id = ActiveValue::Set(Some(course_id));
        }
        active.updated_at = ActiveValue::Set(Utc::now());
        active.update(self.db).await?;

        self.find_by_id(id).await
    }

    /// Adds a student to an event.
    pub async fn enroll(&self, event_id: i32, user_id: i32) -> Result<(), DbErr> {
        entity::event_student::ActiveModel {
            event_id: ActiveValue::Set(event_id),
            user_id: ActiveValue::Set(user_id),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        entity::prelude::EventStudent::delete_many()
            .filter(entity::event_student::Column::EventId.eq(id))
            .exec(self.db)
            .await?;
        let result = entity::prelude::Event::delete_by_id(id).exec(self.db).await?;

        Ok(result.rows_affected > 0)
    }

    /// Detaches events from a course that is being deleted.
    pub async fn clear_course(&self, course_id: i32) -> Result<(), DbErr> {
        let events = entity::prelude::Event::find()
            .filter(entity::event::Column::CourseId.eq(course_id))
            .all(self.db)
            .await?;

        for event in events {
            let mut active = event.into_active_model();
            active.course_id = ActiveValue::Set(None);
            active.update(self.db).await?;
        }

        Ok(())
    }

    async fn load(&self, query: Select<entity::prelude::Event>) -> Result<Vec<Event>, DbErr> {
        let events = query.all(self.db).await?;
        let ids: Vec<i32> = events.iter().map(|e| e.id).collect();

        let mut enrolled: HashMap<i32, Vec<entity::event_student::Model>> = HashMap::new();
        if !ids.is_empty() {
            for row in entity::prelude::EventStudent::find()
                .filter(entity::event_student::Column::EventId.is_in(ids))
                .order_by_asc(entity::event_student::Column::Id)
                .all(self.db)
                .await?
            {
                enrolled.entry(row.event_id).or_default().push(row);
            }
        }

        Ok(events
            .into_iter()
            .map(|e| {
                let students = enrolled.remove(&e.id).unwrap_or_default();
                Event::from_entity(e, students)
            })
            .collect())
    }
}
