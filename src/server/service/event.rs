use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{course::CourseRepository, event::EventRepository, user::UserRepository},
    error::AppError,
    model::{
        event::{CreateEventParams, Event, UpdateEventParams},
        user::User,
    },
    service::ensure_owner,
};

/// Number of events returned by the upcoming listing.
pub const UPCOMING_LIMIT: u64 = 5;

pub struct EventService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> EventService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, params: CreateEventParams) -> Result<Event, AppError> {
        let event = EventRepository::new(self.db).create(params).await?;

        tracing::info!(
            "Event {} '{}' scheduled by instructor {}",
            event.id,
            event.title,
            event.instructor_id
        );

        Ok(event)
    }

    /// Every event ordered by date.
    pub async fn list(&self) -> Result<Vec<Event>, AppError> {
        let events = EventRepository::new(self.db).list().await?;

        self.attach_refs(events).await
    }

    /// One event with instructor and course summaries attached.
    ///
    /// # Returns
    /// - `Ok(Event)` - The event
    /// - `Err(AppError::NotFound)` - No event with this ID
    pub async fn get(&self, event_id: i32) -> Result<Event, AppError> {
        let event = self.require(event_id).await?;

        let mut events = self.attach_refs(vec![event]).await?;
        events.pop().ok_or_else(event_not_found)
    }

    /// Events the caller teaches or is enrolled in.
    pub async fn mine(&self, user_id: i32) -> Result<Vec<Event>, AppError> {
        let events = EventRepository::new(self.db).find_for_user(user_id).await?;

        self.attach_refs(events).await
    }

    /// The five soonest scheduled events that have not started.
    pub async fn upcoming(&self) -> Result<Vec<Event>, AppError> {
        let events = EventRepository::new(self.db)
            .upcoming(Utc::now(), UPCOMING_LIMIT)
            .await?;

        self.attach_refs(events).await
    }

    /// Adds the caller to an event.
    ///
    /// # Returns
    /// - `Ok(())` - The caller is enrolled
    /// - `Err(AppError::NotFound)` - No event with this ID
    /// - `Err(AppError::BadRequest)` - The event is full or the caller is already enrolled
    pub async fn enroll(&self, user_id: i32, event_id: i32) -> Result<(), AppError> {
        let event = self.require(event_id).await?;

        if event.is_full() {
            return Err(AppError::BadRequest("Event is full".to_string()));
        }
        if event.enrolled_students.contains(&user_id) {
            return Err(AppError::BadRequest(
                "Already enrolled in this event".to_string(),
            ));
        }

        EventRepository::new(self.db).enroll(event_id, user_id).await?;

        Ok(())
    }

    pub async fn update(
        &self,
        actor: &User,
        event_id: i32,
        params: UpdateEventParams,
    ) -> Result<Event, AppError> {
        let event = self.require(event_id).await?;
        ensure_owner(actor, event.instructor_id, "Not authorized to update this event")?;

        EventRepository::new(self.db)
            .update(event_id, params)
            .await?
            .ok_or_else(event_not_found)
    }

    pub async fn delete(&self, actor: &User, event_id: i32) -> Result<(), AppError> {
        let event = self.require(event_id).await?;
        ensure_owner(actor, event.instructor_id, "Not authorized to delete this event")?;

        EventRepository::new(self.db).delete(event_id).await?;

        Ok(())
    }

    async fn require(&self, event_id: i32) -> Result<Event, AppError> {
        EventRepository::new(self.db)
            .find_by_id(event_id)
            .await?
            .ok_or_else(event_not_found)
    }

    async fn attach_refs(&self, events: Vec<Event>) -> Result<Vec<Event>, AppError> {
        let instructor_ids: Vec<i32> = events.iter().map(|e| e.instructor_id).collect();
        let course_ids: Vec<i32> = events.iter().filter_map(|e| e.course_id).collect();

        let instructors = UserRepository::new(self.db)
            .find_by_ids(&instructor_ids)
            .await?;
        let courses = CourseRepository::new(self.db)
            .find_by_ids(&course_ids)
            .await?;

        Ok(events
            .into_iter()
            .map(|e| {
                let instructor = instructors.get(&e.instructor_id).map(User::to_summary);
                let course = e
                    .course_id
                    .and_then(|id| courses.get(&id))
                    .map(|c| c.to_ref());
                e.with_refs(instructor, course)
            })
            .collect())
    }
}

fn event_not_found() -> AppError {
    AppError::NotFound("Event not found".to_string())
}
