use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::EventType;
use test_utils::{builder::TestBuilder, factory};

use crate::server::{
    error::AppError, model::event::CreateEventParams, service::event::EventService,
};

/// Expected: the event with its host and course summaries
#[tokio::test]
async fn get_attaches_host_and_course() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (instructor, course) = factory::helpers::create_course_with_instructor(db).await?;
    let service = EventService::new(db);

    let created = service
        .create(CreateEventParams {
            title: "Borrow checker clinic".to_string(),
            instructor_id: instructor.id,
            event_type: EventType::LiveClass,
            date: Utc::now() + Duration::days(2),
            start_time: "10:00".to_string(),
            end_time: "11:00".to_string(),
            location: "Online".to_string(),
            max_students: 30,
            course_id: Some(course.id),
        })
        .await?;

    let event = service.get(created.id).await?;

    assert_eq!(event.title, "Borrow checker clinic");
    assert_eq!(event.instructor.map(|i| i.id), Some(instructor.id));
    assert_eq!(event.course.map(|c| c.title), Some(course.title));

    Ok(())
}

/// Expected: Err(NotFound("Event not found"))
#[tokio::test]
async fn get_unknown_event() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let result = EventService::new(db).get(404).await;

    assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Event not found"));

    Ok(())
}
