use sea_orm::{ActiveModelTrait, ActiveValue, EntityTrait, IntoActiveModel};
use serde_json::json;
use test_utils::{builder::TestBuilder, factory};

use super::load_user;
use crate::{
    model::quiz::QuizAnswerDto,
    server::{data::quiz::QuizRepository, error::AppError, service::quiz::QuizService},
};

fn answer(question_id: i32, selected: serde_json::Value) -> QuizAnswerDto {
    QuizAnswerDto {
        question_id: json!(question_id),
        selected_option: selected,
    }
}

/// One of two equally weighted questions right is 50 percent, which fails a 60 percent
/// quiz; the attempt is still stored.
///
/// Expected: Ok(QuizGrade { score 1, percentage 50, passed false }) and one recorded attempt
#[tokio::test]
async fn grades_and_records_attempt() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (instructor, course) = factory::helpers::create_course_with_instructor(db).await?;
    let student = factory::user::create_user(db).await?;
    let (quiz, questions) = factory::quiz::QuizFactory::new(db, course.id, instructor.id)
        .question("2 + 2?", &[("3", false), ("4", true)], 1)
        .question("Capital of France?", &[("Paris", true), ("Rome", false)], 1)
        .build()
        .await?;

    let grade = QuizService::new(db)
        .submit(
            student.id,
            quiz.id,
            &[
                answer(questions[0].id, json!("4")),
                answer(questions[1].id, json!("Rome")),
            ],
        )
        .await?;

    assert_eq!(grade.score, 1);
    assert_eq!(grade.total_marks, 2);
    assert_eq!(grade.percentage, 50);
    assert!(!grade.passed);
    assert!(grade.results[0].is_correct);
    assert!(!grade.results[1].is_correct);
    let attempts = QuizRepository::new(db).attempt_percentages(student.id).await?;
    assert_eq!(attempts, vec![50.0]);

    Ok(())
}

/// Options may be picked by position as well as by text.
///
/// Expected: Ok(QuizGrade { percentage 100, passed true })
#[tokio::test]
async fn accepts_option_index() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (instructor, course) = factory::helpers::create_course_with_instructor(db).await?;
    let student = factory::user::create_user(db).await?;
    let (quiz, questions) = factory::quiz::QuizFactory::new(db, course.id, instructor.id)
        .question("2 + 2?", &[("3", false), ("4", true)], 2)
        .build()
        .await?;

    let grade = QuizService::new(db)
        .submit(student.id, quiz.id, &[answer(questions[0].id, json!(1))])
        .await?;

    assert_eq!(grade.percentage, 100);
    assert!(grade.passed);

    Ok(())
}

/// Expected: Err(NotFound("Quiz not found"))
#[tokio::test]
async fn rejects_unknown_quiz() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let student = factory::user::create_user(db).await?;

    let result = QuizService::new(db).submit(student.id, 77, &[]).await;

    assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Quiz not found"));

    Ok(())
}

/// Lessons pointing at a deleted quiz lose the reference.
///
/// Expected: Ok, quiz gone and the lesson's quiz id cleared
#[tokio::test]
async fn delete_detaches_lessons() -> Result<(), AppError> {
    let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let (instructor, course, lessons) = factory::helpers::create_course_with_lessons(db, 1).await?;
    let (quiz, _) = factory::quiz::QuizFactory::new(db, course.id, instructor.id)
        .question("2 + 2?", &[("4", true)], 1)
        .build()
        .await?;
    let mut lesson = lessons[0].clone().into_active_model();
    lesson.quiz_id = ActiveValue::Set(Some(quiz.id));
    lesson.update(db).await?;

    QuizService::new(db)
        .delete(&load_user(db, instructor.id).await?, quiz.id)
        .await?;

    assert!(entity::prelude::Quiz::find_by_id(quiz.id).one(db).await?.is_none());
    let lesson = entity::prelude::Lesson::find_by_id(lessons[0].id)
        .one(db)
        .await?
        .unwrap();
    assert_eq!(lesson.quiz_id, None);

    Ok(())
}
