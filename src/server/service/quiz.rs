//! Quiz authoring and grading.
//!
//! Submissions are graded in memory against the stored quiz; each graded submission is
//! recorded as an attempt and logged as "Quiz Passed" or "Quiz Completed".

use sea_orm::{DatabaseConnection, TransactionTrait};
use serde_json::json;

use crate::{
    model::quiz::QuizAnswerDto,
    server::{
        data::{course::CourseRepository, lesson::LessonRepository, quiz::QuizRepository},
        error::AppError,
        model::{
            activity::{NewActivity, TargetType},
            quiz::{CreateQuizParams, NewQuizAttempt, Quiz, QuizGrade, UpdateQuizParams},
            user::User,
        },
        service::{activity::ActivityLogger, ensure_owner},
    },
};

pub struct QuizService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> QuizService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a quiz with its questions for a course taught by the caller.
    ///
    /// # Returns
    /// - `Ok(Quiz)` - The created quiz with questions and total marks
    /// - `Err(AppError::NotFound)` - No course with this ID
    /// - `Err(AppError::AuthErr)` - Caller does not teach the course and is not an admin
    pub async fn create(&self, actor: &User, params: CreateQuizParams) -> Result<Quiz, AppError> {
        let course = CourseRepository::new(self.db)
            .find_by_id(params.course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
        ensure_owner(
            actor,
            course.instructor_id,
            "Not authorized to create quiz for this course",
        )?;

        let txn = self.db.begin().await?;
        let quiz = QuizRepository::new(&txn).create(params).await?;
        txn.commit().await?;

        Ok(quiz.with_course(Some(course.to_ref())))
    }

    pub async fn list(&self, course_id: Option<i32>) -> Result<Vec<Quiz>, AppError> {
        let quizzes = QuizRepository::new(self.db).list(course_id).await?;

        let course_ids: Vec<i32> = quizzes.iter().map(|q| q.course_id).collect();
        let courses = CourseRepository::new(self.db)
            .find_by_ids(&course_ids)
            .await?;

        Ok(quizzes
            .into_iter()
            .map(|q| {
                let course = courses.get(&q.course_id).map(|c| c.to_ref());
                q.with_course(course)
            })
            .collect())
    }

    pub async fn get(&self, quiz_id: i32) -> Result<Quiz, AppError> {
        let quiz = self.require(quiz_id).await?;
        let course = CourseRepository::new(self.db)
            .find_by_id(quiz.course_id)
            .await?
            .map(|c| c.to_ref());

        Ok(quiz.with_course(course))
    }

    pub async fn update(
        &self,
        actor: &User,
        quiz_id: i32,
        params: UpdateQuizParams,
    ) -> Result<Quiz, AppError> {
        let quiz = self.require(quiz_id).await?;
        ensure_owner(actor, quiz.instructor_id, "Not authorized to update this quiz")?;

        QuizRepository::new(self.db)
            .update(quiz_id, params)
            .await?
            .ok_or_else(quiz_not_found)
    }

    pub async fn delete(&self, actor: &User, quiz_id: i32) -> Result<(), AppError> {
        let quiz = self.require(quiz_id).await?;
        ensure_owner(actor, quiz.instructor_id, "Not authorized to delete this quiz")?;

        let txn = self.db.begin().await?;
        LessonRepository::new(&txn).clear_quiz(quiz_id).await?;
        QuizRepository::new(&txn).delete(quiz_id).await?;
        txn.commit().await?;

        Ok(())
    }

    /// Grades a submission and records the attempt.
    ///
    /// # Arguments
    /// - `user_id` - Submitting user
    /// - `quiz_id` - Quiz being answered
    /// - `answers` - Raw answers; unmatched questions score 0
    ///
    /// # Returns
    /// - `Ok(QuizGrade)` - Score, percentage, pass flag and per-question results
    /// - `Err(AppError::NotFound)` - No quiz with this ID
    pub async fn submit(
        &self,
        user_id: i32,
        quiz_id: i32,
        answers: &[QuizAnswerDto],
    ) -> Result<QuizGrade, AppError> {
        let quiz = self.require(quiz_id).await?;
        let grade = quiz.grade(answers);

        QuizRepository::new(self.db)
            .record_attempt(NewQuizAttempt {
                quiz_id,
                user_id,
                score: grade.score,
                total_marks: grade.total_marks,
                percentage: grade.percentage,
                passed: grade.passed,
                answers: grade.answers_json(),
            })
            .await?;

        let action = if grade.passed {
            "Quiz Passed"
        } else {
            "Quiz Completed"
        };
        ActivityLogger::new(self.db)
            .record(
                NewActivity::new(action, user_id)
                    .target(TargetType::Quiz, quiz_id)
                    .details(json!({
                        "courseId": quiz.course_id,
                        "score": grade.score,
                        "percentage": grade.percentage,
                        "passed": grade.passed,
                    })),
            )
            .await;

        Ok(grade)
    }

    async fn require(&self, quiz_id: i32) -> Result<Quiz, AppError> {
        QuizRepository::new(self.db)
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(quiz_not_found)
    }
}

fn quiz_not_found() -> AppError {
    AppError::NotFound("Quiz not found".to_string())
}
