//! Quiz data repository.
//!
//! Handles quizzes with their ordered questions and the attempts recorded on submit.
//! Question options are stored as a JSON array of `{text, isCorrect}` objects.

use std::collections::HashMap;

use chrono::Utc;
use entity::sea_orm_active_enums::AttemptStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};

use crate::server::model::quiz::{
    CreateQuizParams, NewQuizAttempt, Quiz, UpdateQuizParams, total_marks_of,
};

pub struct QuizRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> QuizRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a quiz and its questions in position order.
    ///
    /// Total marks are derived from the questions. Callers wanting atomicity pass an
    /// open transaction.
    ///
    /// # Arguments
    /// - `params` - Quiz fields and prepared questions
    ///
    /// # Returns
    /// - `Ok(Quiz)` - The created quiz with its questions
    /// - `Err(DbErr)` - Database error during insert
    pub async fn create(&self, params: CreateQuizParams) -> Result<Quiz, DbErr> {
        let now = Utc::now();
        let quiz = entity::quiz::ActiveModel {
            course_id: ActiveValue::Set(params.course_id),
            lesson_id: ActiveValue::Set(params.lesson_id),
            instructor_id: ActiveValue::Set(params.instructor_id),
            title: ActiveValue::Set(params.title),
            description: ActiveValue::Set(params.description),
            duration: ActiveValue::Set(params.duration),
            total_marks: ActiveValue::Set(total_marks_of(&params.questions)),
            passing_percentage: ActiveValue::Set(params.passing_percentage),
            is_published: ActiveValue::Set(false),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        let mut questions = Vec::with_capacity(params.questions.len());
        for (position, question) in params.questions.into_iter().enumerate() {
            let options = serde_json::to_value(&question.options)
                .map_err(|e| DbErr::Custom(e.to_string()))?;

            let entity = entity::quiz_question::ActiveModel {
                quiz_id: ActiveValue::Set(quiz.id),
                position: ActiveValue::Set(position as i32),
                question: ActiveValue::Set(question.question),
                options: ActiveValue::Set(options),
                explanation: ActiveValue::Set(question.explanation),
                marks: ActiveValue::Set(question.marks),
                ..Default::default()
            }
            .insert(self.db)
            .await?;
            questions.push(entity);
        }

        Ok(Quiz::from_entity(quiz, questions))
    }

    /// Gets a quiz with its questions.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Quiz>, DbErr> {
        let Some(quiz) = entity::prelude::Quiz::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let questions = entity::prelude::QuizQuestion::find()
            .filter(entity::quiz_question::Column::QuizId.eq(id))
            .order_by_asc(entity::quiz_question::Column::Position)
            .all(self.db)
            .await?;

        Ok(Some(Quiz::from_entity(quiz, questions)))
    }

    /// Quizzes of a course with their questions, oldest first.
    pub async fn find_by_course(&self, course_id: i32) -> Result<Vec<Quiz>, DbErr> {
        self.list(Some(course_id)).await
    }

    /// Quizzes with their questions, optionally limited to one course, oldest first.
    pub async fn list(&self, course_id: Option<i32>) -> Result<Vec<Quiz>, DbErr> {
        let mut query = entity::prelude::Quiz::find();
        if let Some(course_id) = course_id {
            query = query.filter(entity::quiz::Column::CourseId.eq(course_id));
        }

        let quizzes = query
            .order_by_asc(entity::quiz::Column::CreatedAt)
            .order_by_asc(entity::quiz::Column::Id)
            .all(self.db)
            .await?;

        let ids: Vec<i32> = quizzes.iter().map(|q| q.id).collect();
        let mut questions: HashMap<i32, Vec<entity::quiz_question::Model>> = HashMap::new();
        if !ids.is_empty() {
            for question in entity::prelude::QuizQuestion::find()
                .filter(entity::quiz_question::Column::QuizId.is_in(ids))
                .order_by_asc(entity::quiz_question::Column::Position)
                .all(self.db)
                .await?
            {
                questions.entry(question.quiz_id).or_default().push(question);
            }
        }

        Ok(quizzes
            .into_iter()
            .map(|q| {
                let qs = questions.remove(&q.id).unwrap_or_default();
                Quiz::from_entity(q, qs)
            })
            .collect())
    }

    pub async fn update(&self, id: i32, params: UpdateQuizParams) -> Result<Option<Quiz>, DbErr> {
        let Some(entity) = entity::prelude::Quiz::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let mut active = entity.into_active_model();
        if let Some(title) = params.title {
            active.title = ActiveValue::Set(title);
        }
        if let Some(description) = params.description {
            active.description = ActiveValue::Set(Some(description));
        }
        if let Some(duration) = params.duration {
            active.duration = ActiveValue::Set(duration);
        }
        if let Some(passing_percentage) = params.passing_percentage {
            active.passing_percentage = ActiveValue::Set(passing_percentage);
        }
        if let Some(is_published) = params.is_published {
            active.is_published = ActiveValue::Set(is_published);
        }
        if let Some(lesson_id) = params.lesson_id {
            active.lesson_id = ActiveValue::Set(Some(lesson_id));
        }
        active.updated_at = ActiveValue::Set(Utc::now());
        active.update(self.db).await?;

        self.find_by_id(id).await
    }

    /// Deletes a quiz with its questions and attempts.
    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        entity::prelude::QuizQuestion::delete_many()
            .filter(entity::quiz_question::Column::QuizId.eq(id))
            .exec(self.db)
            .await?;
        entity::prelude::QuizAttempt::delete_many()
            .filter(entity::quiz_attempt::Column::QuizId.eq(id))
            .exec(self.db)
            .await?;
        let result = entity::prelude::Quiz::delete_by_id(id).exec(self.db).await?;

        Ok(result.rows_affected > 0)
    }

    /// Deletes every quiz of a course with questions and attempts.
    pub async fn delete_by_course(&self, course_id: i32) -> Result<(), DbErr> {
        let ids: Vec<i32> = entity::prelude::Quiz::find()
            .filter(entity::quiz::Column::CourseId.eq(course_id))
            .all(self.db)
            .await?
            .into_iter()
            .map(|q| q.id)
            .collect();

        for id in ids {
            self.delete(id).await?;
        }

        Ok(())
    }

    /// Records a graded attempt.
    pub async fn record_attempt(&self, attempt: NewQuizAttempt) -> Result<(), DbErr> {
        let status = if attempt.passed {
            AttemptStatus::Passed
        } else {
            AttemptStatus::Failed
        };

        entity::quiz_attempt::ActiveModel {
            quiz_id: ActiveValue::Set(attempt.quiz_id),
            user_id: ActiveValue::Set(attempt.user_id),
            score: ActiveValue::Set(attempt.score),
            total_marks: ActiveValue::Set(attempt.total_marks),
            percentage: ActiveValue::Set(attempt.percentage),
            status: ActiveValue::Set(status),
            answers: ActiveValue::Set(attempt.answers),
            completed_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    /// Score percentages of every attempt by a user, using the quiz's total marks.
    ///
    /// Attempts on quizzes with no marks count as 0.
    pub async fn attempt_percentages(&self, user_id: i32) -> Result<Vec<f64>, DbErr> {
        let attempts = entity::prelude::QuizAttempt::find()
            .filter(entity::quiz_attempt::Column::UserId.eq(user_id))
            .find_also_related(entity::prelude::Quiz)
            .all(self.db)
            .await?;

        Ok(attempts
            .into_iter()
            .map(|(attempt, quiz)| {
                let total = quiz.map(|q| q.total_marks).unwrap_or(attempt.total_marks);
                if total > 0 {
                    attempt.score as f64 / total as f64 * 100.0
                } else {
                    0.0
                }
            })
            .collect())
    }
}
