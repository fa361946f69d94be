//! Quiz factory for creating quizzes together with their questions.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// A question queued on a `QuizFactory`.
struct QuestionSpec {
    question: String,
    options: Vec<(String, bool)>,
    marks: i32,
}

/// Factory for creating test quizzes with customizable fields and questions.
///
/// # Example
///
/// ```rust,ignore
/// let (quiz, questions) = QuizFactory::new(&db, course.id, instructor.id)
///     .question("2 + 2?", &[("3", false), ("4", true)], 1)
///     .build()
///     .await?;
/// ```
pub struct QuizFactory<'a> {
    db: &'a DatabaseConnection,
    course_id: i32,
    instructor_id: i32,
    lesson_id: Option<i32>,
    title: String,
    passing_percentage: i32,
    is_published: bool,
    questions: Vec<QuestionSpec>,
}

impl<'a> QuizFactory<'a> {
    /// Creates a new QuizFactory with default values.
    ///
    /// Defaults:
    /// - title: `"Quiz {id}"`
    /// - passing_percentage: `60`
    /// - is_published: `true`
    /// - no questions
    pub fn new(db: &'a DatabaseConnection, course_id: i32, instructor_id: i32) -> Self {
        let id = next_id();
        Self {
            db,
            course_id,
            instructor_id,
            lesson_id: None,
            title: format!("Quiz {}", id),
            passing_percentage: 60,
            is_published: true,
            questions: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn lesson_id(mut self, lesson_id: Option<i32>) -> Self {
        self.lesson_id = lesson_id;
        self
    }

    pub fn passing_percentage(mut self, passing_percentage: i32) -> Self {
        self.passing_percentage = passing_percentage;
        self
    }

    pub fn is_published(mut self, is_published: bool) -> Self {
        self.is_published = is_published;
        self
    }

    /// Queues a question; options are `(text, is_correct)` pairs.
    pub fn question(mut self, question: impl Into<String>, options: &[(&str, bool)], marks: i32) -> Self {
        self.questions.push(QuestionSpec {
            question: question.into(),
            options: options
                .iter()
                .map(|(text, correct)| (text.to_string(), *correct))
                .collect(),
            marks,
        });
        self
    }

    /// Builds and inserts the quiz and its questions.
    ///
    /// `total_marks` is the sum of the queued question marks.
    ///
    /// # Returns
    /// - `Ok((quiz, questions))` - Created quiz and its questions in position order
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(
        self,
    ) -> Result<(entity::quiz::Model, Vec<entity::quiz_question::Model>), DbErr> {
        let now = Utc::now();
        let total_marks: i32 = self.questions.iter().map(|q| q.marks).sum();

        let quiz = entity::quiz::ActiveModel {
            id: ActiveValue::NotSet,
            course_id: ActiveValue::Set(self.course_id),
            lesson_id: ActiveValue::Set(self.lesson_id),
            instructor_id: ActiveValue::Set(self.instructor_id),
            title: ActiveValue::Set(self.title),
            description: ActiveValue::Set(None),
            duration: ActiveValue::Set(30),
            total_marks: ActiveValue::Set(total_marks),
            passing_percentage: ActiveValue::Set(self.passing_percentage),
            is_published: ActiveValue::Set(self.is_published),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(self.db)
        .await?;

        let mut questions = Vec::with_capacity(self.questions.len());
        for (position, spec) in self.questions.into_iter().enumerate() {
            let options: Vec<serde_json::Value> = spec
                .options
                .into_iter()
                .map(|(text, correct)| serde_json::json!({ "text": text, "isCorrect": correct }))
                .collect();

            let question = entity::quiz_question::ActiveModel {
                id: ActiveValue::NotSet,
                quiz_id: ActiveValue::Set(quiz.id),
                position: ActiveValue::Set(position as i32),
                question: ActiveValue::Set(spec.question),
                options: ActiveValue::Set(serde_json::Value::Array(options)),
                explanation: ActiveValue::Set(None),
                marks: ActiveValue::Set(spec.marks),
            }
            .insert(self.db)
            .await?;
            questions.push(question);
        }

        Ok((quiz, questions))
    }
}

/// Creates an empty published quiz for the given course and instructor.
pub async fn create_quiz(
    db: &DatabaseConnection,
    course_id: i32,
    instructor_id: i32,
) -> Result<entity::quiz::Model, DbErr> {
    let (quiz, _) = QuizFactory::new(db, course_id, instructor_id).build().await?;
    Ok(quiz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use crate::factory::helpers::create_course_with_instructor;

    #[tokio::test]
    async fn creates_quiz_with_questions() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_lms_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let (instructor, course) = create_course_with_instructor(db).await?;
        let (quiz, questions) = QuizFactory::new(db, course.id, instructor.id)
            .question("2 + 2?", &[("3", false), ("4", true)], 2)
            .question("Capital of India?", &[("Delhi", true), ("Pune", false)], 3)
            .build()
            .await?;

        assert_eq!(quiz.total_marks, 5);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].position, 1);
        assert_eq!(questions[0].options[1]["isCorrect"], serde_json::json!(true));

        Ok(())
    }
}
