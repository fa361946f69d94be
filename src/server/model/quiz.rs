//! Quiz domain models and grading.
//!
//! Questions are stored with their options as `{text, isCorrect}` objects. Submissions
//! reference questions loosely (by id, position or text) and options by text or index,
//! so grading is a pure function over the loaded quiz and the raw submitted answers.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    model::{
        api::CourseRefDto,
        quiz::{
            CreateQuizDto, QuestionResultDto, QuizAnswerDto, QuizDto, QuizOptionDto,
            QuizQuestionDto, QuizResultDto, UpdateQuizDto,
        },
    },
    server::error::AppError,
};

pub const DEFAULT_PASSING_PERCENTAGE: i32 = 60;
pub const DEFAULT_DURATION_MINUTES: i32 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct QuizQuestion {
    pub id: i32,
    pub position: i32,
    pub question: String,
    pub options: Vec<QuizOptionDto>,
    pub explanation: Option<String>,
    pub marks: i32,
}

impl QuizQuestion {
    /// Options that fail to decode are treated as an empty option list.
    pub fn from_entity(entity: entity::quiz_question::Model) -> Self {
        let options = serde_json::from_value(entity.options).unwrap_or_default();

        Self {
            id: entity.id,
            position: entity.position,
            question: entity.question,
            options,
            explanation: entity.explanation,
            marks: entity.marks,
        }
    }

    pub fn into_dto(self) -> QuizQuestionDto {
        QuizQuestionDto {
            id: self.id,
            question: self.question,
            options: self.options,
            explanation: self.explanation,
            marks: self.marks,
        }
    }

    fn correct_options(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|o| o.is_correct)
            .map(|o| o.text.clone())
            .collect()
    }

    fn marks_or_default(&self) -> i32 {
        if self.marks > 0 { self.marks } else { 1 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    pub id: i32,
    pub course_id: i32,
    pub course: Option<CourseRefDto>,
    pub lesson_id: Option<i32>,
    pub instructor_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub duration: i32,
    pub total_marks: i32,
    pub passing_percentage: i32,
    pub is_published: bool,
    /// Ordered by position.
    pub questions: Vec<QuizQuestion>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quiz {
    pub fn from_entity(
        entity: entity::quiz::Model,
        questions: Vec<entity::quiz_question::Model>,
    ) -> Self {
        let mut questions: Vec<QuizQuestion> =
            questions.into_iter().map(QuizQuestion::from_entity).collect();
        questions.sort_by_key(|q| q.position);

        Self {
            id: entity.id,
            course_id: entity.course_id,
            course: None,
            lesson_id: entity.lesson_id,
            instructor_id: entity.instructor_id,
            title: entity.title,
            description: entity.description,
            duration: entity.duration,
            total_marks: entity.total_marks,
            passing_percentage: entity.passing_percentage,
            is_published: entity.is_published,
            questions,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    pub fn with_course(mut self, course: Option<CourseRefDto>) -> Self {
        self.course = course;
        self
    }

    pub fn into_dto(self) -> QuizDto {
        QuizDto {
            id: self.id,
            course_id: self.course_id,
            course: self.course,
            lesson_id: self.lesson_id,
            instructor_id: self.instructor_id,
            title: self.title,
            description: self.description,
            duration: self.duration,
            total_marks: self.total_marks,
            passing_percentage: self.passing_percentage,
            is_published: self.is_published,
            questions: self.questions.into_iter().map(QuizQuestion::into_dto).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Grades a submission against this quiz.
    ///
    /// The denominator is the stored total marks, falling back to the sum of question
    /// marks and then to the question count. Each question takes the first answer whose
    /// `questionId` names it by id, by zero-based position or by question text. The
    /// selected option matches an option by its text or by its index written as a
    /// string. Marks are awarded only when the matched option is flagged correct.
    ///
    /// # Arguments
    /// - `answers` - Raw answers as submitted
    ///
    /// # Returns
    /// - `QuizGrade` - Score, percentage, pass flag and per-question results
    pub fn grade(&self, answers: &[QuizAnswerDto]) -> QuizGrade {
        let mut score = 0;
        let mut marks_sum = 0;
        let mut results = Vec::with_capacity(self.questions.len());

        for (index, question) in self.questions.iter().enumerate() {
            let marks = question.marks_or_default();
            marks_sum += question.marks.max(0);

            let answer = answers
                .iter()
                .find(|a| targets_id(&a.question_id, question))
                .or_else(|| {
                    answers
                        .iter()
                        .find(|a| targets_position(&a.question_id, question, index))
                });
            let user_answer = answer
                .map(|a| a.selected_option.clone())
                .unwrap_or(Value::Null);

            let is_correct = value_as_key(&user_answer)
                .and_then(|selected| {
                    question
                        .options
                        .iter()
                        .enumerate()
                        .find(|(i, o)| o.text == selected || i.to_string() == selected)
                })
                .is_some_and(|(_, o)| o.is_correct);

            let marks_awarded = if is_correct { marks } else { 0 };
            score += marks_awarded;

            results.push(QuestionResult {
                question_id: question.id,
                user_answer,
                correct_options: question.correct_options(),
                is_correct,
                marks_awarded,
            });
        }

        let total = if self.total_marks > 0 {
            self.total_marks
        } else if marks_sum > 0 {
            marks_sum
        } else {
            self.questions.len() as i32
        };
        let percentage = percentage_of(score, total);

        QuizGrade {
            score,
            total_marks: total,
            percentage,
            passed: percentage >= self.passing_percentage,
            passing_percentage: self.passing_percentage,
            results,
        }
    }
}

fn targets_id(question_id: &Value, question: &QuizQuestion) -> bool {
    value_as_key(question_id).as_deref() == Some(question.id.to_string().as_str())
}

/// Fallback match on the question's position or its text.
fn targets_position(question_id: &Value, question: &QuizQuestion, index: usize) -> bool {
    match question_id {
        Value::Number(n) => n.as_u64() == Some(index as u64),
        Value::String(s) => *s == question.question,
        _ => false,
    }
}

/// Normalizes a loosely typed JSON scalar to a comparable string.
pub fn value_as_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `round(part / whole * 100)`, 0 when `whole` is 0.
pub fn percentage_of(part: i32, whole: i32) -> i32 {
    if whole <= 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as i32
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionResult {
    pub question_id: i32,
    pub user_answer: Value,
    pub correct_options: Vec<String>,
    pub is_correct: bool,
    pub marks_awarded: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizGrade {
    pub score: i32,
    pub total_marks: i32,
    pub percentage: i32,
    pub passed: bool,
    pub passing_percentage: i32,
    pub results: Vec<QuestionResult>,
}

impl QuizGrade {
    pub fn into_dto(self) -> QuizResultDto {
        QuizResultDto {
            score: self.score,
            total_marks: self.total_marks,
            percentage: self.percentage,
            passed: self.passed,
            passing_percentage: self.passing_percentage,
            results: self
                .results
                .into_iter()
                .map(|r| QuestionResultDto {
                    question_id: r.question_id,
                    user_answer: r.user_answer,
                    correct_options: r.correct_options,
                    is_correct: r.is_correct,
                    marks_awarded: r.marks_awarded,
                })
                .collect(),
        }
    }

    /// Per-question results as stored on the attempt row.
    pub fn answers_json(&self) -> Value {
        Value::Array(
            self.results
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "questionId": r.question_id,
                        "userAnswer": r.user_answer,
                        "isCorrect": r.is_correct,
                        "marksAwarded": r.marks_awarded,
                    })
                })
                .collect(),
        )
    }
}

/// A question ready to insert: options already carry correctness flags.
#[derive(Debug, Clone)]
pub struct NewQuizQuestion {
    pub question: String,
    pub options: Vec<QuizOptionDto>,
    pub explanation: Option<String>,
    pub marks: i32,
}

impl NewQuizQuestion {
    /// Flags the option whose text equals `correct_answer`. Missing marks default to 1.
    pub fn from_authored(
        question: String,
        options: Vec<String>,
        correct_answer: Option<&str>,
        explanation: Option<String>,
        marks: Option<i32>,
    ) -> Self {
        let options = options
            .into_iter()
            .map(|text| {
                let is_correct = correct_answer == Some(text.as_str());
                QuizOptionDto { text, is_correct }
            })
            .collect();

        Self {
            question,
            options,
            explanation,
            marks: marks.unwrap_or(1).max(0),
        }
    }
}

/// Sum of question marks, or the question count (at least 1) when that sum is 0.
pub fn total_marks_of(questions: &[NewQuizQuestion]) -> i32 {
    let sum: i32 = questions.iter().map(|q| q.marks).sum();
    if sum > 0 {
        sum
    } else {
        (questions.len() as i32).max(1)
    }
}

#[derive(Debug, Clone)]
pub struct CreateQuizParams {
    pub course_id: i32,
    pub lesson_id: Option<i32>,
    pub instructor_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub duration: i32,
    pub passing_percentage: i32,
    pub questions: Vec<NewQuizQuestion>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateQuizParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<i32>,
    pub passing_percentage: Option<i32>,
    pub is_published: Option<bool>,
    pub lesson_id: Option<i32>,
}

impl CreateQuizParams {
    /// Validates an authored quiz and converts its questions.
    ///
    /// Passing percentage defaults to 60. Duration falls back to the time limit, then
    /// to 60 minutes.
    pub fn from_dto(course_id: i32, instructor_id: i32, dto: CreateQuizDto) -> Result<Self, AppError> {
        let title = dto.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::BadRequest("Title required".to_string()));
        }

        let questions = dto
            .questions
            .into_iter()
            .map(|q| {
                NewQuizQuestion::from_authored(
                    q.question,
                    q.options,
                    q.correct_answer.as_deref(),
                    q.explanation,
                    q.marks,
                )
            })
            .collect();

        Ok(Self {
            course_id,
            lesson_id: dto.lesson_id,
            instructor_id,
            title,
            description: dto.description,
            duration: dto
                .duration
                .or(dto.time_limit)
                .unwrap_or(DEFAULT_DURATION_MINUTES),
            passing_percentage: dto
                .passing_score
                .filter(|p| *p > 0)
                .unwrap_or(DEFAULT_PASSING_PERCENTAGE),
            questions,
        })
    }
}

impl From<UpdateQuizDto> for UpdateQuizParams {
    fn from(dto: UpdateQuizDto) -> Self {
        Self {
            title: dto.title,
            description: dto.description,
            duration: dto.duration,
            passing_percentage: dto.passing_percentage,
            is_published: dto.is_published,
            lesson_id: dto.lesson_id,
        }
    }
}

/// Attempt row to insert after grading.
#[derive(Debug, Clone)]
pub struct NewQuizAttempt {
    pub quiz_id: i32,
    pub user_id: i32,
    pub score: i32,
    pub total_marks: i32,
    pub percentage: i32,
    pub passed: bool,
    pub answers: Value,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn option(text: &str, is_correct: bool) -> QuizOptionDto {
        QuizOptionDto {
            text: text.to_string(),
            is_correct,
        }
    }

    fn quiz(passing: i32) -> Quiz {
        let now = Utc::now();
        Quiz {
            id: 1,
            course_id: 1,
            course: None,
            lesson_id: None,
            instructor_id: 1,
            title: "Basics".to_string(),
            description: None,
            duration: 60,
            total_marks: 3,
            passing_percentage: passing,
            is_published: true,
            questions: vec![
                QuizQuestion {
                    id: 10,
                    position: 0,
                    question: "2 + 2".to_string(),
                    options: vec![option("3", false), option("4", true)],
                    explanation: None,
                    marks: 1,
                },
                QuizQuestion {
                    id: 11,
                    position: 1,
                    question: "Capital of France".to_string(),
                    options: vec![option("Paris", true), option("Rome", false)],
                    explanation: None,
                    marks: 2,
                },
            ],
            created_at: now,
            updated_at: now,
        }
    }

    fn answer(question_id: Value, selected: Value) -> QuizAnswerDto {
        QuizAnswerDto {
            question_id,
            selected_option: selected,
        }
    }

    /// Expected: answers matched by id and by option text earn full marks
    #[test]
    fn grades_by_question_id_and_option_text() {
        let grade = quiz(60).grade(&[
            answer(json!("10"), json!("4")),
            answer(json!(11), json!("Paris")),
        ]);

        assert_eq!(grade.score, 3);
        assert_eq!(grade.total_marks, 3);
        assert_eq!(grade.percentage, 100);
        assert!(grade.passed);
    }

    /// Expected: positional question id and option index both resolve
    #[test]
    fn grades_by_position_and_option_index() {
        let grade = quiz(60).grade(&[answer(json!(0), json!(1))]);

        assert_eq!(grade.score, 1);
        assert_eq!(grade.percentage, 33);
        assert!(!grade.passed);
        assert!(grade.results[0].is_correct);
        assert!(!grade.results[1].is_correct);
        assert_eq!(grade.results[1].user_answer, Value::Null);
    }

    /// A numeric id equal to another question's position still targets its own question.
    ///
    /// Expected: each answer lands on the question with that id
    #[test]
    fn question_id_wins_over_position() {
        let mut quiz = quiz(60);
        quiz.questions[0].id = 1;
        quiz.questions[1].id = 0;

        let grade = quiz.grade(&[answer(json!(1), json!("4")), answer(json!(0), json!("Rome"))]);

        assert!(grade.results[0].is_correct);
        assert!(!grade.results[1].is_correct);
        assert_eq!(grade.results[1].user_answer, json!("Rome"));
    }

    /// Expected: question text is accepted as the question reference
    #[test]
    fn grades_by_question_text() {
        let grade = quiz(50).grade(&[answer(json!("Capital of France"), json!("Paris"))]);

        assert_eq!(grade.score, 2);
        assert_eq!(grade.percentage, 67);
        assert!(grade.passed);
        assert_eq!(grade.results[1].correct_options, vec!["Paris".to_string()]);
    }

    /// Expected: a wrong option awards nothing
    #[test]
    fn wrong_option_scores_zero() {
        let grade = quiz(60).grade(&[answer(json!(10), json!("3"))]);

        assert_eq!(grade.score, 0);
        assert_eq!(grade.percentage, 0);
        assert!(!grade.passed);
    }

    #[test]
    fn authored_question_flags_correct_option() {
        let q = NewQuizQuestion::from_authored(
            "Pick".to_string(),
            vec!["a".to_string(), "b".to_string()],
            Some("b"),
            None,
            None,
        );

        assert_eq!(q.options, vec![option("a", false), option("b", true)]);
        assert_eq!(q.marks, 1);
    }

    #[test]
    fn total_marks_falls_back_to_question_count() {
        assert_eq!(total_marks_of(&[]), 1);

        let q = |marks| NewQuizQuestion {
            question: String::new(),
            options: vec![],
            explanation: None,
            marks,
        };
        assert_eq!(total_marks_of(&[q(2), q(3)]), 5);
        assert_eq!(total_marks_of(&[q(0), q(0)]), 2);
    }
}
