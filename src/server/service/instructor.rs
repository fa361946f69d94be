use std::collections::HashMap;

use sea_orm::DatabaseConnection;

use crate::{
    model::instructor::{InstructorCourseDto, InstructorStudentDto, StudentCourseProgressDto},
    server::{
        data::{
            course::{CourseRepository, CourseStudentRepository},
            lesson::LessonRepository,
            user::UserRepository,
            user_course::UserCourseRepository,
        },
        error::AppError,
        model::{enum_name, lesson::Lesson, user::User},
        service::ensure_owner,
    },
};

pub struct InstructorService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> InstructorService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// The instructor's courses with ordered lessons and enrolled students.
    pub async fn courses(&self, instructor: &User) -> Result<Vec<InstructorCourseDto>, AppError> {
        let courses = CourseRepository::new(self.db)
            .find_by_instructor(instructor.id)
            .await?;
        let course_ids: Vec<i32> = courses.iter().map(|c| c.id).collect();

        let mut lessons = LessonRepository::new(self.db)
            .find_by_courses(&course_ids)
            .await?;
        let rosters = CourseStudentRepository::new(self.db)
            .student_ids_by_course(&course_ids)
            .await?;
        let student_ids: Vec<i32> = rosters.values().flatten().copied().collect();
        let students = UserRepository::new(self.db)
            .find_by_ids(&student_ids)
            .await?;

        Ok(courses
            .into_iter()
            .map(|course| {
                let enrolled_students = rosters
                    .get(&course.id)
                    .into_iter()
                    .flatten()
                    .filter_map(|id| students.get(id))
                    .map(User::to_summary)
                    .collect();
                let course_lessons = lessons
                    .remove(&course.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(Lesson::into_dto)
                    .collect();

                InstructorCourseDto {
                    course: course.with_instructor(Some(instructor.to_summary())).into_dto(),
                    lessons: course_lessons,
                    enrolled_students,
                }
            })
            .collect())
    }

    /// Unique students across the instructor's courses, in first-seen order, with the
    /// number of those courses each is enrolled in.
    pub async fn students(&self, instructor_id: i32) -> Result<Vec<InstructorStudentDto>, AppError> {
        let course_ids: Vec<i32> = CourseRepository::new(self.db)
            .find_by_instructor(instructor_id)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        let rosters = CourseStudentRepository::new(self.db)
            .student_ids_by_course(&course_ids)
            .await?;

        let mut order: Vec<i32> = Vec::new();
        let mut counts: HashMap<i32, u64> = HashMap::new();
        for course_id in &course_ids {
            for student_id in rosters.get(course_id).into_iter().flatten() {
                let count = counts.entry(*student_id).or_insert_with(|| {
                    order.push(*student_id);
                    0
                });
                *count += 1;
            }
        }

        let users = UserRepository::new(self.db).find_by_ids(&order).await?;

        Ok(order
            .into_iter()
            .filter_map(|id| {
                let user = users.get(&id)?;
                Some(InstructorStudentDto {
                    id: user.id,
                    full_name: user.full_name.clone(),
                    email: user.email.clone(),
                    phone: user.phone.clone(),
                    status: enum_name(&user.status),
                    total_hours_learned: user.total_hours_learned,
                    streak_days: user.streak_days,
                    enrolled_in_course_count: counts.get(&id).copied().unwrap_or_default(),
                })
            })
            .collect())
    }

    /// A student's progress in one of the instructor's courses.
    ///
    /// # Returns
    /// - `Ok(StudentCourseProgressDto)` - Lesson counts, completion and hours
    /// - `Err(AppError::NotFound)` - Unknown student or course, or the student is not enrolled
    /// - `Err(AppError::AuthErr)` - The course belongs to another instructor
    pub async fn student_progress(
        &self,
        instructor: &User,
        student_id: i32,
        course_id: i32,
    ) -> Result<StudentCourseProgressDto, AppError> {
        UserRepository::new(self.db)
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

        let user_course = UserCourseRepository::new(self.db)
            .find(student_id, course_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Student not enrolled in this course".to_string())
            })?;

        let course = CourseRepository::new(self.db)
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
        ensure_owner(instructor, course.instructor_id, "Not authorized")?;

        let total_lessons = LessonRepository::new(self.db)
            .count_by_course(course_id)
            .await?;

        Ok(StudentCourseProgressDto {
            student_id,
            course_id,
            course_name: course.title,
            completed_lessons: user_course.completed_lessons.len() as u64,
            total_lessons,
            completion_percentage: user_course.completion_percentage,
            hours_spent: user_course.hours_spent,
            enrollment_date: user_course.enrollment_date,
        })
    }
}
