pub use super::achievement::Entity as Achievement;
pub use super::activity_log::Entity as ActivityLog;
pub use super::ai_interaction::Entity as AiInteraction;
pub use super::announcement::Entity as Announcement;
pub use super::assignment::Entity as Assignment;
pub use super::course::Entity as Course;
pub use super::course_review::Entity as CourseReview;
pub use super::course_student::Entity as CourseStudent;
pub use super::enrollment::Entity as Enrollment;
pub use super::event::Entity as Event;
pub use super::event_student::Entity as EventStudent;
pub use super::feature_flag::Entity as FeatureFlag;
pub use super::lesson::Entity as Lesson;
pub use super::parent_child::Entity as ParentChild;
pub use super::payment::Entity as Payment;
pub use super::quiz::Entity as Quiz;
pub use super::quiz_attempt::Entity as QuizAttempt;
pub use super::quiz_question::Entity as QuizQuestion;
pub use super::user::Entity as User;
pub use super::user_course::Entity as UserCourse;
pub use super::user_course_lesson::Entity as UserCourseLesson;
pub use super::user_permission::Entity as UserPermission;
