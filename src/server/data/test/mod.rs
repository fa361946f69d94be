mod achievement;
mod course_student;
mod enrollment;
mod feature_flag;
mod user;
mod user_course;
