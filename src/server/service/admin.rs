//! Administrative back office: users, courses, enrollments, announcements, sub-admins
//! and the activity log.
//!
//! Every mutation appends an activity log entry naming the acting administrator.

use entity::sea_orm_active_enums::{Audience, EnrollmentStatus, Role};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde_json::json;

use crate::{
    model::{
        admin::{
            AdminCreateCourseDto, AdminCreateEnrollmentDto, AdminCreateUserDto,
            AdminUpdateEnrollmentDto, AdminUpdateUserDto, CreateAnnouncementDto,
            CreateSubAdminDto, UpdateSubAdminDto,
        },
        course::{CreateCourseDto, UpdateCourseDto},
    },
    server::{
        data::{
            activity_log::ActivityLogRepository,
            announcement::AnnouncementRepository,
            course::{CourseRepository, CourseStudentRepository},
            enrollment::EnrollmentRepository,
            user::UserRepository,
            user_course::UserCourseRepository,
        },
        error::{auth::AuthError, AppError},
        model::{
            activity::{ActivityLog, NewActivity, TargetType},
            admin::{
                parse_capabilities, Announcement, CreateAnnouncementParams, DashboardSummary,
                SubAdmin,
            },
            course::{Course, CourseFilter, CreateCourseParams, UpdateCourseParams},
            enrollment::{Enrollment, UpdateEnrollmentParams},
            parse_optional_enum,
            user::{CreateUserParams, UpdateUserParams, User, UserFilter},
        },
        service::{
            activity::ActivityLogger, auth::validate_password, course::CourseService, MAX_PAGE,
        },
        util::{
            parse::{is_valid_email, normalize_email},
            password::hash_password,
        },
    },
};

/// Announcements returned by the listing.
pub const ANNOUNCEMENT_LIMIT: u64 = 100;
const MAX_PAGE_SIZE: u64 = 100;

/// 1-based page and page size from a query string.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageRequest {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageRequest {
    /// Offset and limit, falling back to page 1 and `default_limit`.
    pub fn resolve(&self, default_limit: u64) -> (u64, u64) {
        let page = self.page.filter(|p| *p > 0).unwrap_or(1).min(MAX_PAGE);
        let limit = self
            .limit
            .filter(|l| *l > 0)
            .unwrap_or(default_limit)
            .min(MAX_PAGE_SIZE);

        ((page - 1).saturating_mul(limit), limit)
    }
}

pub struct AdminService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AdminService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    async fn log(
        &self,
        admin: &User,
        action: &str,
        target: TargetType,
        target_id: i32,
        details: Option<serde_json::Value>,
    ) {
        let mut activity = NewActivity::new(action, admin.id).target(target, target_id);
        if let Some(details) = details {
            activity = activity.details(details);
        }
        ActivityLogger::new(self.db).record(activity).await;
    }

    // Users

    /// Creates an account with any role.
    ///
    /// # Returns
    /// - `Ok(User)` - The created account
    /// - `Err(AppError::BadRequest)` - Validation failed or the email is taken
    pub async fn create_user(
        &self,
        admin: &User,
        dto: AdminCreateUserDto,
    ) -> Result<User, AppError> {
        let user = self.insert_user(dto).await?;

        self.log(
            admin,
            "create_user",
            TargetType::User,
            user.id,
            Some(json!({ "email": user.email })),
        )
        .await;

        Ok(user)
    }

    async fn insert_user(&self, dto: AdminCreateUserDto) -> Result<User, AppError> {
        let full_name = dto.full_name.trim().to_string();
        let email = normalize_email(&dto.email);
        if full_name.is_empty() {
            return Err(AppError::BadRequest("Full name required".to_string()));
        }
        if !is_valid_email(&email) {
            return Err(AppError::BadRequest("Valid email required".to_string()));
        }
        validate_password(&dto.password)?;
        let role = parse_optional_enum("role", dto.role.filter(|r| !r.is_empty()))?
            .unwrap_or(Role::Student);

        let user_repo = UserRepository::new(self.db);
        if user_repo.email_exists(&email).await? {
            return Err(AppError::BadRequest("User already exists".to_string()));
        }

        let user = user_repo
            .create(CreateUserParams {
                full_name,
                email,
                password_hash: hash_password(&dto.password)?,
                role,
                phone: dto.phone,
                address: dto.address,
            })
            .await?;

        tracing::info!("Created user {} as {:?}", user.id, user.role);

        Ok(user)
    }

    pub async fn list_users(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), AppError> {
        let (offset, limit) = page.resolve(20);

        Ok(UserRepository::new(self.db)
            .list(filter, offset, limit)
            .await?)
    }

    pub async fn get_user(&self, user_id: i32) -> Result<User, AppError> {
        UserRepository::new(self.db)
            .find_by_id(user_id)
            .await?
            .ok_or_else(user_not_found)
    }

    /// Merges the provided fields into an account. A new password is hashed.
    pub async fn update_user(
        &self,
        admin: &User,
        user_id: i32,
        dto: AdminUpdateUserDto,
    ) -> Result<User, AppError> {
        let user_repo = UserRepository::new(self.db);
        let existing = user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(user_not_found)?;

        let email = match dto.email.as_deref() {
            Some(raw) => {
                let email = normalize_email(raw);
                if !is_valid_email(&email) {
                    return Err(AppError::BadRequest("Valid email required".to_string()));
                }
                if email != existing.email && user_repo.email_exists(&email).await? {
                    return Err(AppError::BadRequest("Email already in use".to_string()));
                }
                Some(email)
            }
            None => None,
        };
        let password_hash = match dto.password.as_deref() {
            Some(password) => {
                validate_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        let details = json!({
            "fullName": dto.full_name,
            "email": email,
            "role": dto.role,
            "status": dto.status,
            "passwordChanged": password_hash.is_some(),
        });

        let user = user_repo
            .update(
                user_id,
                UpdateUserParams {
                    full_name: dto.full_name.map(|n| n.trim().to_string()),
                    email,
                    password_hash,
                    role: parse_optional_enum("role", dto.role)?,
                    status: parse_optional_enum("status", dto.status)?,
                    phone: dto.phone,
                    bio: dto.bio,
                    location: dto.location,
                    address: dto.address,
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(user_not_found)?;

        self.log(admin, "update_user", TargetType::User, user.id, Some(details))
            .await;

        Ok(user)
    }

    /// Deletes an account. Only full administrators may delete.
    pub async fn delete_user(&self, admin: &User, user_id: i32) -> Result<(), AppError> {
        if !admin.is_admin() {
            return Err(AuthError::InsufficientRole.into());
        }

        let deleted = UserRepository::new(self.db).delete(user_id).await?;
        if !deleted {
            return Err(user_not_found());
        }

        self.log(admin, "delete_user", TargetType::User, user_id, None)
            .await;

        Ok(())
    }

    // Courses

    /// Creates a course owned by the given instructor, or by the admin when none is named.
    pub async fn create_course(
        &self,
        admin: &User,
        dto: AdminCreateCourseDto,
    ) -> Result<Course, AppError> {
        let instructor_id = match dto.instructor_id {
            Some(id) => {
                UserRepository::new(self.db)
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Instructor not found".to_string()))?;
                id
            }
            None => admin.id,
        };

        let params = CreateCourseParams::from_dto(
            instructor_id,
            CreateCourseDto {
                title: dto.title,
                description: dto.description,
                category: dto.category,
                level: dto.level,
                price: dto.price,
                duration: dto.duration,
                thumbnail: dto.thumbnail,
                is_published: dto.is_published,
            },
        )?;
        let course = CourseService::new(self.db).create(params).await?;

        self.log(
            admin,
            "create_course",
            TargetType::Course,
            course.id,
            Some(json!({ "title": course.title, "instructorId": course.instructor_id })),
        )
        .await;

        Ok(course)
    }

    pub async fn list_courses(
        &self,
        filter: &CourseFilter,
        page: PageRequest,
    ) -> Result<(Vec<Course>, u64), AppError> {
        let (offset, limit) = page.resolve(20);

        Ok(CourseRepository::new(self.db)
            .list(filter, offset, limit)
            .await?)
    }

    pub async fn get_course(&self, course_id: i32) -> Result<Course, AppError> {
        let course = CourseService::new(self.db).require(course_id).await?;
        let instructor = UserRepository::new(self.db)
            .find_by_id(course.instructor_id)
            .await?
            .map(|u| u.to_summary());

        Ok(course.with_instructor(instructor))
    }

    pub async fn update_course(
        &self,
        admin: &User,
        course_id: i32,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let details = serde_json::to_value(&dto).ok();
        let course = CourseRepository::new(self.db)
            .update(course_id, UpdateCourseParams::from_dto(dto)?)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        self.log(admin, "update_course", TargetType::Course, course.id, details)
            .await;

        Ok(course)
    }

    /// Deletes a course with the same cascade as instructor deletes.
    pub async fn delete_course(&self, admin: &User, course_id: i32) -> Result<(), AppError> {
        let deleted = CourseService::new(self.db).delete_cascade(course_id).await?;
        if !deleted {
            return Err(AppError::NotFound("Course not found".to_string()));
        }

        self.log(admin, "delete_course", TargetType::Course, course_id, None)
            .await;

        Ok(())
    }

    // Enrollments

    /// Enrolls a student without payment. The enrollment starts active and the
    /// student joins the course roster and progress list.
    ///
    /// # Returns
    /// - `Ok(Enrollment)` - The active enrollment
    /// - `Err(AppError::BadRequest)` - Missing ids or the student is already enrolled
    /// - `Err(AppError::NotFound)` - Unknown student or course
    pub async fn create_enrollment(
        &self,
        admin: &User,
        dto: AdminCreateEnrollmentDto,
    ) -> Result<Enrollment, AppError> {
        let (Some(student_id), Some(course_id)) = (dto.student_id, dto.course_id) else {
            return Err(AppError::BadRequest(
                "studentId and courseId required".to_string(),
            ));
        };

        UserRepository::new(self.db)
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
        CourseService::new(self.db).require(course_id).await?;

        if EnrollmentRepository::new(self.db)
            .find_by_pair(student_id, course_id)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest("Student already enrolled".to_string()));
        }

        let txn = self.db.begin().await?;
        let enrollment = EnrollmentRepository::new(&txn)
            .create(student_id, course_id, EnrollmentStatus::Active)
            .await?;
        UserCourseRepository::new(&txn)
            .ensure(student_id, course_id)
            .await?;
        CourseStudentRepository::new(&txn)
            .add(course_id, student_id)
            .await?;
        txn.commit().await?;

        self.log(
            admin,
            "create_enrollment",
            TargetType::Enrollment,
            enrollment.id,
            Some(json!({ "studentId": student_id, "courseId": course_id })),
        )
        .await;

        Ok(enrollment)
    }

    pub async fn list_enrollments(
        &self,
        page: PageRequest,
    ) -> Result<(Vec<Enrollment>, u64), AppError> {
        let (offset, limit) = page.resolve(50);

        Ok(EnrollmentRepository::new(self.db)
            .list(offset, limit)
            .await?)
    }

    pub async fn get_enrollment(&self, enrollment_id: i32) -> Result<Enrollment, AppError> {
        EnrollmentRepository::new(self.db)
            .find_by_id(enrollment_id)
            .await?
            .ok_or_else(enrollment_not_found)
    }

    pub async fn update_enrollment(
        &self,
        admin: &User,
        enrollment_id: i32,
        dto: AdminUpdateEnrollmentDto,
    ) -> Result<Enrollment, AppError> {
        let details = serde_json::to_value(&dto).ok();

        let mut status = parse_optional_enum("enrollmentStatus", dto.enrollment_status)?;
        if dto.completed == Some(true) {
            status = Some(EnrollmentStatus::Completed);
        }

        let enrollment = EnrollmentRepository::new(self.db)
            .update(
                enrollment_id,
                UpdateEnrollmentParams {
                    status,
                    progress_percentage: dto.progress_percentage,
                    watch_hours: dto.watch_hours,
                    completed: dto.completed,
                    grade: dto.grade,
                    feedback: dto.feedback,
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(enrollment_not_found)?;

        self.log(
            admin,
            "update_enrollment",
            TargetType::Enrollment,
            enrollment.id,
            details,
        )
        .await;

        Ok(enrollment)
    }

    /// Deletes an enrollment and takes the student off the course roster.
    pub async fn delete_enrollment(&self, admin: &User, enrollment_id: i32) -> Result<(), AppError> {
        let enrollment = self.get_enrollment(enrollment_id).await?;

        let txn = self.db.begin().await?;
        EnrollmentRepository::new(&txn).delete(enrollment_id).await?;
        CourseStudentRepository::new(&txn)
            .remove(enrollment.course_id, enrollment.student_id)
            .await?;
        txn.commit().await?;

        self.log(
            admin,
            "delete_enrollment",
            TargetType::Enrollment,
            enrollment_id,
            None,
        )
        .await;

        Ok(())
    }

    // Announcements

    pub async fn create_announcement(
        &self,
        admin: &User,
        dto: CreateAnnouncementDto,
    ) -> Result<Announcement, AppError> {
        let title = dto.title.trim().to_string();
        let message = dto.message.trim().to_string();
        if title.is_empty() || message.is_empty() {
            return Err(AppError::BadRequest(
                "Title and message required".to_string(),
            ));
        }
        let target_role = parse_optional_enum("targetRole", dto.target_role)?
            .unwrap_or(Audience::All);

        let announcement = AnnouncementRepository::new(self.db)
            .create(CreateAnnouncementParams {
                title,
                message,
                target_role,
                created_by: admin.id,
            })
            .await?;

        self.log(
            admin,
            "create_announcement",
            TargetType::Announcement,
            announcement.id,
            Some(json!({ "title": announcement.title })),
        )
        .await;

        Ok(announcement)
    }

    pub async fn list_announcements(&self) -> Result<Vec<Announcement>, AppError> {
        Ok(AnnouncementRepository::new(self.db)
            .recent(ANNOUNCEMENT_LIMIT)
            .await?)
    }

    pub async fn delete_announcement(
        &self,
        admin: &User,
        announcement_id: i32,
    ) -> Result<(), AppError> {
        let deleted = AnnouncementRepository::new(self.db)
            .delete(announcement_id)
            .await?;
        if !deleted {
            return Err(AppError::NotFound("Announcement not found".to_string()));
        }

        self.log(
            admin,
            "delete_announcement",
            TargetType::Announcement,
            announcement_id,
            None,
        )
        .await;

        Ok(())
    }

    // Sub-admins

    /// Creates a sub-admin holding the given capabilities.
    pub async fn create_subadmin(
        &self,
        admin: &User,
        dto: CreateSubAdminDto,
    ) -> Result<SubAdmin, AppError> {
        let permissions = parse_capabilities(&dto.permissions)?;

        let user = self
            .insert_user(AdminCreateUserDto {
                full_name: dto.full_name,
                email: dto.email,
                password: dto.password,
                role: Some("sub-admin".to_string()),
                phone: None,
                address: None,
            })
            .await?;
        UserRepository::new(self.db)
            .set_permissions(user.id, &permissions)
            .await?;

        self.log(
            admin,
            "create_subadmin",
            TargetType::User,
            user.id,
            Some(json!({ "permissions": permissions })),
        )
        .await;

        Ok(SubAdmin { user, permissions })
    }

    pub async fn list_subadmins(&self) -> Result<Vec<SubAdmin>, AppError> {
        let user_repo = UserRepository::new(self.db);
        let users = user_repo.list_by_role(Role::SubAdmin).await?;

        let mut subadmins = Vec::with_capacity(users.len());
        for user in users {
            let permissions = user_repo.permissions(user.id).await?;
            subadmins.push(SubAdmin { user, permissions });
        }

        Ok(subadmins)
    }

    pub async fn update_subadmin(
        &self,
        admin: &User,
        user_id: i32,
        dto: UpdateSubAdminDto,
    ) -> Result<SubAdmin, AppError> {
        self.require_subadmin(user_id).await?;

        let permissions = dto
            .permissions
            .as_deref()
            .map(parse_capabilities)
            .transpose()?;

        let user_repo = UserRepository::new(self.db);
        let user = user_repo
            .update(
                user_id,
                UpdateUserParams {
                    full_name: dto.full_name.map(|n| n.trim().to_string()),
                    status: parse_optional_enum("status", dto.status)?,
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(subadmin_not_found)?;
        if let Some(permissions) = &permissions {
            user_repo.set_permissions(user_id, permissions).await?;
        }
        let permissions = user_repo.permissions(user_id).await?;

        self.log(
            admin,
            "update_subadmin",
            TargetType::User,
            user_id,
            Some(json!({ "permissions": permissions })),
        )
        .await;

        Ok(SubAdmin { user, permissions })
    }

    pub async fn delete_subadmin(&self, admin: &User, user_id: i32) -> Result<(), AppError> {
        self.require_subadmin(user_id).await?;

        UserRepository::new(self.db).delete(user_id).await?;

        self.log(admin, "delete_subadmin", TargetType::User, user_id, None)
            .await;

        Ok(())
    }

    async fn require_subadmin(&self, user_id: i32) -> Result<User, AppError> {
        UserRepository::new(self.db)
            .find_by_id(user_id)
            .await?
            .filter(|u| u.role == Role::SubAdmin)
            .ok_or_else(subadmin_not_found)
    }

    // Reporting

    /// A page of the activity log with performer summaries attached.
    pub async fn logs(&self, page: PageRequest) -> Result<(Vec<ActivityLog>, u64), AppError> {
        let (offset, limit) = page.resolve(50);
        let (logs, total) = ActivityLogRepository::new(self.db)
            .list(offset, limit)
            .await?;

        let performer_ids: Vec<i32> = logs.iter().filter_map(|l| l.performed_by_id).collect();
        let performers = UserRepository::new(self.db)
            .find_by_ids(&performer_ids)
            .await?;

        let logs = logs
            .into_iter()
            .map(|log| {
                let performer = log
                    .performed_by_id
                    .and_then(|id| performers.get(&id))
                    .map(User::to_summary);
                log.with_performer(performer)
            })
            .collect();

        Ok((logs, total))
    }

    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, AppError> {
        let user_repo = UserRepository::new(self.db);
        let enrollment_repo = EnrollmentRepository::new(self.db);

        Ok(DashboardSummary {
            total_students: user_repo.count_by_role(Role::Student).await?,
            total_parents: user_repo.count_by_role(Role::Parent).await?,
            total_instructors: user_repo.count_by_role(Role::Instructor).await?,
            total_courses: CourseRepository::new(self.db).count().await?,
            total_enrollments: enrollment_repo.count().await?,
            completed_courses: enrollment_repo.count_completed().await?,
        })
    }
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

fn subadmin_not_found() -> AppError {
    AppError::NotFound("Sub-admin not found".to_string())
}

fn enrollment_not_found() -> AppError {
    AppError::NotFound("Enrollment not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_defaults_and_caps() {
        assert_eq!(PageRequest::default().resolve(20), (0, 20));
        assert_eq!(
            PageRequest {
                page: Some(3),
                limit: Some(10)
            }
            .resolve(20),
            (20, 10)
        );
        assert_eq!(
            PageRequest {
                page: Some(0),
                limit: Some(1000)
            }
            .resolve(20),
            (0, 100)
        );
    }

    #[test]
    fn page_request_clamps_huge_page() {
        let (offset, limit) = PageRequest {
            page: Some(u64::MAX),
            limit: Some(20),
        }
        .resolve(20);

        assert_eq!(limit, 20);
        assert_eq!(offset, (MAX_PAGE - 1) * 20);
    }
}
