use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use entity::sea_orm_active_enums::Role;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    model::{
        admin::{
            ActivityLogDto, AdminCreateCourseDto, AdminCreateEnrollmentDto, AdminCreateUserDto,
            AdminUpdateEnrollmentDto, AdminUpdateUserDto, AnnouncementDto,
            CreateAnnouncementDto, CreateSubAdminDto, DashboardSummaryDto, SubAdminDto,
            UpdateSubAdminDto,
        },
        api::{ErrorDto, ListDto, MessageDto},
        course::{CourseDto, UpdateCourseDto},
        enrollment::EnrollmentDto,
        user::UserDto,
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::{
            activity::ActivityLog,
            admin::{Announcement, Capability, SubAdmin},
            course::{Course, CourseFilter},
            enrollment::Enrollment,
            parse_optional_enum,
            user::{User, UserFilter},
        },
        service::admin::{AdminService, PageRequest},
        state::AppState,
    },
};

pub static ADMIN_TAG: &str = "admin";

const ADMIN_ONLY: Permission = Permission::Roles(&[Role::Admin]);
const STAFF: Permission = Permission::Roles(&[Role::Admin, Role::SubAdmin]);
const MANAGE_STUDENTS: Permission = Permission::Capability(Capability::ManageStudents);
const MANAGE_COURSES: Permission = Permission::Capability(Capability::ManageCourses);
const VIEW_REPORTS: Permission = Permission::Capability(Capability::ViewReports);

async fn require(
    state: &AppState,
    headers: &HeaderMap,
    permission: Permission,
) -> Result<User, AppError> {
    AuthGuard::new(&state.db, &state.tokens, headers)
        .require(&[permission])
        .await
}

#[derive(Deserialize, IntoParams)]
pub struct PageParams {
    /// 1-based page number
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageParams {
    fn page(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Deserialize, IntoParams)]
pub struct UserListParams {
    pub role: Option<String>,
    pub status: Option<String>,
    /// Case-insensitive match over name and email
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Deserialize, IntoParams)]
pub struct CourseListParams {
    pub category: Option<String>,
    /// Case-insensitive match over title and description
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

// Users

/// Create an account with any role.
#[utoipa::path(
    post,
    path = "/api/admin/users",
    tag = ADMIN_TAG,
    request_body = AdminCreateUserDto,
    responses(
        (status = 201, description = "Account created", body = UserDto),
        (status = 400, description = "Invalid data or user already exists", body = ErrorDto),
        (status = 403, description = "Requires manageStudents", body = ErrorDto)
    ),
)]
pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AdminCreateUserDto>,
) -> Result<impl IntoResponse, AppError> {
    let admin = require(&state, &headers, MANAGE_STUDENTS).await?;

    let user = AdminService::new(&state.db)
        .create_user(&admin, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(user.into_dto())))
}

/// Page through accounts, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = ADMIN_TAG,
    params(UserListParams),
    responses(
        (status = 200, description = "Page of accounts", body = ListDto<UserDto>),
        (status = 400, description = "Unknown role or status filter", body = ErrorDto),
        (status = 403, description = "Requires manageStudents", body = ErrorDto)
    ),
)]
pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<UserListParams>,
) -> Result<impl IntoResponse, AppError> {
    require(&state, &headers, MANAGE_STUDENTS).await?;

    let filter = UserFilter {
        role: parse_optional_enum("role", params.role)?,
        status: parse_optional_enum("status", params.status)?,
        search: params.search.filter(|s| !s.trim().is_empty()),
    };
    let page = PageRequest {
        page: params.page,
        limit: params.limit,
    };

    let (users, total) = AdminService::new(&state.db)
        .list_users(&filter, page)
        .await?;
    let data = users.into_iter().map(User::into_dto).collect();

    Ok((StatusCode::OK, Json(ListDto { data, total })))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account", body = UserDto),
        (status = 404, description = "User not found", body = ErrorDto)
    ),
)]
pub async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    require(&state, &headers, MANAGE_STUDENTS).await?;

    let user = AdminService::new(&state.db).get_user(id).await?;

    Ok((StatusCode::OK, Json(user.into_dto())))
}

/// Update profile fields, role, status or password of an account.
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "User ID")),
    request_body = AdminUpdateUserDto,
    responses(
        (status = 200, description = "Updated account", body = UserDto),
        (status = 400, description = "Invalid data", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto)
    ),
)]
pub async fn update_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(payload): Json<AdminUpdateUserDto>,
) -> Result<impl IntoResponse, AppError> {
    let admin = require(&state, &headers, MANAGE_STUDENTS).await?;

    let user = AdminService::new(&state.db)
        .update_user(&admin, id, payload)
        .await?;

    Ok((StatusCode::OK, Json(user.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageDto),
        (status = 403, description = "Admin only", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto)
    ),
)]
pub async fn delete_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let admin = require(&state, &headers, ADMIN_ONLY).await?;

    AdminService::new(&state.db).delete_user(&admin, id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("User deleted"))))
}

// Courses

/// Create a course on behalf of an instructor, or of the caller when none is given.
#[utoipa::path(
    post,
    path = "/api/admin/courses",
    tag = ADMIN_TAG,
    request_body = AdminCreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = CourseDto),
        (status = 400, description = "Invalid course data", body = ErrorDto),
        (status = 403, description = "Requires manageCourses", body = ErrorDto)
    ),
)]
pub async fn create_course(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AdminCreateCourseDto>,
) -> Result<impl IntoResponse, AppError> {
    let admin = require(&state, &headers, MANAGE_COURSES).await?;

    let course = AdminService::new(&state.db)
        .create_course(&admin, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(course.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/admin/courses",
    tag = ADMIN_TAG,
    params(CourseListParams),
    responses(
        (status = 200, description = "Page of courses", body = ListDto<CourseDto>),
        (status = 403, description = "Requires manageCourses", body = ErrorDto)
    ),
)]
pub async fn list_courses(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CourseListParams>,
) -> Result<impl IntoResponse, AppError> {
    require(&state, &headers, MANAGE_COURSES).await?;

    let filter = CourseFilter {
        keyword: params.search.filter(|s| !s.trim().is_empty()),
        category: params.category.filter(|c| !c.trim().is_empty()),
        instructor_id: None,
    };
    let page = PageRequest {
        page: params.page,
        limit: params.limit,
    };

    let (courses, total) = AdminService::new(&state.db)
        .list_courses(&filter, page)
        .await?;
    let data = courses.into_iter().map(Course::into_dto).collect();

    Ok((StatusCode::OK, Json(ListDto { data, total })))
}

#[utoipa::path(
    get,
    path = "/api/admin/courses/{id}",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course with instructor", body = CourseDto),
        (status = 404, description = "Course not found", body = ErrorDto)
    ),
)]
pub async fn get_course(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    require(&state, &headers, MANAGE_COURSES).await?;

    let course = AdminService::new(&state.db).get_course(id).await?;

    Ok((StatusCode::OK, Json(course.into_dto())))
}

#[utoipa::path(
    put,
    path = "/api/admin/courses/{id}",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "Course ID")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Updated course", body = CourseDto),
        (status = 404, description = "Course not found", body = ErrorDto)
    ),
)]
pub async fn update_course(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCourseDto>,
) -> Result<impl IntoResponse, AppError> {
    let admin = require(&state, &headers, MANAGE_COURSES).await?;

    let course = AdminService::new(&state.db)
        .update_course(&admin, id, payload)
        .await?;

    Ok((StatusCode::OK, Json(course.into_dto())))
}

/// Delete a course with its lessons, enrollments and progress rows.
#[utoipa::path(
    delete,
    path = "/api/admin/courses/{id}",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course deleted", body = MessageDto),
        (status = 403, description = "Admin only", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto)
    ),
)]
pub async fn delete_course(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let admin = require(&state, &headers, ADMIN_ONLY).await?;

    AdminService::new(&state.db).delete_course(&admin, id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Course deleted"))))
}

// Enrollments

/// Enroll a student directly. The enrollment starts active.
#[utoipa::path(
    post,
    path = "/api/admin/enrollments",
    tag = ADMIN_TAG,
    request_body = AdminCreateEnrollmentDto,
    responses(
        (status = 201, description = "Enrollment created", body = EnrollmentDto),
        (status = 400, description = "Missing ids or student already enrolled", body = ErrorDto),
        (status = 404, description = "Student or course not found", body = ErrorDto)
    ),
)]
pub async fn create_enrollment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AdminCreateEnrollmentDto>,
) -> Result<impl IntoResponse, AppError> {
    let admin = require(&state, &headers, MANAGE_STUDENTS).await?;

    let enrollment = AdminService::new(&state.db)
        .create_enrollment(&admin, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(enrollment.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/admin/enrollments",
    tag = ADMIN_TAG,
    params(PageParams),
    responses(
        (status = 200, description = "Page of enrollments", body = ListDto<EnrollmentDto>),
        (status = 403, description = "Requires manageStudents", body = ErrorDto)
    ),
)]
pub async fn list_enrollments(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    require(&state, &headers, MANAGE_STUDENTS).await?;

    let (enrollments, total) = AdminService::new(&state.db)
        .list_enrollments(params.page())
        .await?;
    let data = enrollments.into_iter().map(Enrollment::into_dto).collect();

    Ok((StatusCode::OK, Json(ListDto { data, total })))
}

#[utoipa::path(
    get,
    path = "/api/admin/enrollments/{id}",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment", body = EnrollmentDto),
        (status = 404, description = "Enrollment not found", body = ErrorDto)
    ),
)]
pub async fn get_enrollment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    require(&state, &headers, MANAGE_STUDENTS).await?;

    let enrollment = AdminService::new(&state.db).get_enrollment(id).await?;

    Ok((StatusCode::OK, Json(enrollment.into_dto())))
}

#[utoipa::path(
    put,
    path = "/api/admin/enrollments/{id}",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "Enrollment ID")),
    request_body = AdminUpdateEnrollmentDto,
    responses(
        (status = 200, description = "Updated enrollment", body = EnrollmentDto),
        (status = 404, description = "Enrollment not found", body = ErrorDto)
    ),
)]
pub async fn update_enrollment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(payload): Json<AdminUpdateEnrollmentDto>,
) -> Result<impl IntoResponse, AppError> {
    let admin = require(&state, &headers, MANAGE_STUDENTS).await?;

    let enrollment = AdminService::new(&state.db)
        .update_enrollment(&admin, id, payload)
        .await?;

    Ok((StatusCode::OK, Json(enrollment.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/admin/enrollments/{id}",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment deleted", body = MessageDto),
        (status = 403, description = "Admin only", body = ErrorDto),
        (status = 404, description = "Enrollment not found", body = ErrorDto)
    ),
)]
pub async fn delete_enrollment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let admin = require(&state, &headers, ADMIN_ONLY).await?;

    AdminService::new(&state.db)
        .delete_enrollment(&admin, id)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Enrollment deleted"))))
}

// Announcements

#[utoipa::path(
    post,
    path = "/api/admin/announcements",
    tag = ADMIN_TAG,
    request_body = CreateAnnouncementDto,
    responses(
        (status = 201, description = "Announcement created", body = AnnouncementDto),
        (status = 400, description = "Title and message required", body = ErrorDto),
        (status = 403, description = "Requires manageCourses", body = ErrorDto)
    ),
)]
pub async fn create_announcement(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateAnnouncementDto>,
) -> Result<impl IntoResponse, AppError> {
    let admin = require(&state, &headers, MANAGE_COURSES).await?;

    let announcement = AdminService::new(&state.db)
        .create_announcement(&admin, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(announcement.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/admin/announcements",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Most recent announcements", body = Vec<AnnouncementDto>),
        (status = 403, description = "Admins and sub-admins only", body = ErrorDto)
    ),
)]
pub async fn list_announcements(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    require(&state, &headers, STAFF).await?;

    let announcements: Vec<AnnouncementDto> = AdminService::new(&state.db)
        .list_announcements()
        .await?
        .into_iter()
        .map(Announcement::into_dto)
        .collect();

    Ok((StatusCode::OK, Json(announcements)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/announcements/{id}",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "Announcement ID")),
    responses(
        (status = 200, description = "Announcement deleted", body = MessageDto),
        (status = 404, description = "Announcement not found", body = ErrorDto)
    ),
)]
pub async fn delete_announcement(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let admin = require(&state, &headers, ADMIN_ONLY).await?;

    AdminService::new(&state.db)
        .delete_announcement(&admin, id)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Announcement deleted"))))
}

// Sub-admins

/// Create a sub-admin holding a subset of `manageStudents`, `manageCourses` and `viewReports`.
#[utoipa::path(
    post,
    path = "/api/admin/subadmins",
    tag = ADMIN_TAG,
    request_body = CreateSubAdminDto,
    responses(
        (status = 201, description = "Sub-admin created", body = SubAdminDto),
        (status = 400, description = "Invalid data, unknown permission or user already exists", body = ErrorDto),
        (status = 403, description = "Admin only", body = ErrorDto)
    ),
)]
pub async fn create_subadmin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateSubAdminDto>,
) -> Result<impl IntoResponse, AppError> {
    let admin = require(&state, &headers, ADMIN_ONLY).await?;

    let subadmin = AdminService::new(&state.db)
        .create_subadmin(&admin, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(subadmin.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/admin/subadmins",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Sub-admins with their permissions", body = Vec<SubAdminDto>),
        (status = 403, description = "Admins and sub-admins only", body = ErrorDto)
    ),
)]
pub async fn list_subadmins(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    require(&state, &headers, STAFF).await?;

    let subadmins: Vec<SubAdminDto> = AdminService::new(&state.db)
        .list_subadmins()
        .await?
        .into_iter()
        .map(SubAdmin::into_dto)
        .collect();

    Ok((StatusCode::OK, Json(subadmins)))
}

#[utoipa::path(
    put,
    path = "/api/admin/subadmins/{id}",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "Sub-admin user ID")),
    request_body = UpdateSubAdminDto,
    responses(
        (status = 200, description = "Updated sub-admin", body = SubAdminDto),
        (status = 400, description = "Unknown permission or status", body = ErrorDto),
        (status = 404, description = "Sub-admin not found", body = ErrorDto)
    ),
)]
pub async fn update_subadmin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateSubAdminDto>,
) -> Result<impl IntoResponse, AppError> {
    let admin = require(&state, &headers, ADMIN_ONLY).await?;

    let subadmin = AdminService::new(&state.db)
        .update_subadmin(&admin, id, payload)
        .await?;

    Ok((StatusCode::OK, Json(subadmin.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/admin/subadmins/{id}",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "Sub-admin user ID")),
    responses(
        (status = 200, description = "Sub-admin deleted", body = MessageDto),
        (status = 404, description = "Sub-admin not found", body = ErrorDto)
    ),
)]
pub async fn delete_subadmin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let admin = require(&state, &headers, ADMIN_ONLY).await?;

    AdminService::new(&state.db)
        .delete_subadmin(&admin, id)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Sub-admin deleted"))))
}

// Reports

/// Page through the activity log, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/logs",
    tag = ADMIN_TAG,
    params(PageParams),
    responses(
        (status = 200, description = "Page of activity entries", body = ListDto<ActivityLogDto>),
        (status = 403, description = "Requires viewReports", body = ErrorDto)
    ),
)]
pub async fn list_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    require(&state, &headers, VIEW_REPORTS).await?;

    let (logs, total) = AdminService::new(&state.db).logs(params.page()).await?;
    let data = logs.into_iter().map(ActivityLog::into_dto).collect();

    Ok((StatusCode::OK, Json(ListDto { data, total })))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/summary",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Platform counters", body = DashboardSummaryDto),
        (status = 403, description = "Requires viewReports", body = ErrorDto)
    ),
)]
pub async fn dashboard_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    require(&state, &headers, VIEW_REPORTS).await?;

    let summary = AdminService::new(&state.db).dashboard_summary().await?;

    Ok((StatusCode::OK, Json(summary.into_dto())))
}
