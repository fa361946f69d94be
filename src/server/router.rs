use std::{sync::Arc, time::Duration};

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    config::Config,
    controller::{
        achievement, admin, ai, assignment, auth, course, enrollment, event, flag, instructor,
        lesson, parent, payment, progress, quiz, student, user,
    },
    error::{config::ConfigError, AppError},
    state::AppState,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "KavyaLearn API", description = "Learning management backend"),
    tags(
        (name = "auth", description = "Registration, login and account"),
        (name = "user", description = "Profile, photo, streak and weekly stats"),
        (name = "course", description = "Course catalog, reviews and certificates"),
        (name = "lesson", description = "Course lessons"),
        (name = "assignment", description = "Course assignments"),
        (name = "quiz", description = "Quizzes and grading"),
        (name = "event", description = "Live classes and events"),
        (name = "enrollment", description = "Paid enrollment lifecycle"),
        (name = "payment", description = "Payments and instructor revenue"),
        (name = "progress", description = "Learning progress and certificate downloads"),
        (name = "achievement", description = "Achievements, points and leaderboard"),
        (name = "student", description = "Student dashboard"),
        (name = "parent", description = "Parent access to linked students"),
        (name = "instructor", description = "Instructor dashboard"),
        (name = "flag", description = "Feature flags"),
        (name = "ai", description = "AI chat proxy, tutor and mock payment checks"),
        (name = "admin", description = "Back office")
    )
)]
struct ApiDoc;

/// Requests allowed per window, replenished one per `period`.
struct RateLimit {
    name: &'static str,
    period: Duration,
    burst: u32,
}

/// 5 login attempts per 15 minutes.
const LOGIN_LIMIT: RateLimit = RateLimit {
    name: "login",
    period: Duration::from_secs(180),
    burst: 5,
};

/// 100 requests per 15 minutes.
const API_LIMIT: RateLimit = RateLimit {
    name: "api",
    period: Duration::from_secs(9),
    burst: 100,
};

/// 10 requests per minute.
const AI_LIMIT: RateLimit = RateLimit {
    name: "ai",
    period: Duration::from_secs(6),
    burst: 10,
};

/// Wraps `router` in a per-client-IP limiter. The IP is taken from forwarding headers
/// when present, otherwise from the peer address.
fn rate_limited(router: Router<AppState>, limit: RateLimit) -> Result<Router<AppState>, AppError> {
    let config = GovernorConfigBuilder::default()
        .period(limit.period)
        .burst_size(limit.burst)
        .key_extractor(SmartIpKeyExtractor)
        .finish()
        .ok_or(ConfigError::InvalidRateLimit(limit.name))?;

    Ok(router.layer(GovernorLayer::new(Arc::new(config))))
}

fn cors(config: &Config) -> CorsLayer {
    let origin = if config.allow_all_origins {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin {}", origin);
                        None
                    }
                }),
        )
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}

fn login_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(auth::login))
        .route("/api/users/login", post(auth::login))
}

fn ai_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(ai::chat))
        .routes(routes!(ai::verify_upi))
        .routes(routes!(ai::process_payment))
        .routes(routes!(ai::query))
        .routes(routes!(ai::history))
        .routes(routes!(ai::get_interaction, ai::delete_interaction))
}

fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        // Account
        .routes(routes!(auth::register))
        .route("/api/users/register", post(auth::register))
        .routes(routes!(auth::get_profile, auth::update_profile))
        .routes(routes!(user::get_profile, user::update_profile))
        .routes(routes!(user::upload_photo))
        .routes(routes!(user::get_streak))
        .routes(routes!(user::get_weekly_stats, user::update_weekly_stats))
        // Catalog
        .routes(routes!(course::create_course, course::list_courses))
        .routes(routes!(
            course::get_course,
            course::update_course,
            course::delete_course
        ))
        .routes(routes!(course::enroll_course))
        .routes(routes!(course::review_course))
        .routes(routes!(course::get_certificate))
        .route(
            "/api/courses/{id}/certificate/pdf",
            get(progress::download_certificate),
        )
        .routes(routes!(lesson::create_lesson, lesson::list_lessons))
        .routes(routes!(
            lesson::get_lesson,
            lesson::update_lesson,
            lesson::delete_lesson
        ))
        .routes(routes!(
            assignment::create_assignment,
            assignment::list_assignments
        ))
        .routes(routes!(
            assignment::get_assignment,
            assignment::update_assignment,
            assignment::delete_assignment
        ))
        .routes(routes!(quiz::create_quiz, quiz::list_quizzes))
        .routes(routes!(quiz::get_quiz, quiz::update_quiz, quiz::delete_quiz))
        .routes(routes!(quiz::submit_quiz))
        .routes(routes!(event::create_event, event::list_events))
        .routes(routes!(event::my_events))
        .routes(routes!(event::upcoming_events))
        .routes(routes!(event::enroll_event))
        .routes(routes!(
            event::get_event,
            event::update_event,
            event::delete_event
        ))
        // Enrollment and payment
        .routes(routes!(enrollment::create_enrollment))
        .routes(routes!(enrollment::activate_enrollment))
        .routes(routes!(enrollment::list_enrollments))
        .routes(routes!(enrollment::enrollment_status))
        .routes(routes!(enrollment::update_enrollment))
        .routes(routes!(payment::create_payment, payment::list_payments))
        .routes(routes!(payment::get_payment, payment::update_payment))
        .routes(routes!(payment::instructor_revenue))
        // Progress and dashboards
        .routes(routes!(progress::overview))
        .routes(routes!(progress::activity))
        .routes(routes!(progress::download_certificate))
        .routes(routes!(achievement::create_achievement))
        .routes(routes!(achievement::my_achievements))
        .routes(routes!(achievement::recent_achievements))
        .routes(routes!(achievement::points))
        .routes(routes!(achievement::leaderboard))
        .routes(routes!(student::dashboard))
        .routes(routes!(student::get_profile, student::update_profile))
        .routes(routes!(student::courses))
        .routes(routes!(student::course))
        .routes(routes!(student::enroll))
        .routes(routes!(student::complete_lesson))
        .routes(routes!(student::achievements))
        .routes(routes!(student::activity))
        .routes(routes!(parent::children))
        .routes(routes!(parent::report))
        .routes(routes!(parent::link_child))
        .routes(routes!(parent::unlink_child))
        .routes(routes!(instructor::courses))
        .routes(routes!(instructor::students))
        .routes(routes!(instructor::student_progress))
        .routes(routes!(flag::list_flags))
        .routes(routes!(flag::get_flag, flag::set_flag))
        // Back office
        .routes(routes!(admin::create_user, admin::list_users))
        .routes(routes!(
            admin::get_user,
            admin::update_user,
            admin::delete_user
        ))
        .routes(routes!(admin::create_course, admin::list_courses))
        .routes(routes!(
            admin::get_course,
            admin::update_course,
            admin::delete_course
        ))
        .routes(routes!(
            admin::create_enrollment,
            admin::list_enrollments
        ))
        .routes(routes!(
            admin::get_enrollment,
            admin::update_enrollment,
            admin::delete_enrollment
        ))
        .routes(routes!(
            admin::create_announcement,
            admin::list_announcements
        ))
        .routes(routes!(admin::delete_announcement))
        .routes(routes!(admin::create_subadmin, admin::list_subadmins))
        .routes(routes!(admin::update_subadmin, admin::delete_subadmin))
        .routes(routes!(admin::list_logs))
        .routes(routes!(admin::dashboard_summary))
}

async fn root() -> &'static str {
    "KavyaLearn API is running..."
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// Assembles every route tree with its rate limits, the Swagger UI at `/api-docs`,
/// CORS and request tracing.
///
/// Login and AI routes carry their own limiter in addition to the general API limit.
///
/// # Returns
/// - `Ok(Router)` - Router ready for `with_state`
/// - `Err(AppError::ConfigErr)` - A rate limit quota could not be built
pub fn router(config: &Config) -> Result<Router<AppState>, AppError> {
    let (login, login_doc) = login_routes().split_for_parts();
    let (ai, ai_doc) = ai_routes().split_for_parts();
    let (api, mut openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(api_routes())
        .split_for_parts();
    openapi.merge(login_doc);
    openapi.merge(ai_doc);

    let routes = rate_limited(
        api.merge(rate_limited(login, LOGIN_LIMIT)?)
            .merge(rate_limited(ai, AI_LIMIT)?),
        API_LIMIT,
    )?;

    Ok(Router::new()
        .route("/", get(root))
        .merge(routes)
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", openapi))
        .fallback(not_found)
        .layer(cors(config))
        .layer(TraceLayer::new_for_http()))
}
