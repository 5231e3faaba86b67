//! services/api/src/web/rest.rs
//!
//! Contains the handlers shared by every role and the master definition for the
//! OpenAPI specification.

use crate::error::http_error;
use crate::web::protocol::*;
use crate::web::state::AppState;
use crate::web::{admin, auth, intern, supervisor};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use interntrack_core::domain::Actor;
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup_handler,
        auth::verify_email_handler,
        auth::login_handler,
        auth::logout_handler,
        me_handler,
        get_task_handler,
        get_user_handler,
        get_complaint_handler,
        admin::list_users_handler,
        admin::delete_user_handler,
        admin::assign_handler,
        admin::unassign_handler,
        admin::analytics_handler,
        admin::activity_handler,
        admin::attendance_handler,
        admin::complaints_handler,
        admin::progress_handler,
        admin::monthly_report_handler,
        admin::monthly_report_csv_handler,
        supervisor::interns_handler,
        supervisor::tasks_handler,
        supervisor::create_task_handler,
        supervisor::rate_task_handler,
        supervisor::attendance_handler,
        supervisor::intern_attendance_handler,
        supervisor::reports_handler,
        supervisor::complaints_handler,
        supervisor::complaint_status_handler,
        intern::supervisor_handler,
        intern::tasks_handler,
        intern::task_status_handler,
        intern::task_report_handler,
        intern::mark_attendance_handler,
        intern::attendance_handler,
        intern::file_complaint_handler,
        intern::complaints_handler,
    ),
    components(
        schemas(
            SignupRequest, VerifyEmailRequest, LoginRequest, CreateTaskRequest, StatusRequest,
            RateTaskRequest, TaskReportRequest, AttendanceRequest, ComplaintRequest,
            AssignRequest, UnassignRequest, AuthResponse, SignupResponse, MessageResponse,
            UserResponse, UserDirectoryResponse, TaskResponse, TaskReportResponse,
            AttendanceResponse, ComplaintResponse, ActivityResponse, AnalyticsResponse,
            MonthlyTaskResponse
        )
    ),
    tags(
        (name = "InternTrack API", description = "Internship management: tasks, attendance, complaints and reporting.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Shared Handlers
//=========================================================================================

/// The authenticated user's own profile.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<UserResponse>, (StatusCode, String)> {
    let user = state.internships.me(&actor).await.map_err(http_error)?;
    Ok(Json(user.into()))
}

/// A single task. Admins see any task; supervisors and interns only their own.
#[utoipa::path(
    get,
    path = "/tasks/{task_id}",
    params(("task_id" = Uuid, Path, description = "The task id.")),
    responses(
        (status = 200, description = "The task", body = TaskResponse),
        (status = 404, description = "No such task in the caller's scope")
    )
)]
pub async fn get_task_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<TaskResponse>, (StatusCode, String)> {
    let task = state
        .internships
        .get_task(&actor, task_id)
        .await
        .map_err(http_error)?;
    Ok(Json(task.into()))
}

/// A single user. Admins see anyone, supervisors see themselves and their interns.
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "The user id.")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 404, description = "No such user in the caller's scope")
    )
)]
pub async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, (StatusCode, String)> {
    let user = state
        .internships
        .get_user(&actor, user_id)
        .await
        .map_err(http_error)?;
    Ok(Json(user.into()))
}

/// A single complaint, visible to its author, the supervisor it was routed to, and admins.
#[utoipa::path(
    get,
    path = "/complaints/{complaint_id}",
    params(("complaint_id" = Uuid, Path, description = "The complaint id.")),
    responses(
        (status = 200, description = "The complaint", body = ComplaintResponse),
        (status = 404, description = "No such complaint in the caller's scope")
    )
)]
pub async fn get_complaint_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(complaint_id): Path<Uuid>,
) -> Result<Json<ComplaintResponse>, (StatusCode, String)> {
    let complaint = state
        .internships
        .get_complaint(&actor, complaint_id)
        .await
        .map_err(http_error)?;
    Ok(Json(complaint.into()))
}
