//! services/api/src/web/supervisor.rs
//!
//! Endpoints for supervisors: their interns, the tasks they hand out, and the complaints
//! addressed to them.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use interntrack_core::domain::Actor;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::http_error;
use crate::web::protocol::{
    integer, list, AttendanceResponse, ComplaintResponse, CreateTaskRequest, RateTaskRequest,
    StatusRequest, TaskReportResponse, TaskResponse, UserResponse,
};
use crate::web::state::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

#[utoipa::path(
    get,
    path = "/supervisor/interns",
    responses((status = 200, description = "Interns assigned to the caller", body = [UserResponse]))
)]
pub async fn interns_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<UserResponse>> {
    let interns = state.internships.my_interns(&actor).await.map_err(http_error)?;
    Ok(Json(list(interns)))
}

#[utoipa::path(
    get,
    path = "/supervisor/tasks",
    responses((status = 200, description = "Tasks created by the caller, newest first", body = [TaskResponse]))
)]
pub async fn tasks_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<TaskResponse>> {
    let tasks = state.internships.my_tasks(&actor).await.map_err(http_error)?;
    Ok(Json(list(tasks)))
}

#[utoipa::path(
    post,
    path = "/supervisor/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Missing intern or title"),
        (status = 404, description = "Intern not assigned to the caller")
    )
)]
pub async fn create_task_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), (StatusCode, String)> {
    let intern_id = req.intern_id.ok_or((
        StatusCode::BAD_REQUEST,
        "intern and title required".to_string(),
    ))?;
    let task = state
        .internships
        .create_task(&actor, intern_id, &req.title, req.description.as_deref())
        .await
        .map_err(http_error)?;
    Ok((StatusCode::CREATED, Json(task.into())))
}

#[utoipa::path(
    post,
    path = "/supervisor/tasks/{task_id}/rate",
    params(("task_id" = Uuid, Path, description = "The task to rate.")),
    request_body = RateTaskRequest,
    responses(
        (status = 200, description = "Rating stored", body = TaskResponse),
        (status = 400, description = "Rating outside 1-5"),
        (status = 404, description = "No such task in the caller's scope")
    )
)]
pub async fn rate_task_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<RateTaskRequest>,
) -> ApiResult<TaskResponse> {
    let task = state
        .internships
        .rate_task(
            &actor,
            task_id,
            integer(&req.star_rating),
            req.supervisor_feedback.as_deref(),
        )
        .await
        .map_err(http_error)?;
    Ok(Json(task.into()))
}

#[utoipa::path(
    get,
    path = "/supervisor/attendance",
    responses((status = 200, description = "Check-ins of the caller's interns, newest first", body = [AttendanceResponse]))
)]
pub async fn attendance_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<AttendanceResponse>> {
    let records = state.internships.attendance(&actor).await.map_err(http_error)?;
    Ok(Json(list(records)))
}

#[utoipa::path(
    get,
    path = "/supervisor/interns/{intern_id}/attendance",
    params(("intern_id" = Uuid, Path, description = "One of the caller's interns.")),
    responses(
        (status = 200, description = "The intern's recent check-ins", body = [AttendanceResponse]),
        (status = 404, description = "Intern not assigned to the caller")
    )
)]
pub async fn intern_attendance_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(intern_id): Path<Uuid>,
) -> ApiResult<Vec<AttendanceResponse>> {
    let records = state
        .internships
        .intern_attendance(&actor, intern_id)
        .await
        .map_err(http_error)?;
    Ok(Json(list(records)))
}

#[utoipa::path(
    get,
    path = "/supervisor/reports",
    responses((status = 200, description = "Reports on the caller's tasks, newest first", body = [TaskReportResponse]))
)]
pub async fn reports_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<TaskReportResponse>> {
    let reports = state.internships.task_reports(&actor).await.map_err(http_error)?;
    Ok(Json(list(reports)))
}

#[utoipa::path(
    get,
    path = "/supervisor/complaints",
    responses((status = 200, description = "Complaints addressed to the caller", body = [ComplaintResponse]))
)]
pub async fn complaints_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<ComplaintResponse>> {
    let complaints = state.internships.complaints(&actor).await.map_err(http_error)?;
    Ok(Json(list(complaints)))
}

#[utoipa::path(
    post,
    path = "/supervisor/complaints/{complaint_id}/status",
    params(("complaint_id" = Uuid, Path, description = "A complaint addressed to the caller.")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ComplaintResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "No such complaint in the caller's scope")
    )
)]
pub async fn complaint_status_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(complaint_id): Path<Uuid>,
    Json(req): Json<StatusRequest>,
) -> ApiResult<ComplaintResponse> {
    let complaint = state
        .internships
        .set_complaint_status(&actor, complaint_id, &req.status)
        .await
        .map_err(http_error)?;
    Ok(Json(complaint.into()))
}
