//! services/api/src/web/intern.rs
//!
//! Endpoints for interns: their tasks, check-ins and complaints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use interntrack_core::domain::Actor;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::http_error;
use crate::web::protocol::{
    list, AttendanceRequest, AttendanceResponse, ComplaintRequest, ComplaintResponse,
    StatusRequest, TaskReportRequest, TaskReportResponse, TaskResponse, UserResponse,
};
use crate::web::state::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

#[utoipa::path(
    get,
    path = "/intern/supervisor",
    responses(
        (status = 200, description = "The caller's supervisor", body = UserResponse),
        (status = 404, description = "No supervisor assigned")
    )
)]
pub async fn supervisor_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<UserResponse> {
    let supervisor = state.internships.my_supervisor(&actor).await.map_err(http_error)?;
    Ok(Json(supervisor.into()))
}

#[utoipa::path(
    get,
    path = "/intern/tasks",
    responses((status = 200, description = "The caller's tasks, newest first", body = [TaskResponse]))
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
    path = "/intern/tasks/{task_id}/status",
    params(("task_id" = Uuid, Path, description = "One of the caller's tasks.")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status updated", body = TaskResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "No such task in the caller's scope")
    )
)]
pub async fn task_status_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<StatusRequest>,
) -> ApiResult<TaskResponse> {
    let task = state
        .internships
        .set_task_status(&actor, task_id, &req.status)
        .await
        .map_err(http_error)?;
    Ok(Json(task.into()))
}

#[utoipa::path(
    post,
    path = "/intern/tasks/{task_id}/report",
    params(("task_id" = Uuid, Path, description = "One of the caller's tasks.")),
    request_body = TaskReportRequest,
    responses(
        (status = 201, description = "Report submitted", body = TaskReportResponse),
        (status = 400, description = "Empty report"),
        (status = 404, description = "No such task in the caller's scope")
    )
)]
pub async fn task_report_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<TaskReportRequest>,
) -> Result<(StatusCode, Json<TaskReportResponse>), (StatusCode, String)> {
    let report = state
        .internships
        .submit_task_report(&actor, task_id, &req.content)
        .await
        .map_err(http_error)?;
    Ok((StatusCode::CREATED, Json(report.into())))
}

/// Records a check-in. The office claim is validated against the configured geofence.
#[utoipa::path(
    post,
    path = "/intern/attendance",
    request_body = AttendanceRequest,
    responses((status = 201, description = "Check-in recorded", body = AttendanceResponse))
)]
pub async fn mark_attendance_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<AttendanceRequest>,
) -> Result<(StatusCode, Json<AttendanceResponse>), (StatusCode, String)> {
    let record = state
        .internships
        .record_attendance(&actor, req.to_check_in(), &state.config.office)
        .await
        .map_err(http_error)?;
    info!(
        "Attendance {} for intern {}: in_office={}, validated={}",
        record.id, record.intern_id, record.in_office, record.location_validated
    );
    Ok((StatusCode::CREATED, Json(record.into())))
}

#[utoipa::path(
    get,
    path = "/intern/attendance",
    responses((status = 200, description = "The caller's check-ins, newest first", body = [AttendanceResponse]))
)]
pub async fn attendance_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<AttendanceResponse>> {
    let records = state.internships.attendance(&actor).await.map_err(http_error)?;
    Ok(Json(list(records)))
}

#[utoipa::path(
    post,
    path = "/intern/complaints",
    request_body = ComplaintRequest,
    responses(
        (status = 201, description = "Complaint filed", body = ComplaintResponse),
        (status = 400, description = "Missing subject or message")
    )
)]
pub async fn file_complaint_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<ComplaintRequest>,
) -> Result<(StatusCode, Json<ComplaintResponse>), (StatusCode, String)> {
    let complaint = state
        .internships
        .file_complaint(&actor, &req.subject, &req.message)
        .await
        .map_err(http_error)?;
    Ok((StatusCode::CREATED, Json(complaint.into())))
}

#[utoipa::path(
    get,
    path = "/intern/complaints",
    responses((status = 200, description = "The caller's complaints, newest first", body = [ComplaintResponse]))
)]
pub async fn complaints_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<ComplaintResponse>> {
    let complaints = state.internships.complaints(&actor).await.map_err(http_error)?;
    Ok(Json(list(complaints)))
}
