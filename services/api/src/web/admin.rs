//! services/api/src/web/admin.rs
//!
//! Admin-only endpoints: the user directory, assignments, oversight lists and the
//! monthly report.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use interntrack_core::domain::Actor;
use interntrack_core::report;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::http_error;
use crate::web::protocol::{
    list, ActivityResponse, AnalyticsResponse, AssignRequest, AttendanceResponse,
    ComplaintResponse, MessageResponse, MonthQuery, MonthlyTaskResponse, TaskResponse,
    UnassignRequest, UserDirectoryResponse, UserResponse,
};
use crate::web::state::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

/// Interns and supervisors, each ordered by name.
#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "All interns and supervisors", body = UserDirectoryResponse),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<UserDirectoryResponse> {
    let directory = state.internships.list_users(&actor).await.map_err(http_error)?;
    Ok(Json(directory.into()))
}

#[utoipa::path(
    delete,
    path = "/admin/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "The user to delete.")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Attempted self-deletion"),
        (status = 404, description = "No such user")
    )
)]
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<MessageResponse> {
    state
        .internships
        .delete_user(&actor, user_id)
        .await
        .map_err(http_error)?;
    Ok(Json(MessageResponse::new("User deleted")))
}

#[utoipa::path(
    post,
    path = "/admin/assign",
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Intern assigned", body = UserResponse),
        (status = 404, description = "Unknown intern or supervisor")
    )
)]
pub async fn assign_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<AssignRequest>,
) -> ApiResult<UserResponse> {
    let intern = state
        .internships
        .assign_intern(&actor, req.intern_id, req.supervisor_id)
        .await
        .map_err(http_error)?;
    Ok(Json(intern.into()))
}

#[utoipa::path(
    post,
    path = "/admin/unassign",
    request_body = UnassignRequest,
    responses(
        (status = 200, description = "Intern unassigned", body = UserResponse),
        (status = 404, description = "Unknown intern")
    )
)]
pub async fn unassign_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<UnassignRequest>,
) -> ApiResult<UserResponse> {
    let intern = state
        .internships
        .unassign_intern(&actor, req.intern_id)
        .await
        .map_err(http_error)?;
    Ok(Json(intern.into()))
}

#[utoipa::path(
    get,
    path = "/admin/analytics",
    responses((status = 200, description = "Headline counts", body = AnalyticsResponse))
)]
pub async fn analytics_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<AnalyticsResponse> {
    let counts = state.internships.analytics(&actor).await.map_err(http_error)?;
    Ok(Json(counts.into()))
}

#[utoipa::path(
    get,
    path = "/admin/activity",
    responses((status = 200, description = "Latest activity, newest first", body = [ActivityResponse]))
)]
pub async fn activity_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<ActivityResponse>> {
    let entries = state.internships.activity_log(&actor).await.map_err(http_error)?;
    Ok(Json(list(entries)))
}

#[utoipa::path(
    get,
    path = "/admin/attendance",
    responses((status = 200, description = "Latest check-ins, newest first", body = [AttendanceResponse]))
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
    path = "/admin/complaints",
    responses((status = 200, description = "Latest complaints, newest first", body = [ComplaintResponse]))
)]
pub async fn complaints_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<ComplaintResponse>> {
    let complaints = state.internships.complaints(&actor).await.map_err(http_error)?;
    Ok(Json(list(complaints)))
}

#[utoipa::path(
    get,
    path = "/admin/progress",
    responses((status = 200, description = "Latest tasks across all interns", body = [TaskResponse]))
)]
pub async fn progress_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<TaskResponse>> {
    let tasks = state.internships.my_tasks(&actor).await.map_err(http_error)?;
    Ok(Json(list(tasks)))
}

#[utoipa::path(
    get,
    path = "/admin/reports/monthly",
    params(MonthQuery),
    responses(
        (status = 200, description = "Tasks created in the month, oldest first", body = [MonthlyTaskResponse]),
        (status = 400, description = "Month outside 1-12")
    )
)]
pub async fn monthly_report_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Vec<MonthlyTaskResponse>> {
    let rows = state
        .internships
        .monthly_task_report(&actor, query.year, query.month)
        .await
        .map_err(http_error)?;
    Ok(Json(list(rows)))
}

/// The monthly report as a CSV download.
#[utoipa::path(
    get,
    path = "/admin/reports/monthly/csv",
    params(MonthQuery),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv"),
        (status = 400, description = "Month outside 1-12")
    )
)]
pub async fn monthly_report_csv_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let csv = state
        .internships
        .monthly_report_csv(&actor, query.year, query.month)
        .await
        .map_err(http_error)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        report::csv_filename(query.year, query.month)
    );
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
