//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser client and the API server,
//! plus the lenient parsers used for hand-built form submissions.

use chrono::{DateTime, Utc};
use interntrack_core::domain::{
    ActivityLog, Analytics, Attendance, Complaint, MonthlyTaskRow, Task, TaskReport, User,
};
use interntrack_core::service::{CheckIn, UserDirectory};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

//=========================================================================================
// Payloads Sent FROM the Client TO the Server
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    pub password: String,
    /// `INTERN` or `SUPERVISOR`.
    pub role: String,
}

#[derive(Deserialize, ToSchema)]
pub struct VerifyEmailRequest {
    pub token: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    pub intern_id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct StatusRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RateTaskRequest {
    /// An integer 1-5, as a number or a numeric string.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub star_rating: Value,
    pub supervisor_feedback: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct TaskReportRequest {
    #[serde(default)]
    pub content: String,
}

/// A check-in as submitted by the browser. Every field is parsed leniently.
#[derive(Deserialize, ToSchema, Default)]
pub struct AttendanceRequest {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub in_office: Value,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub lat: Value,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub lng: Value,
}

impl AttendanceRequest {
    pub fn to_check_in(&self) -> CheckIn {
        CheckIn {
            in_office: claim_flag(&self.in_office),
            lat: coordinate(&self.lat),
            lng: coordinate(&self.lng),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct ComplaintRequest {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AssignRequest {
    pub intern_id: Uuid,
    pub supervisor_id: Uuid,
}

#[derive(Deserialize, ToSchema)]
pub struct UnassignRequest {
    pub intern_id: Uuid,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

//=========================================================================================
// Lenient Parsers
//=========================================================================================

/// Accepts exactly `true`, `1` (any numeric form equal to one), `"true"`, `"True"` and `"1"`.
pub fn claim_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => matches!(s.as_str(), "true" | "True" | "1"),
        _ => false,
    }
}

/// A number or a numeric string; anything else is treated as absent.
pub fn coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// A whole number or a string holding one.
pub fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

//=========================================================================================
// Payloads Sent FROM the Server TO the Client
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub email: String,
}

#[derive(Serialize, ToSchema)]
pub struct SignupResponse {
    pub user_id: Uuid,
    pub email: String,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub employee_id: String,
    pub department: String,
    pub supervisor_id: Option<Uuid>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            role: user.role.to_string(),
            email: user.email,
            full_name: user.full_name,
            employee_id: user.employee_id,
            department: user.department,
            supervisor_id: user.supervisor_id,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct UserDirectoryResponse {
    pub interns: Vec<UserResponse>,
    pub supervisors: Vec<UserResponse>,
}

impl From<UserDirectory> for UserDirectoryResponse {
    fn from(directory: UserDirectory) -> Self {
        Self {
            interns: list(directory.interns),
            supervisors: list(directory.supervisors),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct TaskResponse {
    pub id: Uuid,
    pub supervisor_id: Uuid,
    pub intern_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub star_rating: Option<u8>,
    pub supervisor_feedback: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            supervisor_id: task.supervisor_id,
            intern_id: task.intern_id,
            title: task.title,
            description: task.description,
            status: task.status.to_string(),
            star_rating: task.star_rating.map(|r| r.value()),
            supervisor_feedback: task.supervisor_feedback,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct TaskReportResponse {
    pub id: Uuid,
    pub task_id: Uuid,
    pub intern_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<TaskReport> for TaskReportResponse {
    fn from(report: TaskReport) -> Self {
        Self {
            id: report.id,
            task_id: report.task_id,
            intern_id: report.intern_id,
            content: report.content,
            created_at: report.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceResponse {
    pub id: Uuid,
    pub intern_id: Uuid,
    pub in_office: bool,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub office_distance_m: Option<f64>,
    pub location_validated: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Attendance> for AttendanceResponse {
    fn from(a: Attendance) -> Self {
        Self {
            id: a.id,
            intern_id: a.intern_id,
            in_office: a.in_office,
            lat: a.lat,
            lng: a.lng,
            office_distance_m: a.office_distance_m,
            location_validated: a.location_validated,
            created_at: a.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ComplaintResponse {
    pub id: Uuid,
    pub intern_id: Uuid,
    pub supervisor_id: Option<Uuid>,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Complaint> for ComplaintResponse {
    fn from(c: Complaint) -> Self {
        Self {
            id: c.id,
            intern_id: c.intern_id,
            supervisor_id: c.supervisor_id,
            subject: c.subject,
            message: c.message,
            status: c.status.to_string(),
            created_at: c.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ActivityResponse {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityLog> for ActivityResponse {
    fn from(entry: ActivityLog) -> Self {
        Self {
            id: entry.id,
            actor_id: entry.actor_id,
            action: entry.action,
            created_at: entry.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct AnalyticsResponse {
    pub interns: i64,
    pub supervisors: i64,
    pub tasks_total: i64,
    pub complaints_open: i64,
}

impl From<Analytics> for AnalyticsResponse {
    fn from(a: Analytics) -> Self {
        Self {
            interns: a.interns,
            supervisors: a.supervisors,
            tasks_total: a.tasks_total,
            complaints_open: a.complaints_open,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MonthlyTaskResponse {
    pub task_id: Uuid,
    pub intern_email: String,
    pub supervisor_email: String,
    pub title: String,
    pub status: String,
    pub star_rating: Option<u8>,
    pub created_at: DateTime<Utc>,
}

impl From<MonthlyTaskRow> for MonthlyTaskResponse {
    fn from(row: MonthlyTaskRow) -> Self {
        Self {
            task_id: row.task_id,
            intern_email: row.intern_email,
            supervisor_email: row.supervisor_email,
            title: row.title,
            status: row.status.to_string(),
            star_rating: row.star_rating.map(|r| r.value()),
            created_at: row.created_at,
        }
    }
}

/// Converts a list of domain values into their response form.
pub fn list<T, R: From<T>>(items: Vec<T>) -> Vec<R> {
    items.into_iter().map(R::from).collect()
}
