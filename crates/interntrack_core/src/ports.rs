//! crates/interntrack_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete storage engine.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    ActivityLog, Analytics, Attendance, Complaint, ComplaintStatus, MonthlyTaskRow, NewActivity,
    NewAttendance, NewComplaint, NewTask, NewTaskReport, NewUser, Role, StarRating, Task,
    TaskReport, TaskStatus, User, UserCredentials,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error taxonomy shared by every port and use case.
///
/// `NotFound` covers both a missing resource and one outside the actor's scope; callers
/// cannot tell the two apart.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Storage port. Every method that takes a `NewActivity` must persist the mutation and the
/// activity entry atomically: both rows are written or neither is.
#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- User Management ---
    async fn create_user(&self, user: NewUser) -> PortResult<User>;

    async fn get_user(&self, user_id: Uuid) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    /// Users holding `role`, ordered by full name.
    async fn list_users_by_role(&self, role: Role) -> PortResult<Vec<User>>;

    async fn list_interns_for_supervisor(&self, supervisor_id: Uuid) -> PortResult<Vec<User>>;

    async fn set_supervisor(
        &self,
        intern_id: Uuid,
        supervisor_id: Option<Uuid>,
        activity: NewActivity,
    ) -> PortResult<User>;

    /// Deletes a user. Interns and complaints pointing at the user lose the link.
    async fn delete_user(&self, user_id: Uuid, activity: NewActivity) -> PortResult<()>;

    // --- Auth Methods ---
    async fn create_verification_token(&self, user_id: Uuid, token: &str) -> PortResult<()>;

    /// Marks an unused token as used and the owning user as verified.
    async fn consume_verification_token(&self, token: &str) -> PortResult<Uuid>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Tasks ---
    async fn create_task(&self, task: NewTask, activity: NewActivity) -> PortResult<Task>;

    async fn get_task(&self, task_id: Uuid) -> PortResult<Task>;

    async fn list_tasks_for_supervisor(&self, supervisor_id: Uuid) -> PortResult<Vec<Task>>;

    async fn list_tasks_for_intern(&self, intern_id: Uuid) -> PortResult<Vec<Task>>;

    async fn list_tasks(&self, limit: i64) -> PortResult<Vec<Task>>;

    async fn update_task_status(
        &self,
        task_id: Uuid,
        status: TaskStatus,
        activity: NewActivity,
    ) -> PortResult<Task>;

    async fn rate_task(
        &self,
        task_id: Uuid,
        rating: StarRating,
        feedback: &str,
        activity: NewActivity,
    ) -> PortResult<Task>;

    async fn create_task_report(
        &self,
        report: NewTaskReport,
        activity: NewActivity,
    ) -> PortResult<TaskReport>;

    async fn list_reports_for_supervisor(
        &self,
        supervisor_id: Uuid,
        limit: i64,
    ) -> PortResult<Vec<TaskReport>>;

    /// Tasks created within `[start, end]`, oldest first, joined with both emails.
    async fn list_tasks_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> PortResult<Vec<MonthlyTaskRow>>;

    // --- Attendance ---
    async fn create_attendance(
        &self,
        attendance: NewAttendance,
        activity: NewActivity,
    ) -> PortResult<Attendance>;

    async fn list_attendance_for_intern(
        &self,
        intern_id: Uuid,
        limit: i64,
    ) -> PortResult<Vec<Attendance>>;

    /// Attendance of every intern currently assigned to `supervisor_id`.
    async fn list_attendance_for_supervisor(
        &self,
        supervisor_id: Uuid,
        limit: i64,
    ) -> PortResult<Vec<Attendance>>;

    async fn list_attendance(&self, limit: i64) -> PortResult<Vec<Attendance>>;

    // --- Complaints ---
    async fn create_complaint(
        &self,
        complaint: NewComplaint,
        activity: NewActivity,
    ) -> PortResult<Complaint>;

    async fn get_complaint(&self, complaint_id: Uuid) -> PortResult<Complaint>;

    async fn update_complaint_status(
        &self,
        complaint_id: Uuid,
        status: ComplaintStatus,
        activity: NewActivity,
    ) -> PortResult<Complaint>;

    async fn list_complaints_for_intern(
        &self,
        intern_id: Uuid,
        limit: i64,
    ) -> PortResult<Vec<Complaint>>;

    async fn list_complaints_for_supervisor(
        &self,
        supervisor_id: Uuid,
        limit: i64,
    ) -> PortResult<Vec<Complaint>>;

    async fn list_complaints(&self, limit: i64) -> PortResult<Vec<Complaint>>;

    // --- Activity & Analytics ---
    async fn list_activity(&self, limit: i64) -> PortResult<Vec<ActivityLog>>;

    async fn analytics(&self) -> PortResult<Analytics>;
}
