//! crates/interntrack_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::ports::PortError;

//=========================================================================================
// Identity & Roles
//=========================================================================================

/// The closed set of roles a user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Supervisor,
    Intern,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Supervisor => "SUPERVISOR",
            Role::Intern => "INTERN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "SUPERVISOR" => Ok(Role::Supervisor),
            "INTERN" => Ok(Role::Intern),
            other => Err(PortError::Validation(format!(
                "role must be ADMIN/SUPERVISOR/INTERN, got '{}'",
                other
            ))),
        }
    }
}

/// The authenticated identity performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// Represents a user - used throughout app.
///
/// `supervisor_id` is a non-owning link to another user; it only carries meaning for interns.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub employee_id: String,
    pub department: String,
    pub supervisor_id: Option<Uuid>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub is_verified: bool,
}

/// The fields needed to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub hashed_password: String,
    pub is_verified: bool,
}

//=========================================================================================
// Tasks
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    InProgress,
    Done,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
            TaskStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "DONE" => Ok(TaskStatus::Done),
            "COMPLETED" => Ok(TaskStatus::Completed),
            _ => Err(PortError::Validation(
                "status must be DONE/IN_PROGRESS/COMPLETED".to_string(),
            )),
        }
    }
}

/// A star rating, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarRating(u8);

impl StarRating {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    pub fn new(value: i64) -> Result<Self, PortError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(PortError::Validation("star_rating must be 1-5".to_string()))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// A unit of work created by a supervisor for one of their interns.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub supervisor_id: Uuid,
    pub intern_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub star_rating: Option<StarRating>,
    pub supervisor_feedback: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub id: Uuid,
    pub supervisor_id: Uuid,
    pub intern_id: Uuid,
    pub title: String,
    pub description: String,
}

/// An intern's free-text submission against one of their tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskReport {
    pub id: Uuid,
    pub task_id: Uuid,
    pub intern_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTaskReport {
    pub id: Uuid,
    pub task_id: Uuid,
    pub intern_id: Uuid,
    pub content: String,
}

//=========================================================================================
// Attendance
//=========================================================================================

/// An immutable check-in record.
#[derive(Debug, Clone, PartialEq)]
pub struct Attendance {
    pub id: Uuid,
    pub intern_id: Uuid,
    pub in_office: bool,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub office_distance_m: Option<f64>,
    pub location_validated: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub id: Uuid,
    pub intern_id: Uuid,
    pub in_office: bool,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub office_distance_m: Option<f64>,
    pub location_validated: bool,
}

//=========================================================================================
// Complaints
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplaintStatus {
    Open,
    InReview,
    Resolved,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Open => "OPEN",
            ComplaintStatus::InReview => "IN_REVIEW",
            ComplaintStatus::Resolved => "RESOLVED",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(ComplaintStatus::Open),
            "IN_REVIEW" => Ok(ComplaintStatus::InReview),
            "RESOLVED" => Ok(ComplaintStatus::Resolved),
            _ => Err(PortError::Validation(
                "status must be OPEN/IN_REVIEW/RESOLVED".to_string(),
            )),
        }
    }
}

/// A complaint raised by an intern. `supervisor_id` is captured when the complaint is filed.
#[derive(Debug, Clone, PartialEq)]
pub struct Complaint {
    pub id: Uuid,
    pub intern_id: Uuid,
    pub supervisor_id: Option<Uuid>,
    pub subject: String,
    pub message: String,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub id: Uuid,
    pub intern_id: Uuid,
    pub supervisor_id: Option<Uuid>,
    pub subject: String,
    pub message: String,
}

//=========================================================================================
// Activity Log & Reporting
//=========================================================================================

/// A single audit trail entry. `actor_id` is cleared if the actor is later deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityLog {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub created_at: DateTime<Utc>,
}

/// The audit entry written alongside a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub actor_id: Uuid,
    pub action: String,
}

impl NewActivity {
    pub fn new(actor: &Actor, action: impl Into<String>) -> Self {
        Self {
            actor_id: actor.user_id,
            action: action.into(),
        }
    }
}

/// One row of the monthly task export.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTaskRow {
    pub task_id: Uuid,
    pub intern_email: String,
    pub supervisor_email: String,
    pub title: String,
    pub status: TaskStatus,
    pub star_rating: Option<StarRating>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Analytics {
    pub interns: i64,
    pub supervisors: i64,
    pub tasks_total: i64,
    pub complaints_open: i64,
}
