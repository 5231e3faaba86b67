//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.
//!
//! Every mutation that carries a `NewActivity` runs inside a single transaction together
//! with the insert into `activity_logs`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use interntrack_core::domain::{
    ActivityLog, Analytics, Attendance, Complaint, ComplaintStatus, MonthlyTaskRow, NewActivity,
    NewAttendance, NewComplaint, NewTask, NewTaskReport, NewUser, Role, StarRating, Task,
    TaskReport, TaskStatus, User, UserCredentials,
};
use interntrack_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// Column Lists & Error Helpers
//=========================================================================================

macro_rules! user_columns {
    () => {
        "id, email, full_name, role, employee_id, department, supervisor_id, is_verified, created_at"
    };
}

macro_rules! task_columns {
    () => {
        "id, supervisor_id, intern_id, title, description, status, star_rating, supervisor_feedback, created_at, updated_at"
    };
}

macro_rules! attendance_columns {
    () => {
        "id, intern_id, in_office, lat, lng, office_distance_m, location_validated, created_at"
    };
}

macro_rules! complaint_columns {
    () => {
        "id, intern_id, supervisor_id, subject, message, status, created_at"
    };
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn not_found(what: &'static str, id: impl std::fmt::Display) -> impl FnOnce(sqlx::Error) -> PortError {
    move |e| match e {
        sqlx::Error::RowNotFound => PortError::NotFound(format!("{} {} not found", what, id)),
        _ => unexpected(e),
    }
}

fn corrupt(column: &str, value: &str) -> PortError {
    PortError::Unexpected(format!("Unexpected value '{}' in column {}", value, column))
}

/// Appends an audit entry on the same connection as the mutation it describes.
async fn log_activity(conn: &mut PgConnection, activity: NewActivity) -> PortResult<()> {
    sqlx::query("INSERT INTO activity_logs (id, actor_id, action) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(activity.actor_id)
        .bind(activity.action)
        .execute(conn)
        .await
        .map_err(unexpected)?;
    Ok(())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    email: String,
    full_name: String,
    role: String,
    employee_id: String,
    department: String,
    supervisor_id: Option<Uuid>,
    is_verified: bool,
    created_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> PortResult<User> {
        let role = self.role.parse::<Role>().map_err(|_| corrupt("users.role", &self.role))?;
        Ok(User {
            id: self.id,
            email: self.email,
            full_name: self.full_name,
            role,
            employee_id: self.employee_id,
            department: self.department,
            supervisor_id: self.supervisor_id,
            is_verified: self.is_verified,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: Uuid,
    email: String,
    hashed_password: String,
    is_verified: bool,
}

#[derive(FromRow)]
struct TaskRecord {
    id: Uuid,
    supervisor_id: Uuid,
    intern_id: Uuid,
    title: String,
    description: String,
    status: String,
    star_rating: Option<i16>,
    supervisor_feedback: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl TaskRecord {
    fn to_domain(self) -> PortResult<Task> {
        Ok(Task {
            id: self.id,
            supervisor_id: self.supervisor_id,
            intern_id: self.intern_id,
            status: parse_task_status(&self.status)?,
            star_rating: parse_rating(self.star_rating)?,
            title: self.title,
            description: self.description,
            supervisor_feedback: self.supervisor_feedback,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn parse_task_status(raw: &str) -> PortResult<TaskStatus> {
    raw.parse().map_err(|_| corrupt("tasks.status", raw))
}

fn parse_rating(raw: Option<i16>) -> PortResult<Option<StarRating>> {
    raw.map(|v| StarRating::new(i64::from(v)).map_err(|_| corrupt("tasks.star_rating", &v.to_string())))
        .transpose()
}

#[derive(FromRow)]
struct TaskReportRecord {
    id: Uuid,
    task_id: Uuid,
    intern_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
}
impl TaskReportRecord {
    fn to_domain(self) -> TaskReport {
        TaskReport {
            id: self.id,
            task_id: self.task_id,
            intern_id: self.intern_id,
            content: self.content,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct MonthlyTaskRecord {
    task_id: Uuid,
    intern_email: String,
    supervisor_email: String,
    title: String,
    status: String,
    star_rating: Option<i16>,
    created_at: DateTime<Utc>,
}
impl MonthlyTaskRecord {
    fn to_domain(self) -> PortResult<MonthlyTaskRow> {
        Ok(MonthlyTaskRow {
            task_id: self.task_id,
            intern_email: self.intern_email,
            supervisor_email: self.supervisor_email,
            status: parse_task_status(&self.status)?,
            star_rating: parse_rating(self.star_rating)?,
            title: self.title,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct AttendanceRecord {
    id: Uuid,
    intern_id: Uuid,
    in_office: bool,
    lat: Option<f64>,
    lng: Option<f64>,
    office_distance_m: Option<f64>,
    location_validated: bool,
    created_at: DateTime<Utc>,
}
impl AttendanceRecord {
    fn to_domain(self) -> Attendance {
        Attendance {
            id: self.id,
            intern_id: self.intern_id,
            in_office: self.in_office,
            lat: self.lat,
            lng: self.lng,
            office_distance_m: self.office_distance_m,
            location_validated: self.location_validated,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct ComplaintRecord {
    id: Uuid,
    intern_id: Uuid,
    supervisor_id: Option<Uuid>,
    subject: String,
    message: String,
    status: String,
    created_at: DateTime<Utc>,
}
impl ComplaintRecord {
    fn to_domain(self) -> PortResult<Complaint> {
        let status = self
            .status
            .parse::<ComplaintStatus>()
            .map_err(|_| corrupt("complaints.status", &self.status))?;
        Ok(Complaint {
            id: self.id,
            intern_id: self.intern_id,
            supervisor_id: self.supervisor_id,
            subject: self.subject,
            message: self.message,
            status,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct ActivityRecord {
    id: Uuid,
    actor_id: Option<Uuid>,
    action: String,
    created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct AnalyticsRecord {
    interns: i64,
    supervisors: i64,
    tasks_total: i64,
    complaints_open: i64,
}

fn users(records: Vec<UserRecord>) -> PortResult<Vec<User>> {
    records.into_iter().map(UserRecord::to_domain).collect()
}

fn tasks(records: Vec<TaskRecord>) -> PortResult<Vec<Task>> {
    records.into_iter().map(TaskRecord::to_domain).collect()
}

fn complaints(records: Vec<ComplaintRecord>) -> PortResult<Vec<Complaint>> {
    records.into_iter().map(ComplaintRecord::to_domain).collect()
}

fn attendance(records: Vec<AttendanceRecord>) -> Vec<Attendance> {
    records.into_iter().map(AttendanceRecord::to_domain).collect()
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user(&self, user: NewUser) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(concat!(
            "INSERT INTO users (id, email, full_name, role, hashed_password, is_verified) ",
            "VALUES ($1, $2, $3, $4, $5, $6) RETURNING ",
            user_columns!()
        ))
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(user.role.as_str())
        .bind(&user.hashed_password)
        .bind(user.is_verified)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                PortError::Validation("Email already exists".to_string())
            }
            _ => unexpected(e),
        })?;
        record.to_domain()
    }

    async fn get_user(&self, user_id: Uuid) -> PortResult<User> {
        sqlx::query_as::<_, UserRecord>(concat!(
            "SELECT ",
            user_columns!(),
            " FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("User", user_id))?
        .to_domain()
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, email, hashed_password, is_verified FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("User", email))?;

        Ok(UserCredentials {
            user_id: record.id,
            email: record.email,
            hashed_password: record.hashed_password,
            is_verified: record.is_verified,
        })
    }

    async fn list_users_by_role(&self, role: Role) -> PortResult<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(concat!(
            "SELECT ",
            user_columns!(),
            " FROM users WHERE role = $1 ORDER BY full_name ASC"
        ))
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        users(records)
    }

    async fn list_interns_for_supervisor(&self, supervisor_id: Uuid) -> PortResult<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(concat!(
            "SELECT ",
            user_columns!(),
            " FROM users WHERE role = 'INTERN' AND supervisor_id = $1 ORDER BY full_name ASC"
        ))
        .bind(supervisor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        users(records)
    }

    async fn set_supervisor(
        &self,
        intern_id: Uuid,
        supervisor_id: Option<Uuid>,
        activity: NewActivity,
    ) -> PortResult<User> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let record = sqlx::query_as::<_, UserRecord>(concat!(
            "UPDATE users SET supervisor_id = $1 WHERE id = $2 RETURNING ",
            user_columns!()
        ))
        .bind(supervisor_id)
        .bind(intern_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(not_found("User", intern_id))?;
        log_activity(&mut tx, activity).await?;
        tx.commit().await.map_err(unexpected)?;
        record.to_domain()
    }

    async fn delete_user(&self, user_id: Uuid, activity: NewActivity) -> PortResult<()> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("User {} not found", user_id)));
        }
        log_activity(&mut tx, activity).await?;
        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }

    async fn create_verification_token(&self, user_id: Uuid, token: &str) -> PortResult<()> {
        sqlx::query("INSERT INTO email_verification_tokens (token, user_id) VALUES ($1, $2)")
            .bind(token)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn consume_verification_token(&self, token: &str) -> PortResult<Uuid> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let user_id: Uuid = sqlx::query_scalar(
            "UPDATE email_verification_tokens SET used = TRUE WHERE token = $1 AND used = FALSE RETURNING user_id",
        )
        .bind(token)
        .fetch_optional(&mut *tx)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::Validation("Invalid/expired token".to_string()))?;

        sqlx::query("UPDATE users SET is_verified = TRUE WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        tx.commit().await.map_err(unexpected)?;
        Ok(user_id)
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > NOW()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn create_task(&self, task: NewTask, activity: NewActivity) -> PortResult<Task> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let record = sqlx::query_as::<_, TaskRecord>(concat!(
            "INSERT INTO tasks (id, supervisor_id, intern_id, title, description) ",
            "VALUES ($1, $2, $3, $4, $5) RETURNING ",
            task_columns!()
        ))
        .bind(task.id)
        .bind(task.supervisor_id)
        .bind(task.intern_id)
        .bind(&task.title)
        .bind(&task.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;
        log_activity(&mut tx, activity).await?;
        tx.commit().await.map_err(unexpected)?;
        record.to_domain()
    }

    async fn get_task(&self, task_id: Uuid) -> PortResult<Task> {
        sqlx::query_as::<_, TaskRecord>(concat!(
            "SELECT ",
            task_columns!(),
            " FROM tasks WHERE id = $1"
        ))
        .bind(task_id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("Task", task_id))?
        .to_domain()
    }

    async fn list_tasks_for_supervisor(&self, supervisor_id: Uuid) -> PortResult<Vec<Task>> {
        let records = sqlx::query_as::<_, TaskRecord>(concat!(
            "SELECT ",
            task_columns!(),
            " FROM tasks WHERE supervisor_id = $1 ORDER BY created_at DESC"
        ))
        .bind(supervisor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        tasks(records)
    }

    async fn list_tasks_for_intern(&self, intern_id: Uuid) -> PortResult<Vec<Task>> {
        let records = sqlx::query_as::<_, TaskRecord>(concat!(
            "SELECT ",
            task_columns!(),
            " FROM tasks WHERE intern_id = $1 ORDER BY created_at DESC"
        ))
        .bind(intern_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        tasks(records)
    }

    async fn list_tasks(&self, limit: i64) -> PortResult<Vec<Task>> {
        let records = sqlx::query_as::<_, TaskRecord>(concat!(
            "SELECT ",
            task_columns!(),
            " FROM tasks ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        tasks(records)
    }

    async fn update_task_status(
        &self,
        task_id: Uuid,
        status: TaskStatus,
        activity: NewActivity,
    ) -> PortResult<Task> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let record = sqlx::query_as::<_, TaskRecord>(concat!(
            "UPDATE tasks SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING ",
            task_columns!()
        ))
        .bind(status.as_str())
        .bind(task_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(not_found("Task", task_id))?;
        log_activity(&mut tx, activity).await?;
        tx.commit().await.map_err(unexpected)?;
        record.to_domain()
    }

    async fn rate_task(
        &self,
        task_id: Uuid,
        rating: StarRating,
        feedback: &str,
        activity: NewActivity,
    ) -> PortResult<Task> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let record = sqlx::query_as::<_, TaskRecord>(concat!(
            "UPDATE tasks SET star_rating = $1, supervisor_feedback = $2, updated_at = NOW() ",
            "WHERE id = $3 RETURNING ",
            task_columns!()
        ))
        .bind(i16::from(rating.value()))
        .bind(feedback)
        .bind(task_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(not_found("Task", task_id))?;
        log_activity(&mut tx, activity).await?;
        tx.commit().await.map_err(unexpected)?;
        record.to_domain()
    }

    async fn create_task_report(
        &self,
        report: NewTaskReport,
        activity: NewActivity,
    ) -> PortResult<TaskReport> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let record = sqlx::query_as::<_, TaskReportRecord>(
            "INSERT INTO task_reports (id, task_id, intern_id, content) VALUES ($1, $2, $3, $4) \
             RETURNING id, task_id, intern_id, content, created_at",
        )
        .bind(report.id)
        .bind(report.task_id)
        .bind(report.intern_id)
        .bind(&report.content)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;
        log_activity(&mut tx, activity).await?;
        tx.commit().await.map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_reports_for_supervisor(
        &self,
        supervisor_id: Uuid,
        limit: i64,
    ) -> PortResult<Vec<TaskReport>> {
        let records = sqlx::query_as::<_, TaskReportRecord>(
            "SELECT r.id, r.task_id, r.intern_id, r.content, r.created_at \
             FROM task_reports r JOIN tasks t ON t.id = r.task_id \
             WHERE t.supervisor_id = $1 ORDER BY r.created_at DESC LIMIT $2",
        )
        .bind(supervisor_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(TaskReportRecord::to_domain).collect())
    }

    async fn list_tasks_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> PortResult<Vec<MonthlyTaskRow>> {
        let records = sqlx::query_as::<_, MonthlyTaskRecord>(
            "SELECT t.id AS task_id, i.email AS intern_email, s.email AS supervisor_email, \
                    t.title, t.status, t.star_rating, t.created_at \
             FROM tasks t \
             JOIN users i ON i.id = t.intern_id \
             JOIN users s ON s.id = t.supervisor_id \
             WHERE t.created_at >= $1 AND t.created_at <= $2 \
             ORDER BY t.created_at ASC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        records.into_iter().map(MonthlyTaskRecord::to_domain).collect()
    }

    async fn create_attendance(
        &self,
        attendance: NewAttendance,
        activity: NewActivity,
    ) -> PortResult<Attendance> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let record = sqlx::query_as::<_, AttendanceRecord>(concat!(
            "INSERT INTO attendance (id, intern_id, in_office, lat, lng, office_distance_m, location_validated) ",
            "VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING ",
            attendance_columns!()
        ))
        .bind(attendance.id)
        .bind(attendance.intern_id)
        .bind(attendance.in_office)
        .bind(attendance.lat)
        .bind(attendance.lng)
        .bind(attendance.office_distance_m)
        .bind(attendance.location_validated)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;
        log_activity(&mut tx, activity).await?;
        tx.commit().await.map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_attendance_for_intern(
        &self,
        intern_id: Uuid,
        limit: i64,
    ) -> PortResult<Vec<Attendance>> {
        let records = sqlx::query_as::<_, AttendanceRecord>(concat!(
            "SELECT ",
            attendance_columns!(),
            " FROM attendance WHERE intern_id = $1 ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(intern_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(attendance(records))
    }

    async fn list_attendance_for_supervisor(
        &self,
        supervisor_id: Uuid,
        limit: i64,
    ) -> PortResult<Vec<Attendance>> {
        let records = sqlx::query_as::<_, AttendanceRecord>(
            "SELECT a.id, a.intern_id, a.in_office, a.lat, a.lng, a.office_distance_m, \
                    a.location_validated, a.created_at \
             FROM attendance a JOIN users u ON u.id = a.intern_id \
             WHERE u.supervisor_id = $1 ORDER BY a.created_at DESC LIMIT $2",
        )
        .bind(supervisor_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(attendance(records))
    }

    async fn list_attendance(&self, limit: i64) -> PortResult<Vec<Attendance>> {
        let records = sqlx::query_as::<_, AttendanceRecord>(concat!(
            "SELECT ",
            attendance_columns!(),
            " FROM attendance ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(attendance(records))
    }

    async fn create_complaint(
        &self,
        complaint: NewComplaint,
        activity: NewActivity,
    ) -> PortResult<Complaint> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let record = sqlx::query_as::<_, ComplaintRecord>(concat!(
            "INSERT INTO complaints (id, intern_id, supervisor_id, subject, message) ",
            "VALUES ($1, $2, $3, $4, $5) RETURNING ",
            complaint_columns!()
        ))
        .bind(complaint.id)
        .bind(complaint.intern_id)
        .bind(complaint.supervisor_id)
        .bind(&complaint.subject)
        .bind(&complaint.message)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;
        log_activity(&mut tx, activity).await?;
        tx.commit().await.map_err(unexpected)?;
        record.to_domain()
    }

    async fn get_complaint(&self, complaint_id: Uuid) -> PortResult<Complaint> {
        sqlx::query_as::<_, ComplaintRecord>(concat!(
            "SELECT ",
            complaint_columns!(),
            " FROM complaints WHERE id = $1"
        ))
        .bind(complaint_id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("Complaint", complaint_id))?
        .to_domain()
    }

    async fn update_complaint_status(
        &self,
        complaint_id: Uuid,
        status: ComplaintStatus,
        activity: NewActivity,
    ) -> PortResult<Complaint> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let record = sqlx::query_as::<_, ComplaintRecord>(concat!(
            "UPDATE complaints SET status = $1 WHERE id = $2 RETURNING ",
            complaint_columns!()
        ))
        .bind(status.as_str())
        .bind(complaint_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(not_found("Complaint", complaint_id))?;
        log_activity(&mut tx, activity).await?;
        tx.commit().await.map_err(unexpected)?;
        record.to_domain()
    }

    async fn list_complaints_for_intern(
        &self,
        intern_id: Uuid,
        limit: i64,
    ) -> PortResult<Vec<Complaint>> {
        let records = sqlx::query_as::<_, ComplaintRecord>(concat!(
            "SELECT ",
            complaint_columns!(),
            " FROM complaints WHERE intern_id = $1 ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(intern_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        complaints(records)
    }

    async fn list_complaints_for_supervisor(
        &self,
        supervisor_id: Uuid,
        limit: i64,
    ) -> PortResult<Vec<Complaint>> {
        let records = sqlx::query_as::<_, ComplaintRecord>(concat!(
            "SELECT ",
            complaint_columns!(),
            " FROM complaints WHERE supervisor_id = $1 ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(supervisor_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        complaints(records)
    }

    async fn list_complaints(&self, limit: i64) -> PortResult<Vec<Complaint>> {
        let records = sqlx::query_as::<_, ComplaintRecord>(concat!(
            "SELECT ",
            complaint_columns!(),
            " FROM complaints ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        complaints(records)
    }

    async fn list_activity(&self, limit: i64) -> PortResult<Vec<ActivityLog>> {
        let records = sqlx::query_as::<_, ActivityRecord>(
            "SELECT id, actor_id, action, created_at FROM activity_logs ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records
            .into_iter()
            .map(|r| ActivityLog {
                id: r.id,
                actor_id: r.actor_id,
                action: r.action,
                created_at: r.created_at,
            })
            .collect())
    }

    async fn analytics(&self) -> PortResult<Analytics> {
        let record = sqlx::query_as::<_, AnalyticsRecord>(
            "SELECT \
                (SELECT COUNT(*) FROM users WHERE role = 'INTERN') AS interns, \
                (SELECT COUNT(*) FROM users WHERE role = 'SUPERVISOR') AS supervisors, \
                (SELECT COUNT(*) FROM tasks) AS tasks_total, \
                (SELECT COUNT(*) FROM complaints WHERE status = 'OPEN') AS complaints_open",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(Analytics {
            interns: record.interns,
            supervisors: record.supervisors,
            tasks_total: record.tasks_total,
            complaints_open: record.complaints_open,
        })
    }
}
