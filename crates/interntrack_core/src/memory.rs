//! crates/interntrack_core/src/memory.rs
//!
//! An in-memory `DatabaseService` used by the unit tests. Lists come back newest first,
//! matching the PostgreSQL adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::domain::{
    ActivityLog, Analytics, Attendance, Complaint, ComplaintStatus, MonthlyTaskRow, NewActivity,
    NewAttendance, NewComplaint, NewTask, NewTaskReport, NewUser, Role, StarRating, Task,
    TaskReport, TaskStatus, User, UserCredentials,
};
use crate::ports::{DatabaseService, PortError, PortResult};

#[derive(Default)]
struct State {
    users: Vec<(User, String)>,
    verification_tokens: Vec<(String, Uuid, bool)>,
    sessions: HashMap<String, (Uuid, DateTime<Utc>)>,
    tasks: Vec<Task>,
    reports: Vec<TaskReport>,
    attendance: Vec<Attendance>,
    complaints: Vec<Complaint>,
    activity: Vec<ActivityLog>,
}

impl State {
    fn user(&self, user_id: Uuid) -> PortResult<&User> {
        self.users
            .iter()
            .map(|(u, _)| u)
            .find(|u| u.id == user_id)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }

    fn log(&mut self, activity: NewActivity) {
        self.activity.push(ActivityLog {
            id: Uuid::new_v4(),
            actor_id: Some(activity.actor_id),
            action: activity.action,
            created_at: Utc::now(),
        });
    }

    fn task_mut(&mut self, task_id: Uuid) -> PortResult<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| PortError::NotFound(format!("Task {} not found", task_id)))
    }
}

#[derive(Default)]
pub struct InMemoryDatabase {
    state: Mutex<State>,
}

impl InMemoryDatabase {
    fn lock(&self) -> PortResult<std::sync::MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }
}

fn newest_first<T: Clone>(items: impl DoubleEndedIterator<Item = T>, limit: i64) -> Vec<T> {
    items.rev().take(limit.max(0) as usize).collect()
}

#[async_trait]
impl DatabaseService for InMemoryDatabase {
    async fn create_user(&self, user: NewUser) -> PortResult<User> {
        let mut state = self.lock()?;
        if state.users.iter().any(|(u, _)| u.email == user.email) {
            return Err(PortError::Validation("Email already exists".to_string()));
        }
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            employee_id: String::new(),
            department: String::new(),
            supervisor_id: None,
            is_verified: user.is_verified,
            created_at: Utc::now(),
        };
        state.users.push((created.clone(), user.hashed_password));
        Ok(created)
    }

    async fn get_user(&self, user_id: Uuid) -> PortResult<User> {
        self.lock()?.user(user_id).cloned()
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        self.lock()?
            .users
            .iter()
            .find(|(u, _)| u.email == email)
            .map(|(u, hash)| UserCredentials {
                user_id: u.id,
                email: u.email.clone(),
                hashed_password: hash.clone(),
                is_verified: u.is_verified,
            })
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))
    }

    async fn list_users_by_role(&self, role: Role) -> PortResult<Vec<User>> {
        let mut users: Vec<User> = self
            .lock()?
            .users
            .iter()
            .map(|(u, _)| u)
            .filter(|u| u.role == role)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(users)
    }

    async fn list_interns_for_supervisor(&self, supervisor_id: Uuid) -> PortResult<Vec<User>> {
        let mut users = self.list_users_by_role(Role::Intern).await?;
        users.retain(|u| u.supervisor_id == Some(supervisor_id));
        Ok(users)
    }

    async fn set_supervisor(
        &self,
        intern_id: Uuid,
        supervisor_id: Option<Uuid>,
        activity: NewActivity,
    ) -> PortResult<User> {
        let mut state = self.lock()?;
        let (user, _) = state
            .users
            .iter_mut()
            .find(|(u, _)| u.id == intern_id)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", intern_id)))?;
        user.supervisor_id = supervisor_id;
        let updated = user.clone();
        state.log(activity);
        Ok(updated)
    }

    async fn delete_user(&self, user_id: Uuid, activity: NewActivity) -> PortResult<()> {
        let mut state = self.lock()?;
        state.user(user_id)?;
        state.users.retain(|(u, _)| u.id != user_id);
        for (u, _) in state.users.iter_mut() {
            if u.supervisor_id == Some(user_id) {
                u.supervisor_id = None;
            }
        }
        for c in state.complaints.iter_mut() {
            if c.supervisor_id == Some(user_id) {
                c.supervisor_id = None;
            }
        }
        state.complaints.retain(|c| c.intern_id != user_id);
        state
            .tasks
            .retain(|t| t.intern_id != user_id && t.supervisor_id != user_id);
        let live_tasks: Vec<Uuid> = state.tasks.iter().map(|t| t.id).collect();
        state
            .reports
            .retain(|r| r.intern_id != user_id && live_tasks.contains(&r.task_id));
        state.attendance.retain(|a| a.intern_id != user_id);
        for entry in state.activity.iter_mut() {
            if entry.actor_id == Some(user_id) {
                entry.actor_id = None;
            }
        }
        state.log(activity);
        Ok(())
    }

    async fn create_verification_token(&self, user_id: Uuid, token: &str) -> PortResult<()> {
        self.lock()?
            .verification_tokens
            .push((token.to_string(), user_id, false));
        Ok(())
    }

    async fn consume_verification_token(&self, token: &str) -> PortResult<Uuid> {
        let mut state = self.lock()?;
        let entry = state
            .verification_tokens
            .iter_mut()
            .find(|(t, _, used)| t == token && !*used)
            .ok_or_else(|| PortError::Validation("Invalid/expired token".to_string()))?;
        entry.2 = true;
        let user_id = entry.1;
        if let Some((user, _)) = state.users.iter_mut().find(|(u, _)| u.id == user_id) {
            user.is_verified = true;
        }
        Ok(user_id)
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        self.lock()?
            .sessions
            .insert(session_id.to_string(), (user_id, expires_at));
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        match self.lock()?.sessions.get(session_id) {
            Some((user_id, expires_at)) if *expires_at > Utc::now() => Ok(*user_id),
            _ => Err(PortError::Unauthorized),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        self.lock()?.sessions.remove(session_id);
        Ok(())
    }

    async fn create_task(&self, task: NewTask, activity: NewActivity) -> PortResult<Task> {
        let mut state = self.lock()?;
        let now = Utc::now();
        let created = Task {
            id: task.id,
            supervisor_id: task.supervisor_id,
            intern_id: task.intern_id,
            title: task.title,
            description: task.description,
            status: TaskStatus::InProgress,
            star_rating: None,
            supervisor_feedback: String::new(),
            created_at: now,
            updated_at: now,
        };
        state.tasks.push(created.clone());
        state.log(activity);
        Ok(created)
    }

    async fn get_task(&self, task_id: Uuid) -> PortResult<Task> {
        self.lock()?.task_mut(task_id).map(|t| t.clone())
    }

    async fn list_tasks_for_supervisor(&self, supervisor_id: Uuid) -> PortResult<Vec<Task>> {
        let state = self.lock()?;
        let tasks = state
            .tasks
            .iter()
            .filter(|t| t.supervisor_id == supervisor_id)
            .cloned();
        Ok(newest_first(tasks, i64::MAX))
    }

    async fn list_tasks_for_intern(&self, intern_id: Uuid) -> PortResult<Vec<Task>> {
        let state = self.lock()?;
        let tasks = state.tasks.iter().filter(|t| t.intern_id == intern_id).cloned();
        Ok(newest_first(tasks, i64::MAX))
    }

    async fn list_tasks(&self, limit: i64) -> PortResult<Vec<Task>> {
        Ok(newest_first(self.lock()?.tasks.iter().cloned(), limit))
    }

    async fn update_task_status(
        &self,
        task_id: Uuid,
        status: TaskStatus,
        activity: NewActivity,
    ) -> PortResult<Task> {
        let mut state = self.lock()?;
        let task = state.task_mut(task_id)?;
        task.status = status;
        task.updated_at = Utc::now();
        let updated = task.clone();
        state.log(activity);
        Ok(updated)
    }

    async fn rate_task(
        &self,
        task_id: Uuid,
        rating: StarRating,
        feedback: &str,
        activity: NewActivity,
    ) -> PortResult<Task> {
        let mut state = self.lock()?;
        let task = state.task_mut(task_id)?;
        task.star_rating = Some(rating);
        task.supervisor_feedback = feedback.to_string();
        task.updated_at = Utc::now();
        let updated = task.clone();
        state.log(activity);
        Ok(updated)
    }

    async fn create_task_report(
        &self,
        report: NewTaskReport,
        activity: NewActivity,
    ) -> PortResult<TaskReport> {
        let mut state = self.lock()?;
        let created = TaskReport {
            id: report.id,
            task_id: report.task_id,
            intern_id: report.intern_id,
            content: report.content,
            created_at: Utc::now(),
        };
        state.reports.push(created.clone());
        state.log(activity);
        Ok(created)
    }

    async fn list_reports_for_supervisor(
        &self,
        supervisor_id: Uuid,
        limit: i64,
    ) -> PortResult<Vec<TaskReport>> {
        let state = self.lock()?;
        let own_tasks: Vec<Uuid> = state
            .tasks
            .iter()
            .filter(|t| t.supervisor_id == supervisor_id)
            .map(|t| t.id)
            .collect();
        let reports = state
            .reports
            .iter()
            .filter(|r| own_tasks.contains(&r.task_id))
            .cloned();
        Ok(newest_first(reports, limit))
    }

    async fn list_tasks_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> PortResult<Vec<MonthlyTaskRow>> {
        let state = self.lock()?;
        state
            .tasks
            .iter()
            .filter(|t| t.created_at >= start && t.created_at <= end)
            .map(|t| -> PortResult<MonthlyTaskRow> {
                Ok(MonthlyTaskRow {
                    task_id: t.id,
                    intern_email: state.user(t.intern_id)?.email.clone(),
                    supervisor_email: state.user(t.supervisor_id)?.email.clone(),
                    title: t.title.clone(),
                    status: t.status,
                    star_rating: t.star_rating,
                    created_at: t.created_at,
                })
            })
            .collect()
    }

    async fn create_attendance(
        &self,
        attendance: NewAttendance,
        activity: NewActivity,
    ) -> PortResult<Attendance> {
        let mut state = self.lock()?;
        let created = Attendance {
            id: attendance.id,
            intern_id: attendance.intern_id,
            in_office: attendance.in_office,
            lat: attendance.lat,
            lng: attendance.lng,
            office_distance_m: attendance.office_distance_m,
            location_validated: attendance.location_validated,
            created_at: Utc::now(),
        };
        state.attendance.push(created.clone());
        state.log(activity);
        Ok(created)
    }

    async fn list_attendance_for_intern(
        &self,
        intern_id: Uuid,
        limit: i64,
    ) -> PortResult<Vec<Attendance>> {
        let state = self.lock()?;
        let records = state
            .attendance
            .iter()
            .filter(|a| a.intern_id == intern_id)
            .cloned();
        Ok(newest_first(records, limit))
    }

    async fn list_attendance_for_supervisor(
        &self,
        supervisor_id: Uuid,
        limit: i64,
    ) -> PortResult<Vec<Attendance>> {
        let state = self.lock()?;
        let records = state
            .attendance
            .iter()
            .filter(|a| {
                state
                    .user(a.intern_id)
                    .map(|u| u.supervisor_id == Some(supervisor_id))
                    .unwrap_or(false)
            })
            .cloned();
        Ok(newest_first(records, limit))
    }

    async fn list_attendance(&self, limit: i64) -> PortResult<Vec<Attendance>> {
        Ok(newest_first(self.lock()?.attendance.iter().cloned(), limit))
    }

    async fn create_complaint(
        &self,
        complaint: NewComplaint,
        activity: NewActivity,
    ) -> PortResult<Complaint> {
        let mut state = self.lock()?;
        let created = Complaint {
            id: complaint.id,
            intern_id: complaint.intern_id,
            supervisor_id: complaint.supervisor_id,
            subject: complaint.subject,
            message: complaint.message,
            status: ComplaintStatus::Open,
            created_at: Utc::now(),
        };
        state.complaints.push(created.clone());
        state.log(activity);
        Ok(created)
    }

    async fn get_complaint(&self, complaint_id: Uuid) -> PortResult<Complaint> {
        self.lock()?
            .complaints
            .iter()
            .find(|c| c.id == complaint_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Complaint {} not found", complaint_id)))
    }

    async fn update_complaint_status(
        &self,
        complaint_id: Uuid,
        status: ComplaintStatus,
        activity: NewActivity,
    ) -> PortResult<Complaint> {
        let mut state = self.lock()?;
        let complaint = state
            .complaints
            .iter_mut()
            .find(|c| c.id == complaint_id)
            .ok_or_else(|| PortError::NotFound(format!("Complaint {} not found", complaint_id)))?;
        complaint.status = status;
        let updated = complaint.clone();
        state.log(activity);
        Ok(updated)
    }

    async fn list_complaints_for_intern(
        &self,
        intern_id: Uuid,
        limit: i64,
    ) -> PortResult<Vec<Complaint>> {
        let state = self.lock()?;
        let complaints = state
            .complaints
            .iter()
            .filter(|c| c.intern_id == intern_id)
            .cloned();
        Ok(newest_first(complaints, limit))
    }

    async fn list_complaints_for_supervisor(
        &self,
        supervisor_id: Uuid,
        limit: i64,
    ) -> PortResult<Vec<Complaint>> {
        let state = self.lock()?;
        let complaints = state
            .complaints
            .iter()
            .filter(|c| c.supervisor_id == Some(supervisor_id))
            .cloned();
        Ok(newest_first(complaints, limit))
    }

    async fn list_complaints(&self, limit: i64) -> PortResult<Vec<Complaint>> {
        Ok(newest_first(self.lock()?.complaints.iter().cloned(), limit))
    }

    async fn list_activity(&self, limit: i64) -> PortResult<Vec<ActivityLog>> {
        Ok(newest_first(self.lock()?.activity.iter().cloned(), limit))
    }

    async fn analytics(&self) -> PortResult<Analytics> {
        let state = self.lock()?;
        let count_role = |role: Role| state.users.iter().filter(|(u, _)| u.role == role).count() as i64;
        Ok(Analytics {
            interns: count_role(Role::Intern),
            supervisors: count_role(Role::Supervisor),
            tasks_total: state.tasks.len() as i64,
            complaints_open: state
                .complaints
                .iter()
                .filter(|c| c.status == ComplaintStatus::Open)
                .count() as i64,
        })
    }
}
