//! Task lifecycle: creation by a supervisor, status by the intern, rating by the supervisor.
//!
//! Status moves freely between `IN_PROGRESS`, `DONE` and `COMPLETED`; there is no enforced
//! order. Rating and feedback are last-write-wins.

use uuid::Uuid;

use super::{required_text, InternshipService, PROGRESS_LIMIT, REPORT_LIMIT};
use crate::domain::{
    Actor, NewActivity, NewTask, NewTaskReport, Role, StarRating, Task, TaskReport, TaskStatus,
};
use crate::policy;
use crate::ports::{PortError, PortResult};

impl InternshipService {
    pub async fn create_task(
        &self,
        actor: &Actor,
        intern_id: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> PortResult<Task> {
        policy::require_role(actor, Role::Supervisor)?;
        let title = required_text(title, "intern and title required")?;
        let description = description.map(str::trim).unwrap_or_default().to_string();

        let intern = self.db.get_user(intern_id).await?;
        policy::in_scope(policy::can_create_task_for(actor, &intern), "Intern", intern_id)?;

        let task = NewTask {
            id: Uuid::new_v4(),
            supervisor_id: actor.user_id,
            intern_id,
            title,
            description,
        };
        let activity = NewActivity::new(
            actor,
            format!("Created task {} for {}", task.id, intern.email),
        );
        self.db.create_task(task, activity).await
    }

    pub async fn get_task(&self, actor: &Actor, task_id: Uuid) -> PortResult<Task> {
        let task = self.db.get_task(task_id).await?;
        policy::in_scope(policy::can_read_task(actor, &task), "Task", task_id)?;
        Ok(task)
    }

    /// Admins see recent progress across everyone; others see their own tasks.
    pub async fn my_tasks(&self, actor: &Actor) -> PortResult<Vec<Task>> {
        match actor.role {
            Role::Admin => self.db.list_tasks(PROGRESS_LIMIT).await,
            Role::Supervisor => self.db.list_tasks_for_supervisor(actor.user_id).await,
            Role::Intern => self.db.list_tasks_for_intern(actor.user_id).await,
        }
    }

    pub async fn set_task_status(
        &self,
        actor: &Actor,
        task_id: Uuid,
        status: &str,
    ) -> PortResult<Task> {
        policy::require_role(actor, Role::Intern)?;
        let status: TaskStatus = status.trim().parse()?;

        let task = self.db.get_task(task_id).await?;
        policy::in_scope(policy::can_set_task_status(actor, &task), "Task", task_id)?;

        let activity = NewActivity::new(actor, format!("Updated task {} -> {}", task.id, status));
        self.db.update_task_status(task_id, status, activity).await
    }

    pub async fn rate_task(
        &self,
        actor: &Actor,
        task_id: Uuid,
        star_rating: Option<i64>,
        feedback: Option<&str>,
    ) -> PortResult<Task> {
        policy::require_role(actor, Role::Supervisor)?;
        let rating = star_rating
            .ok_or_else(|| {
                PortError::Validation("star_rating must be an integer 1-5".to_string())
            })
            .and_then(StarRating::new)?;
        let feedback = feedback.map(str::trim).unwrap_or_default();

        let task = self.db.get_task(task_id).await?;
        policy::in_scope(policy::can_rate_task(actor, &task), "Task", task_id)?;

        let activity = NewActivity::new(
            actor,
            format!("Rated task {} ({} stars)", task.id, rating.value()),
        );
        self.db.rate_task(task_id, rating, feedback, activity).await
    }

    pub async fn submit_task_report(
        &self,
        actor: &Actor,
        task_id: Uuid,
        content: &str,
    ) -> PortResult<TaskReport> {
        policy::require_role(actor, Role::Intern)?;
        let content = required_text(content, "content required")?;

        let task = self.db.get_task(task_id).await?;
        policy::in_scope(policy::can_report_on_task(actor, &task), "Task", task_id)?;

        let report = NewTaskReport {
            id: Uuid::new_v4(),
            task_id,
            intern_id: actor.user_id,
            content,
        };
        let activity = NewActivity::new(actor, format!("Submitted report for task {}", task.id));
        self.db.create_task_report(report, activity).await
    }

    /// Reports submitted against the supervisor's tasks.
    pub async fn task_reports(&self, actor: &Actor) -> PortResult<Vec<TaskReport>> {
        policy::require_role(actor, Role::Supervisor)?;
        self.db
            .list_reports_for_supervisor(actor.user_id, REPORT_LIMIT)
            .await
    }
}
