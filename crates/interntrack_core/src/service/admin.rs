//! Admin-only reads: analytics, the activity log and the monthly task report.

use super::{InternshipService, ACTIVITY_LIMIT};
use crate::domain::{ActivityLog, Actor, Analytics, MonthlyTaskRow, Role};
use crate::policy;
use crate::ports::PortResult;
use crate::report;

impl InternshipService {
    pub async fn analytics(&self, actor: &Actor) -> PortResult<Analytics> {
        policy::require_role(actor, Role::Admin)?;
        self.db.analytics().await
    }

    pub async fn activity_log(&self, actor: &Actor) -> PortResult<Vec<ActivityLog>> {
        policy::require_role(actor, Role::Admin)?;
        self.db.list_activity(ACTIVITY_LIMIT).await
    }

    /// Tasks created during the given calendar month, oldest first.
    pub async fn monthly_task_report(
        &self,
        actor: &Actor,
        year: i32,
        month: u32,
    ) -> PortResult<Vec<MonthlyTaskRow>> {
        policy::require_role(actor, Role::Admin)?;
        let (start, end) = report::month_range(year, month)?;
        self.db.list_tasks_created_between(start, end).await
    }

    pub async fn monthly_report_csv(
        &self,
        actor: &Actor,
        year: i32,
        month: u32,
    ) -> PortResult<String> {
        let rows = self.monthly_task_report(actor, year, month).await?;
        Ok(report::render_csv(&rows))
    }
}
