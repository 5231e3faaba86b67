//! Users and the supervisor/intern assignment relation.

use uuid::Uuid;

use super::InternshipService;
use crate::domain::{Actor, NewActivity, Role, User};
use crate::policy;
use crate::ports::{PortError, PortResult};

/// Interns and supervisors, each ordered by name.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    pub interns: Vec<User>,
    pub supervisors: Vec<User>,
}

impl InternshipService {
    pub async fn me(&self, actor: &Actor) -> PortResult<User> {
        self.db.get_user(actor.user_id).await
    }

    pub async fn get_user(&self, actor: &Actor, user_id: Uuid) -> PortResult<User> {
        let user = self.db.get_user(user_id).await?;
        policy::in_scope(policy::can_read_user(actor, &user), "User", user_id)?;
        Ok(user)
    }

    /// The intern's currently assigned supervisor.
    pub async fn my_supervisor(&self, actor: &Actor) -> PortResult<User> {
        policy::require_role(actor, Role::Intern)?;
        let me = self.db.get_user(actor.user_id).await?;
        let supervisor_id = me
            .supervisor_id
            .ok_or_else(|| PortError::NotFound("No supervisor assigned".to_string()))?;
        self.db.get_user(supervisor_id).await
    }

    pub async fn my_interns(&self, actor: &Actor) -> PortResult<Vec<User>> {
        policy::require_role(actor, Role::Supervisor)?;
        self.db.list_interns_for_supervisor(actor.user_id).await
    }

    pub async fn list_users(&self, actor: &Actor) -> PortResult<UserDirectory> {
        policy::require_role(actor, Role::Admin)?;
        Ok(UserDirectory {
            interns: self.db.list_users_by_role(Role::Intern).await?,
            supervisors: self.db.list_users_by_role(Role::Supervisor).await?,
        })
    }

    pub async fn assign_intern(
        &self,
        actor: &Actor,
        intern_id: Uuid,
        supervisor_id: Uuid,
    ) -> PortResult<User> {
        policy::require_role(actor, Role::Admin)?;
        let intern = self.db.get_user(intern_id).await?;
        policy::in_scope(policy::can_assign(actor, &intern, None), "Intern", intern_id)?;
        let supervisor = self.db.get_user(supervisor_id).await?;
        policy::in_scope(
            policy::can_assign(actor, &intern, Some(&supervisor)),
            "Supervisor",
            supervisor_id,
        )?;

        let activity = NewActivity::new(
            actor,
            format!("Assigned {} -> {}", intern.email, supervisor.email),
        );
        self.db
            .set_supervisor(intern_id, Some(supervisor_id), activity)
            .await
    }

    pub async fn unassign_intern(&self, actor: &Actor, intern_id: Uuid) -> PortResult<User> {
        policy::require_role(actor, Role::Admin)?;
        let intern = self.db.get_user(intern_id).await?;
        policy::in_scope(policy::can_assign(actor, &intern, None), "Intern", intern_id)?;

        let activity = NewActivity::new(actor, format!("Unassigned {}", intern.email));
        self.db.set_supervisor(intern_id, None, activity).await
    }

    /// Removes a user. Deleting a supervisor leaves their interns unassigned.
    pub async fn delete_user(&self, actor: &Actor, user_id: Uuid) -> PortResult<()> {
        policy::can_delete_user(actor, user_id)?;
        let target = self.db.get_user(user_id).await?;

        let activity = NewActivity::new(actor, format!("Deleted user {}", target.email));
        self.db.delete_user(user_id, activity).await
    }
}
