//! crates/interntrack_core/src/policy.rs
//!
//! Role-scoped access predicates. Each predicate is an exhaustive match on the actor's role
//! against the ownership links stored on the resource.
//!
//! Role checks happen before any lookup and fail with `Unauthorized`. Ownership checks happen
//! after the lookup and fail with `NotFound`, so a caller cannot probe for records that belong
//! to someone else.

use uuid::Uuid;

use crate::domain::{Actor, Complaint, Role, Task, User};
use crate::ports::{PortError, PortResult};

/// Fails with `Unauthorized` unless the actor holds `role`.
pub fn require_role(actor: &Actor, role: Role) -> PortResult<()> {
    if actor.role == role {
        Ok(())
    } else {
        Err(PortError::Unauthorized)
    }
}

/// Converts a failed scope check into the `NotFound` the caller sees.
pub fn in_scope(allowed: bool, what: &str, id: Uuid) -> PortResult<()> {
    if allowed {
        Ok(())
    } else {
        Err(PortError::NotFound(format!("{} {} not found", what, id)))
    }
}

//=========================================================================================
// Users
//=========================================================================================

pub fn can_read_user(actor: &Actor, user: &User) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Supervisor => {
            user.id == actor.user_id
                || (user.role == Role::Intern && user.supervisor_id == Some(actor.user_id))
        }
        Role::Intern => user.id == actor.user_id,
    }
}

/// Only admins assign or unassign, and only interns can carry a supervisor link.
pub fn can_assign(actor: &Actor, intern: &User, supervisor: Option<&User>) -> bool {
    match actor.role {
        Role::Admin => {
            intern.role == Role::Intern
                && supervisor.map_or(true, |s| s.role == Role::Supervisor)
        }
        Role::Supervisor | Role::Intern => false,
    }
}

pub fn can_delete_user(actor: &Actor, target_id: Uuid) -> PortResult<()> {
    require_role(actor, Role::Admin)?;
    if actor.user_id == target_id {
        return Err(PortError::Validation("You cannot delete yourself".to_string()));
    }
    Ok(())
}

//=========================================================================================
// Tasks
//=========================================================================================

/// A supervisor may only create tasks for interns currently assigned to them.
pub fn can_create_task_for(actor: &Actor, intern: &User) -> bool {
    match actor.role {
        Role::Supervisor => {
            intern.role == Role::Intern && intern.supervisor_id == Some(actor.user_id)
        }
        Role::Admin | Role::Intern => false,
    }
}

pub fn can_read_task(actor: &Actor, task: &Task) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Supervisor => task.supervisor_id == actor.user_id,
        Role::Intern => task.intern_id == actor.user_id,
    }
}

/// Status belongs to the assigned intern.
pub fn can_set_task_status(actor: &Actor, task: &Task) -> bool {
    match actor.role {
        Role::Intern => task.intern_id == actor.user_id,
        Role::Admin | Role::Supervisor => false,
    }
}

/// Rating and feedback belong to the creating supervisor.
pub fn can_rate_task(actor: &Actor, task: &Task) -> bool {
    match actor.role {
        Role::Supervisor => task.supervisor_id == actor.user_id,
        Role::Admin | Role::Intern => false,
    }
}

pub fn can_report_on_task(actor: &Actor, task: &Task) -> bool {
    can_set_task_status(actor, task)
}

//=========================================================================================
// Attendance
//=========================================================================================

pub fn can_read_attendance_of(actor: &Actor, intern: &User) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Supervisor => {
            intern.role == Role::Intern && intern.supervisor_id == Some(actor.user_id)
        }
        Role::Intern => intern.id == actor.user_id,
    }
}

//=========================================================================================
// Complaints
//=========================================================================================

pub fn can_read_complaint(actor: &Actor, complaint: &Complaint) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Supervisor => complaint.supervisor_id == Some(actor.user_id),
        Role::Intern => complaint.intern_id == actor.user_id,
    }
}

/// Only the supervisor captured when the complaint was filed may move its status.
pub fn can_update_complaint(actor: &Actor, complaint: &Complaint) -> bool {
    match actor.role {
        Role::Supervisor => complaint.supervisor_id == Some(actor.user_id),
        Role::Admin | Role::Intern => false,
    }
}
