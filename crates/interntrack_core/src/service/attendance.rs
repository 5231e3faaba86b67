//! Attendance recorder. Every check-in is stored as its own immutable record; there is no
//! one-per-day constraint.

use uuid::Uuid;

use super::{InternshipService, ATTENDANCE_LIMIT, INTERN_ATTENDANCE_LIMIT};
use crate::domain::{Actor, Attendance, NewActivity, NewAttendance, Role};
use crate::geofence::{self, OfficeConfig};
use crate::policy;
use crate::ports::PortResult;

/// A check-in claim as submitted by the intern.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CheckIn {
    pub in_office: bool,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl InternshipService {
    pub async fn record_attendance(
        &self,
        actor: &Actor,
        claim: CheckIn,
        office: &OfficeConfig,
    ) -> PortResult<Attendance> {
        policy::require_role(actor, Role::Intern)?;
        let outcome = geofence::validate(claim.in_office, claim.lat, claim.lng, office);

        let attendance = NewAttendance {
            id: Uuid::new_v4(),
            intern_id: actor.user_id,
            in_office: claim.in_office,
            lat: claim.lat.filter(|v| v.is_finite()),
            lng: claim.lng.filter(|v| v.is_finite()),
            office_distance_m: outcome.distance_m,
            location_validated: outcome.validated,
        };
        let activity = NewActivity::new(
            actor,
            format!(
                "Marked attendance (in_office={}, validated={})",
                attendance.in_office, attendance.location_validated
            ),
        );
        self.db.create_attendance(attendance, activity).await
    }

    /// Attendance visible to the actor: everything for admins, their interns' for supervisors,
    /// their own for interns.
    pub async fn attendance(&self, actor: &Actor) -> PortResult<Vec<Attendance>> {
        match actor.role {
            Role::Admin => self.db.list_attendance(ATTENDANCE_LIMIT).await,
            Role::Supervisor => {
                self.db
                    .list_attendance_for_supervisor(actor.user_id, ATTENDANCE_LIMIT)
                    .await
            }
            Role::Intern => {
                self.db
                    .list_attendance_for_intern(actor.user_id, ATTENDANCE_LIMIT)
                    .await
            }
        }
    }

    pub async fn intern_attendance(
        &self,
        actor: &Actor,
        intern_id: Uuid,
    ) -> PortResult<Vec<Attendance>> {
        let intern = self.db.get_user(intern_id).await?;
        policy::in_scope(
            policy::can_read_attendance_of(actor, &intern),
            "Intern",
            intern_id,
        )?;
        self.db
            .list_attendance_for_intern(intern_id, INTERN_ATTENDANCE_LIMIT)
            .await
    }
}
