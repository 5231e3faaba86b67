//! Complaint workflow. Any of `OPEN`, `IN_REVIEW`, `RESOLVED` may follow any other; only the
//! supervisor captured at filing time can change it.

use uuid::Uuid;

use super::{required_text, InternshipService, COMPLAINT_LIMIT};
use crate::domain::{Actor, Complaint, ComplaintStatus, NewActivity, NewComplaint, Role};
use crate::policy;
use crate::ports::PortResult;

impl InternshipService {
    pub async fn file_complaint(
        &self,
        actor: &Actor,
        subject: &str,
        message: &str,
    ) -> PortResult<Complaint> {
        policy::require_role(actor, Role::Intern)?;
        let subject = required_text(subject, "subject and message required")?;
        let message = required_text(message, "subject and message required")?;

        let me = self.db.get_user(actor.user_id).await?;
        let complaint = NewComplaint {
            id: Uuid::new_v4(),
            intern_id: actor.user_id,
            supervisor_id: me.supervisor_id,
            subject,
            message,
        };
        let activity = NewActivity::new(actor, format!("Created complaint {}", complaint.id));
        self.db.create_complaint(complaint, activity).await
    }

    pub async fn set_complaint_status(
        &self,
        actor: &Actor,
        complaint_id: Uuid,
        status: &str,
    ) -> PortResult<Complaint> {
        policy::require_role(actor, Role::Supervisor)?;
        let status: ComplaintStatus = status.trim().parse()?;

        let complaint = self.db.get_complaint(complaint_id).await?;
        policy::in_scope(
            policy::can_update_complaint(actor, &complaint),
            "Complaint",
            complaint_id,
        )?;

        let activity = NewActivity::new(
            actor,
            format!("Updated complaint {} -> {}", complaint.id, status),
        );
        self.db
            .update_complaint_status(complaint_id, status, activity)
            .await
    }

    pub async fn get_complaint(&self, actor: &Actor, complaint_id: Uuid) -> PortResult<Complaint> {
        let complaint = self.db.get_complaint(complaint_id).await?;
        policy::in_scope(
            policy::can_read_complaint(actor, &complaint),
            "Complaint",
            complaint_id,
        )?;
        Ok(complaint)
    }

    pub async fn complaints(&self, actor: &Actor) -> PortResult<Vec<Complaint>> {
        match actor.role {
            Role::Admin => self.db.list_complaints(COMPLAINT_LIMIT).await,
            Role::Supervisor => {
                self.db
                    .list_complaints_for_supervisor(actor.user_id, COMPLAINT_LIMIT)
                    .await
            }
            Role::Intern => {
                self.db
                    .list_complaints_for_intern(actor.user_id, COMPLAINT_LIMIT)
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{ComplaintStatus, Role};
    use crate::ports::{DatabaseService, PortError};
    use crate::service::test_support::Fixture;

    #[tokio::test]
    async fn complaint_is_addressed_to_supervisor_at_filing_time() {
        let fx = Fixture::new().await;
        let (sup, intern) = fx.pair("a").await;
        let new_sup = fx.user(Role::Supervisor, "new-sup@example.com").await;

        let complaint = fx
            .service
            .file_complaint(&intern, "Laptop", "Keyboard is broken")
            .await
            .unwrap();
        assert_eq!(complaint.supervisor_id, Some(sup.user_id));
        assert_eq!(complaint.status, ComplaintStatus::Open);

        fx.service
            .assign_intern(&fx.admin, intern.user_id, new_sup.user_id)
            .await
            .unwrap();

        assert!(matches!(
            fx.service
                .set_complaint_status(&new_sup, complaint.id, "IN_REVIEW")
                .await,
            Err(PortError::NotFound(_))
        ));
        let updated = fx
            .service
            .set_complaint_status(&sup, complaint.id, "IN_REVIEW")
            .await
            .unwrap();
        assert_eq!(updated.status, ComplaintStatus::InReview);
        assert!(fx.service.complaints(&new_sup).await.unwrap().is_empty());

        for reader in [&sup, &intern, &fx.admin] {
            let seen = fx.service.get_complaint(reader, complaint.id).await.unwrap();
            assert_eq!(seen.status, ComplaintStatus::InReview);
        }
        assert!(matches!(
            fx.service.get_complaint(&new_sup, complaint.id).await,
            Err(PortError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn repeated_status_is_logged_twice() {
        let fx = Fixture::new().await;
        let (sup, intern) = fx.pair("a").await;
        let complaint = fx
            .service
            .file_complaint(&intern, "Hours", "Too long")
            .await
            .unwrap();
        let before = fx.activity_count().await;

        for _ in 0..2 {
            let updated = fx
                .service
                .set_complaint_status(&sup, complaint.id, "RESOLVED")
                .await
                .unwrap();
            assert_eq!(updated.status, ComplaintStatus::Resolved);
        }
        assert_eq!(fx.activity_count().await, before + 2);

        let reopened = fx
            .service
            .set_complaint_status(&sup, complaint.id, "OPEN")
            .await
            .unwrap();
        assert_eq!(reopened.status, ComplaintStatus::Open);
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_lookup() {
        let fx = Fixture::new().await;
        let (sup, intern) = fx.pair("a").await;

        assert!(matches!(
            fx.service.file_complaint(&intern, " ", "body").await,
            Err(PortError::Validation(_))
        ));
        assert!(matches!(
            fx.service
                .set_complaint_status(&sup, uuid::Uuid::new_v4(), "CLOSED")
                .await,
            Err(PortError::Validation(_))
        ));
        assert!(matches!(
            fx.service.file_complaint(&sup, "s", "m").await,
            Err(PortError::Unauthorized)
        ));
        assert!(matches!(
            fx.service
                .set_complaint_status(&intern, uuid::Uuid::new_v4(), "OPEN")
                .await,
            Err(PortError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn unassigned_intern_files_unaddressed_complaint() {
        let fx = Fixture::new().await;
        let intern = fx.user(Role::Intern, "loner@example.com").await;

        let complaint = fx
            .service
            .file_complaint(&intern, "No mentor", "Nobody assigned")
            .await
            .unwrap();
        assert_eq!(complaint.supervisor_id, None);
        assert_eq!(fx.service.complaints(&intern).await.unwrap().len(), 1);
        assert_eq!(fx.service.complaints(&fx.admin).await.unwrap().len(), 1);
        assert!(fx
            .service
            .get_complaint(&intern, complaint.id)
            .await
            .is_ok());
        assert_eq!(
            fx.db.get_complaint(complaint.id).await.unwrap().status,
            ComplaintStatus::Open
        );
    }
}
