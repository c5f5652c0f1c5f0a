//! Team invitation entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::invitation::InvitationStatus;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum mapping to the PostgreSQL `invitation_status` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "invitation_status", rename_all = "lowercase")]
pub enum InvitationStatusDb {
    Pending,
    Accepted,
    Declined,
}

impl From<InvitationStatusDb> for InvitationStatus {
    fn from(db_status: InvitationStatusDb) -> Self {
        match db_status {
            InvitationStatusDb::Pending => InvitationStatus::Pending,
            InvitationStatusDb::Accepted => InvitationStatus::Accepted,
            InvitationStatusDb::Declined => InvitationStatus::Declined,
        }
    }
}

impl From<InvitationStatus> for InvitationStatusDb {
    fn from(status: InvitationStatus) -> Self {
        match status {
            InvitationStatus::Pending => InvitationStatusDb::Pending,
            InvitationStatus::Accepted => InvitationStatusDb::Accepted,
            InvitationStatus::Declined => InvitationStatusDb::Declined,
        }
    }
}

/// Database row mapping for the `team_invitations` table.
#[derive(Debug, Clone, FromRow)]
pub struct TeamInvitationEntity {
    pub id: Uuid,
    pub team_id: Uuid,
    pub inviter_id: Uuid,
    pub invitee_id: Uuid,
    pub message: Option<String>,
    pub status: InvitationStatusDb,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl From<TeamInvitationEntity> for domain::models::TeamInvitation {
    fn from(entity: TeamInvitationEntity) -> Self {
        Self {
            id: entity.id,
            team_id: entity.team_id,
            inviter_id: entity.inviter_id,
            invitee_id: entity.invitee_id,
            message: entity.message,
            status: entity.status.into(),
            created_at: entity.created_at,
            responded_at: entity.responded_at,
        }
    }
}

/// Pending invitation joined with team and inviter info, for the invitee's
/// inbox listing.
#[derive(Debug, Clone, FromRow)]
pub struct PendingInvitationEntity {
    pub id: Uuid,
    pub team_id: Uuid,
    pub team_name: String,
    pub inviter_id: Uuid,
    pub inviter_display_name: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion_round_trip() {
        for status in [
            InvitationStatus::Pending,
            InvitationStatus::Accepted,
            InvitationStatus::Declined,
        ] {
            let db: InvitationStatusDb = status.into();
            assert_eq!(InvitationStatus::from(db), status);
        }
    }

    #[test]
    fn test_entity_into_model() {
        let entity = TeamInvitationEntity {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            inviter_id: Uuid::new_v4(),
            invitee_id: Uuid::new_v4(),
            message: Some("join us".to_string()),
            status: InvitationStatusDb::Pending,
            created_at: Utc::now(),
            responded_at: None,
        };
        let model: domain::models::TeamInvitation = entity.clone().into();
        assert_eq!(model.id, entity.id);
        assert_eq!(model.status, InvitationStatus::Pending);
        assert_eq!(model.message.as_deref(), Some("join us"));
    }
}
