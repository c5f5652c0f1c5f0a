//! Team join request entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::join_request::JoinRequestStatus;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum mapping to the PostgreSQL `join_request_status` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "join_request_status", rename_all = "lowercase")]
pub enum JoinRequestStatusDb {
    Pending,
    Approved,
    Rejected,
}

impl From<JoinRequestStatusDb> for JoinRequestStatus {
    fn from(db_status: JoinRequestStatusDb) -> Self {
        match db_status {
            JoinRequestStatusDb::Pending => JoinRequestStatus::Pending,
            JoinRequestStatusDb::Approved => JoinRequestStatus::Approved,
            JoinRequestStatusDb::Rejected => JoinRequestStatus::Rejected,
        }
    }
}

impl From<JoinRequestStatus> for JoinRequestStatusDb {
    fn from(status: JoinRequestStatus) -> Self {
        match status {
            JoinRequestStatus::Pending => JoinRequestStatusDb::Pending,
            JoinRequestStatus::Approved => JoinRequestStatusDb::Approved,
            JoinRequestStatus::Rejected => JoinRequestStatusDb::Rejected,
        }
    }
}

/// Database row mapping for the `team_join_requests` table.
#[derive(Debug, Clone, FromRow)]
pub struct TeamJoinRequestEntity {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub message: Option<String>,
    pub status: JoinRequestStatusDb,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
    pub responded_by: Option<Uuid>,
}

impl From<TeamJoinRequestEntity> for domain::models::TeamJoinRequest {
    fn from(entity: TeamJoinRequestEntity) -> Self {
        Self {
            id: entity.id,
            team_id: entity.team_id,
            user_id: entity.user_id,
            message: entity.message,
            status: entity.status.into(),
            created_at: entity.created_at,
            responded_at: entity.responded_at,
            responded_by: entity.responded_by,
        }
    }
}

/// Pending join request joined with the requester's profile, for the lead's
/// review listing.
#[derive(Debug, Clone, FromRow)]
pub struct PendingJoinRequestEntity {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion_round_trip() {
        for status in [
            JoinRequestStatus::Pending,
            JoinRequestStatus::Approved,
            JoinRequestStatus::Rejected,
        ] {
            let db: JoinRequestStatusDb = status.into();
            assert_eq!(JoinRequestStatus::from(db), status);
        }
    }

    #[test]
    fn test_entity_into_model() {
        let responder = Uuid::new_v4();
        let entity = TeamJoinRequestEntity {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            message: None,
            status: JoinRequestStatusDb::Approved,
            created_at: Utc::now(),
            responded_at: Some(Utc::now()),
            responded_by: Some(responder),
        };
        let model: domain::models::TeamJoinRequest = entity.clone().into();
        assert_eq!(model.status, JoinRequestStatus::Approved);
        assert_eq!(model.responded_by, Some(responder));
    }
}
