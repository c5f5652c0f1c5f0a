//! Team invitation models.
//!
//! Invitations are issued by the team lead and transition exactly once from
//! `pending` to `accepted` or `declined`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle status of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Declined => "declined",
        }
    }

    /// Terminal statuses are never reopened.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, InvitationStatus::Pending)
    }
}

impl FromStr for InvitationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(InvitationStatus::Pending),
            "accepted" => Ok(InvitationStatus::Accepted),
            "declined" => Ok(InvitationStatus::Declined),
            _ => Err(format!("Invalid invitation status: {}", s)),
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents an invitation to join a team.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamInvitation {
    pub id: Uuid,
    pub team_id: Uuid,
    pub inviter_id: Uuid,
    pub invitee_id: Uuid,
    pub message: Option<String>,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Request payload for the `invite` action.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct InviteMemberRequest {
    pub team_id: Uuid,
    pub invitee_id: Uuid,

    #[validate(custom(function = "shared::validation::validate_message"))]
    pub message: Option<String>,
}

/// Request payload for the `respond_invitation` action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RespondInvitationRequest {
    pub invitation_id: Uuid,
    pub accept: bool,
}

/// Invitation payload returned by the `invite` action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationResponse {
    pub id: Uuid,
    pub team_id: Uuid,
    pub inviter_id: Uuid,
    pub invitee_id: Uuid,
    pub message: Option<String>,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
}

impl From<TeamInvitation> for InvitationResponse {
    fn from(invitation: TeamInvitation) -> Self {
        Self {
            id: invitation.id,
            team_id: invitation.team_id,
            inviter_id: invitation.inviter_id,
            invitee_id: invitation.invitee_id,
            message: invitation.message,
            status: invitation.status,
            created_at: invitation.created_at,
        }
    }
}

/// Response for the `respond_invitation` action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RespondInvitationResponse {
    pub invitation_id: Uuid,
    pub team_id: Uuid,
    pub status: InvitationStatus,
    /// True when the acceptance produced a membership.
    pub joined: bool,
}

/// A pending invitation as listed for the invitee, joined with team info.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PendingInvitationInfo {
    pub id: Uuid,
    pub team_id: Uuid,
    pub team_name: String,
    pub inviter_id: Uuid,
    pub inviter_display_name: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Response for `GET /api/v1/invitations`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListInvitationsResponse {
    pub invitations: Vec<PendingInvitationInfo>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(InvitationStatus::Pending.as_str(), "pending");
        assert_eq!(InvitationStatus::Accepted.as_str(), "accepted");
        assert_eq!(InvitationStatus::Declined.as_str(), "declined");
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            InvitationStatus::from_str("pending").unwrap(),
            InvitationStatus::Pending
        );
        assert_eq!(
            InvitationStatus::from_str("ACCEPTED").unwrap(),
            InvitationStatus::Accepted
        );
        assert!(InvitationStatus::from_str("expired").is_err());
    }

    #[test]
    fn test_status_terminality() {
        assert!(!InvitationStatus::Pending.is_terminal());
        assert!(InvitationStatus::Accepted.is_terminal());
        assert!(InvitationStatus::Declined.is_terminal());
    }

    #[test]
    fn test_invite_request_message_too_long() {
        let request = InviteMemberRequest {
            team_id: Uuid::new_v4(),
            invitee_id: Uuid::new_v4(),
            message: Some("m".repeat(501)),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_invite_request_valid() {
        let request = InviteMemberRequest {
            team_id: Uuid::new_v4(),
            invitee_id: Uuid::new_v4(),
            message: Some("Join our knitwear studio".to_string()),
        };
        assert!(request.validate().is_ok());

        let no_message = InviteMemberRequest {
            team_id: Uuid::new_v4(),
            invitee_id: Uuid::new_v4(),
            message: None,
        };
        assert!(no_message.validate().is_ok());
    }

    #[test]
    fn test_invitation_response_from_model() {
        let invitation = TeamInvitation {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            inviter_id: Uuid::new_v4(),
            invitee_id: Uuid::new_v4(),
            message: None,
            status: InvitationStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
        };
        let response: InvitationResponse = invitation.clone().into();
        assert_eq!(response.id, invitation.id);
        assert_eq!(response.status, InvitationStatus::Pending);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&InvitationStatus::Declined).unwrap(),
            "\"declined\""
        );
    }
}
