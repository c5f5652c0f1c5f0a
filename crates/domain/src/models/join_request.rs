//! Join request models for open teams.
//!
//! A non-member may ask to join an open team; the team lead approves or
//! rejects. Like invitations, requests transition exactly once out of
//! `pending`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle status of a join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl JoinRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinRequestStatus::Pending => "pending",
            JoinRequestStatus::Approved => "approved",
            JoinRequestStatus::Rejected => "rejected",
        }
    }

    /// Terminal statuses are never reopened.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JoinRequestStatus::Pending)
    }
}

impl FromStr for JoinRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(JoinRequestStatus::Pending),
            "approved" => Ok(JoinRequestStatus::Approved),
            "rejected" => Ok(JoinRequestStatus::Rejected),
            _ => Err(format!("Invalid join request status: {}", s)),
        }
    }
}

impl fmt::Display for JoinRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a request to join an open team.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamJoinRequest {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub message: Option<String>,
    pub status: JoinRequestStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
    pub responded_by: Option<Uuid>,
}

/// Request payload for the `join_request` action.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct JoinTeamRequest {
    pub team_id: Uuid,

    #[validate(custom(function = "shared::validation::validate_message"))]
    pub message: Option<String>,
}

/// Request payload for the `respond_request` action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RespondJoinRequest {
    pub request_id: Uuid,
    pub approve: bool,
}

/// Join request payload returned by the `join_request` action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct JoinRequestResponse {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub message: Option<String>,
    pub status: JoinRequestStatus,
    pub created_at: DateTime<Utc>,
}

impl From<TeamJoinRequest> for JoinRequestResponse {
    fn from(request: TeamJoinRequest) -> Self {
        Self {
            id: request.id,
            team_id: request.team_id,
            user_id: request.user_id,
            message: request.message,
            status: request.status,
            created_at: request.created_at,
        }
    }
}

/// Response for the `respond_request` action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RespondJoinRequestResponse {
    pub request_id: Uuid,
    pub team_id: Uuid,
    pub status: JoinRequestStatus,
    /// True when the approval produced a membership.
    pub joined: bool,
}

/// A pending join request as listed for the team lead, joined with the
/// requester's profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PendingJoinRequestInfo {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Response for `GET /api/v1/teams/:team_id/join-requests`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListJoinRequestsResponse {
    pub requests: Vec<PendingJoinRequestInfo>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(JoinRequestStatus::Pending.as_str(), "pending");
        assert_eq!(JoinRequestStatus::Approved.as_str(), "approved");
        assert_eq!(JoinRequestStatus::Rejected.as_str(), "rejected");
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            JoinRequestStatus::from_str("Approved").unwrap(),
            JoinRequestStatus::Approved
        );
        assert!(JoinRequestStatus::from_str("declined").is_err());
    }

    #[test]
    fn test_status_terminality() {
        assert!(!JoinRequestStatus::Pending.is_terminal());
        assert!(JoinRequestStatus::Approved.is_terminal());
        assert!(JoinRequestStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_join_request_message_cap() {
        let request = JoinTeamRequest {
            team_id: Uuid::new_v4(),
            message: Some("m".repeat(501)),
        };
        assert!(request.validate().is_err());

        let request = JoinTeamRequest {
            team_id: Uuid::new_v4(),
            message: Some("I specialize in denim".to_string()),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_response_from_model() {
        let request = TeamJoinRequest {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            message: None,
            status: JoinRequestStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
            responded_by: None,
        };
        let response: JoinRequestResponse = request.clone().into();
        assert_eq!(response.id, request.id);
        assert_eq!(response.team_id, request.team_id);
        assert_eq!(response.status, JoinRequestStatus::Pending);
    }
}
