//! Team domain models for designer teams.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::models::invitation::{InviteMemberRequest, RespondInvitationRequest};
use crate::models::join_request::{JoinTeamRequest, RespondJoinRequest};

/// Default member capacity for newly created teams.
pub const DEFAULT_MAX_MEMBERS: i32 = 5;

/// Role within a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    Lead,
    Member,
}

impl TeamRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::Lead => "lead",
            TeamRole::Member => "member",
        }
    }

    /// Returns true if this role can send invitations.
    pub fn can_invite(&self) -> bool {
        matches!(self, TeamRole::Lead)
    }

    /// Returns true if this role can approve or reject join requests.
    pub fn can_respond_requests(&self) -> bool {
        matches!(self, TeamRole::Lead)
    }

    /// Returns true if this role can remove other members.
    pub fn can_remove_members(&self) -> bool {
        matches!(self, TeamRole::Lead)
    }

    /// Returns true if this role can transfer team leadership.
    pub fn can_transfer_leadership(&self) -> bool {
        matches!(self, TeamRole::Lead)
    }
}

impl FromStr for TeamRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lead" => Ok(TeamRole::Lead),
            "member" => Ok(TeamRole::Member),
            _ => Err(format!("Invalid team role: {}", s)),
        }
    }
}

impl fmt::Display for TeamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a designer team.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub max_members: i32,
    /// Whether the team accepts unsolicited join requests.
    pub is_open: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Represents a user's membership in a team.
///
/// A user belongs to at most one team at a time, system-wide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamMember {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role: TeamRole,
    pub joined_at: DateTime<Utc>,
}

/// Request payload for the `create` action.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateTeamRequest {
    #[validate(custom(function = "shared::validation::validate_team_name"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "shared::validation::validate_category"))]
    pub category: Option<String>,

    #[validate(range(min = 2, max = 20, message = "Max members must be between 2 and 20"))]
    pub max_members: Option<i32>,

    pub is_open: Option<bool>,
}

/// Request payload for the `leave` action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LeaveTeamRequest {
    pub team_id: Uuid,
}

/// Request payload for the `transfer_leadership` action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TransferLeadershipRequest {
    pub team_id: Uuid,
    /// Must be an existing member of the team.
    pub new_lead_id: Uuid,
}

/// Request payload for the `remove_member` action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RemoveMemberRequest {
    pub team_id: Uuid,
    pub member_id: Uuid,
}

/// The dispatch envelope for `POST /api/v1/teams/manage`.
///
/// The wire shape is `{ "action": "<name>", ...action fields }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TeamAction {
    Create(CreateTeamRequest),
    Invite(InviteMemberRequest),
    RespondInvitation(RespondInvitationRequest),
    JoinRequest(JoinTeamRequest),
    RespondRequest(RespondJoinRequest),
    Leave(LeaveTeamRequest),
    TransferLeadership(TransferLeadershipRequest),
    RemoveMember(RemoveMemberRequest),
}

/// Team payload returned by `create` and the detail endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub max_members: i32,
    pub is_open: bool,
    pub member_count: i64,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl TeamResponse {
    pub fn from_team(team: Team, member_count: i64) -> Self {
        Self {
            id: team.id,
            name: team.name,
            description: team.description,
            category: team.category,
            max_members: team.max_members,
            is_open: team.is_open,
            member_count,
            created_by: team.created_by,
            created_at: team.created_at,
        }
    }
}

/// A member entry in the team roster.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamMemberInfo {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: TeamRole,
    pub joined_at: DateTime<Utc>,
}

/// Team detail with full roster.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamDetailResponse {
    #[serde(flatten)]
    pub team: TeamResponse,
    pub members: Vec<TeamMemberInfo>,
    /// The caller's role, when the caller belongs to this team.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub your_role: Option<TeamRole>,
}

/// Response for the `leave` action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LeaveTeamResponse {
    pub team_id: Uuid,
    pub left: bool,
    /// True when the departing lead was the sole member and the team was
    /// deleted with them.
    pub team_deleted: bool,
}

/// Response for the `transfer_leadership` action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TransferLeadershipResponse {
    pub team_id: Uuid,
    pub previous_lead_id: Uuid,
    pub new_lead_id: Uuid,
    pub transferred_at: DateTime<Utc>,
}

/// Response for the `remove_member` action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RemoveMemberResponse {
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub removed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_role_as_str() {
        assert_eq!(TeamRole::Lead.as_str(), "lead");
        assert_eq!(TeamRole::Member.as_str(), "member");
    }

    #[test]
    fn test_team_role_from_str() {
        assert_eq!(TeamRole::from_str("lead").unwrap(), TeamRole::Lead);
        assert_eq!(TeamRole::from_str("MEMBER").unwrap(), TeamRole::Member);
        assert!(TeamRole::from_str("owner").is_err());
    }

    #[test]
    fn test_team_role_display() {
        assert_eq!(format!("{}", TeamRole::Lead), "lead");
        assert_eq!(format!("{}", TeamRole::Member), "member");
    }

    #[test]
    fn test_team_role_permissions() {
        assert!(TeamRole::Lead.can_invite());
        assert!(TeamRole::Lead.can_respond_requests());
        assert!(TeamRole::Lead.can_remove_members());
        assert!(TeamRole::Lead.can_transfer_leadership());

        assert!(!TeamRole::Member.can_invite());
        assert!(!TeamRole::Member.can_respond_requests());
        assert!(!TeamRole::Member.can_remove_members());
        assert!(!TeamRole::Member.can_transfer_leadership());
    }

    #[test]
    fn test_create_team_request_validation() {
        let valid = CreateTeamRequest {
            name: "Atelier Noir".to_string(),
            description: Some("Dark tailoring collective".to_string()),
            category: Some("couture".to_string()),
            max_members: Some(5),
            is_open: Some(true),
        };
        assert!(valid.validate().is_ok());

        let short_name = CreateTeamRequest {
            name: "ab".to_string(),
            description: None,
            category: None,
            max_members: None,
            is_open: None,
        };
        assert!(short_name.validate().is_err());

        let padded_short_name = CreateTeamRequest {
            name: "  ab  ".to_string(),
            description: None,
            category: None,
            max_members: None,
            is_open: None,
        };
        assert!(padded_short_name.validate().is_err());

        let oversized = CreateTeamRequest {
            name: "Atelier Noir".to_string(),
            description: None,
            category: None,
            max_members: Some(50),
            is_open: None,
        };
        assert!(oversized.validate().is_err());
    }

    #[test]
    fn test_team_action_deserialization() {
        let json = r#"{"action": "create", "name": "Atelier Noir", "is_open": true}"#;
        let action: TeamAction = serde_json::from_str(json).unwrap();
        match action {
            TeamAction::Create(req) => {
                assert_eq!(req.name, "Atelier Noir");
                assert_eq!(req.is_open, Some(true));
                assert!(req.max_members.is_none());
            }
            other => panic!("Expected create action, got {:?}", other),
        }
    }

    #[test]
    fn test_team_action_leave_deserialization() {
        let team_id = Uuid::new_v4();
        let json = format!(r#"{{"action": "leave", "team_id": "{}"}}"#, team_id);
        let action: TeamAction = serde_json::from_str(&json).unwrap();
        match action {
            TeamAction::Leave(req) => assert_eq!(req.team_id, team_id),
            other => panic!("Expected leave action, got {:?}", other),
        }
    }

    #[test]
    fn test_team_action_unknown_rejected() {
        let json = r#"{"action": "disband"}"#;
        assert!(serde_json::from_str::<TeamAction>(json).is_err());
    }

    #[test]
    fn test_team_detail_response_flattens_team() {
        let team = Team {
            id: Uuid::new_v4(),
            name: "Maison Fil".to_string(),
            description: None,
            category: Some("knitwear".to_string()),
            max_members: 5,
            is_open: false,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let detail = TeamDetailResponse {
            team: TeamResponse::from_team(team, 1),
            members: vec![],
            your_role: Some(TeamRole::Lead),
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["name"], "Maison Fil");
        assert_eq!(json["member_count"], 1);
        assert_eq!(json["your_role"], "lead");
    }

    #[test]
    fn test_default_max_members() {
        assert_eq!(DEFAULT_MAX_MEMBERS, 5);
    }
}
