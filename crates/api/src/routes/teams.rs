//! Team management routes.
//!
//! All mutations go through a single dispatch endpoint,
//! `POST /api/v1/teams/manage`, taking `{ "action": <name>, ...fields }` and
//! answering `{ "success": true, ... }` or a structured error. Read endpoints
//! serve the studio UI's team pages.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::profile::{ProfileWithRank, MIN_TEAM_CREATE_RANK};
use domain::models::team::{
    CreateTeamRequest, LeaveTeamRequest, LeaveTeamResponse, RemoveMemberRequest,
    RemoveMemberResponse, TeamAction, TeamDetailResponse, TeamMemberInfo, TeamResponse, TeamRole,
    TransferLeadershipRequest, TransferLeadershipResponse,
};
use domain::services::notification::NotificationKind;
use persistence::repositories::{ProfileRepository, TeamRepository};
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_team_action;
use crate::routes::{invitations, join_requests, ActionSuccess};

/// Dispatch entry point for all team membership mutations.
///
/// POST /api/v1/teams/manage
pub async fn manage_team(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(action): Json<TeamAction>,
) -> Result<Response, ApiError> {
    let action_name = name_of(&action);

    let result = match action {
        TeamAction::Create(request) => create_team(&state, &user_auth, request).await,
        TeamAction::Invite(request) => invitations::invite_member(&state, &user_auth, request).await,
        TeamAction::RespondInvitation(request) => {
            invitations::respond_invitation(&state, &user_auth, request).await
        }
        TeamAction::JoinRequest(request) => {
            join_requests::create_join_request(&state, &user_auth, request).await
        }
        TeamAction::RespondRequest(request) => {
            join_requests::respond_join_request(&state, &user_auth, request).await
        }
        TeamAction::Leave(request) => leave_team(&state, &user_auth, request).await,
        TeamAction::TransferLeadership(request) => {
            transfer_leadership(&state, &user_auth, request).await
        }
        TeamAction::RemoveMember(request) => remove_member(&state, &user_auth, request).await,
    };

    record_team_action(action_name, if result.is_ok() { "success" } else { "error" });
    result
}

fn name_of(action: &TeamAction) -> &'static str {
    match action {
        TeamAction::Create(_) => "create",
        TeamAction::Invite(_) => "invite",
        TeamAction::RespondInvitation(_) => "respond_invitation",
        TeamAction::JoinRequest(_) => "join_request",
        TeamAction::RespondRequest(_) => "respond_request",
        TeamAction::Leave(_) => "leave",
        TeamAction::TransferLeadership(_) => "transfer_leadership",
        TeamAction::RemoveMember(_) => "remove_member",
    }
}

/// `create` action: validate the name, gate on rank, reject double
/// membership, then insert the team and its lead atomically.
async fn create_team(
    state: &AppState,
    user_auth: &UserAuth,
    request: CreateTeamRequest,
) -> Result<Response, ApiError> {
    request.validate()?;

    let profiles = ProfileRepository::new(state.pool.clone());
    let profile: ProfileWithRank = profiles
        .find_with_rank(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?
        .into();

    if !profile.can_create_team() {
        return Err(ApiError::Forbidden(format!(
            "Team creation requires rank {} or above (your rank: {})",
            MIN_TEAM_CREATE_RANK, profile.rank_order
        )));
    }

    let teams = TeamRepository::new(state.pool.clone());
    if teams.membership_for_user(user_auth.user_id).await?.is_some() {
        return Err(ApiError::Conflict(
            "You are already a member of a team".to_string(),
        ));
    }

    let max_members = request
        .max_members
        .unwrap_or(state.config.limits.default_max_members);
    let team = teams
        .create_with_lead(
            request.name.trim(),
            request.description.as_deref(),
            request.category.as_deref(),
            max_members,
            request.is_open.unwrap_or(false),
            user_auth.user_id,
        )
        .await?;

    info!(
        team_id = %team.id,
        team_name = %team.name,
        user_id = %user_auth.user_id,
        "Team created"
    );

    state
        .notifier
        .notify(
            user_auth.user_id,
            NotificationKind::TeamCreated,
            "Team Created",
            &format!("Your team \"{}\" is live.", team.name),
            Some(json!({ "team_id": team.id })),
        )
        .await;

    let response = TeamResponse::from_team(team.into(), 1);
    Ok((StatusCode::CREATED, Json(ActionSuccess::new(response))).into_response())
}

/// `leave` action: a member's row is deleted; a sole lead takes the team
/// down with them; a lead with co-members must hand over first.
async fn leave_team(
    state: &AppState,
    user_auth: &UserAuth,
    request: LeaveTeamRequest,
) -> Result<Response, ApiError> {
    let teams = TeamRepository::new(state.pool.clone());

    let membership = teams
        .membership(request.team_id, user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("You are not a member of this team".to_string()))?;

    let role: TeamRole = membership.role.into();
    let team_deleted = match role {
        TeamRole::Member => {
            teams.remove_member(request.team_id, user_auth.user_id).await?;
            false
        }
        TeamRole::Lead => {
            // Lock the team so a concurrent join approval cannot slip a new
            // member in between the count and the delete.
            let mut tx = teams.begin().await?;
            teams
                .lock_team(&mut tx, request.team_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

            let member_count = teams.count_members_tx(&mut tx, request.team_id).await?;
            if member_count > 1 {
                return Err(ApiError::Conflict(
                    "Transfer leadership or remove members before leaving the team".to_string(),
                ));
            }

            teams.delete_team_tx(&mut tx, request.team_id).await?;
            tx.commit().await?;
            true
        }
    };

    info!(
        team_id = %request.team_id,
        user_id = %user_auth.user_id,
        team_deleted = team_deleted,
        "Member left team"
    );

    Ok(Json(ActionSuccess::new(LeaveTeamResponse {
        team_id: request.team_id,
        left: true,
        team_deleted,
    }))
    .into_response())
}

/// `transfer_leadership` action: lead hands the role to another member,
/// demotion and promotion in one transaction.
async fn transfer_leadership(
    state: &AppState,
    user_auth: &UserAuth,
    request: TransferLeadershipRequest,
) -> Result<Response, ApiError> {
    let teams = TeamRepository::new(state.pool.clone());

    let membership = teams
        .membership(request.team_id, user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("You are not a member of this team".to_string()))?;

    let role: TeamRole = membership.role.into();
    if !role.can_transfer_leadership() {
        return Err(ApiError::Forbidden(
            "Only the team lead can transfer leadership".to_string(),
        ));
    }

    if request.new_lead_id == user_auth.user_id {
        return Err(ApiError::Conflict(
            "You are already the team lead".to_string(),
        ));
    }

    teams
        .membership(request.team_id, request.new_lead_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    let transferred = teams
        .transfer_leadership(request.team_id, user_auth.user_id, request.new_lead_id)
        .await?;
    if !transferred {
        return Err(ApiError::Conflict(
            "Team roles changed concurrently; leadership was not transferred".to_string(),
        ));
    }

    info!(
        team_id = %request.team_id,
        previous_lead_id = %user_auth.user_id,
        new_lead_id = %request.new_lead_id,
        "Leadership transferred"
    );

    state
        .notifier
        .notify(
            request.new_lead_id,
            NotificationKind::LeadershipTransferred,
            "You Are Now Team Lead",
            "Leadership of your team has been transferred to you.",
            Some(json!({ "team_id": request.team_id })),
        )
        .await;

    Ok(Json(ActionSuccess::new(TransferLeadershipResponse {
        team_id: request.team_id,
        previous_lead_id: user_auth.user_id,
        new_lead_id: request.new_lead_id,
        transferred_at: chrono::Utc::now(),
    }))
    .into_response())
}

/// `remove_member` action: lead removes a member from the team.
async fn remove_member(
    state: &AppState,
    user_auth: &UserAuth,
    request: RemoveMemberRequest,
) -> Result<Response, ApiError> {
    let teams = TeamRepository::new(state.pool.clone());

    let membership = teams
        .membership(request.team_id, user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("You are not a member of this team".to_string()))?;

    let role: TeamRole = membership.role.into();
    if !role.can_remove_members() {
        return Err(ApiError::Forbidden(
            "Only the team lead can remove members".to_string(),
        ));
    }

    if request.member_id == user_auth.user_id {
        return Err(ApiError::Conflict(
            "Use the leave action to exit your own team".to_string(),
        ));
    }

    let removed = teams.remove_member(request.team_id, request.member_id).await?;
    if removed == 0 {
        return Err(ApiError::NotFound("Member not found".to_string()));
    }

    info!(
        team_id = %request.team_id,
        actor_user_id = %user_auth.user_id,
        removed_user_id = %request.member_id,
        "Member removed from team"
    );

    state
        .notifier
        .notify(
            request.member_id,
            NotificationKind::RemovedFromTeam,
            "Removed From Team",
            "You have been removed from your team by the team lead.",
            Some(json!({ "team_id": request.team_id })),
        )
        .await;

    Ok(Json(ActionSuccess::new(RemoveMemberResponse {
        team_id: request.team_id,
        user_id: request.member_id,
        removed: true,
    }))
    .into_response())
}

/// Get the caller's team with its roster.
///
/// GET /api/v1/teams/me
pub async fn get_my_team(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<TeamDetailResponse>, ApiError> {
    let teams = TeamRepository::new(state.pool.clone());

    let membership = teams
        .membership_for_user(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("You are not a member of any team".to_string()))?;

    let detail = team_detail(&teams, membership.team_id, Some(membership.role.into())).await?;
    Ok(Json(detail))
}

/// Get a team with its roster.
///
/// GET /api/v1/teams/:team_id
pub async fn get_team(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(team_id): Path<Uuid>,
) -> Result<Json<TeamDetailResponse>, ApiError> {
    let teams = TeamRepository::new(state.pool.clone());

    let your_role = teams
        .membership(team_id, user_auth.user_id)
        .await?
        .map(|m| m.role.into());

    let detail = team_detail(&teams, team_id, your_role).await?;
    Ok(Json(detail))
}

/// Assemble a team detail response from the team row and its roster.
async fn team_detail(
    teams: &TeamRepository,
    team_id: Uuid,
    your_role: Option<TeamRole>,
) -> Result<TeamDetailResponse, ApiError> {
    let team = teams
        .find_by_id(team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    let members: Vec<TeamMemberInfo> = teams
        .list_members_with_profiles(team_id)
        .await?
        .into_iter()
        .map(|m| TeamMemberInfo {
            user_id: m.user_id,
            display_name: m.display_name,
            avatar_url: m.avatar_url,
            role: m.role.into(),
            joined_at: m.joined_at,
        })
        .collect();

    let member_count = members.len() as i64;
    Ok(TeamDetailResponse {
        team: TeamResponse::from_team(team.into(), member_count),
        members,
        your_role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names() {
        let action = TeamAction::Leave(LeaveTeamRequest {
            team_id: Uuid::new_v4(),
        });
        assert_eq!(name_of(&action), "leave");

        let action = TeamAction::RespondInvitation(
            domain::models::invitation::RespondInvitationRequest {
                invitation_id: Uuid::new_v4(),
                accept: true,
            },
        );
        assert_eq!(name_of(&action), "respond_invitation");
    }
}
