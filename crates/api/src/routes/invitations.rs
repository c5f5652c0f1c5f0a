//! Invitation routes: the `invite` and `respond_invitation` actions, plus
//! the invitee's pending-invitation inbox.
//!
//! Accepting an invitation checks team capacity *before* touching the
//! invitation row, and commits the status transition together with the
//! membership insert; a capacity failure therefore leaves the invitation
//! pending.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::invitation::{
    InvitationResponse, InvitationStatus, InviteMemberRequest, ListInvitationsResponse,
    PendingInvitationInfo, RespondInvitationRequest, RespondInvitationResponse,
};
use domain::models::team::TeamRole;
use domain::services::notification::NotificationKind;
use persistence::entities::{InvitationStatusDb, TeamRoleDb};
use persistence::repositories::{InvitationRepository, ProfileRepository, TeamRepository};
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::ActionSuccess;

/// `invite` action: the lead invites a teamless designer.
pub(crate) async fn invite_member(
    state: &AppState,
    user_auth: &UserAuth,
    request: InviteMemberRequest,
) -> Result<Response, ApiError> {
    request.validate()?;

    let teams = TeamRepository::new(state.pool.clone());
    let team = teams
        .find_by_id(request.team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    let membership = teams
        .membership(request.team_id, user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("You are not a member of this team".to_string()))?;

    let role: TeamRole = membership.role.into();
    if !role.can_invite() {
        return Err(ApiError::Forbidden(
            "Only the team lead can send invitations".to_string(),
        ));
    }

    let profiles = ProfileRepository::new(state.pool.clone());
    profiles
        .find_by_id(request.invitee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitee profile not found".to_string()))?;

    if teams
        .membership_for_user(request.invitee_id)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "User is already a member of a team".to_string(),
        ));
    }

    let invitations = InvitationRepository::new(state.pool.clone());
    if invitations
        .pending_exists(request.team_id, request.invitee_id)
        .await?
    {
        return Err(ApiError::Conflict(
            "A pending invitation already exists for this user".to_string(),
        ));
    }

    let invitation = invitations
        .create(
            request.team_id,
            user_auth.user_id,
            request.invitee_id,
            request.message.as_deref(),
        )
        .await?;

    info!(
        invitation_id = %invitation.id,
        team_id = %request.team_id,
        inviter_id = %user_auth.user_id,
        invitee_id = %request.invitee_id,
        "Invitation sent"
    );

    state
        .notifier
        .notify(
            request.invitee_id,
            NotificationKind::TeamInvitation,
            "Team Invitation",
            &format!("You have been invited to join \"{}\".", team.name),
            Some(json!({
                "team_id": request.team_id,
                "invitation_id": invitation.id,
            })),
        )
        .await;

    let response: InvitationResponse = domain::models::TeamInvitation::from(invitation).into();
    Ok((StatusCode::CREATED, Json(ActionSuccess::new(response))).into_response())
}

/// `respond_invitation` action: the invitee accepts or declines.
pub(crate) async fn respond_invitation(
    state: &AppState,
    user_auth: &UserAuth,
    request: RespondInvitationRequest,
) -> Result<Response, ApiError> {
    let invitations = InvitationRepository::new(state.pool.clone());
    let teams = TeamRepository::new(state.pool.clone());

    let invitation = invitations
        .find_by_id(request.invitation_id)
        .await?
        .filter(|i| i.invitee_id == user_auth.user_id && i.status == InvitationStatusDb::Pending)
        .ok_or_else(|| {
            ApiError::NotFound("Invitation not found or already resolved".to_string())
        })?;

    if !request.accept {
        let transitioned = invitations
            .mark_responded(request.invitation_id, InvitationStatusDb::Declined)
            .await?;
        if !transitioned {
            return Err(ApiError::NotFound(
                "Invitation not found or already resolved".to_string(),
            ));
        }

        info!(
            invitation_id = %request.invitation_id,
            invitee_id = %user_auth.user_id,
            "Invitation declined"
        );

        return Ok(Json(ActionSuccess::new(RespondInvitationResponse {
            invitation_id: request.invitation_id,
            team_id: invitation.team_id,
            status: InvitationStatus::Declined,
            joined: false,
        }))
        .into_response());
    }

    if teams.membership_for_user(user_auth.user_id).await?.is_some() {
        return Err(ApiError::Conflict(
            "You are already a member of a team".to_string(),
        ));
    }

    // Capacity check and membership insert commit atomically with the
    // status transition; the team row is locked for the duration.
    let mut tx = teams.begin().await?;
    let team = teams
        .lock_team(&mut tx, invitation.team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team no longer exists".to_string()))?;

    let member_count = teams.count_members_tx(&mut tx, team.id).await?;
    if member_count >= team.max_members as i64 {
        return Err(ApiError::TeamFull("Team is full".to_string()));
    }

    let transitioned = invitations
        .mark_responded_tx(&mut tx, request.invitation_id, InvitationStatusDb::Accepted)
        .await?;
    if !transitioned {
        return Err(ApiError::NotFound(
            "Invitation not found or already resolved".to_string(),
        ));
    }

    teams
        .add_member_tx(&mut tx, team.id, user_auth.user_id, TeamRoleDb::Member)
        .await?;
    tx.commit().await?;

    info!(
        invitation_id = %request.invitation_id,
        team_id = %team.id,
        invitee_id = %user_auth.user_id,
        "Invitation accepted"
    );

    state
        .notifier
        .notify(
            invitation.inviter_id,
            NotificationKind::InvitationAccepted,
            "Invitation Accepted",
            &format!("Your invitation to join \"{}\" was accepted.", team.name),
            Some(json!({
                "team_id": team.id,
                "invitation_id": request.invitation_id,
            })),
        )
        .await;

    Ok(Json(ActionSuccess::new(RespondInvitationResponse {
        invitation_id: request.invitation_id,
        team_id: team.id,
        status: InvitationStatus::Accepted,
        joined: true,
    }))
    .into_response())
}

/// List pending invitations addressed to the caller.
///
/// GET /api/v1/invitations
pub async fn list_invitations(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<ListInvitationsResponse>, ApiError> {
    let invitations = InvitationRepository::new(state.pool.clone());

    let pending: Vec<PendingInvitationInfo> = invitations
        .list_pending_for_invitee(user_auth.user_id)
        .await?
        .into_iter()
        .map(|entity| PendingInvitationInfo {
            id: entity.id,
            team_id: entity.team_id,
            team_name: entity.team_name,
            inviter_id: entity.inviter_id,
            inviter_display_name: entity.inviter_display_name,
            message: entity.message,
            created_at: entity.created_at,
        })
        .collect();

    let count = pending.len();

    info!(
        user_id = %user_auth.user_id,
        count = count,
        "Listed pending invitations"
    );

    Ok(Json(ListInvitationsResponse {
        invitations: pending,
        count,
    }))
}
