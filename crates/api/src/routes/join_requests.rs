//! Join request routes: the `join_request` and `respond_request` actions,
//! plus the lead's review listing.
//!
//! Admissibility of an unsolicited request is decided by the stored
//! `can_join_team` predicate. Approval follows the same transactional shape
//! as invitation acceptance: capacity first, then the status transition and
//! membership insert in one commit.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::join_request::{
    JoinRequestResponse, JoinRequestStatus, JoinTeamRequest, ListJoinRequestsResponse,
    PendingJoinRequestInfo, RespondJoinRequest, RespondJoinRequestResponse,
};
use domain::models::team::TeamRole;
use domain::services::notification::NotificationKind;
use persistence::entities::{JoinRequestStatusDb, TeamRoleDb};
use persistence::repositories::{JoinRequestRepository, TeamRepository};
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::ActionSuccess;

/// `join_request` action: a teamless designer asks to join an open team.
pub(crate) async fn create_join_request(
    state: &AppState,
    user_auth: &UserAuth,
    request: JoinTeamRequest,
) -> Result<Response, ApiError> {
    request.validate()?;

    let teams = TeamRepository::new(state.pool.clone());
    let team = teams
        .find_by_id(request.team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    let join_requests = JoinRequestRepository::new(state.pool.clone());
    if !join_requests
        .can_join_team(request.team_id, user_auth.user_id)
        .await?
    {
        return Err(ApiError::Conflict("Cannot join this team".to_string()));
    }

    if join_requests
        .pending_exists(request.team_id, user_auth.user_id)
        .await?
    {
        return Err(ApiError::Conflict(
            "You already have a pending request for this team".to_string(),
        ));
    }

    let join_request = join_requests
        .create(request.team_id, user_auth.user_id, request.message.as_deref())
        .await?;

    info!(
        request_id = %join_request.id,
        team_id = %request.team_id,
        user_id = %user_auth.user_id,
        "Join request created"
    );

    if let Some(lead) = teams.lead_of(request.team_id).await? {
        state
            .notifier
            .notify(
                lead.user_id,
                NotificationKind::JoinRequestReceived,
                "New Join Request",
                &format!("A designer asked to join \"{}\".", team.name),
                Some(json!({
                    "team_id": request.team_id,
                    "request_id": join_request.id,
                })),
            )
            .await;
    }

    let response: JoinRequestResponse =
        domain::models::TeamJoinRequest::from(join_request).into();
    Ok((StatusCode::CREATED, Json(ActionSuccess::new(response))).into_response())
}

/// `respond_request` action: the lead approves or rejects a pending request.
pub(crate) async fn respond_join_request(
    state: &AppState,
    user_auth: &UserAuth,
    request: RespondJoinRequest,
) -> Result<Response, ApiError> {
    let join_requests = JoinRequestRepository::new(state.pool.clone());
    let teams = TeamRepository::new(state.pool.clone());

    let join_request = join_requests
        .find_by_id(request.request_id)
        .await?
        .filter(|r| r.status == JoinRequestStatusDb::Pending)
        .ok_or_else(|| {
            ApiError::NotFound("Join request not found or already resolved".to_string())
        })?;

    let membership = teams
        .membership(join_request.team_id, user_auth.user_id)
        .await?;
    let is_lead = membership
        .map(|m| TeamRole::from(m.role).can_respond_requests())
        .unwrap_or(false);
    if !is_lead {
        return Err(ApiError::Forbidden(
            "Only the team lead can respond to join requests".to_string(),
        ));
    }

    if !request.approve {
        let transitioned = join_requests
            .mark_responded(
                request.request_id,
                JoinRequestStatusDb::Rejected,
                user_auth.user_id,
            )
            .await?;
        if !transitioned {
            return Err(ApiError::NotFound(
                "Join request not found or already resolved".to_string(),
            ));
        }

        info!(
            request_id = %request.request_id,
            team_id = %join_request.team_id,
            responded_by = %user_auth.user_id,
            "Join request rejected"
        );

        state
            .notifier
            .notify(
                join_request.user_id,
                NotificationKind::JoinRequestRejected,
                "Join Request Rejected",
                "Your request to join the team was rejected.",
                Some(json!({ "request_id": request.request_id })),
            )
            .await;

        return Ok(Json(ActionSuccess::new(RespondJoinRequestResponse {
            request_id: request.request_id,
            team_id: join_request.team_id,
            status: JoinRequestStatus::Rejected,
            joined: false,
        }))
        .into_response());
    }

    if teams
        .membership_for_user(join_request.user_id)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "User is already a member of a team".to_string(),
        ));
    }

    // Capacity is validated before the request row changes; a full team
    // leaves the request pending.
    let mut tx = teams.begin().await?;
    let team = teams
        .lock_team(&mut tx, join_request.team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team no longer exists".to_string()))?;

    let member_count = teams.count_members_tx(&mut tx, team.id).await?;
    if member_count >= team.max_members as i64 {
        return Err(ApiError::TeamFull("Team is full".to_string()));
    }

    let transitioned = join_requests
        .mark_responded_tx(
            &mut tx,
            request.request_id,
            JoinRequestStatusDb::Approved,
            user_auth.user_id,
        )
        .await?;
    if !transitioned {
        return Err(ApiError::NotFound(
            "Join request not found or already resolved".to_string(),
        ));
    }

    teams
        .add_member_tx(&mut tx, team.id, join_request.user_id, TeamRoleDb::Member)
        .await?;
    tx.commit().await?;

    info!(
        request_id = %request.request_id,
        team_id = %team.id,
        new_member_id = %join_request.user_id,
        responded_by = %user_auth.user_id,
        "Join request approved"
    );

    state
        .notifier
        .notify(
            join_request.user_id,
            NotificationKind::JoinRequestApproved,
            "Join Request Approved",
            &format!("You are now a member of \"{}\".", team.name),
            Some(json!({
                "team_id": team.id,
                "request_id": request.request_id,
            })),
        )
        .await;

    Ok(Json(ActionSuccess::new(RespondJoinRequestResponse {
        request_id: request.request_id,
        team_id: team.id,
        status: JoinRequestStatus::Approved,
        joined: true,
    }))
    .into_response())
}

/// List pending join requests for a team. Lead only.
///
/// GET /api/v1/teams/:team_id/join-requests
pub async fn list_join_requests(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(team_id): Path<Uuid>,
) -> Result<Json<ListJoinRequestsResponse>, ApiError> {
    let teams = TeamRepository::new(state.pool.clone());

    let membership = teams
        .membership(team_id, user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found or you are not a member".to_string()))?;

    let role: TeamRole = membership.role.into();
    if !role.can_respond_requests() {
        return Err(ApiError::Forbidden(
            "Only the team lead can review join requests".to_string(),
        ));
    }

    let join_requests = JoinRequestRepository::new(state.pool.clone());
    let pending: Vec<PendingJoinRequestInfo> = join_requests
        .list_pending_for_team(team_id)
        .await?
        .into_iter()
        .map(|entity| PendingJoinRequestInfo {
            id: entity.id,
            team_id: entity.team_id,
            user_id: entity.user_id,
            display_name: entity.display_name,
            avatar_url: entity.avatar_url,
            message: entity.message,
            created_at: entity.created_at,
        })
        .collect();

    let count = pending.len();

    info!(
        team_id = %team_id,
        user_id = %user_auth.user_id,
        count = count,
        "Listed pending join requests"
    );

    Ok(Json(ListJoinRequestsResponse {
        requests: pending,
        count,
    }))
}
