//! Repository for team invitation database operations.
//!
//! Status transitions are guarded with `WHERE status = 'pending'`, making the
//! pending-to-terminal move one-shot even under concurrent responders.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::{InvitationStatusDb, PendingInvitationEntity, TeamInvitationEntity};
use crate::metrics::QueryTimer;

const INVITATION_COLUMNS: &str =
    "id, team_id, inviter_id, invitee_id, message, status, created_at, responded_at";

/// Repository for team invitation operations.
#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    /// Creates a new invitation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a new pending invitation.
    pub async fn create(
        &self,
        team_id: Uuid,
        inviter_id: Uuid,
        invitee_id: Uuid,
        message: Option<&str>,
    ) -> Result<TeamInvitationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_invitation");
        let result = sqlx::query_as::<_, TeamInvitationEntity>(&format!(
            r#"
            INSERT INTO team_invitations (team_id, inviter_id, invitee_id, message)
            VALUES ($1, $2, $3, $4)
            RETURNING {INVITATION_COLUMNS}
            "#,
        ))
        .bind(team_id)
        .bind(inviter_id)
        .bind(invitee_id)
        .bind(message)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finds an invitation by ID.
    pub async fn find_by_id(
        &self,
        invitation_id: Uuid,
    ) -> Result<Option<TeamInvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invitation_by_id");
        let result = sqlx::query_as::<_, TeamInvitationEntity>(&format!(
            r#"
            SELECT {INVITATION_COLUMNS}
            FROM team_invitations
            WHERE id = $1
            "#,
        ))
        .bind(invitation_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Checks whether a pending invitation already exists for this invitee
    /// on this team.
    pub async fn pending_exists(
        &self,
        team_id: Uuid,
        invitee_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("invitation_pending_exists");
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM team_invitations
                WHERE team_id = $1 AND invitee_id = $2 AND status = 'pending'
            )
            "#,
        )
        .bind(team_id)
        .bind(invitee_id)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(result.0)
    }

    /// Moves a pending invitation to a terminal status.
    ///
    /// Returns `true` if the transition happened, `false` if the invitation
    /// was already responded to (race lost).
    pub async fn mark_responded(
        &self,
        invitation_id: Uuid,
        status: InvitationStatusDb,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("invitation_mark_responded");
        let result = sqlx::query(
            r#"
            UPDATE team_invitations
            SET status = $2, responded_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(invitation_id)
        .bind(status)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Same as [`mark_responded`](Self::mark_responded), inside a transaction.
    pub async fn mark_responded_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        invitation_id: Uuid,
        status: InvitationStatusDb,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE team_invitations
            SET status = $2, responded_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(invitation_id)
        .bind(status)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Lists pending invitations addressed to a user, newest first, joined
    /// with team and inviter info.
    pub async fn list_pending_for_invitee(
        &self,
        invitee_id: Uuid,
    ) -> Result<Vec<PendingInvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_pending_invitations");
        let result = sqlx::query_as::<_, PendingInvitationEntity>(
            r#"
            SELECT
                ti.id, ti.team_id, t.name AS team_name, ti.inviter_id,
                p.display_name AS inviter_display_name, ti.message, ti.created_at
            FROM team_invitations ti
            JOIN teams t ON t.id = ti.team_id
            JOIN profiles p ON p.id = ti.inviter_id
            WHERE ti.invitee_id = $1 AND ti.status = 'pending'
            ORDER BY ti.created_at DESC
            "#,
        )
        .bind(invitee_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
