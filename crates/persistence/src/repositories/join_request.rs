//! Repository for team join request database operations.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::{JoinRequestStatusDb, PendingJoinRequestEntity, TeamJoinRequestEntity};
use crate::metrics::QueryTimer;

const JOIN_REQUEST_COLUMNS: &str =
    "id, team_id, user_id, message, status, created_at, responded_at, responded_by";

/// Repository for team join request operations.
#[derive(Clone)]
pub struct JoinRequestRepository {
    pool: PgPool,
}

impl JoinRequestRepository {
    /// Creates a new join request repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Evaluates the stored admissibility predicate: team exists, is open,
    /// has capacity, and the user is not already in a team.
    pub async fn can_join_team(&self, team_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("can_join_team");
        let result: (bool,) = sqlx::query_as("SELECT can_join_team($1, $2)")
            .bind(team_id)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        timer.record();
        Ok(result.0)
    }

    /// Creates a new pending join request.
    pub async fn create(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        message: Option<&str>,
    ) -> Result<TeamJoinRequestEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_join_request");
        let result = sqlx::query_as::<_, TeamJoinRequestEntity>(&format!(
            r#"
            INSERT INTO team_join_requests (team_id, user_id, message)
            VALUES ($1, $2, $3)
            RETURNING {JOIN_REQUEST_COLUMNS}
            "#,
        ))
        .bind(team_id)
        .bind(user_id)
        .bind(message)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finds a join request by ID.
    pub async fn find_by_id(
        &self,
        request_id: Uuid,
    ) -> Result<Option<TeamJoinRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_join_request_by_id");
        let result = sqlx::query_as::<_, TeamJoinRequestEntity>(&format!(
            r#"
            SELECT {JOIN_REQUEST_COLUMNS}
            FROM team_join_requests
            WHERE id = $1
            "#,
        ))
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Checks whether the user already has a pending request for this team.
    pub async fn pending_exists(&self, team_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("join_request_pending_exists");
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM team_join_requests
                WHERE team_id = $1 AND user_id = $2 AND status = 'pending'
            )
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(result.0)
    }

    /// Moves a pending request to a terminal status, recording who responded.
    ///
    /// Returns `true` if the transition happened, `false` if the request was
    /// already resolved.
    pub async fn mark_responded(
        &self,
        request_id: Uuid,
        status: JoinRequestStatusDb,
        responded_by: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("join_request_mark_responded");
        let result = sqlx::query(
            r#"
            UPDATE team_join_requests
            SET status = $2, responded_at = NOW(), responded_by = $3
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(request_id)
        .bind(status)
        .bind(responded_by)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Same as [`mark_responded`](Self::mark_responded), inside a transaction.
    pub async fn mark_responded_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        request_id: Uuid,
        status: JoinRequestStatusDb,
        responded_by: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE team_join_requests
            SET status = $2, responded_at = NOW(), responded_by = $3
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(request_id)
        .bind(status)
        .bind(responded_by)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Lists pending requests for a team, oldest first, joined with the
    /// requester's profile.
    pub async fn list_pending_for_team(
        &self,
        team_id: Uuid,
    ) -> Result<Vec<PendingJoinRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_pending_join_requests");
        let result = sqlx::query_as::<_, PendingJoinRequestEntity>(
            r#"
            SELECT
                jr.id, jr.team_id, jr.user_id,
                p.display_name, p.avatar_url, jr.message, jr.created_at
            FROM team_join_requests jr
            JOIN profiles p ON p.id = jr.user_id
            WHERE jr.team_id = $1 AND jr.status = 'pending'
            ORDER BY jr.created_at ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
