//! Team repository for database operations.
//!
//! Capacity-sensitive mutations (membership inserts, team deletion on
//! departure, leadership transfer) run inside a transaction that first locks
//! the team row with `SELECT ... FOR UPDATE`, so concurrent approvals cannot
//! overbook a team.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::{MemberWithProfileEntity, TeamEntity, TeamMemberEntity, TeamRoleDb};
use crate::metrics::QueryTimer;

const TEAM_COLUMNS: &str =
    "id, name, description, category, max_members, is_open, created_by, created_at, updated_at";

/// Repository for team and membership database operations.
#[derive(Clone)]
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    /// Creates a new TeamRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begins a transaction on the underlying pool.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Create a new team and add the creator as lead.
    ///
    /// Both inserts commit atomically; the `UNIQUE (user_id)` constraint on
    /// memberships rejects a creator who raced their way into another team.
    pub async fn create_with_lead(
        &self,
        name: &str,
        description: Option<&str>,
        category: Option<&str>,
        max_members: i32,
        is_open: bool,
        created_by: Uuid,
    ) -> Result<TeamEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_team_with_lead");

        let mut tx = self.pool.begin().await?;

        let team = sqlx::query_as::<_, TeamEntity>(&format!(
            r#"
            INSERT INTO teams (name, description, category, max_members, is_open, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TEAM_COLUMNS}
            "#,
        ))
        .bind(name)
        .bind(description)
        .bind(category)
        .bind(max_members)
        .bind(is_open)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO team_members (team_id, user_id, role)
            VALUES ($1, $2, 'lead')
            "#,
        )
        .bind(team.id)
        .bind(created_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(team)
    }

    /// Find a team by ID.
    pub async fn find_by_id(&self, team_id: Uuid) -> Result<Option<TeamEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_team_by_id");
        let result = sqlx::query_as::<_, TeamEntity>(&format!(
            r#"
            SELECT {TEAM_COLUMNS}
            FROM teams
            WHERE id = $1
            "#,
        ))
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lock a team row for the duration of the transaction.
    ///
    /// Serializes concurrent capacity checks against the same team.
    pub async fn lock_team(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        team_id: Uuid,
    ) -> Result<Option<TeamEntity>, sqlx::Error> {
        sqlx::query_as::<_, TeamEntity>(&format!(
            r#"
            SELECT {TEAM_COLUMNS}
            FROM teams
            WHERE id = $1
            FOR UPDATE
            "#,
        ))
        .bind(team_id)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Find a user's membership in a specific team.
    pub async fn membership(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<TeamMemberEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_membership");
        let result = sqlx::query_as::<_, TeamMemberEntity>(
            r#"
            SELECT id, team_id, user_id, role, joined_at
            FROM team_members
            WHERE team_id = $1 AND user_id = $2
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user's membership in any team.
    ///
    /// A user belongs to at most one team, so this is at most one row.
    pub async fn membership_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<TeamMemberEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_membership_for_user");
        let result = sqlx::query_as::<_, TeamMemberEntity>(
            r#"
            SELECT id, team_id, user_id, role, joined_at
            FROM team_members
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find the current lead of a team.
    pub async fn lead_of(&self, team_id: Uuid) -> Result<Option<TeamMemberEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_team_lead");
        let result = sqlx::query_as::<_, TeamMemberEntity>(
            r#"
            SELECT id, team_id, user_id, role, joined_at
            FROM team_members
            WHERE team_id = $1 AND role = 'lead'
            "#,
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count the members of a team.
    pub async fn count_members(&self, team_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_members");
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM team_members WHERE team_id = $1")
                .bind(team_id)
                .fetch_one(&self.pool)
                .await?;
        timer.record();
        Ok(result.0)
    }

    /// Count the members of a team within a transaction.
    pub async fn count_members_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        team_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM team_members WHERE team_id = $1")
                .bind(team_id)
                .fetch_one(&mut **tx)
                .await?;
        Ok(result.0)
    }

    /// Insert a membership row within a transaction.
    pub async fn add_member_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRoleDb,
    ) -> Result<TeamMemberEntity, sqlx::Error> {
        sqlx::query_as::<_, TeamMemberEntity>(
            r#"
            INSERT INTO team_members (team_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING id, team_id, user_id, role, joined_at
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .bind(role)
        .fetch_one(&mut **tx)
        .await
    }

    /// Remove a member from a team.
    ///
    /// Returns the number of rows deleted (0 or 1).
    pub async fn remove_member(&self, team_id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("remove_member");
        let result = sqlx::query(
            r#"
            DELETE FROM team_members
            WHERE team_id = $1 AND user_id = $2
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Delete a team within a transaction. Memberships, invitations and join
    /// requests cascade.
    pub async fn delete_team_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        team_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(team_id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }

    /// List a team's members joined with their profiles, lead first.
    pub async fn list_members_with_profiles(
        &self,
        team_id: Uuid,
    ) -> Result<Vec<MemberWithProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_members_with_profiles");
        let result = sqlx::query_as::<_, MemberWithProfileEntity>(
            r#"
            SELECT
                tm.id, tm.team_id, tm.user_id, tm.role, tm.joined_at,
                p.display_name, p.avatar_url
            FROM team_members tm
            JOIN profiles p ON p.id = tm.user_id
            WHERE tm.team_id = $1
            ORDER BY (tm.role = 'lead') DESC, tm.joined_at ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Transfer leadership from one member to another.
    ///
    /// Demotes the current lead before promoting the new one so the partial
    /// unique index on `(team_id) WHERE role = 'lead'` holds at every point.
    /// Returns false if either membership row was missing.
    pub async fn transfer_leadership(
        &self,
        team_id: Uuid,
        current_lead_id: Uuid,
        new_lead_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("transfer_leadership");

        let mut tx = self.pool.begin().await?;

        let demoted = sqlx::query(
            r#"
            UPDATE team_members
            SET role = 'member'
            WHERE team_id = $1 AND user_id = $2 AND role = 'lead'
            "#,
        )
        .bind(team_id)
        .bind(current_lead_id)
        .execute(&mut *tx)
        .await?;

        let promoted = sqlx::query(
            r#"
            UPDATE team_members
            SET role = 'lead'
            WHERE team_id = $1 AND user_id = $2 AND role = 'member'
            "#,
        )
        .bind(team_id)
        .bind(new_lead_id)
        .execute(&mut *tx)
        .await?;

        if demoted.rows_affected() == 0 || promoted.rows_affected() == 0 {
            tx.rollback().await?;
            timer.record();
            return Ok(false);
        }

        tx.commit().await?;
        timer.record();
        Ok(true)
    }
}
