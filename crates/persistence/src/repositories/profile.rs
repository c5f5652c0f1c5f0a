//! Repository for profile lookups.
//!
//! Profiles and ranks are written by the wider marketplace; this service
//! only reads them.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ProfileEntity, ProfileWithRankEntity};
use crate::metrics::QueryTimer;

/// Repository for profile read operations.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Creates a new profile repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds a profile by ID.
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile_by_id");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT id, display_name, avatar_url, created_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finds a profile joined with its rank ordinal.
    pub async fn find_with_rank(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ProfileWithRankEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile_with_rank");
        let result = sqlx::query_as::<_, ProfileWithRankEntity>(
            r#"
            SELECT p.id, p.display_name, p.avatar_url, r.name AS rank_name, r.rank_order
            FROM profiles p
            JOIN ranks r ON r.id = p.rank_id
            WHERE p.id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
