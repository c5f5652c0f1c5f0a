//! Profile entities (database row mappings).
//!
//! Profiles and ranks are owned by the wider marketplace; only read here.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the `profiles` table.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileEntity {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ProfileEntity> for domain::models::Profile {
    fn from(entity: ProfileEntity) -> Self {
        Self {
            id: entity.id,
            display_name: entity.display_name,
            avatar_url: entity.avatar_url,
            created_at: entity.created_at,
        }
    }
}

/// Profile row joined with the `ranks` lookup.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileWithRankEntity {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub rank_name: String,
    pub rank_order: i32,
}

impl From<ProfileWithRankEntity> for domain::models::ProfileWithRank {
    fn from(entity: ProfileWithRankEntity) -> Self {
        Self {
            id: entity.id,
            display_name: entity.display_name,
            avatar_url: entity.avatar_url,
            rank_name: entity.rank_name,
            rank_order: entity.rank_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_with_rank_into_model() {
        let entity = ProfileWithRankEntity {
            id: Uuid::new_v4(),
            display_name: Some("Ines".to_string()),
            avatar_url: None,
            rank_name: "designer".to_string(),
            rank_order: 3,
        };
        let model: domain::models::ProfileWithRank = entity.clone().into();
        assert_eq!(model.rank_order, 3);
        assert!(model.can_create_team());
    }
}
