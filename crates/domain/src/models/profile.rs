//! Designer profile and rank models.
//!
//! Profiles and the rank ladder are owned by the wider marketplace; this
//! service only reads them to gate privileged actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum rank ordinal required to create a team.
pub const MIN_TEAM_CREATE_RANK: i32 = 3;

/// A designer profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Profile {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A profile joined with its rank on the ladder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProfileWithRank {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub rank_name: String,
    pub rank_order: i32,
}

impl ProfileWithRank {
    /// Whether this profile's rank permits team creation.
    pub fn can_create_team(&self) -> bool {
        self.rank_order >= MIN_TEAM_CREATE_RANK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with_rank(rank_order: i32) -> ProfileWithRank {
        ProfileWithRank {
            id: Uuid::new_v4(),
            display_name: Some("Ines".to_string()),
            avatar_url: None,
            rank_name: "designer".to_string(),
            rank_order,
        }
    }

    #[test]
    fn test_rank_gate() {
        assert!(!profile_with_rank(1).can_create_team());
        assert!(!profile_with_rank(2).can_create_team());
        assert!(profile_with_rank(3).can_create_team());
        assert!(profile_with_rank(5).can_create_team());
    }

    #[test]
    fn test_min_rank_constant() {
        assert_eq!(MIN_TEAM_CREATE_RANK, 3);
    }
}
