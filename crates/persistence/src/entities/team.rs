//! Team and membership entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::team::TeamRole;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum mapping to the PostgreSQL `team_role` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "team_role", rename_all = "lowercase")]
pub enum TeamRoleDb {
    Lead,
    Member,
}

impl From<TeamRoleDb> for TeamRole {
    fn from(db_role: TeamRoleDb) -> Self {
        match db_role {
            TeamRoleDb::Lead => TeamRole::Lead,
            TeamRoleDb::Member => TeamRole::Member,
        }
    }
}

impl From<TeamRole> for TeamRoleDb {
    fn from(role: TeamRole) -> Self {
        match role {
            TeamRole::Lead => TeamRoleDb::Lead,
            TeamRole::Member => TeamRoleDb::Member,
        }
    }
}

/// Database row mapping for the `teams` table.
#[derive(Debug, Clone, FromRow)]
pub struct TeamEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub max_members: i32,
    pub is_open: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TeamEntity> for domain::models::Team {
    fn from(entity: TeamEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            category: entity.category,
            max_members: entity.max_members,
            is_open: entity.is_open,
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the `team_members` table.
#[derive(Debug, Clone, FromRow)]
pub struct TeamMemberEntity {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role: TeamRoleDb,
    pub joined_at: DateTime<Utc>,
}

impl From<TeamMemberEntity> for domain::models::TeamMember {
    fn from(entity: TeamMemberEntity) -> Self {
        Self {
            id: entity.id,
            team_id: entity.team_id,
            user_id: entity.user_id,
            role: entity.role.into(),
            joined_at: entity.joined_at,
        }
    }
}

/// Membership row joined with the member's profile, for roster listings.
#[derive(Debug, Clone, FromRow)]
pub struct MemberWithProfileEntity {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role: TeamRoleDb,
    pub joined_at: DateTime<Utc>,
    // Profile fields
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_conversion_round_trip() {
        assert_eq!(TeamRole::from(TeamRoleDb::Lead), TeamRole::Lead);
        assert_eq!(TeamRole::from(TeamRoleDb::Member), TeamRole::Member);
        assert_eq!(TeamRoleDb::from(TeamRole::Lead), TeamRoleDb::Lead);
        assert_eq!(TeamRoleDb::from(TeamRole::Member), TeamRoleDb::Member);
    }

    #[test]
    fn test_team_entity_into_model() {
        let entity = TeamEntity {
            id: Uuid::new_v4(),
            name: "Atelier Noir".to_string(),
            description: None,
            category: Some("couture".to_string()),
            max_members: 5,
            is_open: true,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let model: domain::models::Team = entity.clone().into();
        assert_eq!(model.id, entity.id);
        assert_eq!(model.name, "Atelier Noir");
        assert_eq!(model.max_members, 5);
        assert!(model.is_open);
    }

    #[test]
    fn test_member_entity_into_model() {
        let entity = TeamMemberEntity {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role: TeamRoleDb::Lead,
            joined_at: Utc::now(),
        };
        let model: domain::models::TeamMember = entity.clone().into();
        assert_eq!(model.role, TeamRole::Lead);
        assert_eq!(model.team_id, entity.team_id);
    }
}
