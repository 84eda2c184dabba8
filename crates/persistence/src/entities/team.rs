//! Team and membership entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{Team, TeamMember, TeamRole};

/// Database row mapping for the teams table.
#[derive(Debug, Clone, FromRow)]
pub struct TeamEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub company_name: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamEntity {
    pub fn into_model(self) -> Team {
        Team {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            company_name: self.company_name,
            logo_url: self.logo_url,
            primary_color: self.primary_color,
            secondary_color: self.secondary_color,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Database row mapping for the team_members table.
#[derive(Debug, Clone, FromRow)]
pub struct TeamMemberEntity {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TeamMemberEntity {
    pub fn into_model(self) -> TeamMember {
        TeamMember {
            id: self.id,
            team_id: self.team_id,
            user_id: self.user_id,
            role: self.role.parse::<TeamRole>().unwrap_or_default(),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_role_parse_with_default() {
        let entity = TeamMemberEntity {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role: "editor".to_string(),
            created_at: Utc::now(),
        };
        assert_eq!(entity.into_model().role, TeamRole::Editor);

        let entity = TeamMemberEntity {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role: "superuser".to_string(),
            created_at: Utc::now(),
        };
        assert_eq!(entity.into_model().role, TeamRole::Viewer);
    }
}
