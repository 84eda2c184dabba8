//! Team and membership domain models.
//!
//! Teams own widgets collaboratively. Lifecycle is insert/delete only;
//! invitation flows are out of scope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Role of a collaborator within a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    #[default]
    Viewer,
    Editor,
}

impl TeamRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Editor => "editor",
        }
    }
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TeamRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewer" => Ok(Self::Viewer),
            "editor" => Ok(Self::Editor),
            other => Err(format!("unknown team role: {}", other)),
        }
    }
}

/// Represents a team owning widgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Team {
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

/// A collaborator record within a team.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamMember {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role: TeamRole,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a team.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateTeamRequest {
    pub owner_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 200, message = "Company name must be at most 200 characters"))]
    pub company_name: Option<String>,

    #[validate(length(max = 500, message = "Logo URL must be at most 500 characters"))]
    pub logo_url: Option<String>,

    #[validate(custom(function = "shared::validation::validate_hex_color"))]
    pub primary_color: Option<String>,

    #[validate(custom(function = "shared::validation::validate_hex_color"))]
    pub secondary_color: Option<String>,
}

/// Request payload for adding a member to a team.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct AddTeamMemberRequest {
    pub user_id: Uuid,

    #[serde(default)]
    pub role: TeamRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_role_round_trip() {
        assert_eq!("viewer".parse::<TeamRole>().unwrap(), TeamRole::Viewer);
        assert_eq!("editor".parse::<TeamRole>().unwrap(), TeamRole::Editor);
        assert!("admin".parse::<TeamRole>().is_err());
        assert_eq!(TeamRole::Editor.to_string(), "editor");
    }

    #[test]
    fn test_create_team_request_validation() {
        let json = r#"{
            "owner_id": "550e8400-e29b-41d4-a716-446655440000",
            "name": "Acme Support"
        }"#;
        let request: CreateTeamRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_team_request_rejects_empty_name() {
        let json = r#"{
            "owner_id": "550e8400-e29b-41d4-a716-446655440000",
            "name": ""
        }"#;
        let request: CreateTeamRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_add_member_default_role() {
        let json = r#"{"user_id": "550e8400-e29b-41d4-a716-446655440000"}"#;
        let request: AddTeamMemberRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.role, TeamRole::Viewer);
    }
}
