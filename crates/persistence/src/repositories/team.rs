//! Team and membership repository.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{TeamEntity, TeamMemberEntity};
use domain::models::{CreateTeamRequest, TeamRole};

const TEAM_COLUMNS: &str = r#"id, owner_id, name, company_name, logo_url,
    primary_color, secondary_color, created_at, updated_at"#;

const MEMBER_COLUMNS: &str = "id, team_id, user_id, role, created_at";

/// Repository for team ownership records.
#[derive(Clone)]
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new team.
    pub async fn create(&self, request: &CreateTeamRequest) -> Result<TeamEntity, sqlx::Error> {
        sqlx::query_as::<_, TeamEntity>(&format!(
            r#"
            INSERT INTO teams (owner_id, name, company_name, logo_url, primary_color, secondary_color)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            TEAM_COLUMNS
        ))
        .bind(request.owner_id)
        .bind(&request.name)
        .bind(&request.company_name)
        .bind(&request.logo_url)
        .bind(&request.primary_color)
        .bind(&request.secondary_color)
        .fetch_one(&self.pool)
        .await
    }

    /// Look a team up by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TeamEntity>, sqlx::Error> {
        sqlx::query_as::<_, TeamEntity>(&format!(
            "SELECT {} FROM teams WHERE id = $1",
            TEAM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a team (memberships cascade). Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add a member to a team.
    pub async fn add_member(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> Result<TeamMemberEntity, sqlx::Error> {
        sqlx::query_as::<_, TeamMemberEntity>(&format!(
            r#"
            INSERT INTO team_members (team_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            MEMBER_COLUMNS
        ))
        .bind(team_id)
        .bind(user_id)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
    }

    /// Remove a member from a team. Returns whether a row was removed.
    pub async fn remove_member(&self, team_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
            .bind(team_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List members of a team, oldest first.
    pub async fn list_members(&self, team_id: Uuid) -> Result<Vec<TeamMemberEntity>, sqlx::Error> {
        sqlx::query_as::<_, TeamMemberEntity>(&format!(
            "SELECT {} FROM team_members WHERE team_id = $1 ORDER BY created_at ASC",
            MEMBER_COLUMNS
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
    }
}
