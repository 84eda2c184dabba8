//! Dashboard team endpoints (service-key gated). Insert/delete lifecycle
//! only; invitation flows are out of scope.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{AddTeamMemberRequest, CreateTeamRequest, Team, TeamMember};
use persistence::repositories::TeamRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// Response for listing team members.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListMembersResponse {
    pub members: Vec<TeamMember>,
    pub total: i64,
}

/// POST /api/v1/teams
pub async fn create_team(
    State(state): State<AppState>,
    Json(request): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<Team>), ApiError> {
    request.validate()?;

    let repo = TeamRepository::new(state.pool.clone());
    let team = repo.create(&request).await?.into_model();

    info!(team_id = %team.id, "Team created");

    Ok((StatusCode::CREATED, Json(team)))
}

/// GET /api/v1/teams/:id
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Team>, ApiError> {
    let repo = TeamRepository::new(state.pool.clone());
    let team = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?
        .into_model();
    Ok(Json(team))
}

/// DELETE /api/v1/teams/:id
pub async fn delete_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = TeamRepository::new(state.pool.clone());
    if repo.delete(id).await? {
        info!(team_id = %id, "Team deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Team not found".to_string()))
    }
}

/// POST /api/v1/teams/:id/members
pub async fn add_member(
    State(state): State<AppState>,
    Path(team_id): Path<Uuid>,
    Json(request): Json<AddTeamMemberRequest>,
) -> Result<(StatusCode, Json<TeamMember>), ApiError> {
    request.validate()?;

    let repo = TeamRepository::new(state.pool.clone());
    // Membership rows reference the team; a missing team surfaces as a
    // foreign key violation mapped to 404.
    let member = repo
        .add_member(team_id, request.user_id, request.role)
        .await?
        .into_model();

    info!(team_id = %team_id, user_id = %member.user_id, role = %member.role, "Team member added");

    Ok((StatusCode::CREATED, Json(member)))
}

/// GET /api/v1/teams/:id/members
pub async fn list_members(
    State(state): State<AppState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<ListMembersResponse>, ApiError> {
    let repo = TeamRepository::new(state.pool.clone());
    let members: Vec<TeamMember> = repo
        .list_members(team_id)
        .await?
        .into_iter()
        .map(|e| e.into_model())
        .collect();
    let total = members.len() as i64;
    Ok(Json(ListMembersResponse { members, total }))
}

/// DELETE /api/v1/teams/:id/members/:user_id
pub async fn remove_member(
    State(state): State<AppState>,
    Path((team_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let repo = TeamRepository::new(state.pool.clone());
    if repo.remove_member(team_id, user_id).await? {
        info!(team_id = %team_id, user_id = %user_id, "Team member removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Team member not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::TeamRole;

    #[test]
    fn test_list_members_response_serialization() {
        let response = ListMembersResponse {
            members: vec![TeamMember {
                id: Uuid::new_v4(),
                team_id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                role: TeamRole::Editor,
                created_at: Utc::now(),
            }],
            total: 1,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"total\":1"));
        assert!(json.contains("\"role\":\"editor\""));
    }
}
