use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use super::{deleted, repo};
use crate::{
    auth::AdminGuard,
    error::{AppError, StoreContext},
    models::{TeamMember, TeamMemberInput},
    state::AppState,
    utils::parse_json,
};

const NOT_FOUND: &str = "Team member";

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TeamMember>>, AppError> {
    let mut members = repo::<TeamMember>(&state)
        .list()
        .await
        .context("Failed to fetch team members")?;

    members.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    Ok(Json(members))
}

pub async fn create_handler(
    _admin: AdminGuard,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let member = TeamMember::create(parse_json::<TeamMemberInput>(&body)?)?;

    repo::<TeamMember>(&state)
        .save(&member)
        .await
        .context("Failed to create team member")?;

    info!("Created team member {} ({})", member.id, member.name);

    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn get_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TeamMember>, AppError> {
    repo::<TeamMember>(&state)
        .find(&id)
        .await
        .context("Failed to fetch team member")?
        .map(Json)
        .ok_or(AppError::NotFound(NOT_FOUND))
}

pub async fn update_handler(
    _admin: AdminGuard,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<TeamMember>, AppError> {
    let input: TeamMemberInput = parse_json(&body)?;
    let repo = repo::<TeamMember>(&state);

    let mut member = repo
        .find(&id)
        .await
        .context("Failed to update team member")?
        .ok_or(AppError::NotFound(NOT_FOUND))?;

    member.apply(input)?;
    repo.save(&member)
        .await
        .context("Failed to update team member")?;

    Ok(Json(member))
}

pub async fn delete_handler(
    _admin: AdminGuard,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let removed = repo::<TeamMember>(&state)
        .remove(&id)
        .await
        .context("Failed to delete team member")?;

    if !removed {
        return Err(AppError::NotFound(NOT_FOUND));
    }

    info!("Deleted team member {id}");

    Ok(deleted("Team member deleted successfully"))
}
