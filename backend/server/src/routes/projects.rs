use std::{collections::BTreeSet, sync::Arc};

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::info;

use super::{deleted, repo};
use crate::{
    auth::AdminGuard,
    error::{AppError, StoreContext},
    models::{Project, ProjectInput},
    state::AppState,
    utils::{Direction, move_item, parse_json},
};

const NOT_FOUND: &str = "Project";

/// Category the public filter bar uses for "everything".
pub const ALL_CATEGORIES: &str = "Todos";

#[derive(Deserialize)]
pub struct ProjectFilter {
    category: Option<String>,
}

#[derive(Deserialize)]
pub struct MoveImageRequest {
    index: usize,
    direction: Direction,
}

fn newest_first(projects: &mut [Project]) {
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
}

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ProjectFilter>,
) -> Result<Json<Vec<Project>>, AppError> {
    let mut projects = repo::<Project>(&state)
        .list()
        .await
        .context("Failed to fetch projects")?;

    let category = filter
        .category
        .as_deref()
        .map(str::trim)
        .filter(|category| !category.is_empty() && *category != ALL_CATEGORIES);

    if let Some(category) = category {
        projects.retain(|project| project.category == category);
    }

    newest_first(&mut projects);

    Ok(Json(projects))
}

pub async fn categories_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, AppError> {
    let categories: BTreeSet<String> = repo::<Project>(&state)
        .list()
        .await
        .context("Failed to fetch projects")?
        .into_iter()
        .map(|project| project.category)
        .collect();

    Ok(Json(categories.into_iter().collect()))
}

pub async fn create_handler(
    _admin: AdminGuard,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let project = Project::create(parse_json::<ProjectInput>(&body)?)?;

    repo::<Project>(&state)
        .save(&project)
        .await
        .context("Failed to create project")?;

    info!("Created project {} ({})", project.id, project.title);

    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Project>, AppError> {
    repo::<Project>(&state)
        .find(&id)
        .await
        .context("Failed to fetch project")?
        .map(Json)
        .ok_or(AppError::NotFound(NOT_FOUND))
}

pub async fn update_handler(
    _admin: AdminGuard,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Project>, AppError> {
    let input: ProjectInput = parse_json(&body)?;
    let repo = repo::<Project>(&state);

    let mut project = repo
        .find(&id)
        .await
        .context("Failed to update project")?
        .ok_or(AppError::NotFound(NOT_FOUND))?;

    project.apply(input)?;
    repo.save(&project)
        .await
        .context("Failed to update project")?;

    Ok(Json(project))
}

pub async fn delete_handler(
    _admin: AdminGuard,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let removed = repo::<Project>(&state)
        .remove(&id)
        .await
        .context("Failed to delete project")?;

    if !removed {
        return Err(AppError::NotFound(NOT_FOUND));
    }

    info!("Deleted project {id}");

    Ok(deleted("Project deleted successfully"))
}

pub async fn move_image_handler(
    _admin: AdminGuard,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Project>, AppError> {
    let request: MoveImageRequest = parse_json(&body)?;
    let repo = repo::<Project>(&state);

    let mut project = repo
        .find(&id)
        .await
        .context("Failed to reorder project images")?
        .ok_or(AppError::NotFound(NOT_FOUND))?;

    if request.index >= project.images.len() {
        return Err(AppError::bad_request(format!(
            "Image index {} out of range",
            request.index
        )));
    }

    if move_item(&mut project.images, request.index, request.direction) {
        project.touch();
        repo.save(&project)
            .await
            .context("Failed to reorder project images")?;
    }

    Ok(Json(project))
}
