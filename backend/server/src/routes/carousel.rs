use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::info;

use super::{deleted, repo};
use crate::{
    auth::AdminGuard,
    error::{AppError, StoreContext},
    models::{CarouselInput, CarouselItem, move_slide, sort_slides},
    state::AppState,
    utils::{Direction, now, parse_json},
};

const NOT_FOUND: &str = "Carousel item";

#[derive(Deserialize)]
pub struct MoveRequest {
    direction: Direction,
}

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CarouselItem>>, AppError> {
    let mut items = repo::<CarouselItem>(&state)
        .list()
        .await
        .context("Failed to fetch carousel items")?;

    sort_slides(&mut items);

    Ok(Json(items))
}

pub async fn create_handler(
    _admin: AdminGuard,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let item = CarouselItem::create(parse_json::<CarouselInput>(&body)?)?;

    repo::<CarouselItem>(&state)
        .save(&item)
        .await
        .context("Failed to create carousel item")?;

    info!("Created carousel item {}", item.id);

    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CarouselItem>, AppError> {
    repo::<CarouselItem>(&state)
        .find(&id)
        .await
        .context("Failed to fetch carousel item")?
        .map(Json)
        .ok_or(AppError::NotFound(NOT_FOUND))
}

pub async fn update_handler(
    _admin: AdminGuard,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<CarouselItem>, AppError> {
    let input: CarouselInput = parse_json(&body)?;
    let repo = repo::<CarouselItem>(&state);

    let mut item = repo
        .find(&id)
        .await
        .context("Failed to update carousel item")?
        .ok_or(AppError::NotFound(NOT_FOUND))?;

    item.apply(input)?;
    repo.save(&item)
        .await
        .context("Failed to update carousel item")?;

    Ok(Json(item))
}

pub async fn delete_handler(
    _admin: AdminGuard,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let removed = repo::<CarouselItem>(&state)
        .remove(&id)
        .await
        .context("Failed to delete carousel item")?;

    if !removed {
        return Err(AppError::NotFound(NOT_FOUND));
    }

    info!("Deleted carousel item {id}");

    Ok(deleted("Carousel item deleted successfully"))
}

/// Moves one slide up or down and answers with the list in its new order.
pub async fn move_handler(
    _admin: AdminGuard,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Vec<CarouselItem>>, AppError> {
    let request: MoveRequest = parse_json(&body)?;
    let repo = repo::<CarouselItem>(&state);

    let mut items = repo
        .list()
        .await
        .context("Error reordering carousel items")?;
    sort_slides(&mut items);

    let index = items
        .iter()
        .position(|item| item.id == id)
        .ok_or(AppError::NotFound(NOT_FOUND))?;

    for position in move_slide(&mut items, index, request.direction) {
        let item = &mut items[position];
        item.updated_at = now();
        repo.save(item)
            .await
            .context("Error reordering carousel items")?;
    }

    sort_slides(&mut items);

    Ok(Json(items))
}
