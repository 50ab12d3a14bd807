use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{deleted, repo};
use crate::{
    auth::AdminGuard,
    error::{AppError, StoreContext},
    models::{Contact, ContactInput, ContactStatus},
    state::AppState,
    utils::{parse_json, present},
};

const NOT_FOUND: &str = "Message";

#[derive(Deserialize)]
pub struct ContactFilter {
    #[serde(rename = "type")]
    kind: Option<String>,
    status: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusUpdate {
    status: Option<String>,
}

pub async fn submit_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let contact = Contact::submit(parse_json::<ContactInput>(&body)?)?;

    repo::<Contact>(&state)
        .save(&contact)
        .await
        .context("Failed to send message")?;

    info!("New {} message {}", contact.kind.as_str(), contact.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Message sent successfully" })),
    ))
}

/// Unknown filter values match nothing rather than erroring.
pub async fn list_handler(
    _admin: AdminGuard,
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ContactFilter>,
) -> Result<Json<Vec<Contact>>, AppError> {
    let mut messages = repo::<Contact>(&state)
        .list()
        .await
        .context("Failed to fetch contact messages")?;

    if let Some(kind) = present(&filter.kind) {
        messages.retain(|message| message.kind.as_str() == kind);
    }

    if let Some(status) = present(&filter.status) {
        messages.retain(|message| message.status.as_str() == status);
    }

    messages.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

    Ok(Json(messages))
}

pub async fn get_handler(
    _admin: AdminGuard,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Contact>, AppError> {
    repo::<Contact>(&state)
        .find(&id)
        .await
        .context("Failed to fetch message")?
        .map(Json)
        .ok_or(AppError::NotFound(NOT_FOUND))
}

/// Only the status of a message is editable.
pub async fn update_handler(
    _admin: AdminGuard,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Contact>, AppError> {
    let update: StatusUpdate = parse_json(&body)?;
    let status: ContactStatus = present(&update.status)
        .ok_or_else(|| AppError::bad_request("Status is required"))?
        .parse()?;

    let repo = repo::<Contact>(&state);

    let mut message = repo
        .find(&id)
        .await
        .context("Failed to update message")?
        .ok_or(AppError::NotFound(NOT_FOUND))?;

    message.set_status(status);
    repo.save(&message)
        .await
        .context("Failed to update message")?;

    Ok(Json(message))
}

pub async fn delete_handler(
    _admin: AdminGuard,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let removed = repo::<Contact>(&state)
        .remove(&id)
        .await
        .context("Failed to delete message")?;

    if !removed {
        return Err(AppError::NotFound(NOT_FOUND));
    }

    info!("Deleted message {id}");

    Ok(deleted("Message deleted successfully"))
}
