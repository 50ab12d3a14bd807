use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::{
    state::AppState,
    store::{Document, Repository},
};

pub mod actions;
pub mod carousel;
pub mod contact;
pub mod footer;
pub mod projects;
pub mod seo;
pub mod team;
pub mod uploads;

pub fn repo<T: Document>(state: &AppState) -> Repository<'_, T> {
    Repository::new(state.store.as_ref())
}

pub fn deleted(message: &str) -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "message": message })))
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok").into_response()
}
