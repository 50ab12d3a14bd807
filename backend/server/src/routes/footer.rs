use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State};
use tracing::info;

use super::repo;
use crate::{
    auth::AdminGuard,
    error::{AppError, StoreContext},
    models::{FooterInfo, FooterInput},
    state::AppState,
    utils::parse_json,
};

/// Returns the footer, storing the default content on first read.
pub async fn get_handler(State(state): State<Arc<AppState>>) -> Result<Json<FooterInfo>, AppError> {
    let repo = repo::<FooterInfo>(&state);

    if let Some(footer) = repo
        .find(FooterInfo::SINGLETON_ID)
        .await
        .context("Failed to fetch footer info")?
    {
        return Ok(Json(footer));
    }

    let footer = FooterInfo::default_content();
    repo.save(&footer)
        .await
        .context("Failed to fetch footer info")?;

    info!("Stored default footer info");

    Ok(Json(footer))
}

pub async fn update_handler(
    _admin: AdminGuard,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<FooterInfo>, AppError> {
    let input: FooterInput = parse_json(&body)?;
    let repo = repo::<FooterInfo>(&state);

    let footer = match repo
        .find(FooterInfo::SINGLETON_ID)
        .await
        .context("Failed to update footer info")?
    {
        Some(mut footer) => {
            footer.apply(input)?;
            footer
        }
        None => FooterInfo::create(input)?,
    };

    repo.save(&footer)
        .await
        .context("Failed to update footer info")?;

    Ok(Json(footer))
}
