use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use chrono::Utc;
use tokio::fs;
use tracing::{error, info};

use crate::{auth::AdminGuard, models::ActionResult, state::AppState, utils::upload_filename};

pub const UPLOAD_ROUTE: &str = "/uploads";

const NO_FILE: &str = "No se ha seleccionado ningún archivo.";
const NOT_AN_IMAGE: &str = "El archivo debe ser una imagen.";
const UPLOADED: &str = "Imagen subida correctamente.";
const UPLOAD_FAILED: &str = "Hubo un error al subir la imagen. Por favor intenta de nuevo.";

struct Upload {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

async fn read_file_field(multipart: &mut Multipart) -> Result<Option<Upload>, StatusCode> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("Malformed multipart body: {e}");
        StatusCode::BAD_REQUEST
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| {
            error!("Failed to read uploaded file: {e}");
            StatusCode::BAD_REQUEST
        })?;

        return Ok(Some(Upload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        }));
    }

    Ok(None)
}

/// Stores an image under the upload directory and answers with its public url.
pub async fn upload_handler(
    _admin: AdminGuard,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> (StatusCode, Json<ActionResult>) {
    let upload = match read_file_field(&mut multipart).await {
        Ok(Some(upload)) if !upload.bytes.is_empty() => upload,
        Ok(_) => return (StatusCode::BAD_REQUEST, Json(ActionResult::failure(NO_FILE))),
        Err(status) => return (status, Json(ActionResult::failure(UPLOAD_FAILED))),
    };

    if !upload.content_type.starts_with("image/") {
        return (
            StatusCode::BAD_REQUEST,
            Json(ActionResult::failure(NOT_AN_IMAGE)),
        );
    }

    let file_name = upload_filename(&upload.file_name, Utc::now().timestamp_millis());
    let directory = &state.config.upload_dir;

    let written = match fs::create_dir_all(directory).await {
        Ok(()) => fs::write(directory.join(&file_name), &upload.bytes).await,
        Err(e) => Err(e),
    };

    if let Err(e) = written {
        error!("Error uploading image {file_name}: {e}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ActionResult::failure(UPLOAD_FAILED)),
        );
    }

    info!("Stored upload {file_name} ({} bytes)", upload.bytes.len());

    (
        StatusCode::OK,
        Json(ActionResult {
            url: Some(format!("{UPLOAD_ROUTE}/{file_name}")),
            ..ActionResult::ok(UPLOADED)
        }),
    )
}
