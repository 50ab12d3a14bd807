use axum::body::Bytes;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::error::AppError;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static PATH_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[/\\]+").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|_| AppError::MalformedPayload)
}

/// Trimmed value, or `None` when missing or blank.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn is_present(value: &Option<String>) -> bool {
    present(value).is_some()
}

/// Index of the neighbour `index` would swap with, `None` at either end.
pub fn neighbour(index: usize, len: usize, direction: Direction) -> Option<usize> {
    match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => (index + 1 < len).then_some(index + 1),
    }
}

/// Swaps `items[index]` with its neighbour. Returns false when nothing moved.
pub fn move_item<T>(items: &mut [T], index: usize, direction: Direction) -> bool {
    if index >= items.len() {
        return false;
    }

    match neighbour(index, items.len(), direction) {
        Some(other) => {
            items.swap(index, other);
            true
        }
        None => false,
    }
}

/// Stored upload name: `<millis>-<name>` with whitespace runs collapsed to `-`.
pub fn upload_filename(original: &str, millis: i64) -> String {
    let base = PATH_SEPARATORS
        .split(original.trim())
        .filter(|part| !part.is_empty() && *part != "." && *part != "..")
        .last()
        .unwrap_or("upload");

    format!("{millis}-{}", WHITESPACE.replace_all(base, "-"))
}
