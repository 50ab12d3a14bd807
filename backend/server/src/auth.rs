//! # Admin Access
//!
//! A single configured username/password pair, sent as HTTP Basic credentials on every
//! admin call. Login additionally drops an `admin_authenticated` cookie scoped to `/admin`
//! so the dashboard pages know to render.
use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{FromRequestParts, State, rejection::FormRejection},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION, header::SET_COOKIE, request::Parts},
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{config::Config, error::AppError, models::ActionResult, state::AppState};

pub const ADMIN_COOKIE: &str = "admin_authenticated";

const LOGIN_OK: &str = "Sesión iniciada correctamente.";
const LOGIN_FAILED: &str = "Credenciales inválidas. Por favor intenta de nuevo.";

/// Splits a `Basic` authorization value into its username and password.
fn decode_basic(value: &str) -> Option<(String, String)> {
    let encoded = value.strip_prefix("Basic ")?.trim();
    let decoded = STANDARD.decode(encoded).ok()?;
    let credentials = String::from_utf8(decoded).ok()?;

    let (username, password) = credentials.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

fn credentials_match(config: &Config, username: &str, password: &str) -> bool {
    username == config.admin_username && password == config.admin_password
}

pub fn is_admin(headers: &HeaderMap, config: &Config) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(decode_basic)
        .is_some_and(|(username, password)| credentials_match(config, &username, &password))
}

/// Extractor that only lets requests with valid admin credentials through.
pub struct AdminGuard;

impl FromRequestParts<Arc<AppState>> for AdminGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if is_admin(&parts.headers, &state.config) {
            Ok(AdminGuard)
        } else {
            warn!("Rejected admin request to {}", parts.uri.path());
            Err(AppError::Unauthorized)
        }
    }
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!("Unreadable login form: {rejection}");
            return (
                StatusCode::BAD_REQUEST,
                Json(ActionResult::failure(LOGIN_FAILED)),
            )
                .into_response();
        }
    };

    if !credentials_match(&state.config, &form.username, &form.password) {
        warn!("Failed admin login for '{}'", form.username);
        return (
            StatusCode::UNAUTHORIZED,
            Json(ActionResult::failure(LOGIN_FAILED)),
        )
            .into_response();
    }

    info!("Admin logged in");

    let cookie = format!("{ADMIN_COOKIE}=true; Path=/admin; HttpOnly; SameSite=Lax");
    (
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(ActionResult::ok(LOGIN_OK)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn basic(credentials: &str) -> String {
        format!("Basic {}", STANDARD.encode(credentials))
    }

    #[test]
    fn test_decode_basic() {
        assert_eq!(
            decode_basic(&basic("admin:password")),
            Some(("admin".to_string(), "password".to_string()))
        );
        assert_eq!(
            decode_basic(&basic("admin:pa:ss")),
            Some(("admin".to_string(), "pa:ss".to_string()))
        );
        assert_eq!(decode_basic(&basic("nocolon")), None);
        assert_eq!(decode_basic("Bearer abc"), None);
        assert_eq!(decode_basic("Basic !!!"), None);
    }

    #[test]
    fn test_is_admin() {
        let config = Config::default();

        assert!(is_admin(&headers(&basic("admin:password")), &config));
        assert!(!is_admin(&headers(&basic("admin:wrong")), &config));
        assert!(!is_admin(&headers(&basic("root:password")), &config));
        assert!(!is_admin(&HeaderMap::new(), &config));
    }

    #[test]
    fn test_is_admin_uses_configured_pair() {
        let config = Config {
            admin_username: "emilia".to_string(),
            admin_password: "s3cret".to_string(),
            ..Config::default()
        };

        assert!(is_admin(&headers(&basic("emilia:s3cret")), &config));
        assert!(!is_admin(&headers(&basic("admin:password")), &config));
    }
}
