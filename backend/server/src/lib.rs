//! Documentation of the agency content backend.
//!
//! Serves everything the public site renders (hero carousel, projects, team, footer) and
//! the admin dashboard that edits it.
//!
//!
//!
//! # General Infrastructure
//! - Frontend renders pages and calls this service for content
//! - Content lives in Redis as JSON documents, one hash per collection
//! - Uploaded images are written to a local directory and served under `/uploads`
//! - Admin calls carry HTTP Basic credentials, checked against one configured pair
//!
//!
//!
//! # Endpoints
//!
//! Public
//! - `GET /api/carousel`, `GET /api/carousel/{id}`
//! - `GET /api/projects?category=`, `GET /api/projects/categories`, `GET /api/projects/{id}`
//! - `GET /api/team`, `GET /api/team/{id}`
//! - `GET /api/footer`
//! - `POST /api/contact`, `POST /actions/contact`
//! - `GET /api/sitemap`, `GET /sitemap.xml`, `GET /api/jsonld`
//!
//! Admin
//! - `POST /api/admin/login`
//! - `POST|PUT|DELETE` on carousel, projects and team
//! - `POST /api/carousel/{id}/move`, `POST /api/projects/{id}/images/move`
//! - `PUT /api/footer`
//! - `GET|PUT|DELETE` on contact messages
//! - `POST /api/upload`
//!
//!
//!
//! # Notes
//!
//! ## Carousel
//! The frontend rotates through slides in the order this service returns them and pauses
//! on hover. Ordering is the only state the backend owns: `order` ascending, creation
//! time on ties. Moving a slide swaps its `order` with the neighbour's, tied slides are
//! bumped apart.
//!
//! ## Projects
//! Projects started with a single `image` and later gained an `images` gallery. Old
//! documents are upgraded on read and the single field is never written back.
//!
//!
//!
//! # Setup
//!
//! Run against a local Redis.
//! ```sh
//! REDIS_URL=redis://127.0.0.1:6379 RUST_LOG=info cargo run -p agency
//! ```
//!
//! Run without Redis, content is lost on restart.
//! ```sh
//! STORE_BACKEND=memory RUST_LOG=info cargo run -p agency
//! ```
//!
//! Load starting content.
//! ```sh
//! cargo run -p seed -- seed.json --replace
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;

use auth::login_handler;
use config::Config;
use routes::{
    actions, carousel, contact, footer, health_handler, projects, seo, team,
    uploads::{self, UPLOAD_ROUTE},
};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await.expect("Failed to connect to store");

    info!("Starting server...");

    let app = build_router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .expect("Failed to bind listener");
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    info!("Server shut down");
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);
    let uploads_dir = ServeDir::new(&state.config.upload_dir);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/admin/login", post(login_handler))
        .route(
            "/api/carousel",
            get(carousel::list_handler).post(carousel::create_handler),
        )
        .route(
            "/api/carousel/{id}",
            get(carousel::get_handler)
                .put(carousel::update_handler)
                .delete(carousel::delete_handler),
        )
        .route("/api/carousel/{id}/move", post(carousel::move_handler))
        .route(
            "/api/projects",
            get(projects::list_handler).post(projects::create_handler),
        )
        .route("/api/projects/categories", get(projects::categories_handler))
        .route(
            "/api/projects/{id}",
            get(projects::get_handler)
                .put(projects::update_handler)
                .delete(projects::delete_handler),
        )
        .route(
            "/api/projects/{id}/images/move",
            post(projects::move_image_handler),
        )
        .route("/api/team", get(team::list_handler).post(team::create_handler))
        .route(
            "/api/team/{id}",
            get(team::get_handler)
                .put(team::update_handler)
                .delete(team::delete_handler),
        )
        .route(
            "/api/footer",
            get(footer::get_handler).put(footer::update_handler),
        )
        .route(
            "/api/contact",
            get(contact::list_handler).post(contact::submit_handler),
        )
        .route(
            "/api/contact/{id}",
            get(contact::get_handler)
                .put(contact::update_handler)
                .delete(contact::delete_handler),
        )
        .route("/api/upload", post(uploads::upload_handler))
        .route("/api/sitemap", get(seo::sitemap_handler))
        .route("/sitemap.xml", get(seo::sitemap_handler))
        .route("/api/jsonld", get(seo::json_ld_handler))
        .route("/actions/contact", post(actions::contact_handler))
        .nest_service(UPLOAD_ROUTE, uploads_dir)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = if config.cors_origin == "*" {
        AllowOrigin::any()
    } else {
        match HeaderValue::from_str(&config.cors_origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(e) => {
                warn!("Invalid CORS_ORIGIN {}: {e}, allowing any", config.cors_origin);
                AllowOrigin::any()
            }
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
