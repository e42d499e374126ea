//! Backend for the plainmed medical reference frontend.
//!
//! A thin gateway: every endpoint validates the request shape, issues exactly
//! one query (the language listing issues one per distinct language) against
//! the hosted table store, and shapes the JSON response. No caching, no
//! background jobs, no retries; the store round trip is the only suspension
//! point in each handler.
//!
//! # Surface
//!
//! - `GET /personal-info/{user_id}` — profile lookup
//! - `POST /personal-info` — profile creation with an existence check
//! - `POST /search` — substring search over the reference topics
//! - `GET /` and `OPTIONS /search` — static health responses
//! - `GET /test-db-language`, `GET /test-supabase` — diagnostics, soft errors
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod records;
pub mod routes;
pub mod state;
pub mod store;

use routes::{
    create_personal_info_handler, get_personal_info_handler, root_handler, search_handler,
    search_options_handler, test_connection_handler, test_db_language_handler,
};
use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/personal-info/{user_id}", get(get_personal_info_handler))
        .route("/personal-info", post(create_personal_info_handler))
        .route("/search", post(search_handler).options(search_options_handler))
        .route("/test-db-language", get(test_db_language_handler))
        .route("/test-supabase", get(test_connection_handler))
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new();

    info!("Starting server...");

    // Development origins only. Credentials mode forbids wildcards, so the
    // methods and headers are listed out.
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse::<HeaderValue>().expect("static origin"),
            "http://localhost:5173".parse::<HeaderValue>().expect("static origin"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60));

    let app = router(state.clone()).layer(cors);

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
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
