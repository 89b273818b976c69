//! Session server for the political match game.
//!
//! Hosts a single voting session over HTTP so any frontend can draw it.
//!
//!
//!
//! # Endpoints
//!
//! | Method | Path | Effect |
//! |---|---|---|
//! | GET | `/session` | Current view |
//! | POST | `/session/swipe` | Swipe a card: `{"vote_event_id": "...", "direction": "left" \| "right"}` |
//! | POST | `/session/vote/{direction}` | Vote button, swipes the top card |
//! | POST | `/session/enrich/{vote_event_id}` | Ask for a simplified summary |
//! | POST | `/session/reset` | Start over with a freshly loaded deck |
//!
//! Every endpoint answers with the session view as JSON. Actions made while the deck is
//! loading or unavailable answer `503`, an unknown direction answers `400`.
//!
//!
//!
//! # Notes
//!
//! ## One session
//! There is no notion of users. Whoever talks to the server plays the same session, which
//! is fine for a kiosk or a single local frontend.
//!
//! ## Long requests
//! The last swipe and enrichment requests only answer once the remote service does (15s at
//! most by default). Meanwhile `GET /session` keeps answering and shows `submitting` or
//! `enrichment_busy`.
//!
//!
//!
//! # Setup
//!
//! Environment.
//! ```sh
//! export SUPABASE_URL=https://<project>.supabase.co
//! export SUPABASE_KEY=<anon key>   # or /run/secrets/SUPABASE_KEY
//! export RUST_LOG=info
//! ```
//!
//! Run.
//! ```sh
//! cargo run -p server
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use config::Config;
use routes::{enrich_handler, reset_handler, swipe_handler, view_handler, vote_handler};
use state::State;

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(&config).await?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");
    Ok(())
}

pub fn router(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/session", get(view_handler))
        .route("/session/swipe", post(swipe_handler))
        .route("/session/vote/{direction}", post(vote_handler))
        .route("/session/enrich/{vote_event_id}", post(enrich_handler))
        .route("/session/reset", post(reset_handler))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
