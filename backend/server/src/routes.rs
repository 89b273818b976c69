use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State as AxumState},
};
use serde::Deserialize;
use session::{Direction, SessionView};
use tracing::debug;

use crate::{error::AppError, state::State};

type AppState = AxumState<Arc<State>>;

#[derive(Deserialize)]
pub struct SwipeRequest {
    pub vote_event_id: String,
    /// Parsed by the handler so unknown directions answer 400.
    pub direction: String,
}

pub async fn view_handler(AxumState(state): AppState) -> Json<SessionView> {
    Json(state.session.view().await)
}

pub async fn swipe_handler(
    AxumState(state): AppState,
    Json(payload): Json<SwipeRequest>,
) -> Result<Json<SessionView>, AppError> {
    let direction: Direction = payload.direction.parse()?;

    let outcome = state
        .session
        .record_swipe(direction, &payload.vote_event_id)
        .await;
    debug!(?outcome, "Swipe handled");

    ready(state.session.view().await)
}

pub async fn vote_handler(
    AxumState(state): AppState,
    Path(direction): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let direction: Direction = direction.parse()?;

    let outcome = state.session.trigger_swipe(direction).await;
    debug!(?outcome, "Vote button handled");

    ready(state.session.view().await)
}

pub async fn enrich_handler(
    AxumState(state): AppState,
    Path(vote_event_id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let stored = state.session.request_enrichment(&vote_event_id).await;
    debug!(vote_event_id, stored, "Enrichment handled");

    ready(state.session.view().await)
}

pub async fn reset_handler(AxumState(state): AppState) -> Json<SessionView> {
    Json(state.session.reset().await)
}

fn ready(view: SessionView) -> Result<Json<SessionView>, AppError> {
    match view {
        SessionView::Loading | SessionView::Unavailable { .. } => Err(AppError::NotReady),
        view => Ok(Json(view)),
    }
}
