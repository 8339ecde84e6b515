// HTTP handlers and routing for the read-only presentation feed.

use axum::extract::State as AxumState;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::app::AppState;
use crate::model::CommandSnapshot;
use crate::ws::ws_handler;

mod types;
use types::*;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/command", get(get_command))
        .route("/ws", get(ws_handler))
        .with_state(app_state)
}

async fn health(AxumState(app_state): AxumState<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        link: *app_state.link.borrow(),
        sensor_connected: *app_state.sensor_connected.borrow(),
    })
}

async fn get_command(AxumState(app_state): AxumState<AppState>) -> impl IntoResponse {
    Json(CommandSnapshot::from(app_state.commands.current()))
}
