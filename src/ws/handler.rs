//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /ws` — Upgrade HTTP connection to WebSocket.
///
/// The event feed is opened before the upgrade so no event committed after
/// the handshake is missed.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let feed = state.event_bus.subscribe();
    let pool_service = Arc::clone(&state.pool_service);

    ws.on_upgrade(move |socket| run_connection(socket, feed, pool_service))
}
