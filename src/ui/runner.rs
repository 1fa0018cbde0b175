//! Router assembly and server loop.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Build the application router on top of the given state
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/{room_name}", get(get_room_detail))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the chat coordination server until ctrl-c.
pub async fn run_server(addr: SocketAddr) -> std::io::Result<()> {
    let state = Arc::new(AppState::in_memory());
    serve(addr, state, true).await
}

/// Serve the router on the given address.
///
/// `with_shutdown` disables the signal handler for embedded use (tests).
pub async fn serve(
    addr: SocketAddr,
    state: Arc<AppState>,
    with_shutdown: bool,
) -> std::io::Result<()> {
    let router = app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    if with_shutdown {
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    } else {
        axum::serve(listener, router).await
    }
}
