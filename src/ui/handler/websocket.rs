//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::{
    common::time::get_jst_timestamp,
    domain::{ConnectionId, ConnectionIdFactory, Timestamp},
    infrastructure::dto::websocket::{ClientEvent, ServerEvent},
    ui::state::AppState,
    usecase::{
        ChatError, CreateRoomUseCase, DisconnectUseCase, JoinRoomUseCase, SendMessageUseCase,
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let conn_id = match ConnectionIdFactory::generate() {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to generate connection id: {}", e);
            return;
        }
    };

    state
        .registry
        .register(conn_id.clone(), Timestamp::new(get_jst_timestamp()))
        .await;
    tracing::info!("Connection '{}' established", conn_id);

    // All outbound traffic for this connection flows through one channel
    // drained by a single writer task, so deliveries keep their order.
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let (mut sink, mut stream) = socket.split();

    let send_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sink.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    // The receive loop runs on this task, not a spawned one: an in-flight
    // dispatch is never cancelled mid-operation, so a use case that has
    // started mutating room state always runs to completion before teardown.
    // A dying socket surfaces here as a stream error or end-of-stream.
    while let Some(msg) = stream.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!("WebSocket error on '{}': {}", conn_id, e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                dispatch_event(&state, &conn_id, &tx, text.as_str()).await;
            }
            Message::Close(_) => {
                tracing::info!("Connection '{}' requested close", conn_id);
                break;
            }
            Message::Ping(_) => {
                // Ping/pong is handled automatically by the WebSocket protocol
            }
            _ => {}
        }
    }

    send_task.abort();

    // Cleanup always runs to completion, also on abrupt disconnect
    let disconnect = DisconnectUseCase::new(state.registry.clone(), state.rooms.clone());
    match disconnect.execute(&conn_id).await {
        Some(room) => {
            tracing::info!("Connection '{}' disconnected from room '{}'", conn_id, room);
        }
        None => {
            tracing::info!("Connection '{}' disconnected", conn_id);
        }
    }
}

/// Parse one inbound frame and run the matching use case.
///
/// Every failure is translated to an `error` event for the offending
/// connection only; nothing propagates out of the event-handling boundary.
async fn dispatch_event(
    state: &Arc<AppState>,
    conn_id: &ConnectionId,
    tx: &UnboundedSender<String>,
    text: &str,
) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Unparseable event from '{}': {}", conn_id, e);
            let error = ChatError::InvalidInput("invalid event payload".to_string());
            let _ = tx.send(ServerEvent::error(&error).to_json());
            return;
        }
    };

    let result = match event {
        ClientEvent::CreateRoom {
            room,
            password,
            username,
        } => CreateRoomUseCase::new(state.registry.clone(), state.rooms.clone())
            .execute(conn_id, room, password, username, tx.clone())
            .await
            .map(|_| ()),
        ClientEvent::JoinRoom {
            room,
            password,
            username,
        } => JoinRoomUseCase::new(state.registry.clone(), state.rooms.clone())
            .execute(conn_id, room, password, username, tx.clone())
            .await
            .map(|_| ()),
        ClientEvent::Message { text, room } => {
            SendMessageUseCase::new(state.registry.clone(), state.rooms.clone())
                .execute(conn_id, room, text)
                .await
                .map(|_| ())
        }
    };

    if let Err(error) = result {
        tracing::warn!("Event from '{}' rejected: {}", conn_id, error);
        let _ = tx.send(ServerEvent::error(&error).to_json());
    }
}
