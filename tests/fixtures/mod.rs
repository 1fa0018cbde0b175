//! Integration test fixtures.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use tamariba::ui::{AppState, serve};

pub type Ws = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Chat server running on a background task with in-memory state
pub struct TestServer {
    port: u16,
}

impl TestServer {
    /// Spawn a server on the given port and wait until it accepts connections
    pub async fn start(port: u16) -> Self {
        let state = Arc::new(AppState::in_memory());
        let addr: SocketAddr = format!("127.0.0.1:{port}").parse().unwrap();
        tokio::spawn(async move {
            if let Err(e) = serve(addr, state, false).await {
                panic!("test server failed to start: {e}");
            }
        });

        for _ in 0..100 {
            if tokio::net::TcpStream::connect(("127.0.0.1", port))
                .await
                .is_ok()
            {
                return Self { port };
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("test server on port {port} did not become ready");
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws", self.port)
    }

    /// Open a WebSocket connection to the server
    pub async fn connect(&self) -> Ws {
        let (ws, _) = connect_async(self.ws_url())
            .await
            .expect("Failed to open WebSocket connection");
        ws
    }
}

/// Send one client event as a JSON text frame
pub async fn send_event(ws: &mut Ws, event: serde_json::Value) {
    ws.send(Message::Text(event.to_string().into()))
        .await
        .expect("Failed to send event");
}

/// Receive the next server event, skipping non-text frames
pub async fn recv_event(ws: &mut Ws) -> serde_json::Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("Timed out waiting for a server event")
            .expect("Connection closed while waiting for a server event")
            .expect("WebSocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).expect("Server event is not valid JSON");
        }
    }
}

/// Receive the next server event, or `None` if nothing arrives in time
pub async fn try_recv_event(ws: &mut Ws, wait: Duration) -> Option<serde_json::Value> {
    loop {
        let msg = tokio::time::timeout(wait, ws.next()).await.ok()??.ok()?;
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).ok();
        }
    }
}

/// Create a room and drain the `user_list` + `room_joined` replies
pub async fn create_room(ws: &mut Ws, room: &str, password: &str, username: &str) {
    send_event(
        ws,
        serde_json::json!({
            "event": "create_room",
            "room": room,
            "password": password,
            "username": username,
        }),
    )
    .await;
    let first = recv_event(ws).await;
    assert_eq!(first["event"], "user_list");
    let second = recv_event(ws).await;
    assert_eq!(second["event"], "room_joined");
}
