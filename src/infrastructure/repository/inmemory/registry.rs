//! InMemory Connection Registry 実装
//!
//! ドメイン層が定義する ConnectionRegistry trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Connection, ConnectionError, ConnectionId, ConnectionRegistry, RegistryError, RoomName,
    Timestamp, UserName,
};

/// インメモリ Connection Registry 実装
///
/// 接続 ID → Connection の対応を 1 つの Mutex で直列化します。
/// 接続→ルームのマッピングの唯一の情報源です。
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    connections: Mutex<HashMap<ConnectionId, Connection>>,
}

impl InMemoryConnectionRegistry {
    /// 新しい InMemoryConnectionRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(&self, id: ConnectionId, connected_at: Timestamp) {
        let mut connections = self.connections.lock().await;
        connections.insert(id.clone(), Connection::new(id, connected_at));
    }

    async fn claim_name(&self, id: &ConnectionId, name: UserName) -> Result<(), RegistryError> {
        let mut connections = self.connections.lock().await;
        let conn = connections
            .get_mut(id)
            .ok_or_else(|| RegistryError::ConnectionNotFound(id.as_str().to_string()))?;
        conn.claim_name(name).map_err(|e| match e {
            ConnectionError::NameAlreadyClaimed => {
                RegistryError::NameAlreadyClaimed(id.as_str().to_string())
            }
            ConnectionError::AlreadyInRoom(_) => {
                RegistryError::AlreadyInRoom(id.as_str().to_string())
            }
        })
    }

    async fn bind_room(&self, id: &ConnectionId, room: RoomName) -> Result<(), RegistryError> {
        let mut connections = self.connections.lock().await;
        let conn = connections
            .get_mut(id)
            .ok_or_else(|| RegistryError::ConnectionNotFound(id.as_str().to_string()))?;
        conn.bind_room(room)
            .map_err(|_| RegistryError::AlreadyInRoom(id.as_str().to_string()))
    }

    async fn lookup(&self, id: &ConnectionId) -> Result<Connection, RegistryError> {
        let connections = self.connections.lock().await;
        connections
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::ConnectionNotFound(id.as_str().to_string()))
    }

    async fn unregister(&self, id: &ConnectionId) -> Option<Connection> {
        let mut connections = self.connections.lock().await;
        connections.remove(id)
    }

    async fn count(&self) -> usize {
        let connections = self.connections.lock().await;
        connections.len()
    }
}
