//! Server state shared across request handlers.

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, RoomStore};
use crate::infrastructure::{InMemoryConnectionRegistry, InMemoryRoomStore};

/// Shared application state.
///
/// Both stores are process-scoped singletons instantiated once at service
/// start and passed explicitly to the use cases; there is no ambient global
/// state.
pub struct AppState {
    /// Connection Registry（接続→ルームの対応の唯一の情報源）
    pub registry: Arc<dyn ConnectionRegistry>,
    /// Room Store（ルームテーブルとルームごとの排他区間）
    pub rooms: Arc<dyn RoomStore>,
}

impl AppState {
    /// Create a state backed by the given stores
    pub fn new(registry: Arc<dyn ConnectionRegistry>, rooms: Arc<dyn RoomStore>) -> Self {
        Self { registry, rooms }
    }

    /// Create a state backed by fresh in-memory stores
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryConnectionRegistry::new()),
            Arc::new(InMemoryRoomStore::new()),
        )
    }
}
