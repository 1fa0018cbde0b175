//! InMemory Room Store 実装
//!
//! ドメイン層が定義する RoomStore trait の具体的な実装。
//! ルームテーブルを HashMap で保持し、ルームごとに独立した Mutex を
//! 持たせることで「1 ルームにつき 1 つの排他区間」を実現します。
//! 異なるルームへの操作は完全に並行実行されます。
//!
//! ロック順序は常に 外側テーブル → 内側ルーム。メンバーへの配信は
//! ルームのロックを保持したまま行うため、同一ルーム内のメッセージ順序と
//! プレゼンス通知の順序が保証されます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::UnboundedSender};

use crate::common::time::get_jst_timestamp;
use crate::domain::{
    ChatMessage, ConnectionId, Member, MessageText, PasswordHash, Room, RoomName, RoomStore,
    RoomStoreError, Timestamp, UserName,
};
use crate::infrastructure::dto::websocket::ServerEvent;

/// Per-room state guarded by the room's own lock
struct RoomState {
    room: Room,
    /// Outbound channel per member, keyed by connection id
    senders: HashMap<ConnectionId, UnboundedSender<String>>,
    /// Set when the room has been deleted, so a join holding a stale handle
    /// observes the room as gone instead of resurrecting it
    closed: bool,
}

impl RoomState {
    /// Deliver a payload to every current member, in join order.
    ///
    /// A failed send means the member's channel is already closed; the
    /// disconnect path will remove it.
    fn broadcast(&self, payload: &str) {
        for member in &self.room.members {
            if let Some(sender) = self.senders.get(&member.id)
                && sender.send(payload.to_string()).is_err()
            {
                tracing::warn!(
                    "Failed to deliver to member '{}' in room '{}'",
                    member.username,
                    self.room.name
                );
            }
        }
    }
}

/// インメモリ Room Store 実装
#[derive(Default)]
pub struct InMemoryRoomStore {
    rooms: Mutex<HashMap<RoomName, Arc<Mutex<RoomState>>>>,
}

impl InMemoryRoomStore {
    /// 新しい InMemoryRoomStore を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone the handle for a room without holding the table lock afterwards
    async fn handle(&self, name: &RoomName) -> Result<Arc<Mutex<RoomState>>, RoomStoreError> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(name)
            .cloned()
            .ok_or_else(|| RoomStoreError::RoomNotFound(name.as_str().to_string()))
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn create_room(
        &self,
        name: RoomName,
        password: Option<PasswordHash>,
        created_at: Timestamp,
    ) -> Result<(), RoomStoreError> {
        // Atomic check-and-insert under the table lock: concurrent creates
        // for one name yield exactly one success.
        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(&name) {
            return Err(RoomStoreError::RoomAlreadyExists(name.as_str().to_string()));
        }
        let state = RoomState {
            room: Room::new(name.clone(), password, created_at),
            senders: HashMap::new(),
            closed: false,
        };
        rooms.insert(name, Arc::new(Mutex::new(state)));
        Ok(())
    }

    async fn join(
        &self,
        name: &RoomName,
        member: Member,
        password: &str,
        sender: UnboundedSender<String>,
    ) -> Result<Vec<Member>, RoomStoreError> {
        let handle = self.handle(name).await?;
        let mut state = handle.lock().await;
        if state.closed {
            return Err(RoomStoreError::RoomNotFound(name.as_str().to_string()));
        }

        // The credential check happens under the room's lock, against the
        // room that will actually be joined. A delete/recreate of the name
        // cannot slip in between the check and the membership change.
        if !state.room.verify_password(password) {
            return Err(RoomStoreError::InvalidPassword(name.as_str().to_string()));
        }

        state.senders.insert(member.id.clone(), sender);
        state.room.add_member(member);

        // The refreshed list, including the joiner, goes out before anything
        // sent to the room after this join.
        let event = ServerEvent::user_list(name, &state.room.members);
        state.broadcast(&event.to_json());

        Ok(state.room.members.clone())
    }

    async fn leave(
        &self,
        name: &RoomName,
        id: &ConnectionId,
    ) -> Result<Vec<Member>, RoomStoreError> {
        let handle = self.handle(name).await?;
        let mut state = handle.lock().await;

        let member = state
            .room
            .remove_member(id)
            .ok_or_else(|| RoomStoreError::MemberNotFound {
                room: name.as_str().to_string(),
                member: id.as_str().to_string(),
            })?;
        state.senders.remove(id);

        // Departure event, system notice, then the refreshed member list,
        // all to the remaining members only.
        state.broadcast(&ServerEvent::user_left(name, &member).to_json());

        let seq = state.room.next_sequence();
        let notice = ChatMessage::notice(
            format!("{} left the room", member.username),
            name.clone(),
            seq,
            Timestamp::new(get_jst_timestamp()),
        );
        state.broadcast(&ServerEvent::message(&notice).to_json());

        let event = ServerEvent::user_list(name, &state.room.members);
        state.broadcast(&event.to_json());

        Ok(state.room.members.clone())
    }

    async fn publish_chat(
        &self,
        name: &RoomName,
        sender: &UserName,
        text: MessageText,
    ) -> Result<ChatMessage, RoomStoreError> {
        let handle = self.handle(name).await?;
        let mut state = handle.lock().await;
        if state.closed {
            return Err(RoomStoreError::RoomNotFound(name.as_str().to_string()));
        }

        // Stamping and delivery happen inside the room's exclusive section,
        // so every member observes messages in acceptance order.
        let seq = state.room.next_sequence();
        let message = ChatMessage::user(
            sender,
            text.into_string(),
            name.clone(),
            seq,
            Timestamp::new(get_jst_timestamp()),
        );
        state.broadcast(&ServerEvent::message(&message).to_json());

        Ok(message)
    }

    async fn delete_room_if_empty(&self, name: &RoomName) -> Result<bool, RoomStoreError> {
        let mut rooms = self.rooms.lock().await;
        if let Some(handle) = rooms.get(name) {
            let mut state = handle.lock().await;
            if state.room.is_empty() {
                state.closed = true;
                drop(state);
                rooms.remove(name);
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn find_member_room(&self, id: &ConnectionId) -> Option<RoomName> {
        let rooms = self.rooms.lock().await;
        for (name, handle) in rooms.iter() {
            let state = handle.lock().await;
            if state.room.get_member(id).is_some() {
                return Some(name.clone());
            }
        }
        None
    }

    async fn room_names(&self) -> Vec<RoomName> {
        let rooms = self.rooms.lock().await;
        rooms.keys().cloned().collect()
    }

    async fn get_room(&self, name: &RoomName) -> Result<Room, RoomStoreError> {
        let handle = self.handle(name).await?;
        let state = handle.lock().await;
        Ok(state.room.clone())
    }
}
