//! WebSocket wire events for the chat coordination service.
//!
//! Events are JSON text frames, internally tagged on the `event` field. The
//! field names are the wire contract consumed and produced by the UI client.

use serde::{Deserialize, Serialize};

use crate::domain::{ChatMessage, Member, RoomName};
use crate::usecase::ChatError;

/// Inbound events (client → server)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Create a room and join it as the sole member
    CreateRoom {
        room: String,
        #[serde(default)]
        password: String,
        username: String,
    },
    /// Join an existing room
    JoinRoom {
        room: String,
        #[serde(default)]
        password: String,
        username: String,
    },
    /// Send a chat message to the current room
    Message { text: String, room: String },
}

/// Member entry carried by `user_list` broadcasts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub room: String,
}

/// Outbound events (server → client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Sent to the joining/creating connection only
    RoomJoined { room: String, username: String },
    /// Refreshed member list, sent to all members of the affected room
    UserList { users: Vec<UserInfo> },
    /// Chat message or system notice, sent to all members of its room
    Message {
        sender: String,
        text: String,
        timestamp: i64,
        seq: u64,
        room: String,
        system: bool,
    },
    /// Departure notice, sent to the remaining members
    UserLeft {
        id: String,
        username: String,
        room: String,
    },
    /// Sent to the offending connection only
    Error { message: String },
}

impl ServerEvent {
    /// Build a `user_list` event from a room's current members
    pub fn user_list(room: &RoomName, members: &[Member]) -> Self {
        Self::UserList {
            users: members
                .iter()
                .map(|m| UserInfo {
                    id: m.id.as_str().to_string(),
                    username: m.username.as_str().to_string(),
                    room: room.as_str().to_string(),
                })
                .collect(),
        }
    }

    /// Build a `message` event from a domain chat message
    pub fn message(msg: &ChatMessage) -> Self {
        Self::Message {
            sender: msg.sender.clone(),
            text: msg.text.clone(),
            timestamp: msg.timestamp.value(),
            seq: msg.seq,
            room: msg.room.as_str().to_string(),
            system: msg.system,
        }
    }

    /// Build a `user_left` event for a departing member
    pub fn user_left(room: &RoomName, member: &Member) -> Self {
        Self::UserLeft {
            id: member.id.as_str().to_string(),
            username: member.username.as_str().to_string(),
            room: room.as_str().to_string(),
        }
    }

    /// Build an `error` event carrying the user-facing message
    pub fn error(err: &ChatError) -> Self {
        Self::Error {
            message: err.to_string(),
        }
    }

    /// Serialize to a JSON text frame.
    ///
    /// Serialization of our own DTOs cannot fail.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionIdFactory, Timestamp, UserName};

    #[test]
    fn test_client_event_create_room_deserialize() {
        // テスト項目: create_room イベントがフィールド付きでパースできる
        // given (前提条件):
        let json = r#"{"event":"create_room","room":"alpha","password":"","username":"alice"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        match event {
            ClientEvent::CreateRoom {
                room,
                password,
                username,
            } => {
                assert_eq!(room, "alpha");
                assert_eq!(password, "");
                assert_eq!(username, "alice");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_client_event_message_deserialize() {
        // テスト項目: message イベントがパースできる
        // given (前提条件):
        let json = r#"{"event":"message","text":"hi","room":"alpha"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert!(matches!(event, ClientEvent::Message { .. }));
    }

    #[test]
    fn test_client_event_unknown_event_fails() {
        // テスト項目: 未知のイベント名はパースエラーになる
        // given (前提条件):
        let json = r#"{"event":"leave_room","room":"alpha"}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_server_event_error_serialize() {
        // テスト項目: error イベントが契約どおりの JSON になる
        // given (前提条件):
        let event = ServerEvent::error(&ChatError::RoomNotFound);

        // when (操作):
        let json = event.to_json();

        // then (期待する結果):
        assert_eq!(json, r#"{"event":"error","message":"room does not exist"}"#);
    }

    #[test]
    fn test_server_event_user_list_serialize() {
        // テスト項目: user_list イベントに各メンバーの id / username / room が含まれる
        // given (前提条件):
        let room = crate::domain::RoomName::new("alpha".to_string()).unwrap();
        let member = crate::domain::Member::new(
            ConnectionIdFactory::generate().unwrap(),
            UserName::new("alice".to_string()).unwrap(),
            Timestamp::new(1000),
        );

        // when (操作):
        let json = ServerEvent::user_list(&room, &[member.clone()]).to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        // then (期待する結果):
        assert_eq!(value["event"], "user_list");
        assert_eq!(value["users"][0]["id"], member.id.as_str());
        assert_eq!(value["users"][0]["username"], "alice");
        assert_eq!(value["users"][0]["room"], "alpha");
    }
}
