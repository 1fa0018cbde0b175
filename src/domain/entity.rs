//! Core domain models for the chat coordination service.

use serde::{Deserialize, Serialize};

use super::{
    error::ConnectionError,
    value_object::{ConnectionId, PasswordHash, RoomName, Timestamp, UserName},
};

/// Represents one live client connection and the identity it has claimed.
///
/// A connection starts unjoined and anonymous; a successful create/join claims
/// a display name and binds the connection to exactly one room for the rest of
/// its lifetime. Leaving a room is accomplished only by disconnecting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Connection identifier
    pub id: ConnectionId,
    /// Claimed display name, immutable once set
    pub username: Option<UserName>,
    /// Currently joined room, at most one at a time
    pub room: Option<RoomName>,
    /// Timestamp when the connection was established
    pub connected_at: Timestamp,
}

impl Connection {
    /// Create a new unjoined, anonymous connection
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            username: None,
            room: None,
            connected_at,
        }
    }

    /// Claim a display name for this connection
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::NameAlreadyClaimed` if a name is already set
    pub fn claim_name(&mut self, name: UserName) -> Result<(), ConnectionError> {
        if self.username.is_some() {
            return Err(ConnectionError::NameAlreadyClaimed);
        }
        self.username = Some(name);
        Ok(())
    }

    /// Bind this connection to a room
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::AlreadyInRoom` if the connection is already
    /// bound to a room
    pub fn bind_room(&mut self, room: RoomName) -> Result<(), ConnectionError> {
        if let Some(current) = &self.room {
            return Err(ConnectionError::AlreadyInRoom(current.as_str().to_string()));
        }
        self.room = Some(room);
        Ok(())
    }

    /// Whether this connection has joined a room
    pub fn is_joined(&self) -> bool {
        self.room.is_some()
    }
}

/// Represents a member of a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Member's connection identifier
    pub id: ConnectionId,
    /// Member's claimed display name
    pub username: UserName,
    /// Timestamp when the member joined the room
    pub joined_at: Timestamp,
}

impl Member {
    /// Create a new member
    pub fn new(id: ConnectionId, username: UserName, joined_at: Timestamp) -> Self {
        Self {
            id,
            username,
            joined_at,
        }
    }
}

/// Represents a chat room with its members, ordered by join time.
///
/// A room exists only while it has members: it is created together with its
/// first member and deleted as soon as the member set becomes empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Room name, the primary key (case-sensitive)
    pub name: RoomName,
    /// Optional password credential; absent means the room is open
    password: Option<PasswordHash>,
    /// Current members, ordered by join time
    pub members: Vec<Member>,
    /// Timestamp when the room was created
    pub created_at: Timestamp,
    /// Next per-room message sequence number
    next_seq: u64,
}

impl Room {
    /// Create a new empty room
    pub fn new(name: RoomName, password: Option<PasswordHash>, created_at: Timestamp) -> Self {
        Self {
            name,
            password,
            members: Vec::new(),
            created_at,
            next_seq: 1,
        }
    }

    /// Whether this room requires a password to join
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// Check a candidate password against the room credential.
    ///
    /// Open rooms accept any candidate, including the empty string.
    pub fn verify_password(&self, candidate: &str) -> bool {
        match &self.password {
            Some(hash) => hash.verify(candidate),
            None => true,
        }
    }

    /// Add a member to the room, preserving join order
    pub fn add_member(&mut self, member: Member) {
        self.members.push(member);
    }

    /// Remove a member from the room by connection id
    pub fn remove_member(&mut self, id: &ConnectionId) -> Option<Member> {
        let index = self.members.iter().position(|m| &m.id == id)?;
        Some(self.members.remove(index))
    }

    /// Get a member by connection id
    pub fn get_member(&self, id: &ConnectionId) -> Option<&Member> {
        self.members.iter().find(|m| &m.id == id)
    }

    /// Whether the member set is empty
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of current members
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Allocate the next message sequence number for this room.
    ///
    /// Sequence numbers start at 1 and increase monotonically; they are the
    /// ordering surrogate for messages delivered within the room.
    pub fn next_sequence(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

/// Represents a single message delivered to the members of a room.
///
/// Messages are ephemeral: constructed per event, fanned out to the current
/// members and not retained afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sender display name ("System" for system notices)
    pub sender: String,
    /// Text payload
    pub text: String,
    /// Room the message belongs to
    pub room: RoomName,
    /// Per-room monotonically increasing sequence number
    pub seq: u64,
    /// Timestamp when the message was accepted
    pub timestamp: Timestamp,
    /// Marks system-generated notices (join/leave) versus user content
    pub system: bool,
}

impl ChatMessage {
    /// Sender name used for system-generated notices
    pub const SYSTEM_SENDER: &'static str = "System";

    /// Create a user-authored chat message
    pub fn user(
        sender: &UserName,
        text: String,
        room: RoomName,
        seq: u64,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            sender: sender.as_str().to_string(),
            text,
            room,
            seq,
            timestamp,
            system: false,
        }
    }

    /// Create a system-generated notice
    pub fn notice(text: String, room: RoomName, seq: u64, timestamp: Timestamp) -> Self {
        Self {
            sender: Self::SYSTEM_SENDER.to_string(),
            text,
            room,
            seq,
            timestamp,
            system: true,
        }
    }
}
