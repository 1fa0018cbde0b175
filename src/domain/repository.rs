//! Store traits owned by the domain layer.
//!
//! The use case layer depends on these traits; the in-memory implementations
//! live in the infrastructure layer (dependency inversion).

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::sync::mpsc::UnboundedSender;

use super::{
    entity::{ChatMessage, Connection, Member, Room},
    error::{RegistryError, RoomStoreError},
    value_object::{ConnectionId, MessageText, PasswordHash, RoomName, Timestamp, UserName},
};

/// Single source of truth for live connections and their connection→room
/// mapping. Implementations must serialize concurrent access.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Register a freshly connected, unjoined connection
    async fn register(&self, id: ConnectionId, connected_at: Timestamp);

    /// Claim the display name for a connection.
    ///
    /// Names are immutable once claimed; a second claim fails with
    /// `RegistryError::NameAlreadyClaimed`.
    async fn claim_name(&self, id: &ConnectionId, name: UserName) -> Result<(), RegistryError>;

    /// Record the room a connection has joined.
    ///
    /// Fails with `RegistryError::ConnectionNotFound` if the connection has
    /// already been unregistered, which lets a join that races a disconnect
    /// observe the connection as gone and abort.
    async fn bind_room(&self, id: &ConnectionId, room: RoomName) -> Result<(), RegistryError>;

    /// Get a snapshot of a connection
    async fn lookup(&self, id: &ConnectionId) -> Result<Connection, RegistryError>;

    /// Remove a connection and return its last-known state.
    ///
    /// Idempotent: returns `None` if the connection was already removed, so
    /// repeated transport-level disconnect reports are harmless.
    async fn unregister(&self, id: &ConnectionId) -> Option<Connection>;

    /// Number of currently registered connections
    async fn count(&self) -> usize;
}

/// Owns the room table and the per-room exclusive sections.
///
/// Every mutating operation on one room is serialized; operations on distinct
/// rooms run fully concurrently. Fan-out to members happens inside the room's
/// exclusive section, which is what makes presence broadcasts ordered relative
/// to the membership change that triggered them and gives messages a per-room
/// total order.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Atomically check-and-insert a new room.
    ///
    /// Concurrent creates for the same name yield exactly one success; the
    /// rest fail with `RoomStoreError::RoomAlreadyExists`.
    async fn create_room(
        &self,
        name: RoomName,
        password: Option<PasswordHash>,
        created_at: Timestamp,
    ) -> Result<(), RoomStoreError>;

    /// Add a member and broadcast the refreshed member list to every member
    /// of the room, the joiner included. Returns the updated member list.
    ///
    /// The candidate password is verified against the room's credential
    /// inside the room's exclusive section, so the check and the membership
    /// change cannot interleave with a delete/recreate of the room. A failed
    /// check yields `RoomStoreError::InvalidPassword` without any mutation
    /// or broadcast. Open rooms accept any candidate, including the empty
    /// string.
    async fn join(
        &self,
        name: &RoomName,
        member: Member,
        password: &str,
        sender: UnboundedSender<String>,
    ) -> Result<Vec<Member>, RoomStoreError>;

    /// Remove a member and notify the remaining members: a departure event,
    /// a system notice and the refreshed member list. Returns the remaining
    /// member list.
    async fn leave(&self, name: &RoomName, id: &ConnectionId)
    -> Result<Vec<Member>, RoomStoreError>;

    /// Stamp the next per-room sequence number on a user message and deliver
    /// it to every member of the room, the sender included, in acceptance
    /// order.
    async fn publish_chat(
        &self,
        name: &RoomName,
        sender: &UserName,
        text: MessageText,
    ) -> Result<ChatMessage, RoomStoreError>;

    /// Delete a room if its member set is empty.
    ///
    /// Idempotent: a no-op returning `false` when the room still has members
    /// or does not exist. Returns `true` when the room was deleted, which
    /// makes its name available for creation again.
    async fn delete_room_if_empty(&self, name: &RoomName) -> Result<bool, RoomStoreError>;

    /// Find the room that currently lists the connection as a member.
    ///
    /// Fallback for disconnect cleanup: a join cut short by a dying socket
    /// may have added membership without recording the room in the registry,
    /// and this lookup lets the cleanup path find and remove such a member
    /// anyway.
    async fn find_member_room(&self, id: &ConnectionId) -> Option<RoomName>;

    /// Names of all currently existing rooms
    async fn room_names(&self) -> Vec<RoomName>;

    /// Get a snapshot of a room
    async fn get_room(&self, name: &RoomName) -> Result<Room, RoomStoreError>;
}
