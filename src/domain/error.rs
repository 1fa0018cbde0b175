//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// ConnectionId too long error
    #[error("ConnectionId cannot exceed {max} characters (got {actual})")]
    ConnectionIdTooLong { max: usize, actual: usize },

    /// RoomName validation error
    #[error("room name cannot be empty")]
    RoomNameEmpty,

    /// RoomName too long error
    #[error("room name cannot exceed {max} characters (got {actual})")]
    RoomNameTooLong { max: usize, actual: usize },

    /// UserName validation error
    #[error("username cannot be empty")]
    UserNameEmpty,

    /// UserName too long error
    #[error("username cannot exceed {max} characters (got {actual})")]
    UserNameTooLong { max: usize, actual: usize },

    /// MessageText validation error
    #[error("message text cannot be empty")]
    MessageTextEmpty,

    /// MessageText too long error
    #[error("message text cannot exceed {max} characters (got {actual})")]
    MessageTextTooLong { max: usize, actual: usize },
}

/// Errors related to Connection domain logic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// Display name is immutable once claimed
    #[error("display name already claimed")]
    NameAlreadyClaimed,

    /// A connection belongs to at most one room
    #[error("connection already bound to room '{0}'")]
    AlreadyInRoom(String),
}

/// Errors returned by the Connection Registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The connection is not (or no longer) registered
    #[error("connection not found: {0}")]
    ConnectionNotFound(String),

    /// Display name is immutable once claimed
    #[error("display name already claimed for connection {0}")]
    NameAlreadyClaimed(String),

    /// A connection belongs to at most one room
    #[error("connection {0} already bound to a room")]
    AlreadyInRoom(String),
}

/// Errors returned by the Room Store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomStoreError {
    /// A room with the same name is already present
    #[error("room already exists: {0}")]
    RoomAlreadyExists(String),

    /// No room with the given name is present
    #[error("room not found: {0}")]
    RoomNotFound(String),

    /// The candidate password does not match the room's credential
    #[error("invalid password for room '{0}'")]
    InvalidPassword(String),

    /// The connection is not a member of the room
    #[error("member {member} not found in room '{room}'")]
    MemberNotFound { room: String, member: String },
}
