//! Domain layer for the chat coordination service.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, Connection, Member, Room};
pub use error::{ConnectionError, RegistryError, RoomStoreError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use repository::{ConnectionRegistry, RoomStore};
pub use value_object::{ConnectionId, MessageText, PasswordHash, RoomName, Timestamp, UserName};

#[cfg(test)]
pub use repository::{MockConnectionRegistry, MockRoomStore};
