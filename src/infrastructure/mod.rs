//! Infrastructure layer: in-memory stores and wire DTOs.

pub mod dto;
pub mod repository;

pub use repository::{InMemoryConnectionRegistry, InMemoryRoomStore};
