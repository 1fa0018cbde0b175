//! インメモリ実装のストア群

pub mod registry;
pub mod room;

pub use registry::InMemoryConnectionRegistry;
pub use room::InMemoryRoomStore;
