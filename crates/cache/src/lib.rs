//! Fast state store implementations.
//!
//! - [`RedisStateStore`] keeps every index in one Redis hash.
//! - [`MemoryStateStore`] keeps them in a process-local map.

pub mod memory;
pub mod redis_store;

pub use memory::MemoryStateStore;
pub use redis_store::{connect, RedisStateStore, VALUES_HASH};
