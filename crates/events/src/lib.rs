//! Event channel implementations.
//!
//! Both carry the decimal string of a newly accepted index on a single
//! topic and deliver only to subscribers connected at publish time:
//!
//! - [`EventBus`]: in-process hub backed by `tokio::sync::broadcast`.
//! - [`RedisChannel`]: Redis pub/sub, for a worker in another process.

pub mod bus;
pub mod redis_channel;

pub use bus::EventBus;
pub use redis_channel::RedisChannel;

/// Topic every accepted index is published on.
pub const INSERT_TOPIC: &str = "insert";
