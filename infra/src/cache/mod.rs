//! Record store implementations
//!
//! - `RedisRecordStore`: Redis-backed, native key expiry, Lua compare-and-delete
//! - `MemoryRecordStore`: process-local map for development and tests

pub mod memory_store;
pub mod redis_client;
pub mod redis_store;

pub use memory_store::MemoryRecordStore;
pub use redis_client::RedisClient;
pub use redis_store::RedisRecordStore;

// Re-export commonly used types
pub use ev_shared::CacheConfig;
