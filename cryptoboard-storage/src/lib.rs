//! Cryptoboard Storage
//!
//! String key/value stores (in-memory and LMDB) and the expiring cache that
//! sits in front of every API request.

pub mod expiring;
pub mod lmdb_store;
pub mod store;

pub use expiring::{CacheEntry, CacheStats, ExpiringCache};
pub use lmdb_store::{LmdbStore, LmdbStoreError};
pub use store::{KeyValueStore, MemoryStore};
