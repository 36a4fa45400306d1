//! Storage Engine Module
//!
//! This module provides the core storage functionality for FlintKV: a
//! typed keyspace with per-key TTLs, guarded by one mutex.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                StorageEngine                 │
//! │   key commands (engine.rs)                   │
//! │   string │ list │ hash │ set │ zset commands │
//! └──────────────────────┬───────────────────────┘
//!                        │ Mutex
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │                  Keyspace                    │
//! │   index: name → KeyType                      │
//! │   one HashMap per value kind                 │
//! │   locate() reaps expired keys on access      │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - **Typed Values**: strings, lists, hashes, sets and sorted sets
//! - **Uniform TTLs**: every value kind carries the same [`Expiration`]
//! - **Lazy Expiry**: expired keys are removed when something looks them up
//! - **Glob Matching**: KEYS patterns with `*`, `?`, classes and escapes
//!
//! ## Example
//!
//! ```
//! use flintkv::storage::StorageEngine;
//! use bytes::Bytes;
//! use std::time::Duration;
//!
//! let engine = StorageEngine::new();
//!
//! engine.set(Bytes::from("name"), Bytes::from("Ariz")).unwrap();
//! assert_eq!(engine.get(b"name").unwrap(), Some(Bytes::from("Ariz")));
//!
//! engine
//!     .set_with_ttl(Bytes::from("session"), Bytes::from("token123"), Duration::from_secs(3600))
//!     .unwrap();
//! assert_eq!(engine.key_type(b"session"), "string");
//! ```

pub mod engine;
pub mod expiry;
pub mod glob;
pub mod keyspace;
pub mod types;

mod hash;
mod list;
mod set;
mod string;
mod zset;

// Re-export commonly used types
pub use engine::{StorageEngine, StorageStats};
pub use expiry::{Expirable, Expiration};
pub use glob::GlobPattern;
pub use keyspace::Keyspace;
pub use string::{SetCondition, SetOptions, SetOutcome};
pub use types::{KeyType, Value};
