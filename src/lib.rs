//! # FlintKV - An In-Process, In-Memory Typed Key-Value Store
//!
//! FlintKV keeps strings, lists, hashes, sets and sorted sets under byte
//! string keys, with per-key TTLs and a Redis-like command surface. It is a
//! library first; the `flintkv` binary wraps it in an interactive shell.
//!
//! ## Features
//!
//! - **Typed Keyspace**: one name maps to exactly one value of one type
//! - **TTL Support**: every value kind can carry an expiration
//! - **Lazy Expiry**: expired keys disappear when they are next looked up
//! - **Thread-Safe**: one mutex guards the whole keyspace, so every command
//!   is atomic with respect to every other
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                         FlintKV                           │
//! │                                                           │
//! │  ┌─────────────┐    ┌─────────────┐                       │
//! │  │    repl     │───>│  Command    │                       │
//! │  │ (stdin/out) │    │  Handler    │                       │
//! │  └─────────────┘    └──────┬──────┘                       │
//! │                            │ Reply                        │
//! │                            ▼                              │
//! │  ┌──────────────────────────────────────────────────────┐ │
//! │  │                  StorageEngine                       │ │
//! │  │   Mutex<Keyspace>                                    │ │
//! │  │   ┌───────┐ ┌──────┐ ┌──────┐ ┌─────┐ ┌──────┐       │ │
//! │  │   │string │ │ list │ │ hash │ │ set │ │ zset │       │ │
//! │  │   └───────┘ └──────┘ └──────┘ └─────┘ └──────┘       │ │
//! │  └──────────────────────────────────────────────────────┘ │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use flintkv::{CommandHandler, Reply, StorageEngine};
//! use bytes::Bytes;
//! use std::sync::Arc;
//!
//! let storage = Arc::new(StorageEngine::new());
//! let handler = CommandHandler::new(Arc::clone(&storage));
//!
//! let argv: Vec<Bytes> = ["SET", "name", "flint"].iter().map(|s| Bytes::from(*s)).collect();
//! assert_eq!(handler.execute(&argv), Reply::ok());
//!
//! assert_eq!(storage.get(b"name").unwrap(), Some(Bytes::from("flint")));
//! ```
//!
//! ## Module Overview
//!
//! - [`storage`]: the keyspace, lazy expiry and per-type commands
//! - [`commands`]: argument-vector dispatch and [`Reply`]
//! - [`repl`]: the line-oriented shell
//! - [`config`]: engine and shell settings
//! - [`error`]: the crate error type

pub mod commands;
pub mod config;
pub mod error;
pub mod repl;
pub mod storage;

// Re-export commonly used types for convenience
pub use commands::{CommandHandler, Reply};
pub use config::Config;
pub use error::{Error, Result};
pub use storage::StorageEngine;

/// Version of FlintKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
