//! Command Handler Module
//!
//! This module implements the command layer for FlintKV. It takes an
//! argument vector, executes it against the storage engine, and returns a
//! [`Reply`].
//!
//! ## Architecture
//!
//! ```text
//! Shell line
//!       │
//!       ▼
//! ┌─────────────────┐
//! │  split_args     │  (repl module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CommandHandler  │  (this module)
//! │                 │
//! │  - Dispatch     │
//! │  - Validate     │
//! │  - Execute      │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ StorageEngine   │  (storage module)
//! └─────────────────┘
//! ```
//!
//! ## Supported Commands
//!
//! ### String Commands
//! - `GET`, `SET`, `SETNX`, `SETEX`, `PSETEX`
//! - `GETSET`, `GETDEL`, `APPEND`, `STRLEN`
//! - `INCR`, `INCRBY`, `DECR`, `DECRBY`
//! - `MGET`, `MSET`
//!
//! ### List Commands
//! - `LPUSH`, `RPUSH`, `LPOP`, `RPOP`
//! - `LLEN`, `LINDEX`, `LRANGE`, `LSET`, `LREM`
//!
//! ### Hash Commands
//! - `HSET`, `HGET`, `HEXISTS`, `HDEL`
//! - `HLEN`, `HGETALL`, `HKEYS`, `HVALS`
//!
//! ### Set Commands
//! - `SADD`, `SREM`, `SISMEMBER`, `SMEMBERS`, `SCARD`
//!
//! ### Sorted Set Commands
//! - `ZADD`, `ZREM`, `ZSCORE`, `ZCARD`, `ZRANK`, `ZRANGE`
//!
//! ### Key Commands
//! - `DEL`, `EXISTS`, `TYPE`, `KEYS`, `RENAME`, `RENAMENX`
//! - `EXPIRE`, `PEXPIRE`, `EXPIREAT`, `PEXPIREAT`
//! - `TTL`, `PTTL`, `PERSIST`
//!
//! ### Server Commands
//! - `PING`, `ECHO`, `INFO`
//! - `DBSIZE`, `FLUSHDB`, `FLUSHALL`

pub mod handler;
pub mod reply;

pub use handler::CommandHandler;
pub use reply::Reply;
