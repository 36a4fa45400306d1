//! Thread-Safe Storage Engine with Lazy Expiry
//!
//! This module implements the core storage engine for FlintKV: a typed
//! keyspace behind one database-wide mutex, plus the commands that work on
//! keys of any type (DEL, EXPIRE, TTL, KEYS, RENAME, ...).
//!
//! Type-specific commands live next door in `string.rs`, `list.rs`,
//! `hash.rs`, `set.rs` and `zset.rs`, each as another `impl StorageEngine`
//! block.
//!
//! ## Concurrency Model
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                StorageEngine                 │
//! │  ┌────────────────────────────────────────┐  │
//! │  │             Mutex<Keyspace>            │  │
//! │  │  index: name → type                    │  │
//! │  │  strings │ lists │ hashes │ sets │ zsets│  │
//! │  └────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Every operation takes the lock exactly once, for its whole duration,
//! so each command is atomic with respect to every other. Values handed
//! back to callers are owned copies; nothing borrowed from the keyspace
//! outlives the lock.
//!
//! ## Expiry
//!
//! There is no background sweeper. Every lookup goes through
//! [`Keyspace::locate`], which removes a key whose deadline has passed
//! before the command sees it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use tracing::{debug, warn};

use super::expiry::unix_millis;
use super::glob::GlobPattern;
use super::keyspace::Keyspace;
use crate::config::Config;
use crate::error::{Error, Result};

/// The main storage engine for FlintKV.
///
/// Wrap it in an `Arc` to share it between threads or tasks. All
/// operations take `&self`.
///
/// # Example
///
/// ```
/// use flintkv::StorageEngine;
/// use bytes::Bytes;
///
/// let engine = StorageEngine::new();
///
/// engine.set(Bytes::from("name"), Bytes::from("Ariz")).unwrap();
/// assert_eq!(engine.get(b"name").unwrap(), Some(Bytes::from("Ariz")));
///
/// assert!(engine.expire(b"name", 60));
/// assert!(engine.ttl(b"name") > 0);
/// ```
pub struct StorageEngine {
    keyspace: Mutex<Keyspace>,

    config: Config,

    /// Statistics: total operations served
    commands: AtomicU64,
}

impl std::fmt::Debug for StorageEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageEngine")
            .field("keys", &self.len())
            .field("commands", &self.commands.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for StorageEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageEngine {
    /// Creates a new storage engine with default settings.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a new storage engine with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            keyspace: Mutex::new(Keyspace::new()),
            config,
            commands: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Acquires the database lock for one operation. A poisoned lock is taken over.
    pub(crate) fn keyspace(&self) -> MutexGuard<'_, Keyspace> {
        self.commands.fetch_add(1, Ordering::Relaxed);
        self.keyspace.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================================================
    // KEY OPERATIONS
    // ========================================================================

    /// Deletes a key of any type.
    ///
    /// # Returns
    ///
    /// Returns `true` if the key was deleted, `false` if it didn't exist.
    pub fn del(&self, key: &[u8]) -> bool {
        let mut ks = self.keyspace();
        match ks.locate(key) {
            Some(key_type) => ks.remove(key, key_type).is_some(),
            None => false,
        }
    }

    /// Deletes several keys under one lock.
    ///
    /// # Returns
    ///
    /// Returns the number of keys that were deleted.
    pub fn del_many(&self, keys: &[Bytes]) -> u64 {
        let mut ks = self.keyspace();
        let mut deleted = 0;
        for key in keys {
            if let Some(key_type) = ks.locate(key) {
                ks.remove(key, key_type);
                deleted += 1;
            }
        }
        deleted
    }

    /// Checks if a live key of any type exists.
    pub fn exists(&self, key: &[u8]) -> bool {
        self.keyspace().locate(key).is_some()
    }

    /// Counts how many of the given keys exist. Repeated keys count each time.
    pub fn exists_many(&self, keys: &[Bytes]) -> u64 {
        let mut ks = self.keyspace();
        keys.iter().filter(|key| ks.locate(key).is_some()).count() as u64
    }

    /// Sets a TTL in seconds on an existing key.
    ///
    /// Zero or negative TTLs leave the key already expired.
    ///
    /// # Returns
    ///
    /// Returns `true` if the TTL was set, `false` if the key doesn't exist.
    pub fn expire(&self, key: &[u8], seconds: i64) -> bool {
        self.pexpire(key, seconds.saturating_mul(1000))
    }

    /// Sets a TTL in milliseconds on an existing key.
    pub fn pexpire(&self, key: &[u8], millis: i64) -> bool {
        let mut ks = self.keyspace();
        match ks.ttl_carrier(key) {
            Ok(value) => {
                value.set_ttl(millis);
                true
            }
            Err(_) => false,
        }
    }

    /// Sets an absolute deadline as a unix timestamp in seconds.
    pub fn expire_at(&self, key: &[u8], unix_seconds: i64) -> bool {
        self.pexpire_at(key, unix_seconds.saturating_mul(1000))
    }

    /// Sets an absolute deadline as a unix timestamp in milliseconds.
    pub fn pexpire_at(&self, key: &[u8], unix_ms: i64) -> bool {
        let mut ks = self.keyspace();
        match ks.ttl_carrier(key) {
            Ok(value) => {
                value.set_expiration_at(unix_millis(unix_ms));
                true
            }
            Err(_) => false,
        }
    }

    /// Gets the remaining TTL for a key in seconds.
    ///
    /// # Returns
    ///
    /// - the remaining whole seconds if the key has a TTL
    /// - `-1` if the key exists but has no TTL
    /// - `-2` if the key doesn't exist
    pub fn ttl(&self, key: &[u8]) -> i64 {
        let mut ks = self.keyspace();
        ks.ttl_carrier(key).map_or(-2, |value| value.ttl_seconds())
    }

    /// Gets the remaining TTL for a key in milliseconds. Same sentinels as [`StorageEngine::ttl`].
    pub fn pttl(&self, key: &[u8]) -> i64 {
        let mut ks = self.keyspace();
        ks.ttl_carrier(key).map_or(-2, |value| value.ttl_millis())
    }

    /// Removes the TTL from a key (makes it persistent).
    ///
    /// # Returns
    ///
    /// Returns `true` if a TTL was removed, `false` if the key doesn't exist
    /// or didn't have one.
    pub fn persist(&self, key: &[u8]) -> bool {
        let mut ks = self.keyspace();
        ks.ttl_carrier(key).is_ok_and(|value| value.clear_ttl())
    }

    /// Returns all live keys matching a glob pattern, in no particular order.
    ///
    /// **Warning**: This operation walks the whole keyspace.
    pub fn keys(&self, pattern: &[u8]) -> Result<Vec<Bytes>> {
        let glob = GlobPattern::compile(pattern)?;
        let mut ks = self.keyspace();

        if ks.len() > self.config.keys_warn_threshold {
            warn!(
                keys = ks.len(),
                threshold = self.config.keys_warn_threshold,
                "KEYS is scanning a large keyspace"
            );
        }

        // names are collected first; reaping while walking the index is not possible
        let candidates = ks.matching_names(&glob);
        Ok(candidates
            .into_iter()
            .filter(|name| ks.locate(name).is_some())
            .collect())
    }

    /// Returns the type of a key: "string", "list", "hash", "set", "zset" or "none".
    pub fn key_type(&self, key: &[u8]) -> &'static str {
        self.keyspace()
            .locate(key)
            .map_or("none", |key_type| key_type.as_str())
    }

    /// Moves a key to a new name, replacing whatever `dst` held.
    ///
    /// The value keeps its type and TTL. Renaming a key to itself succeeds
    /// and changes nothing.
    pub fn rename(&self, src: &[u8], dst: Bytes) -> Result<()> {
        let mut ks = self.keyspace();
        let key_type = ks.locate(src).ok_or(Error::MissingKey)?;
        if src != &dst[..] {
            if let Some(value) = ks.remove(src, key_type) {
                ks.install(dst, value);
            }
        }
        Ok(())
    }

    /// Like [`StorageEngine::rename`], but fails with `NameTaken` if `dst`
    /// is a live key (including when `dst == src`).
    pub fn renamenx(&self, src: &[u8], dst: Bytes) -> Result<()> {
        let mut ks = self.keyspace();
        let key_type = ks.locate(src).ok_or(Error::MissingKey)?;
        if ks.locate(&dst).is_some() {
            return Err(Error::NameTaken);
        }
        if let Some(value) = ks.remove(src, key_type) {
            ks.install(dst, value);
        }
        Ok(())
    }

    /// Clears all data from the database.
    pub fn flush(&self) {
        let mut ks = self.keyspace();
        let dropped = ks.len();
        ks.clear();
        debug!(keys = dropped, "Flushed keyspace");
    }

    /// Returns the number of keys in the database.
    ///
    /// Expired keys that have not been looked up since expiring are still
    /// counted.
    pub fn len(&self) -> usize {
        self.keyspace.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if the database is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns database statistics.
    pub fn stats(&self) -> StorageStats {
        let ks = self.keyspace.lock().unwrap_or_else(PoisonError::into_inner);
        StorageStats {
            keys: ks.len() as u64,
            keys_with_expiry: ks.keys_with_expiry() as u64,
            reaped: ks.reaped(),
            commands: self.commands.load(Ordering::Relaxed),
        }
    }
}

/// Database statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of keys currently indexed
    pub keys: u64,
    /// Keys carrying a TTL
    pub keys_with_expiry: u64,
    /// Total expired keys removed on access
    pub reaped: u64,
    /// Total engine operations served
    pub commands: u64,
}
