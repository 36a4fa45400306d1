//! String commands: GET, SET and its variants, counters, APPEND.

use std::time::Duration;

use bytes::{Bytes, BytesMut};

use super::engine::StorageEngine;
use super::expiry::Expirable;
use super::types::{KeyType, StringValue, Value};
use crate::error::{Error, Result};

/// Existence precondition for SET.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SetCondition {
    /// Always write.
    #[default]
    Always,
    /// NX: only write if the key does not exist.
    IfAbsent,
    /// XX: only write if the key already exists.
    IfPresent,
}

/// Modifiers accepted by SET.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// EX/PX: TTL for the new value, in milliseconds.
    pub ttl_millis: Option<i64>,
    pub condition: SetCondition,
    /// KEEPTTL: carry the previous value's TTL over to the new one.
    pub keep_ttl: bool,
}

/// What a SET did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOutcome {
    /// False when the NX/XX condition blocked the write.
    pub written: bool,
    /// The string held before the command, if any.
    pub previous: Option<Bytes>,
}

fn parse_integer(data: &[u8]) -> Result<i64> {
    std::str::from_utf8(data)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or(Error::NotAnInteger)
}

impl StorageEngine {
    // ========================================================================
    // STRING OPERATIONS
    // ========================================================================

    /// Gets the string stored at `key`.
    ///
    /// Returns `Ok(None)` if the key doesn't exist or has expired.
    pub fn get(&self, key: &[u8]) -> Result<Option<Bytes>> {
        let mut ks = self.keyspace();
        Ok(ks.lookup::<StringValue>(key)?.map(|s| s.data.clone()))
    }

    /// Sets a string, replacing any previous string and clearing its TTL.
    pub fn set(&self, key: Bytes, value: Bytes) -> Result<()> {
        self.set_with_options(key, value, &SetOptions::default())
            .map(|_| ())
    }

    /// Sets a string that expires after `ttl`.
    pub fn set_with_ttl(&self, key: Bytes, value: Bytes, ttl: Duration) -> Result<()> {
        let options = SetOptions {
            ttl_millis: Some(i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)),
            ..SetOptions::default()
        };
        self.set_with_options(key, value, &options).map(|_| ())
    }

    /// SET with the full set of modifiers.
    ///
    /// Fails with `WrongType` if `key` holds a non-string value, whatever
    /// the condition.
    pub fn set_with_options(
        &self,
        key: Bytes,
        value: Bytes,
        options: &SetOptions,
    ) -> Result<SetOutcome> {
        let mut ks = self.keyspace();

        let existing = ks
            .lookup::<StringValue>(&key)?
            .map(|s| (s.data.clone(), *s.expiration()));
        let previous = existing.as_ref().map(|(data, _)| data.clone());

        let blocked = match options.condition {
            SetCondition::Always => false,
            SetCondition::IfAbsent => existing.is_some(),
            SetCondition::IfPresent => existing.is_none(),
        };
        if blocked {
            return Ok(SetOutcome {
                written: false,
                previous,
            });
        }

        let mut string = StringValue::new(value);
        if let Some(millis) = options.ttl_millis {
            string.set_ttl(millis);
        } else if options.keep_ttl {
            if let Some((_, expiration)) = existing {
                *string.expiration_mut() = expiration;
            }
        }
        ks.install(key, Value::String(string));

        Ok(SetOutcome {
            written: true,
            previous,
        })
    }

    /// Sets `key` only if it does not exist.
    ///
    /// # Returns
    ///
    /// Returns `true` if the value was written.
    pub fn setnx(&self, key: Bytes, value: Bytes) -> Result<bool> {
        let options = SetOptions {
            condition: SetCondition::IfAbsent,
            ..SetOptions::default()
        };
        Ok(self.set_with_options(key, value, &options)?.written)
    }

    /// Sets a new string and returns the one it replaced.
    pub fn getset(&self, key: Bytes, value: Bytes) -> Result<Option<Bytes>> {
        Ok(self
            .set_with_options(key, value, &SetOptions::default())?
            .previous)
    }

    /// Gets a string and deletes the key.
    pub fn getdel(&self, key: &[u8]) -> Result<Option<Bytes>> {
        let mut ks = self.keyspace();
        let Some(data) = ks.lookup::<StringValue>(key)?.map(|s| s.data.clone()) else {
            return Ok(None);
        };
        ks.remove(key, KeyType::String);
        Ok(Some(data))
    }

    /// Appends to a string, creating it if absent. The TTL is kept.
    ///
    /// # Returns
    ///
    /// Returns the length of the string after the append.
    pub fn append(&self, key: Bytes, value: &[u8]) -> Result<usize> {
        let mut ks = self.keyspace();
        let string = ks.lookup_or_create::<StringValue>(&key)?;

        let mut data = BytesMut::with_capacity(string.data.len() + value.len());
        data.extend_from_slice(&string.data);
        data.extend_from_slice(value);
        string.data = data.freeze();

        Ok(string.data.len())
    }

    /// Gets the length of a string value, 0 if the key doesn't exist.
    pub fn strlen(&self, key: &[u8]) -> Result<usize> {
        let mut ks = self.keyspace();
        Ok(ks.lookup::<StringValue>(key)?.map_or(0, |s| s.data.len()))
    }

    /// Increments an integer value by 1.
    pub fn incr(&self, key: Bytes) -> Result<i64> {
        self.incr_by(key, 1)
    }

    /// Increments an integer value by `delta`.
    ///
    /// A missing key counts as 0. The stored string must be a base-10
    /// signed 64-bit integer; nothing is written on parse failure or
    /// overflow. An existing TTL is kept.
    pub fn incr_by(&self, key: Bytes, delta: i64) -> Result<i64> {
        let mut ks = self.keyspace();

        let current = match ks.lookup::<StringValue>(&key)? {
            Some(string) => parse_integer(&string.data)?,
            None => 0,
        };
        let next = current.checked_add(delta).ok_or(Error::Overflow)?;

        ks.lookup_or_create::<StringValue>(&key)?.data = Bytes::from(next.to_string());
        Ok(next)
    }

    /// Decrements an integer value by 1.
    pub fn decr(&self, key: Bytes) -> Result<i64> {
        self.incr_by(key, -1)
    }

    /// Decrements an integer value by `delta`.
    pub fn decr_by(&self, key: Bytes, delta: i64) -> Result<i64> {
        let delta = delta.checked_neg().ok_or(Error::Overflow)?;
        self.incr_by(key, delta)
    }

    /// Gets several strings at once. Missing keys and keys of other types
    /// come back as `None`.
    pub fn mget(&self, keys: &[Bytes]) -> Vec<Option<Bytes>> {
        let mut ks = self.keyspace();
        keys.iter()
            .map(|key| {
                ks.lookup::<StringValue>(key)
                    .ok()
                    .flatten()
                    .map(|s| s.data.clone())
            })
            .collect()
    }

    /// Sets several strings under one lock.
    ///
    /// Fails with `WrongType`, writing nothing, if any key holds a
    /// non-string value.
    pub fn mset(&self, pairs: Vec<(Bytes, Bytes)>) -> Result<()> {
        let mut ks = self.keyspace();
        for (key, _) in &pairs {
            ks.lookup::<StringValue>(key)?;
        }
        for (key, value) in pairs {
            ks.install(key, Value::String(StringValue::new(value)));
        }
        Ok(())
    }
}
