//! Sorted set commands.
//!
//! Members are ordered by score, then by member bytes. NaN scores are
//! rejected before anything is written.

use bytes::Bytes;

use super::engine::StorageEngine;
use super::types::{KeyType, SortedSetValue};
use crate::error::{Error, Result};

impl StorageEngine {
    // ========================================================================
    // SORTED SET OPERATIONS
    // ========================================================================

    /// Adds members with scores, or updates the scores of existing ones.
    ///
    /// # Returns
    ///
    /// The number of members that were new.
    pub fn zadd(&self, key: Bytes, entries: Vec<(f64, Bytes)>) -> Result<usize> {
        if entries.iter().any(|(score, _)| score.is_nan()) {
            return Err(Error::NotAFloat);
        }

        let mut ks = self.keyspace();
        if entries.is_empty() {
            ks.lookup::<SortedSetValue>(&key)?;
            return Ok(0);
        }

        let zset = ks.lookup_or_create::<SortedSetValue>(&key)?;
        let mut added = 0;
        for (score, member) in entries {
            if zset.members.insert(member, score) {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Removes members. Removing the last member deletes the key.
    pub fn zrem(&self, key: &[u8], members: &[Bytes]) -> Result<usize> {
        let mut ks = self.keyspace();
        let Some(zset) = ks.lookup_mut::<SortedSetValue>(key)? else {
            return Ok(0);
        };

        let mut removed = 0;
        for member in members {
            if zset.members.remove(member) {
                removed += 1;
            }
        }
        if zset.members.is_empty() {
            ks.remove(key, KeyType::ZSet);
        }
        Ok(removed)
    }

    pub fn zscore(&self, key: &[u8], member: &[u8]) -> Result<Option<f64>> {
        let mut ks = self.keyspace();
        Ok(ks
            .lookup::<SortedSetValue>(key)?
            .and_then(|zset| zset.members.score(member)))
    }

    pub fn zcard(&self, key: &[u8]) -> Result<usize> {
        let mut ks = self.keyspace();
        Ok(ks
            .lookup::<SortedSetValue>(key)?
            .map_or(0, |zset| zset.members.len()))
    }

    /// 0-based rank of a member, lowest score first.
    pub fn zrank(&self, key: &[u8], member: &[u8]) -> Result<Option<usize>> {
        let mut ks = self.keyspace();
        Ok(ks
            .lookup::<SortedSetValue>(key)?
            .and_then(|zset| zset.members.rank(member)))
    }

    /// Members between two ranks (inclusive) with their scores.
    /// Negative ranks count from the end.
    pub fn zrange(&self, key: &[u8], start: i64, stop: i64) -> Result<Vec<(Bytes, f64)>> {
        let mut ks = self.keyspace();
        Ok(ks
            .lookup::<SortedSetValue>(key)?
            .map_or_else(Vec::new, |zset| zset.members.range(start, stop)))
    }
}
