//! Set commands.

use bytes::Bytes;

use super::engine::StorageEngine;
use super::types::{KeyType, SetValue};
use crate::error::Result;

impl StorageEngine {
    // ========================================================================
    // SET OPERATIONS
    // ========================================================================

    /// Adds members to a set, creating it if needed. Returns how many were new.
    pub fn sadd(&self, key: Bytes, members: Vec<Bytes>) -> Result<usize> {
        let mut ks = self.keyspace();
        if members.is_empty() {
            ks.lookup::<SetValue>(&key)?;
            return Ok(0);
        }

        let set = ks.lookup_or_create::<SetValue>(&key)?;
        let mut added = 0;
        for member in members {
            if set.members.insert(member) {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Removes members from a set. Returns how many were present.
    ///
    /// Removing the last member deletes the key.
    pub fn srem(&self, key: &[u8], members: &[Bytes]) -> Result<usize> {
        let mut ks = self.keyspace();
        let Some(set) = ks.lookup_mut::<SetValue>(key)? else {
            return Ok(0);
        };

        let mut removed = 0;
        for member in members {
            if set.members.remove(member) {
                removed += 1;
            }
        }
        if set.members.is_empty() {
            ks.remove(key, KeyType::Set);
        }
        Ok(removed)
    }

    pub fn sismember(&self, key: &[u8], member: &[u8]) -> Result<bool> {
        let mut ks = self.keyspace();
        Ok(ks
            .lookup::<SetValue>(key)?
            .is_some_and(|set| set.members.contains(member)))
    }

    /// Returns every member of a set, in no particular order.
    pub fn smembers(&self, key: &[u8]) -> Result<Vec<Bytes>> {
        let mut ks = self.keyspace();
        Ok(ks
            .lookup::<SetValue>(key)?
            .map_or_else(Vec::new, |set| set.members.iter().cloned().collect()))
    }

    pub fn scard(&self, key: &[u8]) -> Result<usize> {
        let mut ks = self.keyspace();
        Ok(ks.lookup::<SetValue>(key)?.map_or(0, |set| set.members.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn members(values: &[&str]) -> Vec<Bytes> {
        values.iter().map(|v| Bytes::from(v.to_string())).collect()
    }

    #[test]
    fn test_sadd_and_smembers() {
        let engine = StorageEngine::new();

        assert_eq!(engine.sadd(Bytes::from("s"), members(&["a", "b", "a"])), Ok(2));
        assert_eq!(engine.sadd(Bytes::from("s"), members(&["b", "c"])), Ok(1));
        assert_eq!(engine.scard(b"s"), Ok(3));

        let mut all = engine.smembers(b"s").unwrap();
        all.sort();
        assert_eq!(all, members(&["a", "b", "c"]));
        assert_eq!(engine.key_type(b"s"), "set");
    }

    #[test]
    fn test_sismember() {
        let engine = StorageEngine::new();
        engine.sadd(Bytes::from("s"), members(&["a"])).unwrap();

        assert_eq!(engine.sismember(b"s", b"a"), Ok(true));
        assert_eq!(engine.sismember(b"s", b"b"), Ok(false));
        assert_eq!(engine.sismember(b"missing", b"a"), Ok(false));
    }

    #[test]
    fn test_srem_deletes_emptied_set() {
        let engine = StorageEngine::new();
        engine.sadd(Bytes::from("s"), members(&["a", "b"])).unwrap();

        assert_eq!(engine.srem(b"s", &members(&["a", "x"])), Ok(1));
        assert!(engine.exists(b"s"));
        assert_eq!(engine.srem(b"s", &members(&["b"])), Ok(1));
        assert!(!engine.exists(b"s"));
        assert_eq!(engine.scard(b"s"), Ok(0));
    }

    #[test]
    fn test_set_wrong_type() {
        let engine = StorageEngine::new();
        engine.set(Bytes::from("k"), Bytes::from("v")).unwrap();

        assert_eq!(engine.sadd(Bytes::from("k"), members(&["a"])), Err(Error::WrongType));
        assert_eq!(engine.smembers(b"k"), Err(Error::WrongType));
        assert_eq!(engine.srem(b"k", &members(&["a"])), Err(Error::WrongType));
    }
}
