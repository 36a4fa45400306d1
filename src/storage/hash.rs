//! Hash commands. A hash whose last field is deleted is deleted itself.

use bytes::Bytes;

use super::engine::StorageEngine;
use super::types::{HashValue, KeyType};
use crate::error::Result;

impl StorageEngine {
    // ========================================================================
    // HASH OPERATIONS
    // ========================================================================

    /// Sets one field in a hash, creating the hash if needed.
    ///
    /// # Returns
    ///
    /// Returns `true` if the field is new, `false` if an existing value was replaced.
    pub fn hset(&self, key: Bytes, field: Bytes, value: Bytes) -> Result<bool> {
        Ok(self.hset_many(key, vec![(field, value)])? == 1)
    }

    /// Sets several fields in a hash. Returns the number of new fields.
    pub fn hset_many(&self, key: Bytes, pairs: Vec<(Bytes, Bytes)>) -> Result<usize> {
        let mut ks = self.keyspace();
        if pairs.is_empty() {
            // nothing to create, but the type is still checked
            ks.lookup::<HashValue>(&key)?;
            return Ok(0);
        }

        let hash = ks.lookup_or_create::<HashValue>(&key)?;
        let mut added = 0;
        for (field, value) in pairs {
            if hash.fields.insert(field, value).is_none() {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Gets the value of a field in a hash.
    pub fn hget(&self, key: &[u8], field: &[u8]) -> Result<Option<Bytes>> {
        let mut ks = self.keyspace();
        Ok(ks
            .lookup::<HashValue>(key)?
            .and_then(|hash| hash.fields.get(field).cloned()))
    }

    /// Checks whether a field exists in a hash.
    pub fn hexists(&self, key: &[u8], field: &[u8]) -> Result<bool> {
        let mut ks = self.keyspace();
        Ok(ks
            .lookup::<HashValue>(key)?
            .is_some_and(|hash| hash.fields.contains_key(field)))
    }

    /// Deletes fields from a hash. Returns how many existed.
    pub fn hdel(&self, key: &[u8], fields: &[Bytes]) -> Result<usize> {
        let mut ks = self.keyspace();
        let Some(hash) = ks.lookup_mut::<HashValue>(key)? else {
            return Ok(0);
        };

        let mut removed = 0;
        for field in fields {
            if hash.fields.remove(field).is_some() {
                removed += 1;
            }
        }
        if hash.fields.is_empty() {
            ks.remove(key, KeyType::Hash);
        }
        Ok(removed)
    }

    /// Returns the number of fields in a hash.
    pub fn hlen(&self, key: &[u8]) -> Result<usize> {
        let mut ks = self.keyspace();
        Ok(ks.lookup::<HashValue>(key)?.map_or(0, |hash| hash.fields.len()))
    }

    /// Returns every field-value pair of a hash, in no particular order.
    pub fn hgetall(&self, key: &[u8]) -> Result<Vec<(Bytes, Bytes)>> {
        let mut ks = self.keyspace();
        Ok(ks.lookup::<HashValue>(key)?.map_or_else(Vec::new, |hash| {
            hash.fields
                .iter()
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect()
        }))
    }

    /// Returns every field name of a hash.
    pub fn hkeys(&self, key: &[u8]) -> Result<Vec<Bytes>> {
        let mut ks = self.keyspace();
        Ok(ks
            .lookup::<HashValue>(key)?
            .map_or_else(Vec::new, |hash| hash.fields.keys().cloned().collect()))
    }

    /// Returns every value of a hash.
    pub fn hvals(&self, key: &[u8]) -> Result<Vec<Bytes>> {
        let mut ks = self.keyspace();
        Ok(ks
            .lookup::<HashValue>(key)?
            .map_or_else(Vec::new, |hash| hash.fields.values().cloned().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sorted<T: Ord>(mut v: Vec<T>) -> Vec<T> {
        v.sort();
        v
    }

    #[test]
    fn test_hset_and_hget() {
        let engine = StorageEngine::new();

        assert_eq!(
            engine.hset(Bytes::from("h"), Bytes::from("f"), Bytes::from("v1")),
            Ok(true)
        );
        assert_eq!(
            engine.hset(Bytes::from("h"), Bytes::from("f"), Bytes::from("v2")),
            Ok(false)
        );
        assert_eq!(engine.hget(b"h", b"f").unwrap(), Some(Bytes::from("v2")));
        assert_eq!(engine.hget(b"h", b"nope").unwrap(), None);
        assert_eq!(engine.hget(b"missing", b"f").unwrap(), None);
        assert_eq!(engine.key_type(b"h"), "hash");
    }

    #[test]
    fn test_hset_many() {
        let engine = StorageEngine::new();
        let pairs = vec![
            (Bytes::from("a"), Bytes::from("1")),
            (Bytes::from("b"), Bytes::from("2")),
            (Bytes::from("a"), Bytes::from("3")),
        ];
        assert_eq!(engine.hset_many(Bytes::from("h"), pairs), Ok(2));
        assert_eq!(engine.hget(b"h", b"a").unwrap(), Some(Bytes::from("3")));
        assert_eq!(engine.hlen(b"h"), Ok(2));
    }

    #[test]
    fn test_hash_wrong_type() {
        let engine = StorageEngine::new();
        engine.set(Bytes::from("s"), Bytes::from("v")).unwrap();

        assert_eq!(
            engine.hset(Bytes::from("s"), Bytes::from("f"), Bytes::from("v")),
            Err(Error::WrongType)
        );
        assert_eq!(engine.hget(b"s", b"f"), Err(Error::WrongType));
        assert_eq!(engine.hset_many(Bytes::from("s"), vec![]), Err(Error::WrongType));
    }

    #[test]
    fn test_hdel() {
        let engine = StorageEngine::new();
        engine.hset(Bytes::from("h"), Bytes::from("f1"), Bytes::from("1")).unwrap();
        engine.hset(Bytes::from("h"), Bytes::from("f2"), Bytes::from("2")).unwrap();

        let fields = [Bytes::from("f1"), Bytes::from("fx")];
        assert_eq!(engine.hdel(b"h", &fields), Ok(1));
        assert_eq!(engine.hget(b"h", b"f2").unwrap(), Some(Bytes::from("2")));

        // removing the last field removes the key
        assert_eq!(engine.hdel(b"h", &[Bytes::from("f2")]), Ok(1));
        assert!(!engine.exists(b"h"));
        assert_eq!(engine.hdel(b"h", &[Bytes::from("f2")]), Ok(0));
    }

    #[test]
    fn test_hexists_and_listing() {
        let engine = StorageEngine::new();
        engine.hset(Bytes::from("h"), Bytes::from("a"), Bytes::from("1")).unwrap();
        engine.hset(Bytes::from("h"), Bytes::from("b"), Bytes::from("2")).unwrap();

        assert_eq!(engine.hexists(b"h", b"a"), Ok(true));
        assert_eq!(engine.hexists(b"h", b"z"), Ok(false));
        assert_eq!(engine.hexists(b"missing", b"a"), Ok(false));

        assert_eq!(
            sorted(engine.hkeys(b"h").unwrap()),
            vec![Bytes::from("a"), Bytes::from("b")]
        );
        assert_eq!(
            sorted(engine.hvals(b"h").unwrap()),
            vec![Bytes::from("1"), Bytes::from("2")]
        );
        assert_eq!(
            sorted(engine.hgetall(b"h").unwrap()),
            vec![
                (Bytes::from("a"), Bytes::from("1")),
                (Bytes::from("b"), Bytes::from("2"))
            ]
        );
        assert!(engine.hgetall(b"missing").unwrap().is_empty());
    }

    #[test]
    fn test_hset_keeps_ttl() {
        let engine = StorageEngine::new();
        engine.hset(Bytes::from("h"), Bytes::from("a"), Bytes::from("1")).unwrap();
        engine.expire(b"h", 60);
        engine.hset(Bytes::from("h"), Bytes::from("b"), Bytes::from("2")).unwrap();
        assert!(engine.ttl(b"h") > 0);
    }
}
