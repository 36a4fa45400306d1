//! List commands. A list that becomes empty is deleted.

use bytes::Bytes;

use super::engine::StorageEngine;
use super::types::{normalize_range, KeyType, ListValue};
use crate::error::{Error, Result};

/// Resolves a possibly negative index against a list of `len` items.
fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let actual = if index < 0 { len + index } else { index };
    if actual < 0 || actual >= len {
        return None;
    }
    usize::try_from(actual).ok()
}

#[derive(Clone, Copy)]
enum End {
    Head,
    Tail,
}

impl StorageEngine {
    // ========================================================================
    // LIST OPERATIONS
    // ========================================================================

    /// Pushes one or more values to the left (head) of a list.
    /// Creates the list if it doesn't exist.
    ///
    /// `LPUSH key a b c` leaves the list as `[c, b, a]`.
    ///
    /// # Returns
    /// The length of the list after the push operation.
    pub fn lpush(&self, key: Bytes, values: Vec<Bytes>) -> Result<usize> {
        self.push(key, values, End::Head)
    }

    /// Pushes one or more values to the right (tail) of a list.
    /// Creates the list if it doesn't exist.
    ///
    /// # Returns
    /// The length of the list after the push operation.
    pub fn rpush(&self, key: Bytes, values: Vec<Bytes>) -> Result<usize> {
        self.push(key, values, End::Tail)
    }

    fn push(&self, key: Bytes, values: Vec<Bytes>, end: End) -> Result<usize> {
        if values.is_empty() {
            return self.llen(&key);
        }

        let mut ks = self.keyspace();
        let list = ks.lookup_or_create::<ListValue>(&key)?;
        for value in values {
            match end {
                End::Head => list.items.push_front(value),
                End::Tail => list.items.push_back(value),
            }
        }
        Ok(list.items.len())
    }

    /// Removes and returns the first element (head) of a list.
    pub fn lpop(&self, key: &[u8]) -> Result<Option<Bytes>> {
        self.pop(key, End::Head)
    }

    /// Removes and returns the last element (tail) of a list.
    pub fn rpop(&self, key: &[u8]) -> Result<Option<Bytes>> {
        self.pop(key, End::Tail)
    }

    fn pop(&self, key: &[u8], end: End) -> Result<Option<Bytes>> {
        let mut ks = self.keyspace();
        let Some(list) = ks.lookup_mut::<ListValue>(key)? else {
            return Ok(None);
        };

        let value = match end {
            End::Head => list.items.pop_front(),
            End::Tail => list.items.pop_back(),
        };
        if list.items.is_empty() {
            ks.remove(key, KeyType::List);
        }
        Ok(value)
    }

    /// Returns the length of a list, or 0 if the list doesn't exist.
    pub fn llen(&self, key: &[u8]) -> Result<usize> {
        let mut ks = self.keyspace();
        Ok(ks.lookup::<ListValue>(key)?.map_or(0, |list| list.items.len()))
    }

    /// Returns the element at the specified index in a list.
    /// Negative indices count from the end (-1 is the last element).
    pub fn lindex(&self, key: &[u8], index: i64) -> Result<Option<Bytes>> {
        let mut ks = self.keyspace();
        Ok(ks.lookup::<ListValue>(key)?.and_then(|list| {
            resolve_index(index, list.items.len()).and_then(|i| list.items.get(i).cloned())
        }))
    }

    /// Returns a range of elements from a list.
    /// Both start and stop are inclusive. Negative indices count from the end.
    pub fn lrange(&self, key: &[u8], start: i64, stop: i64) -> Result<Vec<Bytes>> {
        let mut ks = self.keyspace();
        let Some(list) = ks.lookup::<ListValue>(key)? else {
            return Ok(Vec::new());
        };

        Ok(match normalize_range(start, stop, list.items.len()) {
            Some((from, to)) => list.items.range(from..=to).cloned().collect(),
            None => Vec::new(),
        })
    }

    /// Sets the element at the specified index in a list.
    ///
    /// Fails with `MissingKey` if the list doesn't exist and with
    /// `IndexOutOfRange` if the index is outside it.
    pub fn lset(&self, key: &[u8], index: i64, value: Bytes) -> Result<()> {
        let mut ks = self.keyspace();
        let list = ks.lookup_mut::<ListValue>(key)?.ok_or(Error::MissingKey)?;
        let i = resolve_index(index, list.items.len()).ok_or(Error::IndexOutOfRange)?;
        list.items[i] = value;
        Ok(())
    }

    /// Removes elements equal to the given value from a list.
    ///
    /// - count > 0: Remove `count` elements equal to value, from head to tail.
    /// - count < 0: Remove `|count|` elements equal to value, from tail to head.
    /// - count = 0: Remove all elements equal to value.
    ///
    /// # Returns
    /// The number of removed elements.
    pub fn lrem(&self, key: &[u8], count: i64, value: &[u8]) -> Result<usize> {
        let mut ks = self.keyspace();
        let Some(list) = ks.lookup_mut::<ListValue>(key)? else {
            return Ok(0);
        };

        let max_remove = if count == 0 {
            usize::MAX
        } else {
            usize::try_from(count.unsigned_abs()).unwrap_or(usize::MAX)
        };
        let mut removed = 0usize;

        if count >= 0 {
            let mut i = 0;
            while i < list.items.len() && removed < max_remove {
                if list.items[i] == value {
                    list.items.remove(i);
                    removed += 1;
                } else {
                    i += 1;
                }
            }
        } else {
            let mut i = list.items.len();
            while i > 0 && removed < max_remove {
                i -= 1;
                if list.items[i] == value {
                    list.items.remove(i);
                    removed += 1;
                }
            }
        }

        if list.items.is_empty() {
            ks.remove(key, KeyType::List);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(values: &[&str]) -> Vec<Bytes> {
        values.iter().map(|v| Bytes::from(v.to_string())).collect()
    }

    #[test]
    fn test_lpush_rpush() {
        let engine = StorageEngine::new();

        assert_eq!(engine.lpush(Bytes::from("list"), items(&["a", "b", "c"])), Ok(3));
        assert_eq!(engine.lrange(b"list", 0, -1).unwrap(), items(&["c", "b", "a"]));

        assert_eq!(engine.rpush(Bytes::from("list"), items(&["d", "e"])), Ok(5));
        assert_eq!(
            engine.lrange(b"list", 0, -1).unwrap(),
            items(&["c", "b", "a", "d", "e"])
        );
        assert_eq!(engine.key_type(b"list"), "list");
    }

    #[test]
    fn test_push_on_other_type() {
        let engine = StorageEngine::new();
        engine.set(Bytes::from("s"), Bytes::from("v")).unwrap();

        assert_eq!(engine.lpush(Bytes::from("s"), items(&["a"])), Err(Error::WrongType));
        assert_eq!(engine.llen(b"s"), Err(Error::WrongType));
        assert_eq!(engine.get(b"s").unwrap(), Some(Bytes::from("v")));
    }

    #[test]
    fn test_lpop_rpop() {
        let engine = StorageEngine::new();
        engine.rpush(Bytes::from("list"), items(&["a", "b", "c"])).unwrap();

        assert_eq!(engine.lpop(b"list").unwrap(), Some(Bytes::from("a")));
        assert_eq!(engine.rpop(b"list").unwrap(), Some(Bytes::from("c")));
        assert_eq!(engine.lpop(b"list").unwrap(), Some(Bytes::from("b")));

        // emptied list is gone
        assert_eq!(engine.lpop(b"list").unwrap(), None);
        assert!(!engine.exists(b"list"));
        assert_eq!(engine.key_type(b"list"), "none");
    }

    #[test]
    fn test_llen() {
        let engine = StorageEngine::new();
        assert_eq!(engine.llen(b"list"), Ok(0));

        engine.rpush(Bytes::from("list"), items(&["a", "b"])).unwrap();
        assert_eq!(engine.llen(b"list"), Ok(2));
    }

    #[test]
    fn test_lindex() {
        let engine = StorageEngine::new();
        engine.rpush(Bytes::from("list"), items(&["a", "b", "c"])).unwrap();

        assert_eq!(engine.lindex(b"list", 0).unwrap(), Some(Bytes::from("a")));
        assert_eq!(engine.lindex(b"list", 2).unwrap(), Some(Bytes::from("c")));
        assert_eq!(engine.lindex(b"list", -1).unwrap(), Some(Bytes::from("c")));
        assert_eq!(engine.lindex(b"list", -3).unwrap(), Some(Bytes::from("a")));
        assert_eq!(engine.lindex(b"list", 3).unwrap(), None);
        assert_eq!(engine.lindex(b"list", -4).unwrap(), None);
        assert_eq!(engine.lindex(b"missing", 0).unwrap(), None);
    }

    #[test]
    fn test_lrange() {
        let engine = StorageEngine::new();
        engine
            .rpush(Bytes::from("list"), items(&["a", "b", "c", "d", "e"]))
            .unwrap();

        assert_eq!(engine.lrange(b"list", 1, 3).unwrap(), items(&["b", "c", "d"]));
        assert_eq!(engine.lrange(b"list", -2, -1).unwrap(), items(&["d", "e"]));
        assert_eq!(engine.lrange(b"list", -100, 100).unwrap().len(), 5);
        assert!(engine.lrange(b"list", 3, 1).unwrap().is_empty());
        assert!(engine.lrange(b"list", 10, 20).unwrap().is_empty());
        assert!(engine.lrange(b"missing", 0, -1).unwrap().is_empty());
    }

    #[test]
    fn test_lset() {
        let engine = StorageEngine::new();
        engine.rpush(Bytes::from("list"), items(&["a", "b", "c"])).unwrap();

        engine.lset(b"list", 1, Bytes::from("B")).unwrap();
        engine.lset(b"list", -1, Bytes::from("C")).unwrap();
        assert_eq!(engine.lrange(b"list", 0, -1).unwrap(), items(&["a", "B", "C"]));

        assert_eq!(
            engine.lset(b"list", 5, Bytes::from("x")),
            Err(Error::IndexOutOfRange)
        );
        assert_eq!(
            engine.lset(b"missing", 0, Bytes::from("x")),
            Err(Error::MissingKey)
        );
    }

    #[test]
    fn test_lrem() {
        let engine = StorageEngine::new();
        let list = items(&["a", "b", "a", "c", "a"]);

        engine.rpush(Bytes::from("l1"), list.clone()).unwrap();
        assert_eq!(engine.lrem(b"l1", 2, b"a"), Ok(2));
        assert_eq!(engine.lrange(b"l1", 0, -1).unwrap(), items(&["b", "c", "a"]));

        engine.rpush(Bytes::from("l2"), list.clone()).unwrap();
        assert_eq!(engine.lrem(b"l2", -2, b"a"), Ok(2));
        assert_eq!(engine.lrange(b"l2", 0, -1).unwrap(), items(&["a", "b", "c"]));

        engine.rpush(Bytes::from("l3"), list).unwrap();
        assert_eq!(engine.lrem(b"l3", 0, b"a"), Ok(3));
        assert_eq!(engine.lrange(b"l3", 0, -1).unwrap(), items(&["b", "c"]));

        assert_eq!(engine.lrem(b"missing", 0, b"a"), Ok(0));
    }

    #[test]
    fn test_lrem_deletes_emptied_list() {
        let engine = StorageEngine::new();
        engine.rpush(Bytes::from("l"), items(&["x", "x"])).unwrap();
        assert_eq!(engine.lrem(b"l", 0, b"x"), Ok(2));
        assert!(!engine.exists(b"l"));
    }

    #[test]
    fn test_list_keeps_ttl() {
        let engine = StorageEngine::new();
        engine.rpush(Bytes::from("l"), items(&["a", "b"])).unwrap();
        engine.expire(b"l", 60);

        engine.rpush(Bytes::from("l"), items(&["c"])).unwrap();
        engine.lpop(b"l").unwrap();
        assert!(engine.ttl(b"l") > 0);
    }
}
