//! Typed value kinds stored in the keyspace.
//!
//! There are five kinds, one per [`KeyType`]. Each is a plain record of
//! its payload plus an embedded [`Expiration`], and each implements
//! [`Expirable`] by handing out that carrier. [`Value`] is the tagged
//! union used when a value has to move between names (RENAME) or be
//! installed without knowing its kind statically.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

use bytes::Bytes;
use ordered_float::OrderedFloat;

use super::expiry::{Expirable, Expiration};

/// The type tag of a key, as reported by TYPE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    String,
    List,
    Hash,
    Set,
    ZSet,
}

impl KeyType {
    /// The TYPE command's name for this tag.
    pub const fn as_str(self) -> &'static str {
        match self {
            KeyType::String => "string",
            KeyType::List => "list",
            KeyType::Hash => "hash",
            KeyType::Set => "set",
            KeyType::ZSet => "zset",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A binary-safe string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringValue {
    pub data: Bytes,
    expiration: Expiration,
}

impl StringValue {
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            expiration: Expiration::persistent(),
        }
    }
}

/// An ordered list. `VecDeque` gives O(1) push/pop at both ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListValue {
    pub items: VecDeque<Bytes>,
    expiration: Expiration,
}

/// A field → value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashValue {
    pub fields: HashMap<Bytes, Bytes>,
    expiration: Expiration,
}

/// An unordered set of unique members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetValue {
    pub members: HashSet<Bytes>,
    expiration: Expiration,
}

/// A sorted set of unique members ordered by (score, member).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedSetValue {
    pub members: SortedSet,
    expiration: Expiration,
}

macro_rules! impl_expirable {
    ($($kind:ty),+ $(,)?) => {
        $(
            impl Expirable for $kind {
                fn expiration(&self) -> &Expiration {
                    &self.expiration
                }

                fn expiration_mut(&mut self) -> &mut Expiration {
                    &mut self.expiration
                }
            }
        )+
    };
}

impl_expirable!(StringValue, ListValue, HashValue, SetValue, SortedSetValue);

/// A value of any kind, tagged by its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(StringValue),
    List(ListValue),
    Hash(HashValue),
    Set(SetValue),
    ZSet(SortedSetValue),
}

impl Value {
    /// The type tag for this value.
    pub fn key_type(&self) -> KeyType {
        match self {
            Value::String(_) => KeyType::String,
            Value::List(_) => KeyType::List,
            Value::Hash(_) => KeyType::Hash,
            Value::Set(_) => KeyType::Set,
            Value::ZSet(_) => KeyType::ZSet,
        }
    }

    /// The value's TTL carrier, whatever its kind.
    pub fn as_expirable(&self) -> &dyn Expirable {
        match self {
            Value::String(v) => v,
            Value::List(v) => v,
            Value::Hash(v) => v,
            Value::Set(v) => v,
            Value::ZSet(v) => v,
        }
    }
}

/// Sorted set payload.
///
/// `ordered` keeps `(score, member)` pairs in rank order; `scores` gives
/// O(1) member → score lookups. Both always hold the same members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedSet {
    ordered: BTreeSet<(OrderedFloat<f64>, Bytes)>,
    scores: HashMap<Bytes, OrderedFloat<f64>>,
}

impl SortedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member or updates its score. Returns true if it was new.
    pub fn insert(&mut self, member: Bytes, score: f64) -> bool {
        let score = OrderedFloat(score);
        match self.scores.insert(member.clone(), score) {
            Some(old) => {
                if old != score {
                    self.ordered.remove(&(old, member.clone()));
                    self.ordered.insert((score, member));
                }
                false
            }
            None => {
                self.ordered.insert((score, member));
                true
            }
        }
    }

    /// Removes a member. Returns true if it was present.
    pub fn remove(&mut self, member: &[u8]) -> bool {
        match self.scores.remove_entry(member) {
            Some((name, score)) => {
                self.ordered.remove(&(score, name));
                true
            }
            None => false,
        }
    }

    pub fn score(&self, member: &[u8]) -> Option<f64> {
        self.scores.get(member).map(|s| s.0)
    }

    /// 0-based position of a member, lowest score first.
    pub fn rank(&self, member: &[u8]) -> Option<usize> {
        let score = *self.scores.get(member)?;
        self.ordered
            .iter()
            .position(|(s, m)| *s == score && m.as_ref() == member)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Members in rank order with their scores.
    pub fn iter(&self) -> impl Iterator<Item = (&Bytes, f64)> {
        self.ordered.iter().map(|(s, m)| (m, s.0))
    }

    /// Members between two ranks, inclusive; negative ranks count from the end.
    pub fn range(&self, start: i64, stop: i64) -> Vec<(Bytes, f64)> {
        match normalize_range(start, stop, self.len()) {
            Some((from, to)) => self
                .iter()
                .skip(from)
                .take(to - from + 1)
                .map(|(m, s)| (m.clone(), s))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Converts a Redis-style inclusive `start..=stop` range (negative indices
/// count from the end) into clamped `usize` bounds. Returns `None` when the
/// range selects nothing.
pub(crate) fn normalize_range(start: i64, stop: i64, len: usize) -> Option<(usize, usize)> {
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    if len == 0 {
        return None;
    }

    let start = (if start < 0 { len + start } else { start }).max(0);
    let stop = (if stop < 0 { len + stop } else { stop }).min(len - 1);

    if start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(KeyType::String.as_str(), "string");
        assert_eq!(KeyType::List.to_string(), "list");
        assert_eq!(KeyType::Hash.as_str(), "hash");
        assert_eq!(KeyType::Set.as_str(), "set");
        assert_eq!(KeyType::ZSet.as_str(), "zset");
    }

    #[test]
    fn test_value_tags_and_carrier() {
        let mut string = StringValue::new(Bytes::from("v"));
        string.set_ttl(60_000);
        let value = Value::String(string);
        assert_eq!(value.key_type(), KeyType::String);
        assert!(value.as_expirable().has_ttl());

        let value = Value::ZSet(SortedSetValue::default());
        assert_eq!(value.key_type(), KeyType::ZSet);
        assert!(!value.as_expirable().has_ttl());
    }

    #[test]
    fn test_payload_mutation_keeps_ttl() {
        let mut hash = HashValue::default();
        hash.set_ttl(60_000);
        hash.fields.insert(Bytes::from("f"), Bytes::from("v"));
        hash.fields.clear();
        assert!(hash.has_ttl());
    }

    #[test]
    fn test_sorted_set_ordering() {
        let mut zset = SortedSet::new();
        assert!(zset.insert(Bytes::from("b"), 2.0));
        assert!(zset.insert(Bytes::from("a"), 2.0));
        assert!(zset.insert(Bytes::from("c"), 1.0));

        let order: Vec<_> = zset.iter().map(|(m, _)| m.clone()).collect();
        assert_eq!(
            order,
            vec![Bytes::from("c"), Bytes::from("a"), Bytes::from("b")]
        );
        assert_eq!(zset.rank(b"a"), Some(1));
        assert_eq!(zset.rank(b"zzz"), None);
    }

    #[test]
    fn test_sorted_set_update_and_remove() {
        let mut zset = SortedSet::new();
        zset.insert(Bytes::from("m"), 1.0);
        assert!(!zset.insert(Bytes::from("m"), 5.0));
        assert_eq!(zset.score(b"m"), Some(5.0));
        assert_eq!(zset.len(), 1);
        assert_eq!(zset.iter().count(), 1);

        assert!(zset.remove(b"m"));
        assert!(!zset.remove(b"m"));
        assert!(zset.is_empty());
        assert_eq!(zset.iter().count(), 0);
    }

    #[test]
    fn test_sorted_set_range() {
        let mut zset = SortedSet::new();
        for (i, m) in ["a", "b", "c", "d"].iter().enumerate() {
            zset.insert(Bytes::from(*m), i as f64);
        }
        let names = |r: Vec<(Bytes, f64)>| r.into_iter().map(|(m, _)| m).collect::<Vec<_>>();

        assert_eq!(
            names(zset.range(1, 2)),
            vec![Bytes::from("b"), Bytes::from("c")]
        );
        assert_eq!(
            names(zset.range(-2, -1)),
            vec![Bytes::from("c"), Bytes::from("d")]
        );
        assert_eq!(zset.range(0, 100).len(), 4);
        assert!(zset.range(3, 1).is_empty());
    }

    #[test]
    fn test_normalize_range() {
        assert_eq!(normalize_range(0, -1, 5), Some((0, 4)));
        assert_eq!(normalize_range(-3, -1, 5), Some((2, 4)));
        assert_eq!(normalize_range(-100, 1, 5), Some((0, 1)));
        assert_eq!(normalize_range(2, 100, 5), Some((2, 4)));
        assert_eq!(normalize_range(5, 10, 5), None);
        assert_eq!(normalize_range(3, 1, 5), None);
        assert_eq!(normalize_range(0, -1, 0), None);
    }
}
