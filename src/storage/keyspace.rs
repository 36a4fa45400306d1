//! The keyspace registry.
//!
//! One map per value kind plus a name → type index. The index is the
//! existence authority: a name is live iff it has an index entry, and
//! every index entry has exactly one value in the store of its type.
//!
//! The registry offers three primitives:
//!
//! - [`Keyspace::locate`] consults the index and lazily reaps the key
//!   if its value has expired
//! - [`Keyspace::install`] binds a name to a value, replacing any prior
//!   binding in every store
//! - [`Keyspace::remove`] unbinds a name from its store and the index
//!
//! Typed access goes through [`Keyspace::lookup`] and friends, which
//! always `locate` first, so stores are only read after the reaper has
//! had its say.
//!
//! The registry does no locking of its own; [`StorageEngine`] wraps it in
//! a single mutex.
//!
//! [`StorageEngine`]: super::StorageEngine

use std::collections::HashMap;

use bytes::Bytes;
use tracing::debug;

use super::expiry::Expirable;
use super::glob::GlobPattern;
use super::types::{
    HashValue, KeyType, ListValue, SetValue, SortedSetValue, StringValue, Value,
};
use crate::error::{Error, Result};

/// Links a value kind to its typed store.
pub trait Stored: Expirable + Default + Sized {
    const TYPE: KeyType;

    fn store(keyspace: &Keyspace) -> &HashMap<Bytes, Self>;

    fn store_mut(keyspace: &mut Keyspace) -> &mut HashMap<Bytes, Self>;
}

macro_rules! impl_stored {
    ($($kind:ty => $tag:ident, $field:ident;)+) => {
        $(
            impl Stored for $kind {
                const TYPE: KeyType = KeyType::$tag;

                fn store(keyspace: &Keyspace) -> &HashMap<Bytes, Self> {
                    &keyspace.$field
                }

                fn store_mut(keyspace: &mut Keyspace) -> &mut HashMap<Bytes, Self> {
                    &mut keyspace.$field
                }
            }
        )+
    };
}

impl_stored! {
    StringValue => String, strings;
    ListValue => List, lists;
    HashValue => Hash, hashes;
    SetValue => Set, sets;
    SortedSetValue => ZSet, zsets;
}

/// Name → type index plus one store per value kind.
#[derive(Debug, Default)]
pub struct Keyspace {
    index: HashMap<Bytes, KeyType>,
    strings: HashMap<Bytes, StringValue>,
    lists: HashMap<Bytes, ListValue>,
    hashes: HashMap<Bytes, HashValue>,
    sets: HashMap<Bytes, SetValue>,
    zsets: HashMap<Bytes, SortedSetValue>,
    /// Keys removed by the lazy reaper since creation.
    reaped: u64,
}

impl Keyspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a name to its type, reaping it first if it has expired.
    pub fn locate(&mut self, name: &[u8]) -> Option<KeyType> {
        let key_type = *self.index.get(name)?;

        let expired = self
            .expirable(name, key_type)
            .map_or(true, |value| value.is_expired());

        if expired {
            self.remove(name, key_type);
            self.reaped += 1;
            debug!(
                key = %String::from_utf8_lossy(name),
                key_type = %key_type,
                "Reaped expired key"
            );
            return None;
        }

        Some(key_type)
    }

    /// Binds `name` to `value`, dropping whatever it was bound to before.
    pub fn install(&mut self, name: Bytes, value: Value) {
        match value {
            Value::String(v) => self.insert(name, v),
            Value::List(v) => self.insert(name, v),
            Value::Hash(v) => self.insert(name, v),
            Value::Set(v) => self.insert(name, v),
            Value::ZSet(v) => self.insert(name, v),
        }
    }

    fn insert<T: Stored>(&mut self, name: Bytes, value: T) {
        if let Some(previous) = self.index.insert(name.clone(), T::TYPE) {
            if previous != T::TYPE {
                self.detach(&name, previous);
            }
        }
        T::store_mut(self).insert(name, value);
    }

    /// Unbinds `name` from the store of `key_type` and from the index.
    pub fn remove(&mut self, name: &[u8], key_type: KeyType) -> Option<Value> {
        self.index.remove(name);
        self.detach(name, key_type)
    }

    fn detach(&mut self, name: &[u8], key_type: KeyType) -> Option<Value> {
        match key_type {
            KeyType::String => self.strings.remove(name).map(Value::String),
            KeyType::List => self.lists.remove(name).map(Value::List),
            KeyType::Hash => self.hashes.remove(name).map(Value::Hash),
            KeyType::Set => self.sets.remove(name).map(Value::Set),
            KeyType::ZSet => self.zsets.remove(name).map(Value::ZSet),
        }
    }

    fn expirable(&self, name: &[u8], key_type: KeyType) -> Option<&dyn Expirable> {
        match key_type {
            KeyType::String => self.strings.get(name).map(|v| v as &dyn Expirable),
            KeyType::List => self.lists.get(name).map(|v| v as &dyn Expirable),
            KeyType::Hash => self.hashes.get(name).map(|v| v as &dyn Expirable),
            KeyType::Set => self.sets.get(name).map(|v| v as &dyn Expirable),
            KeyType::ZSet => self.zsets.get(name).map(|v| v as &dyn Expirable),
        }
    }

    fn expirable_mut(&mut self, name: &[u8], key_type: KeyType) -> Option<&mut dyn Expirable> {
        match key_type {
            KeyType::String => self.strings.get_mut(name).map(|v| v as &mut dyn Expirable),
            KeyType::List => self.lists.get_mut(name).map(|v| v as &mut dyn Expirable),
            KeyType::Hash => self.hashes.get_mut(name).map(|v| v as &mut dyn Expirable),
            KeyType::Set => self.sets.get_mut(name).map(|v| v as &mut dyn Expirable),
            KeyType::ZSet => self.zsets.get_mut(name).map(|v| v as &mut dyn Expirable),
        }
    }

    /// The TTL carrier of a live key of any type.
    ///
    /// Returns `Err(MissingKey)` if the key is absent or was just reaped.
    pub fn ttl_carrier(&mut self, name: &[u8]) -> Result<&mut dyn Expirable> {
        let key_type = self.locate(name).ok_or(Error::MissingKey)?;
        self.expirable_mut(name, key_type).ok_or(Error::MissingKey)
    }

    /// A live value of kind `T`.
    ///
    /// `Ok(None)` if the key is absent, `Err(WrongType)` if it holds another kind.
    pub fn lookup<T: Stored>(&mut self, name: &[u8]) -> Result<Option<&T>> {
        match self.locate(name) {
            None => Ok(None),
            Some(key_type) if key_type == T::TYPE => Ok(T::store(self).get(name)),
            Some(_) => Err(Error::WrongType),
        }
    }

    /// Mutable variant of [`Keyspace::lookup`].
    pub fn lookup_mut<T: Stored>(&mut self, name: &[u8]) -> Result<Option<&mut T>> {
        match self.locate(name) {
            None => Ok(None),
            Some(key_type) if key_type == T::TYPE => Ok(T::store_mut(self).get_mut(name)),
            Some(_) => Err(Error::WrongType),
        }
    }

    /// A live value of kind `T`, created empty and persistent if absent.
    pub fn lookup_or_create<T: Stored>(&mut self, name: &Bytes) -> Result<&mut T> {
        match self.locate(name) {
            Some(key_type) if key_type != T::TYPE => return Err(Error::WrongType),
            Some(_) => {}
            None => self.insert(name.clone(), T::default()),
        }
        T::store_mut(self).get_mut(name).ok_or(Error::MissingKey)
    }

    /// Snapshot of indexed names matching `pattern`.
    ///
    /// Does not reap: the index is only read here. Names of expired keys
    /// that have not been touched yet are included.
    pub fn matching_names(&self, pattern: &GlobPattern) -> Vec<Bytes> {
        self.index
            .keys()
            .filter(|name| pattern.matches(name))
            .cloned()
            .collect()
    }

    /// Number of indexed keys, including expired keys not yet reaped.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of indexed keys that carry a TTL.
    pub fn keys_with_expiry(&self) -> usize {
        self.index
            .iter()
            .filter(|(name, key_type)| {
                self.expirable(name, **key_type)
                    .is_some_and(|value| value.has_ttl())
            })
            .count()
    }

    /// Total keys removed by the lazy reaper.
    pub fn reaped(&self) -> u64 {
        self.reaped
    }

    /// Drops every key.
    pub fn clear(&mut self) {
        self.index.clear();
        self.strings.clear();
        self.lists.clear();
        self.hashes.clear();
        self.sets.clear();
        self.zsets.clear();
    }

    /// Panics unless the index and the stores agree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let stored = self.strings.len()
            + self.lists.len()
            + self.hashes.len()
            + self.sets.len()
            + self.zsets.len();
        assert_eq!(stored, self.index.len(), "store sizes disagree with index");
        for (name, key_type) in &self.index {
            assert!(
                self.expirable(name, *key_type).is_some(),
                "{name:?} indexed as {key_type} but missing from its store"
            );
        }
    }
}
