use std::collections::BTreeMap;

use log::trace;

use crate::errors::StoreError;
use crate::store::KvStore;

/// A shadow write-set layered over a parent store.
///
/// Reads see pending writes first. Nothing reaches the parent until
/// [`CacheStore::write`]; dropping the cache discards every pending write.
pub struct CacheStore<'p> {
    parent: &'p mut dyn KvStore,
    /// `None` marks a pending delete
    pending: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'p> CacheStore<'p> {
    pub fn new(parent: &'p mut dyn KvStore) -> Self {
        Self {
            parent,
            pending: BTreeMap::new(),
        }
    }

    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    /// Flush pending writes to the parent in key order
    pub fn write(self) -> Result<(), StoreError> {
        trace!("Flushing {} cached writes", self.pending.len());
        for (key, value) in self.pending {
            match value {
                Some(v) => self.parent.set(&key, v)?,
                None => self.parent.delete(&key)?,
            }
        }
        Ok(())
    }
}

impl KvStore for CacheStore<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        match self.pending.get(key) {
            Some(value) => Ok(value.clone()),
            None => self.parent.get(key),
        }
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        self.pending.insert(key.to_vec(), Some(value));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.pending.insert(key.to_vec(), None);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.scan_prefix(prefix)?.into_iter().collect();

        for (key, value) in self
            .pending
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
        {
            match value {
                Some(v) => {
                    merged.insert(key.clone(), v.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_iter().collect())
    }
}
