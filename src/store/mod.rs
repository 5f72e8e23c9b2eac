// Key/value persistence used by the committee keeper

pub mod cache;
pub mod keys;
pub mod memory;
#[cfg(feature = "sled-store")]
pub mod sled_store;

pub use cache::CacheStore;
pub use memory::MemStore;
#[cfg(feature = "sled-store")]
pub use sled_store::SledStore;

use crate::errors::StoreError;

/// Ordered byte key/value store.
///
/// `scan_prefix` must return entries in ascending key order so that every
/// sweep over proposals visits them in the same order on every node.
pub trait KvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError>;

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError>;

    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError>;
}
