use chrono::{DateTime, Utc};
use log::debug;

use crate::errors::CommitteeResult;
use crate::store::{CacheStore, KvStore};
use crate::types::{Event, EventManager};

/// Height and time of the block being processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub height: u64,
    pub time: DateTime<Utc>,
}

impl BlockHeader {
    pub fn new(height: u64, time: DateTime<Utc>) -> Self {
        Self { height, time }
    }
}

/// Everything one state transition reads and writes: the store, the
/// current block header, and the events emitted so far.
pub struct Context<'a> {
    store: &'a mut dyn KvStore,
    header: BlockHeader,
    events: EventManager,
}

impl<'a> Context<'a> {
    pub fn new(store: &'a mut dyn KvStore, header: BlockHeader) -> Self {
        Self {
            store,
            header,
            events: EventManager::new(),
        }
    }

    pub fn store(&self) -> &dyn KvStore {
        &*self.store
    }

    pub fn store_mut(&mut self) -> &mut dyn KvStore {
        &mut *self.store
    }

    pub fn header(&self) -> BlockHeader {
        self.header
    }

    pub fn block_time(&self) -> DateTime<Utc> {
        self.header.time
    }

    pub fn block_height(&self) -> u64 {
        self.header.height
    }

    pub fn emit(&mut self, event: Event) {
        self.events.emit(event);
    }

    pub fn events(&self) -> &EventManager {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events.into_events()
    }

    /// Run `f` against a cached view of the store.
    ///
    /// Writes and events made by `f` are committed only when it returns `Ok`.
    pub fn with_cache<T, F>(&mut self, f: F) -> CommitteeResult<T>
    where
        F: FnOnce(&mut Context<'_>) -> CommitteeResult<T>,
    {
        let header = self.header;
        let mut cache = CacheStore::new(&mut *self.store);
        let (result, events) = {
            let mut cached = Context::new(&mut cache, header);
            let result = f(&mut cached);
            (result, cached.into_events())
        };

        match result {
            Ok(value) => {
                cache.write()?;
                self.events.extend(events);
                Ok(value)
            }
            Err(err) => {
                debug!(
                    "Discarding {} cached writes after error: {}",
                    cache.pending_writes(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Run `f` against a cached view of the store and discard everything it did
    pub fn dry_run<T, F>(&mut self, f: F) -> CommitteeResult<T>
    where
        F: FnOnce(&mut Context<'_>) -> CommitteeResult<T>,
    {
        let header = self.header;
        let mut cache = CacheStore::new(&mut *self.store);
        let mut cached = Context::new(&mut cache, header);
        f(&mut cached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CommitteeError;
    use crate::store::MemStore;
    use crate::tests::common::test_header;

    #[test]
    fn test_with_cache_commits_on_success() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(&mut store, test_header());

        let value = ctx
            .with_cache(|cached| {
                cached.store_mut().set(b"key", b"value".to_vec())?;
                cached.emit(Event::new("inner"));
                Ok(7)
            })
            .unwrap();

        assert_eq!(value, 7);
        assert_eq!(ctx.events().events().len(), 1);
        assert_eq!(ctx.store().get(b"key").unwrap(), Some(b"value".to_vec()));
    }

    #[test]
    fn test_with_cache_discards_on_error() {
        let mut store = MemStore::new();
        store.set(b"key", b"original".to_vec()).unwrap();
        let mut ctx = Context::new(&mut store, test_header());

        let result: CommitteeResult<()> = ctx.with_cache(|cached| {
            cached.store_mut().set(b"key", b"changed".to_vec())?;
            cached.store_mut().set(b"other", b"x".to_vec())?;
            cached.emit(Event::new("inner"));
            Err(CommitteeError::InvalidPubProposal("boom".to_string()))
        });

        assert!(result.is_err());
        assert!(ctx.events().events().is_empty());
        assert_eq!(ctx.store().get(b"key").unwrap(), Some(b"original".to_vec()));
        assert_eq!(ctx.store().get(b"other").unwrap(), None);
    }

    #[test]
    fn test_dry_run_never_writes() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(&mut store, test_header());

        ctx.dry_run(|cached| {
            cached.store_mut().set(b"key", b"value".to_vec())?;
            assert!(cached.store().has(b"key")?);
            Ok(())
        })
        .unwrap();

        assert_eq!(ctx.store().get(b"key").unwrap(), None);
        drop(ctx);
        assert!(store.is_empty());
    }
}
