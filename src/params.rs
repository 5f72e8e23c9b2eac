//! Live parameter records, grouped by module subspace.

use std::collections::BTreeSet;

use log::debug;
use serde::Serialize;

use crate::errors::{CommitteeError, CommitteeResult, StoreError};
use crate::store::{keys, KvStore};

/// Registry of the parameter subspaces that exist on this chain
#[derive(Debug, Clone, Default)]
pub struct ParamKeeper {
    subspaces: BTreeSet<String>,
}

impl ParamKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subspace; registering the same name twice is a no-op
    pub fn register(&mut self, name: &str) -> Subspace {
        self.subspaces.insert(name.to_string());
        Subspace::new(name)
    }

    pub fn with_subspaces(names: &[&str]) -> Self {
        let mut keeper = Self::new();
        for name in names {
            keeper.register(name);
        }
        keeper
    }

    pub fn get_subspace(&self, name: &str) -> Option<Subspace> {
        self.subspaces.get(name).map(|n| Subspace::new(n))
    }

    pub fn subspaces(&self) -> impl Iterator<Item = &str> {
        self.subspaces.iter().map(|s| s.as_str())
    }
}

/// Accessor for the records of one subspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subspace {
    name: String,
}

impl Subspace {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_raw(&self, store: &dyn KvStore, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        store.get(&keys::param_key(&self.name, key))
    }

    pub fn has_key(&self, store: &dyn KvStore, key: &str) -> Result<bool, StoreError> {
        store.has(&keys::param_key(&self.name, key))
    }

    /// Replace an existing record with `value`, which must be valid JSON.
    ///
    /// Keys are created with [`Subspace::set`]; updating a key that was never
    /// set is an error.
    pub fn set_raw(&self, store: &mut dyn KvStore, key: &str, value: &[u8]) -> CommitteeResult<()> {
        if !self.has_key(store, key)? {
            return Err(CommitteeError::InvalidPubProposal(format!(
                "parameter {}/{} does not exist",
                self.name, key
            )));
        }
        serde_json::from_slice::<serde_json::Value>(value).map_err(|e| {
            CommitteeError::InvalidPubProposal(format!(
                "value for {}/{} is not valid JSON: {}",
                self.name, key, e
            ))
        })?;

        debug!("Updating parameter {}/{}", self.name, key);
        store.set(&keys::param_key(&self.name, key), value.to_vec())?;
        Ok(())
    }

    /// Create or overwrite a record from a typed value
    pub fn set<T: Serialize>(&self, store: &mut dyn KvStore, key: &str, value: &T) -> CommitteeResult<()> {
        let raw = serde_json::to_vec(value)?;
        store.set(&keys::param_key(&self.name, key), raw)?;
        Ok(())
    }
}
