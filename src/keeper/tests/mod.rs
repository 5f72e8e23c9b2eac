use std::sync::Arc;

use crate::bank::{BankKeeper, MemoryBank};
use crate::config::ProtocolLimits;
use crate::keeper::Keeper;
use crate::store::MemStore;
use crate::tests::common::setup_params;
use crate::types::{Committee, GenesisState};

// Register test modules
pub mod handler_tests;

/// Store seeded with cdp params and `committees`, plus a keeper using the default routes
pub fn setup_keeper(committees: Vec<Committee>, bank: Arc<dyn BankKeeper>) -> (MemStore, Keeper) {
    let mut store = MemStore::new();
    let params = setup_params(&mut store);
    let keeper = Keeper::with_default_routes(params, bank, ProtocolLimits::default());

    let genesis = GenesisState::new(1, committees, vec![], vec![]);
    keeper.init_genesis(&mut store, &genesis).unwrap();
    (store, keeper)
}

pub fn empty_bank() -> Arc<dyn BankKeeper> {
    Arc::new(MemoryBank::new())
}
