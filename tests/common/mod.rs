#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use committee_core::{
    Address, BankKeeper, BlockHeader, Committee, Dec, GenesisState, Keeper, KvStore,
    MemStore, ParamKeeper, Permission, ProtocolLimits, PubProposal, TallyOption,
};

pub const CDP_SUBSPACE: &str = "cdp";
pub const DEBT_PARAM_KEY: &str = "DebtParam";
pub const DEBT_PARAM: &str =
    r#"{"denom":"usdx","reference_asset":"usd","conversion_factor":"6","debt_floor":"10000000"}"#;

pub fn address(n: u8) -> Address {
    Address::derive(format!("account-{}", n).as_bytes())
}

pub fn addresses(count: u8) -> Vec<Address> {
    (1..=count).map(address).collect()
}

pub fn genesis_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap()
}

pub fn header_at(height: u64, offset: ChronoDuration) -> BlockHeader {
    BlockHeader::new(height, genesis_time() + offset)
}

pub fn dec(s: &str) -> Dec {
    s.parse().unwrap()
}

pub fn one_hour() -> Duration {
    Duration::from_secs(3600)
}

pub fn member_committee(id: u64, members: u8, threshold: &str, tally: TallyOption) -> Committee {
    Committee::new_member(
        id,
        "member committee",
        addresses(members),
        vec![Permission::Unconditional],
        dec(threshold),
        one_hour(),
        tally,
    )
}

pub fn text(title: &str) -> PubProposal {
    PubProposal::text(title, "Integration test proposal.")
}

/// A chain with the cdp subspace seeded and `committees` installed at genesis
pub struct TestChain {
    pub store: Box<dyn KvStore>,
    pub keeper: Keeper,
}

impl TestChain {
    pub fn new(committees: Vec<Committee>, bank: Arc<dyn BankKeeper>) -> Self {
        Self::with_store(Box::new(MemStore::new()), committees, bank)
    }

    pub fn with_store(
        mut store: Box<dyn KvStore>,
        committees: Vec<Committee>,
        bank: Arc<dyn BankKeeper>,
    ) -> Self {
        let mut params = ParamKeeper::new();
        let cdp = params.register(CDP_SUBSPACE);
        let debt: serde_json::Value = serde_json::from_str(DEBT_PARAM).unwrap();
        cdp.set(store.as_mut(), DEBT_PARAM_KEY, &debt).unwrap();

        let keeper =
            Keeper::with_default_routes(Arc::new(params), bank, ProtocolLimits::default());
        let genesis = GenesisState::new(1, committees, vec![], vec![]);
        keeper.init_genesis(store.as_mut(), &genesis).unwrap();

        Self { store, keeper }
    }
}
