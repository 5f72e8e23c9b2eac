use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use crate::context::BlockHeader;
use crate::params::ParamKeeper;
use crate::store::KvStore;
use crate::types::{Address, Committee, Dec, ParamChange, Permission, PubProposal, TallyOption};

pub const CDP_SUBSPACE: &str = "cdp";
pub const DEBT_PARAM_KEY: &str = "DebtParam";
pub const COLLATERAL_PARAMS_KEY: &str = "CollateralParams";

pub const DEBT_PARAM: &str = r#"{"denom":"usdx","reference_asset":"usd","conversion_factor":"6","debt_floor":"10000000"}"#;

pub const COLLATERAL_PARAMS: &str = r#"[
    {"denom":"bnb","type":"bnb-a","liquidation_ratio":"2.0","debt_limit":"1000","stability_fee":"1.01"},
    {"denom":"btc","type":"btc-a","liquidation_ratio":"1.5","debt_limit":"500","stability_fee":"1.02"}
]"#;

pub fn test_address(n: u8) -> Address {
    Address::derive(format!("member-{}", n).as_bytes())
}

pub fn test_addresses(count: u8) -> Vec<Address> {
    (1..=count).map(test_address).collect()
}

pub fn test_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
}

pub fn test_header() -> BlockHeader {
    BlockHeader::new(10, test_time())
}

pub fn dec(s: &str) -> Dec {
    s.parse().unwrap()
}

pub fn member_committee(
    id: u64,
    members: Vec<Address>,
    threshold: &str,
    tally_option: TallyOption,
    permissions: Vec<Permission>,
) -> Committee {
    Committee::new_member(
        id,
        "test committee",
        members,
        permissions,
        dec(threshold),
        Duration::from_secs(7 * 24 * 60 * 60),
        tally_option,
    )
}

pub fn text_proposal() -> PubProposal {
    PubProposal::text("A Title", "A description of this proposal.")
}

pub fn param_change_proposal(changes: Vec<ParamChange>) -> PubProposal {
    PubProposal::parameter_change("Params", "Adjust parameters.", changes)
}

/// Register the cdp subspace and seed its records
pub fn setup_params(store: &mut dyn KvStore) -> Arc<ParamKeeper> {
    let mut params = ParamKeeper::new();
    let cdp = params.register(CDP_SUBSPACE);
    let debt: serde_json::Value = serde_json::from_str(DEBT_PARAM).unwrap();
    let collateral: serde_json::Value = serde_json::from_str(COLLATERAL_PARAMS).unwrap();
    cdp.set(store, DEBT_PARAM_KEY, &debt).unwrap();
    cdp.set(store, COLLATERAL_PARAMS_KEY, &collateral).unwrap();
    Arc::new(params)
}
