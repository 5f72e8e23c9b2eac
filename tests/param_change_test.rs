mod common;

use std::sync::Arc;

use chrono::Duration as ChronoDuration;
use committee_core::{
    AllowedParamsChange, Committee, CommitteeError, Context, MemoryBank, ParamChange,
    ParamsChangePermission, Permission, ProposalOutcome, PubProposal, TallyOption, VoteType,
};
use serde_json::{json, Value};

use common::{addresses, address, dec, header_at, one_hour, TestChain, CDP_SUBSPACE, DEBT_PARAM_KEY};

fn debt_committee() -> Committee {
    Committee::new_member(
        1,
        "debt floor committee",
        addresses(3),
        vec![Permission::ParameterChange(ParamsChangePermission::new(vec![
            AllowedParamsChange::single(CDP_SUBSPACE, DEBT_PARAM_KEY, &["debt_floor"]),
        ]))],
        dec("0.5"),
        one_hour(),
        TallyOption::Deadline,
    )
}

fn debt_change(record: Value) -> PubProposal {
    PubProposal::parameter_change(
        "Debt floor",
        "Change the debt floor.",
        vec![ParamChange::new(CDP_SUBSPACE, DEBT_PARAM_KEY, record.to_string())],
    )
}

fn live_debt_param(chain: &TestChain) -> Value {
    let raw = chain
        .keeper
        .querier(chain.store.as_ref())
        .raw_params(CDP_SUBSPACE, DEBT_PARAM_KEY)
        .unwrap();
    serde_json::from_slice(&raw).unwrap()
}

fn record_with(debt_floor: &str, reference_asset: &str) -> Value {
    json!({
        "denom": "usdx",
        "reference_asset": reference_asset,
        "conversion_factor": "6",
        "debt_floor": debt_floor,
    })
}

#[test]
fn test_whitelisted_change_is_enacted() {
    let mut chain = TestChain::new(vec![debt_committee()], Arc::new(MemoryBank::new()));
    let keeper = &chain.keeper;
    {
        let mut ctx = Context::new(chain.store.as_mut(), header_at(1, ChronoDuration::zero()));
        let id = keeper
            .submit_proposal(&mut ctx, &address(1), 1, debt_change(record_with("5000", "usd")))
            .unwrap();
        keeper.add_vote(&mut ctx, id, &address(2), VoteType::Yes).unwrap();
    }

    let mut ctx = Context::new(chain.store.as_mut(), header_at(2, ChronoDuration::hours(1)));
    let records = keeper.process_proposals(&mut ctx).unwrap();
    assert!(records[0].enacted);
    drop(ctx);

    assert_eq!(live_debt_param(&chain), record_with("5000", "usd"));
}

#[test]
fn test_non_whitelisted_change_is_rejected_at_submission() {
    let mut chain = TestChain::new(vec![debt_committee()], Arc::new(MemoryBank::new()));
    let keeper = &chain.keeper;
    let mut ctx = Context::new(chain.store.as_mut(), header_at(1, ChronoDuration::zero()));

    let err = keeper
        .submit_proposal(&mut ctx, &address(1), 1, debt_change(record_with("5000", "eur")))
        .unwrap_err();
    assert!(matches!(err, CommitteeError::Unauthorized(_)));
}

#[test]
fn test_failed_enactment_leaves_state_untouched() {
    let mut chain = TestChain::new(vec![debt_committee()], Arc::new(MemoryBank::new()));
    let keeper = &chain.keeper;
    {
        let mut ctx = Context::new(chain.store.as_mut(), header_at(1, ChronoDuration::zero()));
        let id = keeper
            .submit_proposal(&mut ctx, &address(1), 1, debt_change(record_with("5000", "usd")))
            .unwrap();
        keeper.add_vote(&mut ctx, id, &address(1), VoteType::Yes).unwrap();

        // live state moves on before the deadline
        let subspace = keeper.param_keeper().get_subspace(CDP_SUBSPACE).unwrap();
        subspace
            .set(ctx.store_mut(), DEBT_PARAM_KEY, &record_with("10000000", "eur"))
            .unwrap();
    }

    let mut ctx = Context::new(chain.store.as_mut(), header_at(2, ChronoDuration::hours(1)));
    let records = keeper.process_proposals(&mut ctx).unwrap();
    assert_eq!(records[0].outcome, ProposalOutcome::Passed);
    assert!(!records[0].enacted);
    assert!(records[0].enact_error.is_some());

    let close = ctx.events().events_of("proposal_close").next().unwrap();
    assert_eq!(close.get("enacted"), Some("false"));
    drop(ctx);

    assert_eq!(live_debt_param(&chain), record_with("10000000", "eur"));
}
