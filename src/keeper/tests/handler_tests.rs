use std::sync::Arc;

use chrono::Duration as ChronoDuration;

use super::{empty_bank, setup_keeper};
use crate::context::{BlockHeader, Context};
use crate::errors::CommitteeError;
use crate::handlers::{CommitteeHandler, ParamsChangeHandler, TextHandler, UpgradeHandler};
use crate::keeper::store;
use crate::router::{ProposalHandler, Router};
use crate::store::MemStore;
use crate::tests::common::{
    member_committee, param_change_proposal, setup_params, test_address, test_addresses,
    test_header, test_time, text_proposal, CDP_SUBSPACE, DEBT_PARAM_KEY,
};
use crate::types::{ParamChange, Permission, Plan, PubProposal, TallyOption, VoteType};
use crate::ProtocolLimits;

fn upgrade_proposal(height: u64) -> PubProposal {
    PubProposal::software_upgrade(
        "Upgrade",
        "Schedule an upgrade.",
        Plan {
            name: "v2".to_string(),
            height,
            info: String::new(),
        },
    )
}

#[test]
fn test_params_handler_writes_value() {
    let mut store = MemStore::new();
    let params = setup_params(&mut store);
    let handler = ParamsChangeHandler::new(params.clone());
    let mut ctx = Context::new(&mut store, test_header());

    let proposal = param_change_proposal(vec![ParamChange::new(CDP_SUBSPACE, DEBT_PARAM_KEY, r#"{"debt_floor":"1"}"#)]);
    handler.handle(&mut ctx, &proposal).unwrap();

    let raw = params
        .get_subspace(CDP_SUBSPACE)
        .unwrap()
        .get_raw(ctx.store(), DEBT_PARAM_KEY)
        .unwrap()
        .unwrap();
    assert_eq!(raw, br#"{"debt_floor":"1"}"#.to_vec());
}

#[test]
fn test_params_handler_rejects_bad_changes() {
    let mut store = MemStore::new();
    let params = setup_params(&mut store);
    let handler = ParamsChangeHandler::new(params);
    let mut ctx = Context::new(&mut store, test_header());

    let cases = vec![
        ParamChange::new("nosuch", DEBT_PARAM_KEY, "{}"),
        ParamChange::new(CDP_SUBSPACE, "NoSuchKey", "{}"),
        ParamChange::new(CDP_SUBSPACE, DEBT_PARAM_KEY, "not json"),
    ];
    for change in cases {
        let err = handler
            .handle(&mut ctx, &param_change_proposal(vec![change]))
            .unwrap_err();
        assert!(matches!(err, CommitteeError::InvalidPubProposal(_)));
    }

    let err = handler.handle(&mut ctx, &text_proposal()).unwrap_err();
    assert!(matches!(err, CommitteeError::InvalidPubProposal(_)));
}

#[test]
fn test_text_handler_changes_nothing() {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, test_header());

    TextHandler.handle(&mut ctx, &text_proposal()).unwrap();
    drop(ctx);
    assert!(store.is_empty());
}

#[test]
fn test_upgrade_handler_schedules_plan() {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, test_header());

    UpgradeHandler.handle(&mut ctx, &upgrade_proposal(100)).unwrap();
    UpgradeHandler.handle(&mut ctx, &upgrade_proposal(200)).unwrap();

    let plan = UpgradeHandler::scheduled_plan(ctx.store()).unwrap().unwrap();
    assert_eq!(plan.height, 200);
}

#[test]
fn test_upgrade_handler_rejects_past_height() {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, test_header());

    let err = UpgradeHandler
        .handle(&mut ctx, &upgrade_proposal(test_header().height))
        .unwrap_err();
    assert!(matches!(err, CommitteeError::InvalidPubProposal(_)));
    assert_eq!(UpgradeHandler::scheduled_plan(ctx.store()).unwrap(), None);
}

#[test]
fn test_committee_change_drops_open_proposals() {
    let committee = member_committee(1, test_addresses(2), "0.5", TallyOption::Deadline, vec![Permission::TextOnly]);
    let (mut store, keeper) = setup_keeper(vec![committee], empty_bank());
    let mut ctx = Context::new(&mut store, test_header());

    let id = keeper
        .submit_proposal(&mut ctx, &test_address(1), 1, text_proposal())
        .unwrap();
    keeper.add_vote(&mut ctx, id, &test_address(2), VoteType::No).unwrap();

    let replacement = member_committee(1, test_addresses(3), "0.6", TallyOption::Deadline, vec![Permission::TextOnly]);
    let change = PubProposal::CommitteeChange {
        title: "Replace".to_string(),
        description: "Replace committee 1.".to_string(),
        new_committee: replacement.clone(),
    };
    CommitteeHandler::new(ProtocolLimits::default())
        .handle(&mut ctx, &change)
        .unwrap();

    assert_eq!(store::get_committee(ctx.store(), 1).unwrap(), Some(replacement));
    assert!(store::get_proposal(ctx.store(), id).unwrap().is_none());
    assert!(store::get_votes_by_proposal(ctx.store(), id).unwrap().is_empty());
}

#[test]
fn test_committee_delete_removes_committee() {
    let committees = vec![
        member_committee(1, test_addresses(2), "0.5", TallyOption::Deadline, vec![Permission::TextOnly]),
        member_committee(2, test_addresses(2), "0.5", TallyOption::Deadline, vec![Permission::TextOnly]),
    ];
    let (mut store, keeper) = setup_keeper(committees, empty_bank());
    let mut ctx = Context::new(&mut store, test_header());

    let doomed = keeper.submit_proposal(&mut ctx, &test_address(1), 1, text_proposal()).unwrap();
    let kept = keeper.submit_proposal(&mut ctx, &test_address(1), 2, text_proposal()).unwrap();

    let delete = PubProposal::CommitteeDelete {
        title: "Delete".to_string(),
        description: "Delete committee 1.".to_string(),
        committee_id: 1,
    };
    CommitteeHandler::new(ProtocolLimits::default())
        .handle(&mut ctx, &delete)
        .unwrap();

    assert!(store::get_committee(ctx.store(), 1).unwrap().is_none());
    assert!(store::get_proposal(ctx.store(), doomed).unwrap().is_none());
    assert!(store::get_proposal(ctx.store(), kept).unwrap().is_some());
}

#[test]
fn test_committee_change_rejects_invalid_committee() {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, test_header());

    let invalid = member_committee(1, vec![], "0.5", TallyOption::Deadline, vec![]);
    let change = PubProposal::CommitteeChange {
        title: "Replace".to_string(),
        description: "Empty committee.".to_string(),
        new_committee: invalid,
    };
    let err = CommitteeHandler::new(ProtocolLimits::default())
        .handle(&mut ctx, &change)
        .unwrap_err();
    assert!(matches!(err, CommitteeError::InvalidPubProposal(_)));
}

#[test]
fn test_committee_can_delete_itself() {
    let committee = member_committee(1, test_addresses(2), "0.5", TallyOption::FirstPastThePost, vec![Permission::Unconditional]);
    let (mut store, keeper) = setup_keeper(vec![committee], empty_bank());
    let mut ctx = Context::new(&mut store, test_header());

    let delete = PubProposal::CommitteeDelete {
        title: "Dissolve".to_string(),
        description: "Dissolve this committee.".to_string(),
        committee_id: 1,
    };
    let id = keeper.submit_proposal(&mut ctx, &test_address(1), 1, delete).unwrap();
    keeper.add_vote(&mut ctx, id, &test_address(1), VoteType::Yes).unwrap();

    assert!(store::get_committee(ctx.store(), 1).unwrap().is_none());
    assert!(store::get_proposals(ctx.store()).unwrap().is_empty());
}

#[test]
fn test_upgrade_enacted_through_sweep() {
    let committee = member_committee(1, test_addresses(1), "1", TallyOption::Deadline, vec![Permission::UpgradeOnly]);
    let (mut store, keeper) = setup_keeper(vec![committee], empty_bank());
    let mut ctx = Context::new(&mut store, test_header());
    let id = keeper
        .submit_proposal(&mut ctx, &test_address(1), 1, upgrade_proposal(1_000_000))
        .unwrap();
    keeper.add_vote(&mut ctx, id, &test_address(1), VoteType::Yes).unwrap();
    drop(ctx);

    let after = BlockHeader::new(500, test_time() + ChronoDuration::days(7));
    let mut ctx = Context::new(&mut store, after);
    let records = keeper.process_proposals(&mut ctx).unwrap();
    assert!(records[0].enacted);
    assert_eq!(
        keeper.querier(ctx.store()).upgrade_plan().unwrap().map(|p| p.height),
        Some(1_000_000)
    );
}

#[test]
fn test_default_routes() {
    let router = Router::with_default_routes(Arc::new(Default::default()), ProtocolLimits::default());
    let routes: Vec<&str> = router.routes().collect();
    assert_eq!(routes, vec!["committee", "gov", "params", "upgrade"]);
}

#[test]
#[should_panic(expected = "route gov has already been initialized")]
fn test_duplicate_route_panics() {
    let _ = Router::new()
        .add_route("gov", Box::new(TextHandler))
        .add_route("gov", Box::new(TextHandler));
}
