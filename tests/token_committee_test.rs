mod common;

use std::sync::Arc;

use chrono::Duration as ChronoDuration;
use committee_core::{
    Committee, Context, MemoryBank, Permission, ProposalOutcome, TallyOption, VoteType,
};

use common::{address, dec, header_at, one_hour, text, TestChain};

const DENOM: &str = "hard";

fn token_committee(tally: TallyOption) -> Committee {
    Committee::new_token(
        1,
        "token holders",
        vec![],
        vec![Permission::TextOnly],
        dec("0.667"),
        one_hour(),
        tally,
        dec("0.4"),
        DENOM,
    )
}

/// Supply of 150 spread over three holders
fn bank() -> Arc<MemoryBank> {
    let bank = MemoryBank::new();
    bank.set_balance(&address(1), DENOM, 10);
    bank.set_balance(&address(2), DENOM, 50);
    bank.set_balance(&address(3), DENOM, 90);
    Arc::new(bank)
}

fn close_after_deadline(votes: &[(u8, VoteType)]) -> ProposalOutcome {
    let mut chain = TestChain::new(vec![token_committee(TallyOption::Deadline)], bank());
    let keeper = &chain.keeper;

    {
        let mut ctx = Context::new(chain.store.as_mut(), header_at(1, ChronoDuration::zero()));
        let id = keeper.submit_proposal(&mut ctx, &address(9), 1, text("token")).unwrap();
        for (voter, vote) in votes {
            keeper.add_vote(&mut ctx, id, &address(*voter), *vote).unwrap();
        }
    }

    let mut ctx = Context::new(chain.store.as_mut(), header_at(2, ChronoDuration::hours(1)));
    let records = keeper.process_proposals(&mut ctx).unwrap();
    assert_eq!(records.len(), 1);
    records[0].outcome
}

#[test]
fn test_quorum_met_and_threshold_met() {
    // 60 of 150 voted, 50 of 60 Yes
    let outcome = close_after_deadline(&[(1, VoteType::No), (2, VoteType::Yes)]);
    assert_eq!(outcome, ProposalOutcome::Passed);
}

#[test]
fn test_quorum_met_threshold_missed() {
    let bank = MemoryBank::new();
    bank.set_balance(&address(1), DENOM, 20);
    bank.set_balance(&address(2), DENOM, 40);
    bank.set_balance(&address(3), DENOM, 90);

    let mut chain = TestChain::new(vec![token_committee(TallyOption::Deadline)], Arc::new(bank));
    let keeper = &chain.keeper;
    {
        let mut ctx = Context::new(chain.store.as_mut(), header_at(1, ChronoDuration::zero()));
        let id = keeper.submit_proposal(&mut ctx, &address(9), 1, text("token")).unwrap();
        keeper.add_vote(&mut ctx, id, &address(1), VoteType::Yes).unwrap();
        keeper.add_vote(&mut ctx, id, &address(2), VoteType::No).unwrap();

        let tally = keeper.querier(ctx.store()).tally(id).unwrap();
        assert_eq!(tally.current_votes, 60);
        assert_eq!(tally.possible_votes, 150);
        assert!(tally.meets_quorum());
        assert!(!tally.meets_threshold());
    }

    let mut ctx = Context::new(chain.store.as_mut(), header_at(2, ChronoDuration::hours(1)));
    let records = keeper.process_proposals(&mut ctx).unwrap();
    assert_eq!(records[0].outcome, ProposalOutcome::Failed);
}

#[test]
fn test_quorum_missed() {
    // 50 of 150 is below the 0.4 quorum even though every vote is Yes
    let outcome = close_after_deadline(&[(2, VoteType::Yes)]);
    assert_eq!(outcome, ProposalOutcome::Failed);
}

#[test]
fn test_abstain_counts_toward_quorum() {
    // 100 of 150 voted; 10 Yes of 100 is short of the threshold
    let outcome = close_after_deadline(&[(1, VoteType::Yes), (3, VoteType::Abstain)]);
    assert_eq!(outcome, ProposalOutcome::Failed);
}

#[test]
fn test_fptp_token_committee_closes_on_vote() {
    let mut chain = TestChain::new(vec![token_committee(TallyOption::FirstPastThePost)], bank());
    let keeper = &chain.keeper;
    let mut ctx = Context::new(chain.store.as_mut(), header_at(1, ChronoDuration::zero()));

    let id = keeper.submit_proposal(&mut ctx, &address(9), 1, text("token")).unwrap();
    keeper.add_vote(&mut ctx, id, &address(3), VoteType::Yes).unwrap();

    assert!(keeper.querier(ctx.store()).proposal(id).unwrap_err().is_not_found());
}

#[test]
fn test_fptp_token_committee_expires() {
    let mut chain = TestChain::new(vec![token_committee(TallyOption::FirstPastThePost)], bank());
    let keeper = &chain.keeper;
    {
        let mut ctx = Context::new(chain.store.as_mut(), header_at(1, ChronoDuration::zero()));
        let id = keeper.submit_proposal(&mut ctx, &address(9), 1, text("token")).unwrap();
        keeper.add_vote(&mut ctx, id, &address(3), VoteType::No).unwrap();
    }

    let mut ctx = Context::new(chain.store.as_mut(), header_at(2, ChronoDuration::hours(3)));
    let records = keeper.process_proposals(&mut ctx).unwrap();
    assert_eq!(records[0].outcome, ProposalOutcome::Expired);
}
