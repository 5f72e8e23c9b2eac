use crate::errors::{CommitteeError, CommitteeResult};
use crate::handlers::UpgradeHandler;
use crate::keeper::{store, Keeper};
use crate::store::KvStore;
use crate::tally::ProposalPollingStatus;
use crate::types::{Address, Committee, Plan, Proposal, Vote};

/// Read accessors for presentation layers. Nothing here writes.
pub struct Querier<'k> {
    keeper: &'k Keeper,
    store: &'k dyn KvStore,
}

impl<'k> Querier<'k> {
    pub fn new(keeper: &'k Keeper, store: &'k dyn KvStore) -> Self {
        Self { keeper, store }
    }

    pub fn committees(&self) -> CommitteeResult<Vec<Committee>> {
        store::get_committees(self.store)
    }

    pub fn committee(&self, committee_id: u64) -> CommitteeResult<Committee> {
        store::get_committee(self.store, committee_id)?
            .ok_or(CommitteeError::UnknownCommittee(committee_id))
    }

    /// Open proposals of one committee
    pub fn proposals(&self, committee_id: u64) -> CommitteeResult<Vec<Proposal>> {
        self.committee(committee_id)?;
        store::get_proposals_by_committee(self.store, committee_id)
    }

    pub fn proposal(&self, proposal_id: u64) -> CommitteeResult<Proposal> {
        store::get_proposal(self.store, proposal_id)?
            .ok_or(CommitteeError::UnknownProposal(proposal_id))
    }

    pub fn next_proposal_id(&self) -> CommitteeResult<u64> {
        store::get_next_proposal_id(self.store)
    }

    pub fn votes(&self, proposal_id: u64) -> CommitteeResult<Vec<Vote>> {
        self.proposal(proposal_id)?;
        store::get_votes_by_proposal(self.store, proposal_id)
    }

    pub fn vote(&self, proposal_id: u64, voter: &Address) -> CommitteeResult<Vote> {
        store::get_vote(self.store, proposal_id, voter)?.ok_or_else(|| CommitteeError::UnknownVote {
            proposal_id,
            voter: voter.clone(),
        })
    }

    /// Tally a proposal as it stands now without closing it
    pub fn tally(&self, proposal_id: u64) -> CommitteeResult<ProposalPollingStatus> {
        let proposal = self.proposal(proposal_id)?;
        let committee = self.committee(proposal.committee_id)?;
        self.keeper
            .get_proposal_tally_status(self.store, &committee, proposal_id)
    }

    /// Live JSON record of a parameter
    pub fn raw_params(&self, subspace: &str, key: &str) -> CommitteeResult<Vec<u8>> {
        let ss = self.keeper.param_keeper().get_subspace(subspace).ok_or_else(|| {
            CommitteeError::InvalidPubProposal(format!("subspace {} does not exist", subspace))
        })?;
        ss.get_raw(self.store, key)?.ok_or_else(|| {
            CommitteeError::InvalidPubProposal(format!("parameter {}/{} is not set", subspace, key))
        })
    }

    pub fn upgrade_plan(&self) -> CommitteeResult<Option<Plan>> {
        UpgradeHandler::scheduled_plan(self.store)
    }
}
