use log::trace;

use crate::errors::CommitteeResult;
use crate::keeper::{store, Keeper};
use crate::store::KvStore;
use crate::tally::{tally_votes, ProposalPollingStatus, TokenBalances};
use crate::types::{Committee, Vote};

impl Keeper {
    /// Balances of every voter in the committee's tally denom. Empty for member committees.
    pub fn token_balances(&self, committee: &Committee, votes: &[Vote]) -> TokenBalances {
        match committee {
            Committee::Member(_) => TokenBalances::default(),
            Committee::Token(c) => {
                let mut balances = TokenBalances::new(self.bank().total_supply(&c.tally_denom));
                for vote in votes {
                    let amount = self.bank().balance(&vote.voter, &c.tally_denom);
                    balances.balances.insert(vote.voter.clone(), amount);
                }
                balances
            }
        }
    }

    pub fn get_proposal_tally_status(
        &self,
        store: &dyn KvStore,
        committee: &Committee,
        proposal_id: u64,
    ) -> CommitteeResult<ProposalPollingStatus> {
        let votes = store::get_votes_by_proposal(store, proposal_id)?;
        let balances = self.token_balances(committee, &votes);
        let status = tally_votes(committee, proposal_id, &votes, &balances);
        trace!("Tally for proposal {}: {}", proposal_id, status);
        Ok(status)
    }

    pub fn get_proposal_result(
        &self,
        store: &dyn KvStore,
        committee: &Committee,
        proposal_id: u64,
    ) -> CommitteeResult<bool> {
        Ok(self
            .get_proposal_tally_status(store, committee, proposal_id)?
            .passes())
    }
}
