use log::info;

use crate::errors::CommitteeResult;
use crate::keeper::{store, Keeper};
use crate::store::KvStore;
use crate::types::GenesisState;

impl Keeper {
    /// Validate `genesis` and write it into `kv`
    pub fn init_genesis(&self, kv: &mut dyn KvStore, genesis: &GenesisState) -> CommitteeResult<()> {
        genesis.validate_with(self.limits())?;

        store::set_next_proposal_id(kv, genesis.next_proposal_id)?;
        for committee in &genesis.committees {
            store::set_committee(kv, committee)?;
        }
        for proposal in &genesis.proposals {
            store::set_proposal(kv, proposal)?;
        }
        for vote in &genesis.votes {
            store::set_vote(kv, vote)?;
        }

        info!(
            "Initialized committee genesis: {} committees, {} proposals, {} votes",
            genesis.committees.len(),
            genesis.proposals.len(),
            genesis.votes.len()
        );
        Ok(())
    }

    /// Read the full module state back out, every list in ascending key order
    pub fn export_genesis(&self, kv: &dyn KvStore) -> CommitteeResult<GenesisState> {
        Ok(GenesisState::new(
            store::get_next_proposal_id(kv)?,
            store::get_committees(kv)?,
            store::get_proposals(kv)?,
            store::get_votes(kv)?,
        ))
    }
}
