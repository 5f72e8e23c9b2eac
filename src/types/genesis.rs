use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::ProtocolLimits;
use crate::errors::{CommitteeError, CommitteeResult};
use crate::types::{Committee, Proposal, Vote};

/// First proposal id handed out on a fresh chain
pub const DEFAULT_NEXT_PROPOSAL_ID: u64 = 1;

/// Full committee module state, as exported and imported at chain boundaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenesisState {
    pub next_proposal_id: u64,
    #[serde(default)]
    pub committees: Vec<Committee>,
    #[serde(default)]
    pub proposals: Vec<Proposal>,
    #[serde(default)]
    pub votes: Vec<Vote>,
}

impl Default for GenesisState {
    fn default() -> Self {
        Self {
            next_proposal_id: DEFAULT_NEXT_PROPOSAL_ID,
            committees: Vec::new(),
            proposals: Vec::new(),
            votes: Vec::new(),
        }
    }
}

impl GenesisState {
    pub fn new(
        next_proposal_id: u64,
        committees: Vec<Committee>,
        proposals: Vec<Proposal>,
        votes: Vec<Vote>,
    ) -> Self {
        Self {
            next_proposal_id,
            committees,
            proposals,
            votes,
        }
    }

    pub fn validate(&self) -> CommitteeResult<()> {
        self.validate_with(&ProtocolLimits::default())
    }

    /// Check the state is internally consistent
    pub fn validate_with(&self, limits: &ProtocolLimits) -> CommitteeResult<()> {
        let mut committee_ids = HashSet::with_capacity(self.committees.len());
        for committee in &self.committees {
            if !committee_ids.insert(committee.id()) {
                return Err(CommitteeError::InvalidGenesis(format!(
                    "duplicate committee id found, {}",
                    committee.id()
                )));
            }
            committee
                .validate_with(limits)
                .map_err(|e| CommitteeError::InvalidGenesis(e.to_string()))?;
        }

        let mut proposal_ids = HashSet::with_capacity(self.proposals.len());
        for proposal in &self.proposals {
            if !proposal_ids.insert(proposal.id) {
                return Err(CommitteeError::InvalidGenesis(format!(
                    "duplicate proposal id found, {}",
                    proposal.id
                )));
            }
            if proposal.id >= self.next_proposal_id {
                return Err(CommitteeError::InvalidGenesis(format!(
                    "proposal id {} is not less than next proposal id {}",
                    proposal.id, self.next_proposal_id
                )));
            }
            if !committee_ids.contains(&proposal.committee_id) {
                return Err(CommitteeError::InvalidGenesis(format!(
                    "proposal {} references unknown committee {}",
                    proposal.id, proposal.committee_id
                )));
            }
            proposal
                .pub_proposal
                .validate_basic_with(limits)
                .map_err(|e| CommitteeError::InvalidGenesis(e.to_string()))?;
        }

        for vote in &self.votes {
            vote.validate()
                .map_err(|e| CommitteeError::InvalidGenesis(e.to_string()))?;
            if !proposal_ids.contains(&vote.proposal_id) {
                return Err(CommitteeError::InvalidGenesis(format!(
                    "vote references unknown proposal {}",
                    vote.proposal_id
                )));
            }
        }

        Ok(())
    }
}
