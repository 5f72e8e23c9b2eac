//! Vote counting.
//!
//! Everything here is a pure function of the committee, the cast votes and
//! (for token committees) the voters' balances. Nothing reads the store.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Address, Committee, Dec, Vote, VoteType};

/// Balances of a token committee's tally denom, as seen at tally time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenBalances {
    pub balances: BTreeMap<Address, u128>,
    pub total_supply: u128,
}

impl TokenBalances {
    pub fn new(total_supply: u128) -> Self {
        Self {
            balances: BTreeMap::new(),
            total_supply,
        }
    }

    pub fn with_balance(mut self, address: Address, amount: u128) -> Self {
        self.balances.insert(address, amount);
        self
    }

    pub fn balance_of(&self, address: &Address) -> u128 {
        self.balances.get(address).copied().unwrap_or(0)
    }
}

/// Snapshot of a proposal's tally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalPollingStatus {
    pub proposal_id: u64,
    pub yes_votes: u128,
    pub no_votes: u128,
    /// Weight of every cast vote, abstentions included
    pub current_votes: u128,
    pub possible_votes: u128,
    pub vote_threshold: Dec,
    /// Only set for token committees
    pub quorum: Option<Dec>,
}

impl ProposalPollingStatus {
    /// Whether the Yes share of cast votes meets the threshold
    pub fn meets_threshold(&self) -> bool {
        self.current_votes > 0 && self.vote_threshold.is_met_by(self.yes_votes, self.current_votes)
    }

    /// Whether enough of the possible vote weight took part
    pub fn meets_quorum(&self) -> bool {
        match self.quorum {
            Some(quorum) => quorum.is_met_by(self.current_votes, self.possible_votes),
            None => true,
        }
    }

    pub fn passes(&self) -> bool {
        self.meets_threshold() && self.meets_quorum()
    }
}

impl fmt::Display for ProposalPollingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "proposal_id={} yes_votes={} no_votes={} current_votes={} possible_votes={} vote_threshold={}",
            self.proposal_id,
            self.yes_votes,
            self.no_votes,
            self.current_votes,
            self.possible_votes,
            self.vote_threshold
        )?;
        if let Some(quorum) = self.quorum {
            write!(f, " quorum={}", quorum)?;
        }
        Ok(())
    }
}

/// Count `votes` for `committee`.
///
/// Member committees weight every vote as 1 and have one possible vote per
/// member. Token committees weight each vote by the voter's balance and have
/// the total supply as possible votes. `balances` is ignored for member
/// committees.
pub fn tally_votes(
    committee: &Committee,
    proposal_id: u64,
    votes: &[Vote],
    balances: &TokenBalances,
) -> ProposalPollingStatus {
    let (possible_votes, quorum) = match committee {
        Committee::Member(c) => (c.base.members.len() as u128, None),
        Committee::Token(c) => (balances.total_supply, Some(c.quorum)),
    };

    let mut yes_votes: u128 = 0;
    let mut no_votes: u128 = 0;
    let mut current_votes: u128 = 0;

    for vote in votes {
        let weight = match committee {
            Committee::Member(_) => 1,
            Committee::Token(_) => balances.balance_of(&vote.voter),
        };

        current_votes = current_votes.saturating_add(weight);
        match vote.vote_type {
            VoteType::Yes => yes_votes = yes_votes.saturating_add(weight),
            VoteType::No => no_votes = no_votes.saturating_add(weight),
            VoteType::Abstain => {}
        }
    }

    ProposalPollingStatus {
        proposal_id,
        yes_votes,
        no_votes,
        current_votes,
        possible_votes,
        vote_threshold: committee.vote_threshold(),
        quorum,
    }
}

/// Whether `votes` pass `committee`'s threshold (and quorum, for token committees)
pub fn passes(committee: &Committee, votes: &[Vote], balances: &TokenBalances) -> bool {
    tally_votes(committee, 0, votes, balances).passes()
}
