use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::Address;

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Corrupted value under key {key}: {reason}")]
    Corrupted { key: String, reason: String },
}

#[cfg(feature = "sled-store")]
impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Error type returned by every fallible committee operation.
///
/// Malformed parameter diffs never surface here: they are reported as a
/// permission denial (`Unauthorized`). Invariant violations are not errors
/// either, they panic.
#[derive(Debug, Error)]
pub enum CommitteeError {
    #[error("Unknown committee: {0}")]
    UnknownCommittee(u64),

    #[error("Unknown proposal: {0}")]
    UnknownProposal(u64),

    #[error("Unknown vote: proposal {proposal_id}, voter {voter}")]
    UnknownVote { proposal_id: u64, voter: Address },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Proposal expired: {now} >= {deadline}")]
    ProposalExpired {
        now: DateTime<Utc>,
        deadline: DateTime<Utc>,
    },

    #[error("Invalid pub proposal: {0}")]
    InvalidPubProposal(String),

    #[error("No proposal handler exists for route: {0}")]
    NoProposalHandlerExists(String),

    #[error("Invalid committee: {0}")]
    InvalidCommittee(String),

    #[error("Invalid vote type: {0}")]
    InvalidVoteType(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Proposal id space exhausted at {0}")]
    ProposalIdExhausted(u64),

    #[error("Invalid genesis state: {0}")]
    InvalidGenesis(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CommitteeError {
    /// Whether the error is of the not-found kind
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CommitteeError::UnknownCommittee(_)
                | CommitteeError::UnknownProposal(_)
                | CommitteeError::UnknownVote { .. }
        )
    }
}

pub type CommitteeResult<T> = Result<T, CommitteeError>;
