//! Committee governance core.
//!
//! Committees with a fixed member set or token-weighted voting may enact a
//! whitelisted set of proposals. This crate holds the permission checks
//! (including the parameter diff engine), vote tallying, and the proposal
//! lifecycle run once per block.

pub mod bank;
pub mod config;
pub mod context;
pub mod diff;
pub mod errors;
pub mod handlers;
pub mod keeper;
pub mod params;
pub mod router;
pub mod store;
pub mod tally;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use bank::{BankKeeper, MemoryBank};
pub use config::{CommitteeConfig, ProtocolLimits};
pub use context::{BlockHeader, Context};
pub use errors::{CommitteeError, CommitteeResult, StoreError};
pub use keeper::{Keeper, ProposalCloseRecord, Querier};
pub use params::{ParamKeeper, Subspace};
pub use router::{ProposalHandler, Router};
pub use store::{CacheStore, KvStore, MemStore};
pub use tally::{ProposalPollingStatus, TokenBalances};
pub use types::{
    Address, AllowedParamsChange, Committee, Dec, GenesisState, ParamChange,
    ParamsChangePermission, Permission, Plan, Proposal, ProposalOutcome, PubProposal,
    SubparamRequirement, TallyOption, Vote, VoteType,
};

#[cfg(test)]
mod tests {
    pub mod common;
}
