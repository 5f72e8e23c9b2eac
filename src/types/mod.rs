// Core governance entities: committees, their permissions, proposals and votes

pub mod address;
pub mod committee;
pub mod dec;
pub mod events;
pub mod genesis;
pub mod permission;
pub mod proposal;

pub use address::Address;
pub use committee::{
    validate_denom, BaseCommittee, Committee, MemberCommittee, TallyOption, TokenCommittee,
    MEMBER_COMMITTEE_TYPE, TOKEN_COMMITTEE_TYPE,
};
pub use dec::{Dec, DecError};
pub use events::{Event, EventManager};
pub use genesis::{GenesisState, DEFAULT_NEXT_PROPOSAL_ID};
pub use permission::{AllowedParamsChange, ParamsChangePermission, Permission, SubparamRequirement};
pub use proposal::{
    ParamChange, Plan, Proposal, ProposalOutcome, PubProposal, Vote, VoteType, ROUTE_COMMITTEE,
    ROUTE_GOV, ROUTE_PARAMS, ROUTE_UPGRADE,
};
