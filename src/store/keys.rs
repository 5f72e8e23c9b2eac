//! Storage key layout.
//!
//! Integer ids are big-endian so that lexicographic key order is numeric order.

use crate::types::Address;

pub const COMMITTEE_KEY_PREFIX: u8 = 0x00;
pub const PROPOSAL_KEY_PREFIX: u8 = 0x01;
pub const VOTE_KEY_PREFIX: u8 = 0x02;
pub const NEXT_PROPOSAL_ID_KEY: &[u8] = &[0x03];
pub const PARAMS_KEY_PREFIX: u8 = 0x10;
pub const UPGRADE_PLAN_KEY: &[u8] = &[0x20];

pub fn committee_key(id: u64) -> Vec<u8> {
    prefixed_id(COMMITTEE_KEY_PREFIX, id)
}

pub fn proposal_key(id: u64) -> Vec<u8> {
    prefixed_id(PROPOSAL_KEY_PREFIX, id)
}

/// Prefix under which every vote on `proposal_id` lives
pub fn votes_prefix(proposal_id: u64) -> Vec<u8> {
    prefixed_id(VOTE_KEY_PREFIX, proposal_id)
}

pub fn vote_key(proposal_id: u64, voter: &Address) -> Vec<u8> {
    let mut key = votes_prefix(proposal_id);
    key.extend_from_slice(voter.as_bytes());
    key
}

/// Parameter record key. The subspace name is length-prefixed so that no
/// two (subspace, key) pairs share a key.
pub fn param_key(subspace: &str, key: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(5 + subspace.len() + key.len());
    out.push(PARAMS_KEY_PREFIX);
    out.extend_from_slice(&(subspace.len() as u32).to_be_bytes());
    out.extend_from_slice(subspace.as_bytes());
    out.extend_from_slice(key.as_bytes());
    out
}

fn prefixed_id(prefix: u8, id: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(9);
    key.push(prefix);
    key.extend_from_slice(&id.to_be_bytes());
    key
}
