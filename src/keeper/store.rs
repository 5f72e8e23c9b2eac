//! Typed access to committees, proposals and votes in a `KvStore`.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{CommitteeError, CommitteeResult, StoreError};
use crate::store::{keys, KvStore};
use crate::types::{
    Address, Committee, Proposal, PubProposal, Vote, DEFAULT_NEXT_PROPOSAL_ID,
};

fn read_json<T: DeserializeOwned>(store: &dyn KvStore, key: &[u8]) -> CommitteeResult<Option<T>> {
    match store.get(key)? {
        Some(raw) => decode(key, &raw).map(Some),
        None => Ok(None),
    }
}

fn write_json<T: Serialize>(store: &mut dyn KvStore, key: &[u8], value: &T) -> CommitteeResult<()> {
    let raw = serde_json::to_vec(value)?;
    store.set(key, raw)?;
    Ok(())
}

fn read_all<T: DeserializeOwned>(store: &dyn KvStore, prefix: &[u8]) -> CommitteeResult<Vec<T>> {
    store
        .scan_prefix(prefix)?
        .iter()
        .map(|(key, raw)| decode(key, raw))
        .collect()
}

fn decode<T: DeserializeOwned>(key: &[u8], raw: &[u8]) -> CommitteeResult<T> {
    serde_json::from_slice(raw).map_err(|e| {
        StoreError::Corrupted {
            key: hex::encode(key),
            reason: e.to_string(),
        }
        .into()
    })
}

// Committees

pub fn get_committee(store: &dyn KvStore, committee_id: u64) -> CommitteeResult<Option<Committee>> {
    read_json(store, &keys::committee_key(committee_id))
}

pub fn set_committee(store: &mut dyn KvStore, committee: &Committee) -> CommitteeResult<()> {
    write_json(store, &keys::committee_key(committee.id()), committee)
}

pub fn delete_committee(store: &mut dyn KvStore, committee_id: u64) -> CommitteeResult<()> {
    store.delete(&keys::committee_key(committee_id))?;
    Ok(())
}

/// All committees in ascending id order
pub fn get_committees(store: &dyn KvStore) -> CommitteeResult<Vec<Committee>> {
    read_all(store, &[keys::COMMITTEE_KEY_PREFIX])
}

// Proposal ids

/// The id the next submitted proposal will receive. Defaults to 1 when unset.
pub fn get_next_proposal_id(store: &dyn KvStore) -> CommitteeResult<u64> {
    Ok(read_json(store, keys::NEXT_PROPOSAL_ID_KEY)?.unwrap_or(DEFAULT_NEXT_PROPOSAL_ID))
}

pub fn set_next_proposal_id(store: &mut dyn KvStore, id: u64) -> CommitteeResult<()> {
    write_json(store, keys::NEXT_PROPOSAL_ID_KEY, &id)
}

/// Assign the next id to a new proposal and persist it
pub fn store_new_proposal(
    store: &mut dyn KvStore,
    pub_proposal: PubProposal,
    committee_id: u64,
    deadline: DateTime<Utc>,
) -> CommitteeResult<u64> {
    let id = get_next_proposal_id(store)?;
    let next_id = id
        .checked_add(1)
        .ok_or(CommitteeError::ProposalIdExhausted(id))?;
    let proposal = Proposal::new(pub_proposal, id, committee_id, deadline);
    set_proposal(store, &proposal)?;
    set_next_proposal_id(store, next_id)?;
    Ok(id)
}

// Proposals

pub fn get_proposal(store: &dyn KvStore, proposal_id: u64) -> CommitteeResult<Option<Proposal>> {
    read_json(store, &keys::proposal_key(proposal_id))
}

pub fn set_proposal(store: &mut dyn KvStore, proposal: &Proposal) -> CommitteeResult<()> {
    write_json(store, &keys::proposal_key(proposal.id), proposal)
}

pub fn delete_proposal(store: &mut dyn KvStore, proposal_id: u64) -> CommitteeResult<()> {
    store.delete(&keys::proposal_key(proposal_id))?;
    Ok(())
}

/// All proposals in ascending id order
pub fn get_proposals(store: &dyn KvStore) -> CommitteeResult<Vec<Proposal>> {
    read_all(store, &[keys::PROPOSAL_KEY_PREFIX])
}

pub fn get_proposals_by_committee(
    store: &dyn KvStore,
    committee_id: u64,
) -> CommitteeResult<Vec<Proposal>> {
    Ok(get_proposals(store)?
        .into_iter()
        .filter(|p| p.committee_id == committee_id)
        .collect())
}

pub fn delete_proposal_and_votes(store: &mut dyn KvStore, proposal_id: u64) -> CommitteeResult<()> {
    for vote in get_votes_by_proposal(store, proposal_id)? {
        delete_vote(store, vote.proposal_id, &vote.voter)?;
    }
    delete_proposal(store, proposal_id)
}

// Votes

pub fn get_vote(
    store: &dyn KvStore,
    proposal_id: u64,
    voter: &Address,
) -> CommitteeResult<Option<Vote>> {
    read_json(store, &keys::vote_key(proposal_id, voter))
}

/// Store a vote, replacing any earlier vote by the same voter
pub fn set_vote(store: &mut dyn KvStore, vote: &Vote) -> CommitteeResult<()> {
    write_json(store, &keys::vote_key(vote.proposal_id, &vote.voter), vote)
}

pub fn delete_vote(store: &mut dyn KvStore, proposal_id: u64, voter: &Address) -> CommitteeResult<()> {
    store.delete(&keys::vote_key(proposal_id, voter))?;
    Ok(())
}

/// Votes on one proposal, ordered by voter address
pub fn get_votes_by_proposal(store: &dyn KvStore, proposal_id: u64) -> CommitteeResult<Vec<Vote>> {
    read_all(store, &keys::votes_prefix(proposal_id))
}

/// Every vote, ordered by proposal id then voter
pub fn get_votes(store: &dyn KvStore) -> CommitteeResult<Vec<Vote>> {
    read_all(store, &[keys::VOTE_KEY_PREFIX])
}
