use chrono::Duration as ChronoDuration;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::errors::{CommitteeError, CommitteeResult};
use crate::keeper::{store, Keeper};
use crate::tally::ProposalPollingStatus;
use crate::types::events::{
    ATTRIBUTE_KEY_COMMITTEE_ID, ATTRIBUTE_KEY_DEADLINE, ATTRIBUTE_KEY_ENACTED,
    ATTRIBUTE_KEY_PROPOSAL_ID, ATTRIBUTE_KEY_PROPOSAL_OUTCOME, ATTRIBUTE_KEY_PROPOSAL_TALLY,
    ATTRIBUTE_KEY_VOTE, ATTRIBUTE_KEY_VOTER, EVENT_TYPE_PROPOSAL_CLOSE, EVENT_TYPE_PROPOSAL_SUBMIT,
    EVENT_TYPE_PROPOSAL_VOTE,
};
use crate::types::{
    Address, Committee, Event, Proposal, ProposalOutcome, PubProposal, TallyOption, VoteType,
};

/// What happened when a proposal was closed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalCloseRecord {
    pub proposal_id: u64,
    pub committee_id: u64,
    pub outcome: ProposalOutcome,
    /// Final tally, absent when the committee no longer existed
    pub tally: Option<ProposalPollingStatus>,
    /// Whether a passed proposal's content was applied
    pub enacted: bool,
    pub enact_error: Option<String>,
}

impl Keeper {
    /// Submit `pub_proposal` to a committee and return the new proposal's id
    pub fn submit_proposal(
        &self,
        ctx: &mut Context<'_>,
        proposer: &Address,
        committee_id: u64,
        pub_proposal: PubProposal,
    ) -> CommitteeResult<u64> {
        if proposer.is_empty() {
            return Err(CommitteeError::InvalidAddress(
                "proposer address cannot be empty".to_string(),
            ));
        }

        let committee = store::get_committee(ctx.store(), committee_id)?
            .ok_or(CommitteeError::UnknownCommittee(committee_id))?;

        if committee.is_member_committee() && !committee.has_member(proposer) {
            return Err(CommitteeError::Unauthorized(
                "proposer not member of committee".to_string(),
            ));
        }

        self.validate_pub_proposal(ctx, &pub_proposal)?;

        if !committee.has_permissions_for(ctx.store(), self.param_keeper(), &pub_proposal) {
            return Err(CommitteeError::Unauthorized(
                "committee does not have permissions to enact proposal".to_string(),
            ));
        }

        let duration = ChronoDuration::from_std(committee.proposal_duration()).map_err(|_| {
            CommitteeError::InvalidCommittee(format!(
                "proposal duration of committee {} is out of range",
                committee_id
            ))
        })?;
        let deadline = ctx.block_time().checked_add_signed(duration).ok_or_else(|| {
            CommitteeError::InvalidCommittee(format!(
                "deadline for committee {} overflows",
                committee_id
            ))
        })?;

        let proposal_id =
            store::store_new_proposal(ctx.store_mut(), pub_proposal, committee_id, deadline)?;

        ctx.emit(
            Event::new(EVENT_TYPE_PROPOSAL_SUBMIT)
                .attribute(ATTRIBUTE_KEY_COMMITTEE_ID, committee_id)
                .attribute(ATTRIBUTE_KEY_PROPOSAL_ID, proposal_id)
                .attribute(ATTRIBUTE_KEY_DEADLINE, deadline.to_rfc3339()),
        );
        info!(
            "Proposal {} submitted to committee {} by {}, deadline {}",
            proposal_id, committee_id, proposer, deadline
        );

        Ok(proposal_id)
    }

    /// Record a vote, replacing any earlier vote by the same voter.
    ///
    /// On a first-past-the-post committee the proposal is closed right away
    /// if this vote makes it pass.
    pub fn add_vote(
        &self,
        ctx: &mut Context<'_>,
        proposal_id: u64,
        voter: &Address,
        vote_type: VoteType,
    ) -> CommitteeResult<()> {
        let proposal = store::get_proposal(ctx.store(), proposal_id)?
            .ok_or(CommitteeError::UnknownProposal(proposal_id))?;

        if proposal.has_expired_by(ctx.block_time()) {
            return Err(CommitteeError::ProposalExpired {
                now: ctx.block_time(),
                deadline: proposal.deadline,
            });
        }

        let committee = store::get_committee(ctx.store(), proposal.committee_id)?
            .ok_or(CommitteeError::UnknownCommittee(proposal.committee_id))?;

        if committee.is_member_committee() && !committee.has_member(voter) {
            return Err(CommitteeError::Unauthorized(
                "voter must be a member of committee".to_string(),
            ));
        }

        let vote = crate::types::Vote::new(proposal_id, voter.clone(), vote_type);
        vote.validate()?;
        store::set_vote(ctx.store_mut(), &vote)?;

        ctx.emit(
            Event::new(EVENT_TYPE_PROPOSAL_VOTE)
                .attribute(ATTRIBUTE_KEY_COMMITTEE_ID, committee.id())
                .attribute(ATTRIBUTE_KEY_PROPOSAL_ID, proposal_id)
                .attribute(ATTRIBUTE_KEY_VOTER, voter)
                .attribute(ATTRIBUTE_KEY_VOTE, vote_type),
        );
        info!("{} voted {} on proposal {}", voter, vote_type, proposal_id);

        if committee.tally_option() == TallyOption::FirstPastThePost {
            let status = self.get_proposal_tally_status(ctx.store(), &committee, proposal_id)?;
            if status.passes() {
                self.enact_and_close(ctx, &proposal, status)?;
            }
        }

        Ok(())
    }

    /// Structural validation plus a dry run of the content's handler
    pub fn validate_pub_proposal(
        &self,
        ctx: &mut Context<'_>,
        pub_proposal: &PubProposal,
    ) -> CommitteeResult<()> {
        pub_proposal.validate_basic_with(self.limits())?;

        let route = pub_proposal.route();
        let handler = self
            .router()
            .get_route(route)
            .ok_or_else(|| CommitteeError::NoProposalHandlerExists(route.to_string()))?;

        ctx.dry_run(|cached| handler.handle(cached, pub_proposal))
            .map_err(|err| match err {
                CommitteeError::InvalidPubProposal(_) => err,
                other => CommitteeError::InvalidPubProposal(other.to_string()),
            })
    }

    /// Close every proposal whose deadline has passed, and every proposal
    /// whose committee no longer exists. Runs once per block.
    pub fn process_proposals(
        &self,
        ctx: &mut Context<'_>,
    ) -> CommitteeResult<Vec<ProposalCloseRecord>> {
        let mut records = Vec::new();

        for proposal in store::get_proposals(ctx.store())? {
            // an earlier enactment in this sweep may have removed it
            if store::get_proposal(ctx.store(), proposal.id)?.is_none() {
                continue;
            }

            let committee = match store::get_committee(ctx.store(), proposal.committee_id)? {
                Some(committee) => committee,
                None => {
                    debug!(
                        "Committee {} of proposal {} no longer exists",
                        proposal.committee_id, proposal.id
                    );
                    records.push(self.close_proposal(
                        ctx,
                        &proposal,
                        ProposalOutcome::Failed,
                        None,
                        false,
                        None,
                    )?);
                    continue;
                }
            };

            if !proposal.has_expired_by(ctx.block_time()) {
                continue;
            }

            let status = self.get_proposal_tally_status(ctx.store(), &committee, proposal.id)?;
            let record = if status.passes() {
                self.enact_and_close(ctx, &proposal, status)?
            } else {
                let outcome = match committee.tally_option() {
                    TallyOption::FirstPastThePost => ProposalOutcome::Expired,
                    TallyOption::Deadline => ProposalOutcome::Failed,
                };
                self.close_proposal(ctx, &proposal, outcome, Some(status), false, None)?
            };
            records.push(record);
        }

        Ok(records)
    }

    /// Apply a passed proposal and close it as `Passed` whether or not the
    /// content could be applied
    fn enact_and_close(
        &self,
        ctx: &mut Context<'_>,
        proposal: &Proposal,
        status: ProposalPollingStatus,
    ) -> CommitteeResult<ProposalCloseRecord> {
        let (enacted, enact_error) = match self.enact_proposal(ctx, proposal) {
            Ok(()) => (true, None),
            Err(err) => {
                warn!("Failed to enact passed proposal {}: {}", proposal.id, err);
                (false, Some(err.to_string()))
            }
        };

        self.close_proposal(
            ctx,
            proposal,
            ProposalOutcome::Passed,
            Some(status),
            enacted,
            enact_error,
        )
    }

    /// Apply a proposal's content inside a cached scope.
    ///
    /// Permissions are checked again against live state, which may have
    /// changed since submission. Handler writes are discarded on error.
    pub fn enact_proposal(&self, ctx: &mut Context<'_>, proposal: &Proposal) -> CommitteeResult<()> {
        let committee: Committee = store::get_committee(ctx.store(), proposal.committee_id)?
            .ok_or(CommitteeError::UnknownCommittee(proposal.committee_id))?;

        if !committee.has_permissions_for(ctx.store(), self.param_keeper(), &proposal.pub_proposal) {
            return Err(CommitteeError::Unauthorized(
                "committee does not have permissions to enact proposal".to_string(),
            ));
        }

        self.validate_pub_proposal(ctx, &proposal.pub_proposal)?;

        let route = proposal.pub_proposal.route();
        let handler = self
            .router()
            .get_route(route)
            .ok_or_else(|| CommitteeError::NoProposalHandlerExists(route.to_string()))?;

        ctx.with_cache(|cached| handler.handle(cached, &proposal.pub_proposal))
    }

    /// Delete a proposal and its votes and emit the close event
    pub fn close_proposal(
        &self,
        ctx: &mut Context<'_>,
        proposal: &Proposal,
        outcome: ProposalOutcome,
        tally: Option<ProposalPollingStatus>,
        enacted: bool,
        enact_error: Option<String>,
    ) -> CommitteeResult<ProposalCloseRecord> {
        store::delete_proposal_and_votes(ctx.store_mut(), proposal.id)?;

        let tally_text = tally.as_ref().map(|t| t.to_string()).unwrap_or_default();
        ctx.emit(
            Event::new(EVENT_TYPE_PROPOSAL_CLOSE)
                .attribute(ATTRIBUTE_KEY_COMMITTEE_ID, proposal.committee_id)
                .attribute(ATTRIBUTE_KEY_PROPOSAL_ID, proposal.id)
                .attribute(ATTRIBUTE_KEY_PROPOSAL_TALLY, tally_text)
                .attribute(ATTRIBUTE_KEY_PROPOSAL_OUTCOME, outcome)
                .attribute(ATTRIBUTE_KEY_ENACTED, enacted),
        );
        info!(
            "Proposal {} of committee {} closed: {} (enacted: {})",
            proposal.id, proposal.committee_id, outcome, enacted
        );

        Ok(ProposalCloseRecord {
            proposal_id: proposal.id,
            committee_id: proposal.committee_id,
            outcome,
            tally,
            enacted,
            enact_error,
        })
    }
}
