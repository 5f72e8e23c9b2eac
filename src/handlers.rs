//! Built-in handlers that enact each kind of proposal content.

use std::sync::Arc;

use log::{debug, info};

use crate::config::ProtocolLimits;
use crate::context::Context;
use crate::errors::{CommitteeError, CommitteeResult};
use crate::keeper::store;
use crate::params::ParamKeeper;
use crate::router::ProposalHandler;
use crate::store::keys;
use crate::types::{Plan, PubProposal};

fn unexpected(handler: &str, content: &PubProposal) -> CommitteeError {
    CommitteeError::InvalidPubProposal(format!(
        "{} handler cannot enact {} proposals",
        handler,
        content.proposal_type()
    ))
}

/// Text proposals change nothing
pub struct TextHandler;

impl ProposalHandler for TextHandler {
    fn handle(&self, _ctx: &mut Context<'_>, content: &PubProposal) -> CommitteeResult<()> {
        match content {
            PubProposal::Text { .. } => Ok(()),
            other => Err(unexpected("text", other)),
        }
    }
}

/// Writes each proposed value over the live parameter record
pub struct ParamsChangeHandler {
    params: Arc<ParamKeeper>,
}

impl ParamsChangeHandler {
    pub fn new(params: Arc<ParamKeeper>) -> Self {
        Self { params }
    }
}

impl ProposalHandler for ParamsChangeHandler {
    fn handle(&self, ctx: &mut Context<'_>, content: &PubProposal) -> CommitteeResult<()> {
        let changes = match content {
            PubProposal::ParameterChange { changes, .. } => changes,
            other => return Err(unexpected("params", other)),
        };

        for change in changes {
            let subspace = self.params.get_subspace(&change.subspace).ok_or_else(|| {
                CommitteeError::InvalidPubProposal(format!(
                    "parameter subspace {} does not exist",
                    change.subspace
                ))
            })?;

            subspace.set_raw(ctx.store_mut(), &change.key, change.value.as_bytes())?;
            info!(
                "Parameter {}/{} changed to {}",
                change.subspace, change.key, change.value
            );
        }

        Ok(())
    }
}

/// Schedules a software upgrade, replacing any plan already scheduled
pub struct UpgradeHandler;

impl UpgradeHandler {
    pub fn scheduled_plan(store: &dyn crate::store::KvStore) -> CommitteeResult<Option<Plan>> {
        match store.get(keys::UPGRADE_PLAN_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => Ok(None),
        }
    }
}

impl ProposalHandler for UpgradeHandler {
    fn handle(&self, ctx: &mut Context<'_>, content: &PubProposal) -> CommitteeResult<()> {
        let plan = match content {
            PubProposal::SoftwareUpgrade { plan, .. } => plan,
            other => return Err(unexpected("upgrade", other)),
        };

        if plan.height <= ctx.block_height() {
            return Err(CommitteeError::InvalidPubProposal(format!(
                "upgrade cannot be scheduled in the past: height {} <= current height {}",
                plan.height,
                ctx.block_height()
            )));
        }

        if let Some(previous) = Self::scheduled_plan(ctx.store())? {
            debug!("Replacing scheduled upgrade {}", previous.name);
        }

        let raw = serde_json::to_vec(plan)?;
        ctx.store_mut().set(keys::UPGRADE_PLAN_KEY, raw)?;
        info!("Upgrade {} scheduled at height {}", plan.name, plan.height);
        Ok(())
    }
}

/// Creates, replaces and removes committees.
///
/// A committee that is replaced or removed loses all of its open proposals,
/// since they were submitted under rules that no longer apply.
pub struct CommitteeHandler {
    limits: ProtocolLimits,
}

impl CommitteeHandler {
    pub fn new(limits: ProtocolLimits) -> Self {
        Self { limits }
    }

    fn drop_proposals_of(ctx: &mut Context<'_>, committee_id: u64) -> CommitteeResult<()> {
        let proposals = store::get_proposals_by_committee(ctx.store(), committee_id)?;
        for proposal in proposals {
            debug!(
                "Removing proposal {} of committee {}",
                proposal.id, committee_id
            );
            store::delete_proposal_and_votes(ctx.store_mut(), proposal.id)?;
        }
        Ok(())
    }
}

impl ProposalHandler for CommitteeHandler {
    fn handle(&self, ctx: &mut Context<'_>, content: &PubProposal) -> CommitteeResult<()> {
        match content {
            PubProposal::CommitteeChange { new_committee, .. } => {
                new_committee
                    .validate_with(&self.limits)
                    .map_err(|e| CommitteeError::InvalidPubProposal(e.to_string()))?;

                Self::drop_proposals_of(ctx, new_committee.id())?;
                store::set_committee(ctx.store_mut(), new_committee)?;
                info!("Committee {} set", new_committee.id());
                Ok(())
            }
            PubProposal::CommitteeDelete { committee_id, .. } => {
                Self::drop_proposals_of(ctx, *committee_id)?;
                store::delete_committee(ctx.store_mut(), *committee_id)?;
                info!("Committee {} deleted", committee_id);
                Ok(())
            }
            other => Err(unexpected("committee", other)),
        }
    }
}
