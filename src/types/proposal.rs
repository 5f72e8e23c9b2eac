use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ProtocolLimits;
use crate::errors::{CommitteeError, CommitteeResult};
use crate::types::{Address, Committee};

pub const ROUTE_GOV: &str = "gov";
pub const ROUTE_PARAMS: &str = "params";
pub const ROUTE_UPGRADE: &str = "upgrade";
pub const ROUTE_COMMITTEE: &str = "committee";

/// One edit to an on-chain parameter record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamChange {
    pub subspace: String,
    pub key: String,
    /// Proposed JSON value for the whole record
    pub value: String,
}

impl ParamChange {
    pub fn new(subspace: &str, key: &str, value: impl Into<String>) -> Self {
        Self {
            subspace: subspace.to_string(),
            key: key.to_string(),
            value: value.into(),
        }
    }
}

/// A scheduled software upgrade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    pub height: u64,
    #[serde(default)]
    pub info: String,
}

/// The change a proposal asks to enact. Each kind is dispatched to the
/// handler registered for its route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PubProposal {
    Text {
        title: String,
        description: String,
    },
    ParameterChange {
        title: String,
        description: String,
        changes: Vec<ParamChange>,
    },
    SoftwareUpgrade {
        title: String,
        description: String,
        plan: Plan,
    },
    CommitteeChange {
        title: String,
        description: String,
        new_committee: Committee,
    },
    CommitteeDelete {
        title: String,
        description: String,
        committee_id: u64,
    },
}

impl PubProposal {
    pub fn text(title: &str, description: &str) -> Self {
        PubProposal::Text {
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    pub fn parameter_change(title: &str, description: &str, changes: Vec<ParamChange>) -> Self {
        PubProposal::ParameterChange {
            title: title.to_string(),
            description: description.to_string(),
            changes,
        }
    }

    pub fn software_upgrade(title: &str, description: &str, plan: Plan) -> Self {
        PubProposal::SoftwareUpgrade {
            title: title.to_string(),
            description: description.to_string(),
            plan,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            PubProposal::Text { title, .. }
            | PubProposal::ParameterChange { title, .. }
            | PubProposal::SoftwareUpgrade { title, .. }
            | PubProposal::CommitteeChange { title, .. }
            | PubProposal::CommitteeDelete { title, .. } => title,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            PubProposal::Text { description, .. }
            | PubProposal::ParameterChange { description, .. }
            | PubProposal::SoftwareUpgrade { description, .. }
            | PubProposal::CommitteeChange { description, .. }
            | PubProposal::CommitteeDelete { description, .. } => description,
        }
    }

    /// Key into the dispatch table
    pub fn route(&self) -> &'static str {
        match self {
            PubProposal::Text { .. } => ROUTE_GOV,
            PubProposal::ParameterChange { .. } => ROUTE_PARAMS,
            PubProposal::SoftwareUpgrade { .. } => ROUTE_UPGRADE,
            PubProposal::CommitteeChange { .. } | PubProposal::CommitteeDelete { .. } => {
                ROUTE_COMMITTEE
            }
        }
    }

    pub fn proposal_type(&self) -> &'static str {
        match self {
            PubProposal::Text { .. } => "Text",
            PubProposal::ParameterChange { .. } => "ParameterChange",
            PubProposal::SoftwareUpgrade { .. } => "SoftwareUpgrade",
            PubProposal::CommitteeChange { .. } => "CommitteeChange",
            PubProposal::CommitteeDelete { .. } => "CommitteeDelete",
        }
    }

    /// Validate with the default protocol limits
    pub fn validate_basic(&self) -> CommitteeResult<()> {
        self.validate_basic_with(&ProtocolLimits::default())
    }

    /// Structural checks that need no chain state
    pub fn validate_basic_with(&self, limits: &ProtocolLimits) -> CommitteeResult<()> {
        let invalid = |msg: String| Err(CommitteeError::InvalidPubProposal(msg));

        let title = self.title();
        if title.trim().is_empty() {
            return invalid("proposal title cannot be blank".to_string());
        }
        if title.len() > limits.max_title_length {
            return invalid(format!(
                "proposal title is longer than max length of {}",
                limits.max_title_length
            ));
        }

        let description = self.description();
        if description.is_empty() {
            return invalid("proposal description cannot be blank".to_string());
        }
        if description.len() > limits.max_description_length {
            return invalid(format!(
                "proposal description is longer than max length of {}",
                limits.max_description_length
            ));
        }

        match self {
            PubProposal::ParameterChange { changes, .. } => {
                if changes.is_empty() {
                    return invalid("submitted parameter changes are empty".to_string());
                }
                for change in changes {
                    if change.subspace.is_empty() {
                        return invalid("parameter change has an empty subspace".to_string());
                    }
                    if change.key.is_empty() {
                        return invalid("parameter change has an empty key".to_string());
                    }
                    if change.value.is_empty() {
                        return invalid("parameter change has an empty value".to_string());
                    }
                }
            }
            PubProposal::SoftwareUpgrade { plan, .. } => {
                if plan.name.is_empty() {
                    return invalid("upgrade plan must have a name".to_string());
                }
                if plan.height == 0 {
                    return invalid("upgrade plan height must be greater than 0".to_string());
                }
            }
            PubProposal::CommitteeChange { new_committee, .. } => {
                new_committee
                    .validate_with(limits)
                    .map_err(|e| CommitteeError::InvalidPubProposal(e.to_string()))?;
            }
            PubProposal::Text { .. } | PubProposal::CommitteeDelete { .. } => {}
        }

        Ok(())
    }
}

/// A pending request to a committee to enact a `PubProposal`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: u64,
    pub committee_id: u64,
    pub pub_proposal: PubProposal,
    pub deadline: DateTime<Utc>,
}

impl Proposal {
    pub fn new(
        pub_proposal: PubProposal,
        id: u64,
        committee_id: u64,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            committee_id,
            pub_proposal,
            deadline,
        }
    }

    /// Votes must be cast strictly before the deadline; one cast at the
    /// deadline itself is too late.
    pub fn has_expired_by(&self, time: DateTime<Utc>) -> bool {
        time >= self.deadline
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteType {
    Yes,
    No,
    Abstain,
}

impl FromStr for VoteType {
    type Err = CommitteeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yes" | "y" => Ok(VoteType::Yes),
            "no" | "n" => Ok(VoteType::No),
            "abstain" | "a" => Ok(VoteType::Abstain),
            _ => Err(CommitteeError::InvalidVoteType(s.to_string())),
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteType::Yes => write!(f, "Yes"),
            VoteType::No => write!(f, "No"),
            VoteType::Abstain => write!(f, "Abstain"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub proposal_id: u64,
    pub voter: Address,
    pub vote_type: VoteType,
}

impl Vote {
    pub fn new(proposal_id: u64, voter: Address, vote_type: VoteType) -> Self {
        Self {
            proposal_id,
            voter,
            vote_type,
        }
    }

    pub fn validate(&self) -> CommitteeResult<()> {
        if self.voter.is_empty() {
            return Err(CommitteeError::InvalidAddress(
                "voter address cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Terminal state of a closed proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalOutcome {
    Passed,
    Failed,
    Expired,
}

impl fmt::Display for ProposalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProposalOutcome::Passed => write!(f, "Passed"),
            ProposalOutcome::Failed => write!(f, "Failed"),
            ProposalOutcome::Expired => write!(f, "Expired"),
        }
    }
}
