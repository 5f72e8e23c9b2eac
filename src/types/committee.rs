use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::ProtocolLimits;
use crate::errors::{CommitteeError, CommitteeResult};
use crate::params::ParamKeeper;
use crate::store::KvStore;
use crate::types::{Address, Dec, Permission, PubProposal};

pub const MEMBER_COMMITTEE_TYPE: &str = "MemberCommittee";
pub const TOKEN_COMMITTEE_TYPE: &str = "TokenCommittee";

/// How and when votes on a committee's proposals are tallied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TallyOption {
    /// Proposals close as soon as a vote pushes them over the threshold
    FirstPastThePost,
    /// Proposals are tallied exactly once, when the deadline is reached
    Deadline,
}

impl FromStr for TallyOption {
    type Err = CommitteeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "firstpastthepost" | "fptp" => Ok(TallyOption::FirstPastThePost),
            "deadline" | "d" => Ok(TallyOption::Deadline),
            _ => Err(CommitteeError::InvalidCommittee(format!(
                "'{}' is not a valid tally option",
                s
            ))),
        }
    }
}

impl fmt::Display for TallyOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TallyOption::FirstPastThePost => write!(f, "FirstPastThePost"),
            TallyOption::Deadline => write!(f, "Deadline"),
        }
    }
}

/// Fields shared by every committee variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseCommittee {
    pub id: u64,
    pub description: String,
    pub members: Vec<Address>,
    pub permissions: Vec<Permission>,
    /// Smallest fraction of cast vote weight that must be Yes for a proposal to pass
    pub vote_threshold: Dec,
    /// How long a proposal stays open after submission
    pub proposal_duration: Duration,
    pub tally_option: TallyOption,
}

impl BaseCommittee {
    pub fn has_member(&self, addr: &Address) -> bool {
        self.members.iter().any(|m| m == addr)
    }

    fn validate(&self, limits: &ProtocolLimits, require_members: bool) -> CommitteeResult<()> {
        if self.description.len() > limits.max_committee_description_length {
            return Err(CommitteeError::InvalidCommittee(format!(
                "description length {} longer than max allowed {}",
                self.description.len(),
                limits.max_committee_description_length
            )));
        }

        if require_members && self.members.is_empty() {
            return Err(CommitteeError::InvalidCommittee(
                "committee must have members".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(self.members.len());
        for member in &self.members {
            if member.is_empty() {
                return Err(CommitteeError::InvalidCommittee(
                    "committee cannot have empty member address".to_string(),
                ));
            }
            if !seen.insert(member) {
                return Err(CommitteeError::InvalidCommittee(format!(
                    "committee cannot have duplicate members, {}",
                    member
                )));
            }
        }

        for permission in &self.permissions {
            permission.validate()?;
        }

        // threshold must be in (0, 1]
        if self.vote_threshold.is_zero() || self.vote_threshold > Dec::one() {
            return Err(CommitteeError::InvalidCommittee(format!(
                "invalid threshold: {}",
                self.vote_threshold
            )));
        }

        Ok(())
    }
}

/// Committee whose fixed member set votes with one vote each
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberCommittee {
    #[serde(flatten)]
    pub base: BaseCommittee,
}

/// Committee where any holder of `tally_denom` votes, weighted by balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenCommittee {
    #[serde(flatten)]
    pub base: BaseCommittee,
    /// Fraction of the total supply that must take part for a tally to count
    pub quorum: Dec,
    pub tally_denom: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Committee {
    #[serde(rename = "MemberCommittee")]
    Member(MemberCommittee),
    #[serde(rename = "TokenCommittee")]
    Token(TokenCommittee),
}

impl Committee {
    pub fn new_member(
        id: u64,
        description: impl Into<String>,
        members: Vec<Address>,
        permissions: Vec<Permission>,
        vote_threshold: Dec,
        proposal_duration: Duration,
        tally_option: TallyOption,
    ) -> Self {
        Committee::Member(MemberCommittee {
            base: BaseCommittee {
                id,
                description: description.into(),
                members,
                permissions,
                vote_threshold,
                proposal_duration,
                tally_option,
            },
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new_token(
        id: u64,
        description: impl Into<String>,
        members: Vec<Address>,
        permissions: Vec<Permission>,
        vote_threshold: Dec,
        proposal_duration: Duration,
        tally_option: TallyOption,
        quorum: Dec,
        tally_denom: impl Into<String>,
    ) -> Self {
        Committee::Token(TokenCommittee {
            base: BaseCommittee {
                id,
                description: description.into(),
                members,
                permissions,
                vote_threshold,
                proposal_duration,
                tally_option,
            },
            quorum,
            tally_denom: tally_denom.into(),
        })
    }

    pub fn base(&self) -> &BaseCommittee {
        match self {
            Committee::Member(c) => &c.base,
            Committee::Token(c) => &c.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut BaseCommittee {
        match self {
            Committee::Member(c) => &mut c.base,
            Committee::Token(c) => &mut c.base,
        }
    }

    pub fn id(&self) -> u64 {
        self.base().id
    }

    pub fn committee_type(&self) -> &'static str {
        match self {
            Committee::Member(_) => MEMBER_COMMITTEE_TYPE,
            Committee::Token(_) => TOKEN_COMMITTEE_TYPE,
        }
    }

    pub fn description(&self) -> &str {
        &self.base().description
    }

    pub fn members(&self) -> &[Address] {
        &self.base().members
    }

    pub fn has_member(&self, addr: &Address) -> bool {
        self.base().has_member(addr)
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.base().permissions
    }

    pub fn vote_threshold(&self) -> Dec {
        self.base().vote_threshold
    }

    pub fn proposal_duration(&self) -> Duration {
        self.base().proposal_duration
    }

    pub fn tally_option(&self) -> TallyOption {
        self.base().tally_option
    }

    pub fn is_member_committee(&self) -> bool {
        matches!(self, Committee::Member(_))
    }

    /// Whether the committee may enact `proposal`.
    ///
    /// Permissions are OR'd: one allowing permission is enough.
    pub fn has_permissions_for(
        &self,
        store: &dyn KvStore,
        params: &ParamKeeper,
        proposal: &PubProposal,
    ) -> bool {
        let allowed = self
            .permissions()
            .iter()
            .any(|p| p.allows(store, params, proposal));
        debug!(
            "Committee {} permission check for {} proposal: {}",
            self.id(),
            proposal.proposal_type(),
            if allowed { "allowed" } else { "denied" }
        );
        allowed
    }

    /// Validate with the default protocol limits
    pub fn validate(&self) -> CommitteeResult<()> {
        self.validate_with(&ProtocolLimits::default())
    }

    pub fn validate_with(&self, limits: &ProtocolLimits) -> CommitteeResult<()> {
        match self {
            Committee::Member(c) => c.base.validate(limits, true),
            Committee::Token(c) => {
                if c.tally_denom == limits.bond_denom {
                    return Err(CommitteeError::InvalidCommittee(format!(
                        "invalid tally denom: {}",
                        c.tally_denom
                    )));
                }
                validate_denom(&c.tally_denom)?;
                if c.quorum > Dec::one() {
                    return Err(CommitteeError::InvalidCommittee(format!(
                        "invalid quorum: {}",
                        c.quorum
                    )));
                }
                c.base.validate(limits, false)
            }
        }
    }
}

impl fmt::Display for Committee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = self.base();
        writeln!(f, "Committee {}:", base.id)?;
        writeln!(f, "  Type:             {}", self.committee_type())?;
        writeln!(f, "  Description:      {}", base.description)?;
        writeln!(f, "  Members:          {}", base.members.len())?;
        writeln!(f, "  Permissions:      {}", base.permissions.len())?;
        writeln!(f, "  VoteThreshold:    {}", base.vote_threshold)?;
        writeln!(f, "  ProposalDuration: {:?}", base.proposal_duration)?;
        write!(f, "  TallyOption:      {}", base.tally_option)?;
        if let Committee::Token(c) = self {
            write!(f, "\n  Quorum:           {}", c.quorum)?;
            write!(f, "\n  TallyDenom:       {}", c.tally_denom)?;
        }
        Ok(())
    }
}

/// Denoms must match `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`
pub fn validate_denom(denom: &str) -> CommitteeResult<()> {
    let bytes = denom.as_bytes();
    let valid_len = (3..=128).contains(&bytes.len());
    let valid_first = bytes.first().map_or(false, |b| b.is_ascii_alphabetic());
    let valid_rest = bytes
        .iter()
        .skip(1)
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b':' | b'.' | b'_' | b'-'));

    if valid_len && valid_first && valid_rest {
        Ok(())
    } else {
        Err(CommitteeError::InvalidCommittee(format!(
            "invalid denom: {}",
            denom
        )))
    }
}
