use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::diff;
use crate::errors::{CommitteeError, CommitteeResult};
use crate::params::ParamKeeper;
use crate::store::KvStore;
use crate::types::{ParamChange, PubProposal};

/// A predicate deciding whether a committee may enact a proposal.
///
/// The set of permissions is closed on purpose: every decision a committee
/// can make is visible from this one `match`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Permission {
    /// Allows any proposal
    Unconditional,
    /// Allows only text proposals
    TextOnly,
    /// Allows only software upgrade proposals
    UpgradeOnly,
    /// Allows parameter changes that touch only whitelisted attributes
    ParameterChange(ParamsChangePermission),
}

impl Permission {
    pub fn allows(&self, store: &dyn KvStore, params: &ParamKeeper, proposal: &PubProposal) -> bool {
        match self {
            Permission::Unconditional => true,
            Permission::TextOnly => matches!(proposal, PubProposal::Text { .. }),
            Permission::UpgradeOnly => matches!(proposal, PubProposal::SoftwareUpgrade { .. }),
            Permission::ParameterChange(perm) => perm.allows(store, params, proposal),
        }
    }

    pub fn validate(&self) -> CommitteeResult<()> {
        match self {
            Permission::ParameterChange(perm) => perm.validate(),
            _ => Ok(()),
        }
    }
}

/// Whitelist of parameter records (and attributes within them) a committee may change
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamsChangePermission {
    #[serde(default)]
    pub allowed_params_changes: Vec<AllowedParamsChange>,
}

impl ParamsChangePermission {
    pub fn new(allowed_params_changes: Vec<AllowedParamsChange>) -> Self {
        Self {
            allowed_params_changes,
        }
    }

    /// Every change in the proposal must be allowed by at least one targeted
    /// entry; there is no partial approval.
    pub fn allows(&self, store: &dyn KvStore, params: &ParamKeeper, proposal: &PubProposal) -> bool {
        let changes = match proposal {
            PubProposal::ParameterChange { changes, .. } => changes,
            _ => return false,
        };

        if changes.is_empty() || self.allowed_params_changes.is_empty() {
            return false;
        }

        for change in changes {
            let allowed = self
                .targeted_by(change)
                .any(|entry| entry.allows_param_change(store, params, change));

            if !allowed {
                debug!(
                    "Parameter change {}/{} not allowed by permission",
                    change.subspace, change.key
                );
                return false;
            }
        }

        true
    }

    /// Entries matching a change's subspace and key
    fn targeted_by<'a>(
        &'a self,
        change: &'a ParamChange,
    ) -> impl Iterator<Item = &'a AllowedParamsChange> + 'a {
        self.allowed_params_changes
            .iter()
            .filter(move |p| p.subspace == change.subspace && p.key == change.key)
    }

    fn validate(&self) -> CommitteeResult<()> {
        for entry in &self.allowed_params_changes {
            if entry.subspace.is_empty() || entry.key.is_empty() {
                return Err(CommitteeError::InvalidCommittee(
                    "allowed params change must name a subspace and key".to_string(),
                ));
            }
            for req in &entry.multi_subparams_requirements {
                if req.match_key.is_empty() {
                    return Err(CommitteeError::InvalidCommittee(format!(
                        "subparam requirement for {}/{} has an empty match key",
                        entry.subspace, entry.key
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Rules for one on-chain parameter record, identified by subspace and key.
///
/// Single-object records use `single_subparam_allowed_attrs`; list-shaped
/// records use `multi_subparams_requirements`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllowedParamsChange {
    pub subspace: String,
    pub key: String,
    #[serde(default)]
    pub single_subparam_allowed_attrs: Vec<String>,
    #[serde(default)]
    pub multi_subparams_requirements: Vec<SubparamRequirement>,
}

impl AllowedParamsChange {
    pub fn single(subspace: &str, key: &str, allowed_attrs: &[&str]) -> Self {
        Self {
            subspace: subspace.to_string(),
            key: key.to_string(),
            single_subparam_allowed_attrs: allowed_attrs.iter().map(|s| s.to_string()).collect(),
            multi_subparams_requirements: Vec::new(),
        }
    }

    pub fn multi(subspace: &str, key: &str, requirements: Vec<SubparamRequirement>) -> Self {
        Self {
            subspace: subspace.to_string(),
            key: key.to_string(),
            single_subparam_allowed_attrs: Vec::new(),
            multi_subparams_requirements: requirements,
        }
    }

    /// Compare a proposed value against the live record for this entry's subspace and key.
    ///
    /// # Panics
    ///
    /// Panics if the subspace is not registered on this chain. That means the
    /// chain was set up without a module the permission references.
    pub fn allows_param_change(
        &self,
        store: &dyn KvStore,
        params: &ParamKeeper,
        change: &ParamChange,
    ) -> bool {
        if self.subspace != change.subspace || self.key != change.key {
            return false;
        }

        let subspace = match params.get_subspace(&change.subspace) {
            Some(subspace) => subspace,
            None => {
                error!(
                    "Permission references subspace '{}' which is not registered",
                    change.subspace
                );
                panic!(
                    "invariant violation: subspace '{}' not found",
                    change.subspace
                );
            }
        };

        let current = match subspace.get_raw(store, &change.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No live value for {}/{}", change.subspace, change.key);
                return false;
            }
            Err(err) => {
                error!(
                    "Failed to read live value for {}/{}: {}",
                    change.subspace, change.key, err
                );
                return false;
            }
        };

        diff::allows_change(self, &current, &change.value)
    }
}

/// Locates one record of a list-shaped parameter by `match_key == match_value`
/// and lists the attributes of that record that may change
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubparamRequirement {
    pub match_key: String,
    pub match_value: String,
    #[serde(default)]
    pub allowed_attrs: Vec<String>,
}

impl SubparamRequirement {
    pub fn new(match_key: &str, match_value: &str, allowed_attrs: &[&str]) -> Self {
        Self {
            match_key: match_key.to_string(),
            match_value: match_value.to_string(),
            allowed_attrs: allowed_attrs.iter().map(|s| s.to_string()).collect(),
        }
    }
}
