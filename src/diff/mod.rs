//! Attribute-level comparison of a live parameter record against a proposed one.
//!
//! Every function here answers allow/deny. Malformed input (unparsable JSON,
//! a record of the wrong shape, missing or extra attributes) is a denial,
//! never an error.

use log::debug;
use serde_json::{Map, Value};

use crate::types::{AllowedParamsChange, SubparamRequirement};

/// A single-object parameter record: attribute name to value
pub type SubparamChanges = Map<String, Value>;

/// A list-shaped parameter record
pub type MultiSubparamChanges = Vec<SubparamChanges>;

/// Decide whether replacing `current_raw` with `incoming` is allowed by `allowed`.
///
/// A value whose first non-whitespace character is `[` is treated as a list
/// record and checked against `multi_subparams_requirements`; anything else is
/// a single record checked against `single_subparam_allowed_attrs`.
pub fn allows_change(allowed: &AllowedParamsChange, current_raw: &[u8], incoming: &str) -> bool {
    if is_list_value(incoming) {
        let incoming: MultiSubparamChanges = match serde_json::from_str(incoming) {
            Ok(v) => v,
            Err(err) => {
                debug!("Proposed list value is malformed: {}", err);
                return false;
            }
        };
        let current: MultiSubparamChanges = match serde_json::from_slice(current_raw) {
            Ok(v) => v,
            Err(err) => {
                debug!("Live list value is not a list of records: {}", err);
                return false;
            }
        };
        return allows_multi_params_change(
            &allowed.multi_subparams_requirements,
            &current,
            &incoming,
        );
    }

    let incoming: SubparamChanges = match serde_json::from_str(incoming) {
        Ok(v) => v,
        Err(err) => {
            debug!("Proposed value is malformed: {}", err);
            return false;
        }
    };
    let current: SubparamChanges = match serde_json::from_slice(current_raw) {
        Ok(v) => v,
        Err(err) => {
            debug!("Live value is not a record: {}", err);
            return false;
        }
    };

    validate_param_changes_are_allowed(&current, &incoming, &allowed.single_subparam_allowed_attrs)
}

fn is_list_value(value: &str) -> bool {
    value.trim_start().starts_with('[')
}

/// Attributes in `allow_list` may take any value; every other attribute must
/// be unchanged. The attribute sets themselves must be identical.
pub fn validate_param_changes_are_allowed(
    current: &SubparamChanges,
    incoming: &SubparamChanges,
    allow_list: &[String],
) -> bool {
    if current.len() != incoming.len() {
        return false;
    }

    for (attr, current_value) in current {
        let incoming_value = match incoming.get(attr) {
            Some(v) => v,
            None => return false,
        };

        if allow_list.iter().any(|a| a == attr) {
            continue;
        }

        if current_value != incoming_value {
            debug!("Attribute '{}' changed but is not in the allow list", attr);
            return false;
        }
    }

    true
}

/// Check a list-shaped parameter change against its requirements.
///
/// The lists must have equal length. Each requirement must locate a record
/// in the current list. Records matched by a requirement keep their identity
/// in the incoming list and may only change the requirement's allowed
/// attributes. Records not covered by any requirement must reappear unchanged.
pub fn allows_multi_params_change(
    requirements: &[SubparamRequirement],
    current: &[SubparamChanges],
    incoming: &[SubparamChanges],
) -> bool {
    if current.len() != incoming.len() {
        return false;
    }

    for req in requirements {
        if !current.iter().any(|record| matches_requirement(record, req)) {
            debug!(
                "No live record with {} = {}",
                req.match_key, req.match_value
            );
            return false;
        }
    }

    let mut claimed = vec![false; incoming.len()];

    for record in current {
        let requirement = requirements.iter().find(|req| matches_requirement(record, req));

        let counterpart = match requirement {
            Some(req) => claim(&mut claimed, incoming, |candidate| {
                matches_requirement(candidate, req)
            }),
            None => claim(&mut claimed, incoming, |candidate| candidate == record),
        };

        let incoming_record = match counterpart {
            Some(index) => &incoming[index],
            None => return false,
        };

        if let Some(req) = requirement {
            if !validate_param_changes_are_allowed(record, incoming_record, &req.allowed_attrs) {
                return false;
            }
        }
    }

    true
}

fn matches_requirement(record: &SubparamChanges, req: &SubparamRequirement) -> bool {
    match record.get(&req.match_key) {
        Some(Value::String(s)) => *s == req.match_value,
        _ => false,
    }
}

/// Claim the first unclaimed incoming record accepted by `accept`
fn claim<F>(claimed: &mut [bool], incoming: &[SubparamChanges], accept: F) -> Option<usize>
where
    F: Fn(&SubparamChanges) -> bool,
{
    let index = incoming
        .iter()
        .enumerate()
        .position(|(i, candidate)| !claimed[i] && accept(candidate))?;
    claimed[index] = true;
    Some(index)
}
