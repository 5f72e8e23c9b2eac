use std::fmt;

use serde::{Deserialize, Serialize};

pub const EVENT_TYPE_PROPOSAL_SUBMIT: &str = "proposal_submit";
pub const EVENT_TYPE_PROPOSAL_VOTE: &str = "proposal_vote";
pub const EVENT_TYPE_PROPOSAL_CLOSE: &str = "proposal_close";

pub const ATTRIBUTE_KEY_COMMITTEE_ID: &str = "committee_id";
pub const ATTRIBUTE_KEY_PROPOSAL_ID: &str = "proposal_id";
pub const ATTRIBUTE_KEY_DEADLINE: &str = "deadline";
pub const ATTRIBUTE_KEY_VOTER: &str = "voter";
pub const ATTRIBUTE_KEY_VOTE: &str = "vote";
pub const ATTRIBUTE_KEY_PROPOSAL_TALLY: &str = "proposal_tally";
pub const ATTRIBUTE_KEY_PROPOSAL_OUTCOME: &str = "proposal_outcome";
pub const ATTRIBUTE_KEY_ENACTED: &str = "enacted";

/// A structured notification emitted while processing a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: String,
    pub attributes: Vec<(String, String)>,
}

impl Event {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            attributes: Vec::new(),
        }
    }

    pub fn attribute(mut self, key: &str, value: impl ToString) -> Self {
        self.attributes.push((key.to_string(), value.to_string()));
        self
    }

    /// First value recorded under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for (key, value) in &self.attributes {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

/// Collects the events emitted during one operation
#[derive(Debug, Clone, Default)]
pub struct EventManager {
    events: Vec<Event>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn extend(&mut self, events: Vec<Event>) {
        self.events.extend(events);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn events_of(&self, kind: &str) -> impl Iterator<Item = &Event> + '_ {
        let kind = kind.to_string();
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}
