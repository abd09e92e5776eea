//! Append-only run log: one event per completion plus a terminal end
//! marker. Serializes to JSONL for offline analysis.

use crate::calendar::Date;
use crate::laws::GAME_START;
use crate::orders::ObjectType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuildEvent {
    /// A construction line finished one object.
    Completed {
        day: i64,
        object: ObjectType,
        site: String,
    },
    /// The run terminated, whether by end date or scenario quit.
    End { day: i64 },
}

impl BuildEvent {
    pub fn day(&self) -> i64 {
        match self {
            BuildEvent::Completed { day, .. } | BuildEvent::End { day } => *day,
        }
    }

    pub fn date(&self) -> Date {
        GAME_START.add_days(self.day())
    }
}

/// Ordered record of everything a run produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildLog {
    events: Vec<BuildEvent>,
}

impl BuildLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_completion(&mut self, day: i64, object: ObjectType, site: &str) {
        self.events.push(BuildEvent::Completed {
            day,
            object,
            site: site.to_string(),
        });
    }

    pub(crate) fn record_end(&mut self, day: i64) {
        self.events.push(BuildEvent::End { day });
    }

    pub fn events(&self) -> &[BuildEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Day of the end marker, if the run terminated.
    pub fn final_day(&self) -> Option<i64> {
        self.events.iter().rev().find_map(|e| match e {
            BuildEvent::End { day } => Some(*day),
            _ => None,
        })
    }

    /// Completion days of one object type, in log order.
    pub fn completion_days(&self, object: ObjectType) -> Vec<i64> {
        self.events
            .iter()
            .filter_map(|e| match e {
                BuildEvent::Completed {
                    day, object: o, ..
                } if *o == object => Some(*day),
                _ => None,
            })
            .collect()
    }

    /// Total completions of one object type.
    pub fn completed(&self, object: ObjectType) -> usize {
        self.completion_days(object).len()
    }

    /// One JSON object per line, in event order.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for event in &self.events {
            out.push_str(&serde_json::to_string(event)?);
            out.push('\n');
        }
        Ok(out)
    }
}
