//! Policy state: which law is active in each category, the construction
//! bonus they combine to, and the scheduled timeline of law changes.

use crate::calendar::Date;
use crate::laws::{find_law, LawCategory, LawDef};
use crate::orders::ObjectType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    #[error("unknown law '{0}'")]
    UnknownLaw(String),
    #[error("no laws are active; apply a starting-law set first")]
    NoActivePolicy,
    #[error("no economy law is active, consumer-goods penalty is undefined")]
    NoEconomicsLaw,
}

/// One scheduled law change: the named laws become active on `date`,
/// each replacing the previous law of its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub date: Date,
    pub laws: Vec<String>,
}

/// Ordered schedule of law changes over a run.
///
/// Entries are applied on the morning of their date, before any
/// construction progress accrues. Entries sharing a date are applied in
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyTimeline {
    entries: Vec<TimelineEntry>,
}

impl PolicyTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, date: Date, laws: &[&str]) -> Self {
        self.push(date, laws);
        self
    }

    pub fn push(&mut self, date: Date, laws: &[&str]) {
        self.entries.push(TimelineEntry {
            date,
            laws: laws.iter().map(|s| s.to_string()).collect(),
        });
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    /// Entries sorted by date, stable within a date. The engine consumes
    /// this at run start.
    pub(crate) fn sorted_entries(&self) -> Vec<TimelineEntry> {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|e| e.date);
        entries
    }
}

/// Per-object-type speed multipliers derived from the active laws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildBonus {
    pub infrastructure: f64,
    pub civilian: f64,
    pub military: f64,
}

impl BuildBonus {
    pub fn get(&self, object: ObjectType) -> f64 {
        match object {
            ObjectType::Infrastructure => self.infrastructure,
            ObjectType::CivilianFactory => self.civilian,
            ObjectType::MilitaryFactory => self.military,
        }
    }
}

/// The set of currently active laws, at most one per category.
#[derive(Debug, Clone, Default)]
pub struct PolicyState {
    active: HashMap<LawCategory, &'static LawDef>,
}

impl PolicyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate the named laws, replacing the active law of each one's
    /// category. Returns whether an economy law changed, since that
    /// forces a capacity redistribution.
    pub fn apply(&mut self, laws: &[String]) -> Result<bool, PolicyError> {
        let mut economy_changed = false;
        for name in laws {
            let law = find_law(name).ok_or_else(|| PolicyError::UnknownLaw(name.clone()))?;
            let previous = self.active.insert(law.category, law);
            if law.category == LawCategory::Economy && previous != Some(law) {
                economy_changed = true;
            }
        }
        Ok(economy_changed)
    }

    pub fn active(&self, category: LawCategory) -> Option<&'static LawDef> {
        self.active.get(&category).copied()
    }

    /// Multiplier per object type: `1 + sum of active law modifiers`,
    /// floored at zero.
    pub fn build_bonus(&self) -> Result<BuildBonus, PolicyError> {
        if self.active.is_empty() {
            return Err(PolicyError::NoActivePolicy);
        }
        let sum = |object: ObjectType| -> f64 {
            let total: f64 = self.active.values().map(|law| law.modifier(object)).sum();
            (1.0 + total).max(0.0)
        };
        Ok(BuildBonus {
            infrastructure: sum(ObjectType::Infrastructure),
            civilian: sum(ObjectType::CivilianFactory),
            military: sum(ObjectType::MilitaryFactory),
        })
    }

    /// Consumer-goods penalty of the active economy law.
    pub fn consumer_goods_penalty(&self) -> Result<f64, PolicyError> {
        self.active
            .get(&LawCategory::Economy)
            .and_then(|law| law.consumer_goods_penalty)
            .ok_or(PolicyError::NoEconomicsLaw)
    }
}
