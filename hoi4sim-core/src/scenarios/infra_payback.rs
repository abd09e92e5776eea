//! Infrastructure payback scenario: does raising a site's infrastructure
//! before building factories there ever beat building the factories
//! straight away?
//!
//! Two lines with identical pinned assignments race. The subject line
//! spends its opening weeks on infrastructure, the control line builds
//! civilian factories from day one at a twin of the same site. Each day
//! the factory-day deficit grows by the control's completed-factory lead;
//! once the boosted subject line overtakes, the deficit shrinks and the
//! run quits the day it turns negative. That day is the payback day.

use crate::calendar::Date;
use crate::engine::{
    ConstructionEngine, LinePromotion, ScenarioHooks, SimError, SimInputs,
};
use crate::events::BuildLog;
use crate::laws::DEFAULT_END_DATE;
use crate::orders::{BuildCount, BuildOrder, ObjectType};
use crate::policy::PolicyTimeline;
use crate::site::{ConstructionSite, MAX_INFRASTRUCTURE};
use log::debug;
use serde::{Deserialize, Serialize};

const TRACKED: [ObjectType; 2] = [ObjectType::Infrastructure, ObjectType::CivilianFactory];

const SUBJECT_SLOT: usize = 0;
const CONTROL_SLOT: usize = 1;

/// Both slots get a full line of factories, capacity notwithstanding;
/// the race only makes sense with equal throughput on both sides.
const PINNED_LINE: u32 = 15;

struct InfraPaybackHooks {
    civilian_built: [i64; 2],
    deficit_total: i64,
    paid_back: bool,
}

impl InfraPaybackHooks {
    fn new() -> Self {
        Self {
            civilian_built: [0; 2],
            deficit_total: 0,
            paid_back: false,
        }
    }
}

impl ScenarioHooks for InfraPaybackHooks {
    fn tracked_objects(&self) -> &[ObjectType] {
        &TRACKED
    }

    /// Keeps the subject's civilian order in the same slot when its
    /// infrastructure order drains.
    fn promotion(&self) -> LinePromotion {
        LinePromotion::ReplaceInPlace
    }

    fn line_assignments(&mut self, _engine: &ConstructionEngine) -> Result<Vec<u32>, SimError> {
        Ok(vec![PINNED_LINE, PINNED_LINE])
    }

    fn on_completion(&mut self, slot: usize, _site: &str, object: ObjectType) {
        if object == ObjectType::CivilianFactory && slot < self.civilian_built.len() {
            self.civilian_built[slot] += 1;
        }
    }

    /// The daily lead is counted in *usable* factories: consumer goods
    /// claim `ceil(built * penalty)` of each line's output.
    fn on_day_end(&mut self, engine: &ConstructionEngine) {
        let penalty = engine.policy().consumer_goods_penalty().unwrap_or(0.0);
        self.deficit_total += usable(self.civilian_built[CONTROL_SLOT], penalty)
            - usable(self.civilian_built[SUBJECT_SLOT], penalty);
        if self.deficit_total < 0 {
            self.paid_back = true;
            debug!("deficit went negative on day {}", engine.day());
        }
    }

    fn quit_triggered(&self, _engine: &ConstructionEngine) -> bool {
        self.paid_back
    }
}

/// Result of one payback race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaybackOutcome {
    pub site: String,
    pub infrastructure_levels: u8,
    /// Day the accumulated factory-day deficit turned negative, or
    /// `None` if the investment never paid back before the end date.
    pub payback_day: Option<i64>,
    /// Civilian factories the subject line had finished by the end of
    /// the race.
    pub subject_civilian: i64,
    pub log: BuildLog,
}

/// One sweep sample: payback day per number of levels built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaybackPoint {
    pub infrastructure_levels: u8,
    pub payback_day: Option<i64>,
}

/// Verdict for one real site: is a single infrastructure level worth it?
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteVerdict {
    pub site: String,
    pub infrastructure: u8,
    /// The site's actual slot pool. The race lifts slot limits, so this
    /// is re-checked against what the subject built.
    pub slots: Option<u32>,
    pub payback_day: Option<i64>,
    pub subject_civilian: i64,
}

impl SiteVerdict {
    /// An investment only pays off if it breaks even in time *and* the
    /// real site has room for every factory built before that point.
    pub fn profitable(&self) -> bool {
        self.payback_day.is_some()
            && self
                .slots
                .is_none_or(|slots| self.subject_civilian <= i64::from(slots))
    }
}

/// Scenario parameters; each race constructs a fresh engine.
#[derive(Debug, Clone)]
pub struct InfraPayback {
    pub country: String,
    pub timeline: PolicyTimeline,
    pub end_date: Date,
}

impl InfraPayback {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            timeline: PolicyTimeline::new(),
            end_date: DEFAULT_END_DATE,
        }
    }

    /// Race `levels` infrastructure levels at `site` against building
    /// civilian factories directly. Slot limits are lifted on both twins
    /// so the comparison measures throughput alone.
    pub fn run(&self, site: &ConstructionSite, levels: u8) -> Result<PaybackOutcome, SimError> {
        if levels == 0 || site.infrastructure() + levels > MAX_INFRASTRUCTURE {
            return Err(SimError::InvalidBuildOrder(format!(
                "{levels} infrastructure levels on top of level {} at {}",
                site.infrastructure(),
                site.name()
            )));
        }
        let mut engine = ConstructionEngine::for_country(&self.country)?;
        let subject =
            ConstructionSite::new(site.name(), site.infrastructure(), None, site.country())?;
        let control_name = control_name(site.name());
        let control =
            ConstructionSite::new(&control_name, site.infrastructure(), None, site.country())?;
        let inputs = SimInputs {
            build_order: vec![
                BuildOrder::new(
                    site.name(),
                    ObjectType::Infrastructure,
                    BuildCount::Finite(levels.into()),
                ),
                BuildOrder::new(&control_name, ObjectType::CivilianFactory, BuildCount::Infinite),
                BuildOrder::new(site.name(), ObjectType::CivilianFactory, BuildCount::Infinite),
            ],
            timeline: self.timeline.clone(),
            end_date: self.end_date,
            sites: vec![subject, control],
            ..Default::default()
        };
        let mut hooks = InfraPaybackHooks::new();
        let log = engine.run(&inputs, &mut hooks)?;
        let payback_day = if hooks.paid_back { log.final_day() } else { None };
        Ok(PaybackOutcome {
            site: site.name().to_string(),
            infrastructure_levels: levels,
            payback_day,
            subject_civilian: hooks.civilian_built[SUBJECT_SLOT],
            log,
        })
    }

    /// Payback day for every feasible number of levels at `site`.
    pub fn payback_sweep(&self, site: &ConstructionSite) -> Result<Vec<PaybackPoint>, SimError> {
        (1..=MAX_INFRASTRUCTURE - site.infrastructure())
            .map(|levels| {
                let outcome = self.run(site, levels)?;
                Ok(PaybackPoint {
                    infrastructure_levels: levels,
                    payback_day: outcome.payback_day,
                })
            })
            .collect()
    }

    /// One-level verdict for each site. Sites already at the level cap
    /// are skipped.
    pub fn site_verdicts(&self, sites: &[ConstructionSite]) -> Result<Vec<SiteVerdict>, SimError> {
        sites
            .iter()
            .filter(|site| site.infrastructure() < MAX_INFRASTRUCTURE)
            .map(|site| {
                let outcome = self.run(site, 1)?;
                Ok(SiteVerdict {
                    site: site.name().to_string(),
                    infrastructure: site.infrastructure(),
                    slots: site.slots(),
                    payback_day: outcome.payback_day,
                    subject_civilian: outcome.subject_civilian,
                })
            })
            .collect()
    }

    /// The sites where one more infrastructure level pays back in time.
    pub fn profitable_sites(
        &self,
        sites: &[ConstructionSite],
    ) -> Result<Vec<SiteVerdict>, SimError> {
        let mut verdicts = self.site_verdicts(sites)?;
        verdicts.retain(SiteVerdict::profitable);
        Ok(verdicts)
    }
}

fn control_name(site: &str) -> String {
    format!("{site}_control")
}

/// Factories left after the consumer-goods reservation on `built`.
fn usable(built: i64, penalty: f64) -> i64 {
    built - (built as f64 * penalty).ceil() as i64
}
