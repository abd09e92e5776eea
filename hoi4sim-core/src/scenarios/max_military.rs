//! Military buildup scenario: how many military factories can a country
//! field by a deadline, and how many civilian factories should it build
//! first to get there.

use crate::calendar::Date;
use crate::config::SimConfig;
use crate::engine::{ConstructionEngine, ScenarioHooks, SimError, SimInputs};
use crate::events::BuildLog;
use crate::laws::DEFAULT_END_DATE;
use crate::orders::{BuildCount, BuildOrder, ObjectType};
use crate::policy::PolicyTimeline;
use log::info;
use serde::{Deserialize, Serialize};

const TRACKED: [ObjectType; 2] = [ObjectType::CivilianFactory, ObjectType::MilitaryFactory];

/// Keeps every line busy: once the civilian phase drains, the queue
/// refills with single military factories forever. The run always lasts
/// until the end date.
struct MaxMilitaryHooks;

impl ScenarioHooks for MaxMilitaryHooks {
    fn tracked_objects(&self) -> &[ObjectType] {
        &TRACKED
    }

    fn on_queue_drained(&mut self, engine: &mut ConstructionEngine) {
        engine.enqueue(BuildOrder::generic(
            ObjectType::MilitaryFactory,
            BuildCount::Finite(1),
        ));
    }

    fn quit_triggered(&self, _engine: &ConstructionEngine) -> bool {
        false
    }
}

/// Result of one buildup run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilitaryOutcome {
    pub civilian_first: u32,
    pub military: u32,
    pub civilian: u32,
    pub log: BuildLog,
}

/// One sweep sample: military factories reached for a given civilian
/// investment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EfficiencyPoint {
    pub civilian_first: u32,
    pub military: u32,
}

/// Scenario parameters; each run constructs a fresh engine.
#[derive(Debug, Clone)]
pub struct MaxMilitary {
    pub country: String,
    pub timeline: PolicyTimeline,
    pub trade_bonus: i64,
    /// Average infrastructure of the generic sites everything is built
    /// at; every factory's throughput scales with it.
    pub infrastructure: u8,
    pub end_date: Date,
}

impl MaxMilitary {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            timeline: PolicyTimeline::new(),
            trade_bonus: 0,
            infrastructure: SimConfig::default().default_infrastructure,
            end_date: DEFAULT_END_DATE,
        }
    }

    /// Build `civilian_first` civilian factories (in parallel across
    /// lines), then military factories until the end date.
    pub fn run(&self, civilian_first: u32) -> Result<MilitaryOutcome, SimError> {
        let config = SimConfig {
            default_infrastructure: self.infrastructure,
            ..SimConfig::default()
        };
        let mut engine = ConstructionEngine::for_country(&self.country)?.with_config(config);
        let build_order = (0..civilian_first)
            .map(|_| BuildOrder::generic(ObjectType::CivilianFactory, BuildCount::Finite(1)))
            .collect();
        let inputs = SimInputs {
            build_order,
            timeline: self.timeline.clone(),
            trade_bonus: self.trade_bonus,
            end_date: self.end_date,
            ..Default::default()
        };
        let log = engine.run(&inputs, &mut MaxMilitaryHooks)?;
        Ok(MilitaryOutcome {
            civilian_first,
            military: engine.counts().military,
            civilian: engine.counts().civilian,
            log,
        })
    }

    /// Military factories reached for each civilian investment in
    /// `0..=max_civilian_first`.
    pub fn efficiency_sweep(&self, max_civilian_first: u32) -> Result<Vec<EfficiencyPoint>, SimError> {
        (0..=max_civilian_first)
            .map(|civilian_first| {
                let outcome = self.run(civilian_first)?;
                Ok(EfficiencyPoint {
                    civilian_first,
                    military: outcome.military,
                })
            })
            .collect()
    }

    /// Sweep point with the most military factories; ties go to the
    /// smallest civilian investment.
    pub fn find_optimum(&self, max_civilian_first: u32) -> Result<EfficiencyPoint, SimError> {
        let sweep = self.efficiency_sweep(max_civilian_first)?;
        let mut best = EfficiencyPoint {
            civilian_first: 0,
            military: 0,
        };
        for point in sweep {
            if point.military > best.military {
                best = point;
            }
        }
        info!(
            "{}: optimum is {} civilian factories first for {} military",
            self.country, best.civilian_first, best.military
        );
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Date;

    fn scenario(end: Date) -> MaxMilitary {
        MaxMilitary {
            end_date: end,
            ..MaxMilitary::new("SOV")
        }
    }

    #[test]
    fn test_runs_until_end_date() {
        let end = Date::new(1936, 12, 31).unwrap();
        let outcome = scenario(end).run(0).unwrap();

        assert_eq!(outcome.log.final_day(), Some(365));
        assert!(outcome.military > 0);
        assert_eq!(outcome.civilian, 0);
        assert_eq!(
            outcome.log.completed(ObjectType::MilitaryFactory),
            outcome.military as usize
        );
    }

    #[test]
    fn test_civilian_phase_runs_first() {
        let end = Date::new(1937, 12, 31).unwrap();
        let outcome = scenario(end).run(3).unwrap();

        assert_eq!(outcome.civilian, 3);
        assert!(outcome.military > 0);
        let first_civilian = *outcome
            .log
            .completion_days(ObjectType::CivilianFactory)
            .first()
            .unwrap();
        let first_military = *outcome
            .log
            .completion_days(ObjectType::MilitaryFactory)
            .first()
            .unwrap();
        // Civilian orders sit ahead of every refill order in the queue,
        // so a civilian factory finishes before any military one
        assert!(first_civilian < first_military);
    }

    #[test]
    fn test_sweep_covers_range_and_optimum_is_max() {
        let end = Date::new(1937, 6, 1).unwrap();
        let scenario = scenario(end);
        let sweep = scenario.efficiency_sweep(4).unwrap();

        assert_eq!(sweep.len(), 5);
        assert_eq!(sweep[0].civilian_first, 0);
        assert_eq!(sweep[4].civilian_first, 4);

        let best = scenario.find_optimum(4).unwrap();
        assert!(sweep.iter().all(|p| p.military <= best.military));
        // Ties resolve to the cheapest investment
        let cheapest = sweep.iter().find(|p| p.military == best.military).unwrap();
        assert_eq!(best.civilian_first, cheapest.civilian_first);
    }

    #[test]
    fn test_infrastructure_scales_output() {
        // Same run on barren vs fully developed build sites; the
        // throughput bonus spans 1.0x to 2.0x, so the factory count must
        // grow with it.
        let end = Date::new(1936, 12, 31).unwrap();
        let barren = MaxMilitary {
            infrastructure: 0,
            ..scenario(end)
        }
        .run(0)
        .unwrap();
        let developed = MaxMilitary {
            infrastructure: 10,
            ..scenario(end)
        }
        .run(0)
        .unwrap();

        assert!(developed.military > barren.military);
    }

    #[test]
    fn test_repeat_runs_agree() {
        let end = Date::new(1936, 6, 1).unwrap();
        let scenario = scenario(end);
        assert_eq!(scenario.run(2).unwrap(), scenario.run(2).unwrap());
    }
}
