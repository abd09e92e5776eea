//! The day-stepped construction engine.
//!
//! A run steps one in-game day at a time. Within a day the order is
//! fixed: scheduled law changes apply first, open lines accrue progress,
//! completions are detected and recorded, factory capacity is
//! redistributed if a completion changed it, scenario hooks observe the
//! finished day, and finally termination is checked (a scenario quit
//! wins over the end date). A completion therefore lands on the first
//! day whose accrual pushes the line past the object cost.

use crate::calendar::{days_between, Date};
use crate::capacity::{available_capacity, chunk_capacity};
use crate::config::SimConfig;
use crate::events::BuildLog;
use crate::laws::{find_country, DEFAULT_END_DATE, GAME_START};
use crate::orders::{BuildCount, BuildOrder, ObjectCounts, ObjectType};
use crate::policy::{PolicyError, PolicyState, PolicyTimeline};
use crate::site::{ConstructionSite, SiteError, GENERIC_PREFIX, MAX_INFRASTRUCTURE};
use log::{debug, info, trace};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Site(#[from] SiteError),
    #[error("unknown country '{0}'")]
    UnknownCountry(String),
    #[error("invalid build order: {0}")]
    InvalidBuildOrder(String),
    #[error("end date {0} is on or before the simulation start")]
    InvalidEndDate(Date),
    #[error("no laws take effect by the first simulated day")]
    MissingStartingLaws,
    #[error("run exceeded the iteration cap of {cap} days")]
    IterationCapExceeded { cap: i64 },
    #[error("engine already completed a run; reset() it first")]
    AlreadyCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Running,
    Completed,
}

/// What happens to a line slot when its order drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePromotion {
    /// The slot is freed and the next order opens at the tail.
    ShiftToTail,
    /// The next order takes over the same slot, keeping any pinned
    /// per-slot factory assignment aligned.
    ReplaceInPlace,
}

/// An open construction line: one order being built at one site.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructionLine {
    site: String,
    object: ObjectType,
    remaining: BuildCount,
    progress: f64,
}

impl ConstructionLine {
    fn open(order: QueuedOrder) -> Self {
        Self {
            site: order.site,
            object: order.object,
            remaining: order.count,
            progress: 0.0,
        }
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn object(&self) -> ObjectType {
        self.object
    }

    pub fn remaining(&self) -> BuildCount {
        self.remaining
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }
}

/// Queue entry with the target site already resolved to a concrete name.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct QueuedOrder {
    site: String,
    object: ObjectType,
    count: BuildCount,
}

/// Everything one run consumes besides the engine's own starting state.
#[derive(Debug, Clone)]
pub struct SimInputs {
    pub build_order: Vec<BuildOrder>,
    pub timeline: PolicyTimeline,
    /// Extra civilian factories gained (or lost, if negative) via trade.
    pub trade_bonus: i64,
    pub end_date: Date,
    pub sites: Vec<ConstructionSite>,
}

impl Default for SimInputs {
    fn default() -> Self {
        Self {
            build_order: Vec::new(),
            timeline: PolicyTimeline::new(),
            trade_bonus: 0,
            end_date: DEFAULT_END_DATE,
            sites: Vec::new(),
        }
    }
}

/// Scenario customization points. Every method has a sensible default,
/// so a bare struct gets plain fixed-order construction.
pub trait ScenarioHooks {
    /// Object types this scenario accepts in the caller's build order.
    fn tracked_objects(&self) -> &[ObjectType] {
        &ObjectType::ALL
    }

    fn promotion(&self) -> LinePromotion {
        LinePromotion::ShiftToTail
    }

    /// Called whenever the engine needs an order but the queue is empty.
    /// Refilling the queue here keeps lines from starving.
    fn on_queue_drained(&mut self, _engine: &mut ConstructionEngine) {}

    /// Factory count per line slot. The default splits available capacity
    /// into full quanta.
    fn line_assignments(&mut self, engine: &ConstructionEngine) -> Result<Vec<u32>, SimError> {
        engine.default_line_assignments()
    }

    fn on_completion(&mut self, _slot: usize, _site: &str, _object: ObjectType) {}

    fn on_day_end(&mut self, _engine: &ConstructionEngine) {}

    /// Early-termination predicate, checked before the end date.
    fn quit_triggered(&self, engine: &ConstructionEngine) -> bool {
        engine.queue_len() == 0 && engine.lines().is_empty()
    }
}

/// Plain run: build the given orders in order, stop when done.
#[derive(Debug, Default)]
pub struct DefaultHooks;

impl ScenarioHooks for DefaultHooks {}

/// Day-stepped construction simulation for one country.
#[derive(Debug, Clone)]
pub struct ConstructionEngine {
    config: SimConfig,
    country: String,
    start_counts: ObjectCounts,
    starting_laws: Vec<String>,
    sites: HashMap<String, ConstructionSite>,
    queue: VecDeque<QueuedOrder>,
    lines: Vec<ConstructionLine>,
    assignments: Vec<u32>,
    policy: PolicyState,
    counts: ObjectCounts,
    trade_bonus: i64,
    generic_counter: u64,
    state: EngineState,
    log: BuildLog,
    day: i64,
}

impl ConstructionEngine {
    /// Engine preloaded with a major power's 1936 starting conditions.
    pub fn for_country(tag: &str) -> Result<Self, SimError> {
        let country = find_country(tag).ok_or_else(|| SimError::UnknownCountry(tag.to_string()))?;
        Ok(Self::with_start(
            tag,
            country.civilian,
            country.military,
            &country.starting_laws,
        ))
    }

    /// Engine with explicit starting factories and laws. The laws take
    /// effect on the first simulated day, before any user timeline entry.
    pub fn with_start(country: &str, civilian: u32, military: u32, laws: &[&str]) -> Self {
        Self {
            config: SimConfig::default(),
            country: country.to_string(),
            start_counts: ObjectCounts {
                infrastructure: 0,
                civilian,
                military,
            },
            starting_laws: laws.iter().map(|s| s.to_string()).collect(),
            sites: HashMap::new(),
            queue: VecDeque::new(),
            lines: Vec::new(),
            assignments: Vec::new(),
            policy: PolicyState::new(),
            counts: ObjectCounts::default(),
            trade_bonus: 0,
            generic_counter: 0,
            state: EngineState::Running,
            log: BuildLog::new(),
            day: 0,
        }
    }

    pub fn with_config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Run day by day until the scenario quits or the end date arrives.
    /// The engine ends up `Completed` and keeps its final state for
    /// inspection; [`ConstructionEngine::reset`] makes it reusable.
    #[tracing::instrument(skip_all, fields(country = %self.country))]
    pub fn run<H: ScenarioHooks>(
        &mut self,
        inputs: &SimInputs,
        hooks: &mut H,
    ) -> Result<BuildLog, SimError> {
        if self.state == EngineState::Completed {
            return Err(SimError::AlreadyCompleted);
        }
        let end_day = days_between(GAME_START, inputs.end_date);
        if end_day < 1 {
            return Err(SimError::InvalidEndDate(inputs.end_date));
        }
        self.trade_bonus = inputs.trade_bonus;
        for site in &inputs.sites {
            self.sites.insert(site.name().to_string(), site.clone());
        }
        self.validate_orders(&inputs.build_order, hooks)?;
        for order in &inputs.build_order {
            self.enqueue(order.clone());
        }
        let mut schedule = self.law_schedule(&inputs.timeline)?;
        info!(
            "{}: starting run, {} orders, end day {end_day}",
            self.country,
            self.queue.len()
        );

        let mut day = 1i64;
        loop {
            if day > self.config.iteration_cap {
                return Err(SimError::IterationCapExceeded {
                    cap: self.config.iteration_cap,
                });
            }
            self.day = day;

            let mut economy_changed = false;
            while schedule.front().is_some_and(|(d, _)| *d <= day) {
                if let Some((_, laws)) = schedule.pop_front() {
                    debug!("{}: day {day}, laws {laws:?} take effect", self.country);
                    economy_changed |= self.policy.apply(&laws)?;
                }
            }
            if economy_changed || day == 1 {
                self.redistribute(hooks)?;
            }
            self.fill_lines(hooks);

            self.accrue()?;
            let capacity_changed = self.complete(hooks);
            self.retire_lines(hooks);
            if capacity_changed {
                self.redistribute(hooks)?;
            }
            self.fill_lines(hooks);

            hooks.on_day_end(self);

            if hooks.quit_triggered(self) || day >= end_day {
                self.log.record_end(day);
                self.state = EngineState::Completed;
                break;
            }
            day += 1;
        }
        info!(
            "{}: run ended on day {} ({})",
            self.country,
            self.day,
            self.date()
        );
        Ok(self.log.clone())
    }

    /// Append one order to the build queue, allocating a generic site
    /// name when the order has no target.
    pub fn enqueue(&mut self, order: BuildOrder) {
        let site = match order.site {
            Some(name) => name,
            None => {
                self.generic_counter += 1;
                format!("{GENERIC_PREFIX}{}", self.generic_counter)
            }
        };
        self.queue.push_back(QueuedOrder {
            site,
            object: order.object,
            count: order.count,
        });
    }

    /// Capacity split the scenario gets unless it overrides
    /// [`ScenarioHooks::line_assignments`].
    pub fn default_line_assignments(&self) -> Result<Vec<u32>, SimError> {
        let penalty = self.policy.consumer_goods_penalty()?;
        let available =
            available_capacity(self.civilian_total(), self.military_total(), penalty);
        Ok(chunk_capacity(available, self.config.quantum))
    }

    /// Civilian factories counting toward capacity: starting stock plus
    /// everything built this run plus the trade bonus.
    pub fn civilian_total(&self) -> u32 {
        let total = i64::from(self.start_counts.civilian + self.counts.civilian) + self.trade_bonus;
        total.max(0) as u32
    }

    pub fn military_total(&self) -> u32 {
        self.start_counts.military + self.counts.military
    }

    /// Clear all run state so the engine can run again from its starting
    /// conditions.
    pub fn reset(&mut self) {
        self.sites.clear();
        self.queue.clear();
        self.lines.clear();
        self.assignments.clear();
        self.policy = PolicyState::new();
        self.counts = ObjectCounts::default();
        self.trade_bonus = 0;
        self.generic_counter = 0;
        self.state = EngineState::Running;
        self.log = BuildLog::new();
        self.day = 0;
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn day(&self) -> i64 {
        self.day
    }

    pub fn date(&self) -> Date {
        GAME_START.add_days(self.day)
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn counts(&self) -> &ObjectCounts {
        &self.counts
    }

    pub fn start_counts(&self) -> &ObjectCounts {
        &self.start_counts
    }

    pub fn lines(&self) -> &[ConstructionLine] {
        &self.lines
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn assignments(&self) -> &[u32] {
        &self.assignments
    }

    pub fn policy(&self) -> &PolicyState {
        &self.policy
    }

    pub fn site(&self, name: &str) -> Option<&ConstructionSite> {
        self.sites.get(name)
    }

    pub fn log(&self) -> &BuildLog {
        &self.log
    }

    /// Merge the starting laws (first day) with the user timeline into a
    /// day-keyed schedule. Entries dated before the start are clamped to
    /// the first day, after the starting laws.
    fn law_schedule(
        &self,
        timeline: &PolicyTimeline,
    ) -> Result<VecDeque<(i64, Vec<String>)>, SimError> {
        let mut schedule: Vec<(i64, Vec<String>)> = Vec::new();
        if !self.starting_laws.is_empty() {
            schedule.push((1, self.starting_laws.clone()));
        }
        for entry in timeline.sorted_entries() {
            let day = days_between(GAME_START, entry.date).max(1);
            schedule.push((day, entry.laws));
        }
        schedule.sort_by_key(|(day, _)| *day);
        match schedule.first() {
            Some((1, _)) => Ok(schedule.into()),
            _ => Err(SimError::MissingStartingLaws),
        }
    }

    fn validate_orders<H: ScenarioHooks>(
        &self,
        orders: &[BuildOrder],
        hooks: &H,
    ) -> Result<(), SimError> {
        let tracked = hooks.tracked_objects();
        let mut slot_demand: HashMap<&str, u32> = HashMap::new();
        let mut infra_demand: HashMap<&str, u32> = HashMap::new();
        for order in orders {
            if !tracked.contains(&order.object) {
                return Err(SimError::InvalidBuildOrder(format!(
                    "{} is not tracked by this scenario",
                    order.object
                )));
            }
            if order.count == BuildCount::Finite(0) {
                return Err(SimError::InvalidBuildOrder(
                    "order requests zero objects".to_string(),
                ));
            }
            if order.object == ObjectType::Infrastructure && order.count == BuildCount::Infinite {
                return Err(SimError::InvalidBuildOrder(
                    "infrastructure cannot be built indefinitely".to_string(),
                ));
            }
            let Some(name) = &order.site else { continue };
            if name.starts_with(GENERIC_PREFIX) {
                return Err(SimError::InvalidBuildOrder(format!(
                    "site name '{name}' uses the reserved generic prefix"
                )));
            }
            if let BuildCount::Finite(n) = order.count {
                let demand = match order.object {
                    ObjectType::Infrastructure => &mut infra_demand,
                    _ => &mut slot_demand,
                };
                *demand.entry(name.as_str()).or_default() += n;
            }
        }
        for (name, n) in infra_demand {
            // Sites not seeded yet will be created lazily at the default
            // level, so they are checked against it here.
            let level = self
                .sites
                .get(name)
                .map_or(self.config.default_infrastructure, ConstructionSite::infrastructure);
            if u32::from(level) + n > u32::from(MAX_INFRASTRUCTURE) {
                return Err(SimError::InvalidBuildOrder(format!(
                    "{n} infrastructure levels would push {name} past level {MAX_INFRASTRUCTURE}"
                )));
            }
        }
        for (name, n) in slot_demand {
            if let Some(slots) = self.sites.get(name).and_then(ConstructionSite::slots) {
                if n > slots {
                    return Err(SimError::InvalidBuildOrder(format!(
                        "{n} factories ordered at {name}, which has {slots} open slots"
                    )));
                }
            }
        }
        Ok(())
    }

    fn redistribute<H: ScenarioHooks>(&mut self, hooks: &mut H) -> Result<(), SimError> {
        let assignments = hooks.line_assignments(self)?;
        trace!("{}: day {}, assignments {assignments:?}", self.country, self.day);
        // Shrinking capacity closes surplus lines from the tail; their
        // orders go back to the queue front, unbuilt progress discarded.
        while self.lines.len() > assignments.len() {
            if let Some(line) = self.lines.pop() {
                self.queue.push_front(QueuedOrder {
                    site: line.site,
                    object: line.object,
                    count: line.remaining,
                });
            }
        }
        self.assignments = assignments;
        Ok(())
    }

    /// Open queued orders into free line slots.
    fn fill_lines<H: ScenarioHooks>(&mut self, hooks: &mut H) {
        while self.lines.len() < self.assignments.len() {
            if self.queue.is_empty() {
                hooks.on_queue_drained(self);
            }
            let Some(order) = self.queue.pop_front() else {
                break;
            };
            self.ensure_site(&order.site);
            self.lines.push(ConstructionLine::open(order));
        }
    }

    fn ensure_site(&mut self, name: &str) {
        if !self.sites.contains_key(name) {
            self.sites.insert(
                name.to_string(),
                ConstructionSite::lazy(name.to_string(), self.config.default_infrastructure),
            );
        }
    }

    fn accrue(&mut self) -> Result<(), SimError> {
        let bonus = self.policy.build_bonus()?;
        let daily: Vec<f64> = self
            .lines
            .iter()
            .enumerate()
            .map(|(slot, line)| {
                let factories = self.assignments.get(slot).copied().unwrap_or(0);
                // Infrastructure speeds up everything else built at the
                // site, not further infrastructure.
                let site_bonus = match line.object {
                    ObjectType::Infrastructure => 1.0,
                    _ => self
                        .sites
                        .get(&line.site)
                        .map_or(1.0, ConstructionSite::throughput_bonus),
                };
                self.config.base_rate * bonus.get(line.object) * site_bonus * f64::from(factories)
            })
            .collect();
        for (line, amount) in self.lines.iter_mut().zip(daily) {
            line.progress += amount;
        }
        Ok(())
    }

    /// Detect and record completions. Returns whether a completion
    /// changed factory capacity.
    fn complete<H: ScenarioHooks>(&mut self, hooks: &mut H) -> bool {
        let mut capacity_changed = false;
        for slot in 0..self.lines.len() {
            loop {
                let (site_name, object) = {
                    let line = &self.lines[slot];
                    if line.remaining.is_exhausted() || line.progress < line.object.cost() {
                        break;
                    }
                    (line.site.clone(), line.object)
                };
                self.lines[slot].progress -= object.cost();
                self.lines[slot].remaining = self.lines[slot].remaining.decrement();
                self.counts.add(object);
                self.log.record_completion(self.day, object, &site_name);
                debug!(
                    "{}: day {}, {object} completed at {site_name}",
                    self.country, self.day
                );
                hooks.on_completion(slot, &site_name, object);
                match object {
                    ObjectType::Infrastructure => {
                        if let Some(site) = self.sites.get_mut(&site_name) {
                            site.infrastructure_up();
                            if site.infrastructure() >= MAX_INFRASTRUCTURE {
                                self.lines[slot].remaining = BuildCount::Finite(0);
                            }
                        }
                    }
                    ObjectType::CivilianFactory | ObjectType::MilitaryFactory => {
                        if let Some(site) = self.sites.get_mut(&site_name) {
                            site.slots_down();
                            if site.slots() == Some(0) {
                                self.lines[slot].remaining = BuildCount::Finite(0);
                            }
                        }
                        capacity_changed = true;
                    }
                }
            }
        }
        capacity_changed
    }

    fn retire_lines<H: ScenarioHooks>(&mut self, hooks: &mut H) {
        match hooks.promotion() {
            LinePromotion::ShiftToTail => {
                self.lines.retain(|line| !line.remaining.is_exhausted());
            }
            LinePromotion::ReplaceInPlace => {
                let mut slot = 0;
                while slot < self.lines.len() {
                    if !self.lines[slot].remaining.is_exhausted() {
                        slot += 1;
                        continue;
                    }
                    if self.queue.is_empty() {
                        hooks.on_queue_drained(self);
                    }
                    if let Some(order) = self.queue.pop_front() {
                        self.ensure_site(&order.site);
                        self.lines[slot] = ConstructionLine::open(order);
                        slot += 1;
                    } else {
                        self.lines.remove(slot);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Date;

    fn date(year: i32, month: u8, day: u8) -> Date {
        Date::new(year, month, day).unwrap()
    }

    fn run_default(engine: &mut ConstructionEngine, inputs: &SimInputs) -> BuildLog {
        engine.run(inputs, &mut DefaultHooks).unwrap()
    }

    #[test]
    fn test_soviet_capacity_splits_into_quanta() {
        // 42 civ + 36 mil under civilian_economy: ceil(78 * 0.3) = 24
        // reserved, 18 available, chunked [15, 3]
        let mut engine = ConstructionEngine::for_country("SOV").unwrap();
        let inputs = SimInputs {
            build_order: vec![
                BuildOrder::generic(ObjectType::CivilianFactory, BuildCount::Infinite),
                BuildOrder::generic(ObjectType::CivilianFactory, BuildCount::Infinite),
            ],
            end_date: date(1936, 1, 1),
            ..Default::default()
        };
        run_default(&mut engine, &inputs);

        assert_eq!(engine.assignments(), &[15, 3]);
        assert_eq!(engine.lines().len(), 2);
        assert_eq!(engine.lines()[0].site(), "generic_1");
    }

    #[test]
    fn test_infrastructure_completion_day() {
        // 22 civ at 30% penalty: ceil(6.6) = 7 reserved, 15 available.
        // Rate 5 * 1.1 * 15 = 82.5/day; 3000 / 82.5 completes on day 37.
        let mut engine =
            ConstructionEngine::with_start("TST", 22, 0, &["civilian_economy", "captain_of_industry"]);
        let inputs = SimInputs {
            build_order: vec![BuildOrder::new(
                "Moscow",
                ObjectType::Infrastructure,
                BuildCount::Finite(1),
            )],
            ..Default::default()
        };
        let log = run_default(&mut engine, &inputs);

        assert_eq!(log.completion_days(ObjectType::Infrastructure), vec![37]);
        // Queue and lines drained, so the run quit on the completion day
        assert_eq!(log.final_day(), Some(37));
        assert_eq!(engine.site("Moscow").unwrap().infrastructure(), 6);
        assert_eq!(engine.counts().infrastructure, 1);
    }

    #[test]
    fn test_civilian_factory_completion_and_slot_exhaustion() {
        // One line of 15 under war_economy (civilian modifier 0):
        // 5 * 1.0 * 1.0 * 15 = 75/day, 10800 / 75 = 144 days. The single
        // slot runs out, the line retires despite the infinite count, and
        // the run quits.
        let site = ConstructionSite::new("Plain", 0, Some(1), "TST").unwrap();
        let mut engine = ConstructionEngine::with_start("TST", 22, 0, &["war_economy"]);
        let inputs = SimInputs {
            build_order: vec![BuildOrder::new(
                "Plain",
                ObjectType::CivilianFactory,
                BuildCount::Infinite,
            )],
            sites: vec![site],
            ..Default::default()
        };
        let log = run_default(&mut engine, &inputs);

        assert_eq!(log.completion_days(ObjectType::CivilianFactory), vec![144]);
        assert_eq!(log.final_day(), Some(144));
        assert_eq!(engine.site("Plain").unwrap().slots(), Some(0));
    }

    #[test]
    fn test_throughput_uses_site_infrastructure() {
        // Same setup as above but infrastructure 5: 75 * 1.5 = 112.5/day,
        // 10800 / 112.5 = 96 days.
        let site = ConstructionSite::new("Boosted", 5, Some(1), "TST").unwrap();
        let mut engine = ConstructionEngine::with_start("TST", 22, 0, &["war_economy"]);
        let inputs = SimInputs {
            build_order: vec![BuildOrder::new(
                "Boosted",
                ObjectType::CivilianFactory,
                BuildCount::Finite(1),
            )],
            sites: vec![site],
            ..Default::default()
        };
        let log = run_default(&mut engine, &inputs);

        assert_eq!(log.completion_days(ObjectType::CivilianFactory), vec![96]);
    }

    #[test]
    fn test_timeline_law_change_mid_run() {
        // Switch to war_economy after 10 days; the civilian bonus jumps
        // from 0.7 to 1.0 and the remaining days accrue faster.
        let mut engine = ConstructionEngine::with_start("TST", 22, 0, &["civilian_economy"]);
        let timeline = PolicyTimeline::new().at(date(1936, 1, 11), &["war_economy"]);
        let inputs = SimInputs {
            build_order: vec![BuildOrder::generic(
                ObjectType::CivilianFactory,
                BuildCount::Finite(1),
            )],
            timeline,
            ..Default::default()
        };
        let log = run_default(&mut engine, &inputs);

        // Days 1-10 at 5 * 0.7 * 1.5 * 15 = 78.75/day (default site infra 5)
        // leaves 10012.5; days 11+ at 5 * 1.0 * 1.5 * 15 = 112.5/day
        // (penalty 0.15 still yields 15 factories on one line).
        // 10012.5 / 112.5 = 89 more days: completion day 99.
        assert_eq!(log.completion_days(ObjectType::CivilianFactory), vec![99]);
    }

    #[test]
    fn test_invalid_orders_rejected() {
        let site = ConstructionSite::new("Tight", 9, Some(1), "TST").unwrap();
        let base = SimInputs {
            sites: vec![site],
            ..Default::default()
        };
        let mut engine = ConstructionEngine::with_start("TST", 10, 0, &["civilian_economy"]);

        let zero = SimInputs {
            build_order: vec![BuildOrder::generic(
                ObjectType::CivilianFactory,
                BuildCount::Finite(0),
            )],
            ..base.clone()
        };
        assert!(matches!(
            engine.run(&zero, &mut DefaultHooks),
            Err(SimError::InvalidBuildOrder(_))
        ));

        let reserved = SimInputs {
            build_order: vec![BuildOrder::new(
                "generic_1",
                ObjectType::CivilianFactory,
                BuildCount::Finite(1),
            )],
            ..base.clone()
        };
        assert!(matches!(
            engine.run(&reserved, &mut DefaultHooks),
            Err(SimError::InvalidBuildOrder(_))
        ));

        let over_slots = SimInputs {
            build_order: vec![BuildOrder::new(
                "Tight",
                ObjectType::CivilianFactory,
                BuildCount::Finite(2),
            )],
            ..base.clone()
        };
        assert!(matches!(
            engine.run(&over_slots, &mut DefaultHooks),
            Err(SimError::InvalidBuildOrder(_))
        ));

        let over_level = SimInputs {
            build_order: vec![BuildOrder::new(
                "Tight",
                ObjectType::Infrastructure,
                BuildCount::Finite(2),
            )],
            ..base.clone()
        };
        assert!(matches!(
            engine.run(&over_level, &mut DefaultHooks),
            Err(SimError::InvalidBuildOrder(_))
        ));

        let endless_infra = SimInputs {
            build_order: vec![BuildOrder::generic(
                ObjectType::Infrastructure,
                BuildCount::Infinite,
            )],
            ..base
        };
        assert!(matches!(
            engine.run(&endless_infra, &mut DefaultHooks),
            Err(SimError::InvalidBuildOrder(_))
        ));
    }

    #[test]
    fn test_infrastructure_overshoot_at_lazy_site_rejected() {
        // "Steppe" is not seeded, so it would be created at the default
        // level 5; 7 more levels overshoot the cap and must be rejected
        // up front, not truncated at level 10 mid-run.
        let mut engine = ConstructionEngine::with_start("TST", 10, 0, &["civilian_economy"]);
        let inputs = SimInputs {
            build_order: vec![BuildOrder::new(
                "Steppe",
                ObjectType::Infrastructure,
                BuildCount::Finite(7),
            )],
            ..Default::default()
        };
        assert!(matches!(
            engine.run(&inputs, &mut DefaultHooks),
            Err(SimError::InvalidBuildOrder(_))
        ));

        // Exactly up to the cap is fine
        let mut engine = ConstructionEngine::with_start("TST", 10, 0, &["civilian_economy"]);
        let inputs = SimInputs {
            build_order: vec![BuildOrder::new(
                "Steppe",
                ObjectType::Infrastructure,
                BuildCount::Finite(5),
            )],
            ..Default::default()
        };
        let log = engine.run(&inputs, &mut DefaultHooks).unwrap();
        assert_eq!(log.completed(ObjectType::Infrastructure), 5);
        assert_eq!(engine.site("Steppe").unwrap().infrastructure(), 10);
    }

    #[test]
    fn test_unknown_country() {
        assert_eq!(
            ConstructionEngine::for_country("ZZZ").unwrap_err(),
            SimError::UnknownCountry("ZZZ".to_string())
        );
    }

    #[test]
    fn test_missing_starting_laws() {
        let mut engine = ConstructionEngine::with_start("TST", 10, 0, &[]);
        assert_eq!(
            engine.run(&SimInputs::default(), &mut DefaultHooks),
            Err(SimError::MissingStartingLaws)
        );

        // A timeline entry on the first day satisfies the guard
        let mut engine = ConstructionEngine::with_start("TST", 10, 0, &[]);
        let inputs = SimInputs {
            timeline: PolicyTimeline::new()
                .at(date(1936, 1, 1), &["volunteer_only", "civilian_economy"]),
            end_date: date(1936, 1, 2),
            ..Default::default()
        };
        assert!(engine.run(&inputs, &mut DefaultHooks).is_ok());
    }

    #[test]
    fn test_unknown_law_in_timeline() {
        let mut engine = ConstructionEngine::with_start("TST", 10, 0, &["civilian_economy"]);
        let inputs = SimInputs {
            timeline: PolicyTimeline::new().at(date(1936, 1, 1), &["five_year_plan"]),
            ..Default::default()
        };
        assert_eq!(
            engine.run(&inputs, &mut DefaultHooks),
            Err(SimError::Policy(PolicyError::UnknownLaw(
                "five_year_plan".to_string()
            )))
        );
    }

    #[test]
    fn test_invalid_end_date() {
        let mut engine = ConstructionEngine::with_start("TST", 10, 0, &["civilian_economy"]);
        let inputs = SimInputs {
            end_date: date(1935, 12, 31),
            ..Default::default()
        };
        assert_eq!(
            engine.run(&inputs, &mut DefaultHooks),
            Err(SimError::InvalidEndDate(date(1935, 12, 31)))
        );
    }

    #[test]
    fn test_completed_engine_refuses_reuse_until_reset() {
        let mut engine = ConstructionEngine::with_start("TST", 10, 0, &["civilian_economy"]);
        let inputs = SimInputs {
            end_date: date(1936, 1, 2),
            ..Default::default()
        };
        run_default(&mut engine, &inputs);
        assert_eq!(engine.state(), EngineState::Completed);

        assert_eq!(
            engine.run(&inputs, &mut DefaultHooks),
            Err(SimError::AlreadyCompleted)
        );

        engine.reset();
        assert_eq!(engine.state(), EngineState::Running);
        assert!(engine.run(&inputs, &mut DefaultHooks).is_ok());
    }

    #[test]
    fn test_iteration_cap() {
        struct NeverQuit;
        impl ScenarioHooks for NeverQuit {
            fn quit_triggered(&self, _engine: &ConstructionEngine) -> bool {
                false
            }
        }

        let config = SimConfig {
            iteration_cap: 10,
            ..Default::default()
        };
        let mut engine =
            ConstructionEngine::with_start("TST", 10, 0, &["civilian_economy"]).with_config(config);
        assert_eq!(
            engine.run(&SimInputs::default(), &mut NeverQuit),
            Err(SimError::IterationCapExceeded { cap: 10 })
        );
    }

    #[test]
    fn test_runs_are_deterministic() {
        let inputs = SimInputs {
            build_order: vec![
                BuildOrder::new("Moscow", ObjectType::Infrastructure, BuildCount::Finite(2)),
                BuildOrder::generic(ObjectType::CivilianFactory, BuildCount::Finite(3)),
                BuildOrder::generic(ObjectType::MilitaryFactory, BuildCount::Finite(4)),
            ],
            timeline: PolicyTimeline::new().at(date(1936, 6, 1), &["war_economy"]),
            trade_bonus: 2,
            ..Default::default()
        };
        let mut first = ConstructionEngine::for_country("SOV").unwrap();
        let mut second = ConstructionEngine::for_country("SOV").unwrap();

        let log_a = run_default(&mut first, &inputs);
        let log_b = run_default(&mut second, &inputs);
        assert_eq!(log_a, log_b);
        assert_eq!(
            serde_json::to_string(&log_a).unwrap(),
            serde_json::to_string(&log_b).unwrap()
        );
    }

    #[test]
    fn test_empty_queue_quits_on_first_day() {
        let mut engine = ConstructionEngine::with_start("TST", 10, 0, &["civilian_economy"]);
        let log = run_default(&mut engine, &SimInputs::default());
        assert_eq!(log.final_day(), Some(1));
        assert!(log.completion_days(ObjectType::CivilianFactory).is_empty());
    }

    #[test]
    fn test_capacity_shrink_closes_surplus_lines() {
        // war_economy gives 18 capacity -> [15, 3]; undisturbed_isolation
        // reserves ceil(22 * 0.4) = 9, leaving 13 -> [13]. The tail line
        // closes and its order returns to the queue front.
        let mut engine = ConstructionEngine::with_start("TST", 22, 0, &["war_economy"]);
        let inputs = SimInputs {
            build_order: vec![
                BuildOrder::generic(ObjectType::CivilianFactory, BuildCount::Infinite),
                BuildOrder::generic(ObjectType::CivilianFactory, BuildCount::Infinite),
            ],
            timeline: PolicyTimeline::new().at(date(1936, 1, 2), &["undisturbed_isolation"]),
            end_date: date(1936, 1, 2),
            ..Default::default()
        };
        run_default(&mut engine, &inputs);

        assert_eq!(engine.assignments(), &[13]);
        assert_eq!(engine.lines().len(), 1);
        assert_eq!(engine.queue_len(), 1);
    }

    #[test]
    fn test_trade_bonus_extends_capacity() {
        // 10 civ at 30% penalty: 7 available; +5 trade makes 15 civ,
        // ceil(4.5) = 5 reserved, 10 available.
        let mut engine = ConstructionEngine::with_start("TST", 10, 0, &["civilian_economy"]);
        let inputs = SimInputs {
            build_order: vec![BuildOrder::generic(
                ObjectType::CivilianFactory,
                BuildCount::Infinite,
            )],
            trade_bonus: 5,
            end_date: date(1936, 1, 1),
            ..Default::default()
        };
        run_default(&mut engine, &inputs);
        assert_eq!(engine.assignments(), &[10]);
    }
}
