//! Day-stepped construction simulation for the HOI4 1.4 build economy.
//!
//! The engine steps one in-game day at a time under a 365-day calendar:
//! scheduled law changes shift the construction bonus and the
//! consumer-goods penalty, available civilian factories split into lines
//! of at most fifteen, and open lines accrue progress toward
//! infrastructure and factories at named sites. Scenarios customize a
//! run through [`engine::ScenarioHooks`]; [`scenarios`] ships two canned
//! experiments (military buildup and infrastructure payback).
//!
//! Runs are deterministic: the same starting conditions, orders, and
//! timeline always produce the same [`events::BuildLog`].

pub mod bounded;
pub mod calendar;
pub mod capacity;
pub mod config;
pub mod engine;
pub mod events;
pub mod laws;
pub mod orders;
pub mod policy;
pub mod scenarios;
pub mod site;
pub mod testing;

pub use calendar::{days_between, Date};
pub use config::SimConfig;
pub use engine::{
    ConstructionEngine, DefaultHooks, EngineState, LinePromotion, ScenarioHooks, SimError,
    SimInputs,
};
pub use events::{BuildEvent, BuildLog};
pub use laws::{DEFAULT_END_DATE, GAME_START};
pub use orders::{BuildCount, BuildOrder, ObjectCounts, ObjectType};
pub use policy::PolicyTimeline;
pub use site::ConstructionSite;
