//! Canned experiments built on the engine's scenario hooks.

pub mod infra_payback;
pub mod max_military;

pub use infra_payback::{InfraPayback, PaybackOutcome, PaybackPoint, SiteVerdict};
pub use max_military::{EfficiencyPoint, MaxMilitary, MilitaryOutcome};
