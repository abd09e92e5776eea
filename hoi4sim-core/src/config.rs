//! Engine tuning knobs with HOI4 1.4 defaults.

use crate::capacity::CAPACITY_QUANTUM;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Hard ceiling on simulated days; a run that reaches it errors out
    /// instead of spinning forever on a quit predicate that never fires.
    pub iteration_cap: i64,
    /// Build points one assigned factory contributes per day.
    pub base_rate: f64,
    /// Maximum factories per construction line.
    pub quantum: u32,
    /// Infrastructure level for sites created on demand.
    pub default_infrastructure: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            iteration_cap: 10_000,
            base_rate: 5.0,
            quantum: CAPACITY_QUANTUM,
            default_infrastructure: 5,
        }
    }
}
