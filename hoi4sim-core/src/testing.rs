//! Test fixtures. Not gated on `cfg(test)` so integration tests and
//! downstream crates can build small engines without ceremony.

use crate::config::SimConfig;
use crate::engine::ConstructionEngine;

/// Builder for a minimal engine: a made-up country with a civilian
/// economy and enough factories for a single full line.
pub struct EngineBuilder {
    country: String,
    civilian: u32,
    military: u32,
    laws: Vec<String>,
    config: SimConfig,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            country: "TST".to_string(),
            civilian: 22,
            military: 0,
            laws: vec!["civilian_economy".to_string()],
            config: SimConfig::default(),
        }
    }

    pub fn country(mut self, tag: &str) -> Self {
        self.country = tag.to_string();
        self
    }

    pub fn civilian(mut self, count: u32) -> Self {
        self.civilian = count;
        self
    }

    pub fn military(mut self, count: u32) -> Self {
        self.military = count;
        self
    }

    pub fn laws(mut self, laws: &[&str]) -> Self {
        self.laws = laws.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> ConstructionEngine {
        let laws: Vec<&str> = self.laws.iter().map(String::as_str).collect();
        ConstructionEngine::with_start(&self.country, self.civilian, self.military, &laws)
            .with_config(self.config)
    }
}
