//! Buildable object types and the build-order queue entries.

use serde::{Deserialize, Serialize};

/// What a construction line can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Infrastructure,
    CivilianFactory,
    MilitaryFactory,
}

impl ObjectType {
    pub const ALL: [ObjectType; 3] = [
        ObjectType::Infrastructure,
        ObjectType::CivilianFactory,
        ObjectType::MilitaryFactory,
    ];

    /// Build-point cost of one unit (HOI4 1.4 values).
    pub fn cost(self) -> f64 {
        match self {
            ObjectType::Infrastructure => 3000.0,
            ObjectType::CivilianFactory => 10800.0,
            ObjectType::MilitaryFactory => 7200.0,
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ObjectType::Infrastructure => "infrastructure",
            ObjectType::CivilianFactory => "civilian_factory",
            ObjectType::MilitaryFactory => "military_factory",
        };
        write!(f, "{name}")
    }
}

/// How many units a build-order entry requests. Open-ended orders say so
/// explicitly rather than through a sentinel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildCount {
    Finite(u32),
    Infinite,
}

impl BuildCount {
    /// Count after completing one unit. Infinite lines never drain.
    pub fn decrement(self) -> Self {
        match self {
            BuildCount::Finite(n) => BuildCount::Finite(n.saturating_sub(1)),
            BuildCount::Infinite => BuildCount::Infinite,
        }
    }

    pub fn is_exhausted(self) -> bool {
        self == BuildCount::Finite(0)
    }
}

impl std::fmt::Display for BuildCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildCount::Finite(n) => write!(f, "{n}"),
            BuildCount::Infinite => write!(f, "inf"),
        }
    }
}

/// One entry of the build-order queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildOrder {
    /// Target site name. `None` lets the engine allocate a fresh generic site.
    pub site: Option<String>,
    pub object: ObjectType,
    pub count: BuildCount,
}

impl BuildOrder {
    pub fn new(site: impl Into<String>, object: ObjectType, count: BuildCount) -> Self {
        Self {
            site: Some(site.into()),
            object,
            count,
        }
    }

    /// Order without a target site; the engine creates one on promotion.
    pub fn generic(object: ObjectType, count: BuildCount) -> Self {
        Self {
            site: None,
            object,
            count,
        }
    }
}

/// Completed-object tally, the primary simulation output besides the log.
/// Counts only ever increase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectCounts {
    pub infrastructure: u32,
    pub civilian: u32,
    pub military: u32,
}

impl ObjectCounts {
    pub fn get(&self, object: ObjectType) -> u32 {
        match object {
            ObjectType::Infrastructure => self.infrastructure,
            ObjectType::CivilianFactory => self.civilian,
            ObjectType::MilitaryFactory => self.military,
        }
    }

    pub fn add(&mut self, object: ObjectType) {
        match object {
            ObjectType::Infrastructure => self.infrastructure += 1,
            ObjectType::CivilianFactory => self.civilian += 1,
            ObjectType::MilitaryFactory => self.military += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_costs() {
        assert_eq!(ObjectType::Infrastructure.cost(), 3000.0);
        assert_eq!(ObjectType::CivilianFactory.cost(), 10800.0);
        assert_eq!(ObjectType::MilitaryFactory.cost(), 7200.0);
    }

    #[test]
    fn test_build_count_decrement() {
        assert_eq!(BuildCount::Finite(3).decrement(), BuildCount::Finite(2));
        assert_eq!(BuildCount::Infinite.decrement(), BuildCount::Infinite);

        let one = BuildCount::Finite(1).decrement();
        assert!(one.is_exhausted());
        assert!(!BuildCount::Infinite.is_exhausted());
    }

    #[test]
    fn test_counts_accumulate() {
        let mut counts = ObjectCounts::default();
        counts.add(ObjectType::CivilianFactory);
        counts.add(ObjectType::CivilianFactory);
        counts.add(ObjectType::MilitaryFactory);

        assert_eq!(counts.get(ObjectType::CivilianFactory), 2);
        assert_eq!(counts.get(ObjectType::MilitaryFactory), 1);
        assert_eq!(counts.get(ObjectType::Infrastructure), 0);
    }
}
