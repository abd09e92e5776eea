use serde::{Deserialize, Serialize};

/// A value clamped to an integer range.
/// Used for: site infrastructure level (0 to 10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundedInt {
    value: i32,
    min: i32,
    max: i32,
}

impl BoundedInt {
    pub const fn new(value: i32, min: i32, max: i32) -> Self {
        let value = if value < min {
            min
        } else if value > max {
            max
        } else {
            value
        };
        Self { value, min, max }
    }

    pub fn get(&self) -> i32 {
        self.value
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn add(&mut self, delta: i32) {
        self.value = (self.value + delta).clamp(self.min, self.max);
    }

    pub fn set(&mut self, value: i32) {
        self.value = value.clamp(self.min, self.max);
    }

    /// True when the value sits at its upper bound.
    pub fn is_at_max(&self) -> bool {
        self.value == self.max
    }
}

/// Factory for the 0..=10 infrastructure level scale.
pub const fn new_infrastructure(level: i32) -> BoundedInt {
    BoundedInt::new(level, 0, 10)
}
