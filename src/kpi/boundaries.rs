use serde::{Deserialize, Serialize};

use super::Direction;
use crate::core::ConditionClass;

/// Boundary values separating adjacent condition classes.
///
/// Each boundary is named after the class on its better side: for a
/// lower-is-better KPI `good = 3.0` means "good up to and including 3.0".
/// A reduced table omits `best`; a partial table (texture depth) stops after
/// `fair`. Present boundaries must form a contiguous run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Boundaries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub good: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fair: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poor: Option<f64>,
}

impl Boundaries {
    /// Full four-boundary table.
    pub const fn full(best: f64, good: f64, fair: f64, poor: f64) -> Self {
        Self {
            best: Some(best),
            good: Some(good),
            fair: Some(fair),
            poor: Some(poor),
        }
    }

    /// Reduced three-boundary table (no "best").
    pub const fn reduced(good: f64, fair: f64, poor: f64) -> Self {
        Self {
            best: None,
            good: Some(good),
            fair: Some(fair),
            poor: Some(poor),
        }
    }

    /// Good and fair boundaries only, for three-class KPIs.
    pub const fn three_class(good: f64, fair: f64) -> Self {
        Self {
            best: None,
            good: Some(good),
            fair: Some(fair),
            poor: None,
        }
    }

    pub fn get(&self, class: ConditionClass) -> Option<f64> {
        match class {
            ConditionClass::Best => self.best,
            ConditionClass::Good => self.good,
            ConditionClass::Fair => self.fair,
            ConditionClass::Poor => self.poor,
            ConditionClass::Worst => None,
        }
    }

    /// Present boundaries in best-to-worst order.
    pub fn present(&self) -> Vec<(ConditionClass, f64)> {
        ConditionClass::ALL
            .iter()
            .filter_map(|&class| self.get(class).map(|value| (class, value)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.present().is_empty()
    }

    /// Check that the table is usable for a KPI with the given direction.
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self, direction: Direction) -> Result<(), String> {
        let present = self.present();
        if present.is_empty() {
            return Err("no boundaries configured".to_string());
        }

        if let Some((class, value)) = present.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("boundary '{}' is not finite ({})", class.key(), value));
        }

        let contiguous = present
            .windows(2)
            .all(|pair| pair[0].0.worse() == Some(pair[1].0));
        if !contiguous {
            return Err("boundaries must be a contiguous run (best, good, fair, poor)".to_string());
        }

        for pair in present.windows(2) {
            let (better, worse) = (pair[0], pair[1]);
            let ordered = match direction {
                Direction::LowerIsBetter => better.1 < worse.1,
                Direction::HigherIsBetter => better.1 > worse.1,
            };
            if !ordered {
                return Err(format!(
                    "boundary '{}' ({}) and '{}' ({}) are not strictly {}",
                    better.0.key(),
                    better.1,
                    worse.0.key(),
                    worse.1,
                    match direction {
                        Direction::LowerIsBetter => "increasing",
                        Direction::HigherIsBetter => "decreasing",
                    }
                ));
            }
        }

        Ok(())
    }
}
