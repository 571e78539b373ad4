use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

use crate::core::ConditionClass;

/// Per-class record counts for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCounts {
    pub best: u64,
    pub good: u64,
    pub fair: u64,
    pub poor: u64,
    pub worst: u64,
}

impl ClassCounts {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, class: ConditionClass) -> &mut u64 {
        match class {
            ConditionClass::Best => &mut self.best,
            ConditionClass::Good => &mut self.good,
            ConditionClass::Fair => &mut self.fair,
            ConditionClass::Poor => &mut self.poor,
            ConditionClass::Worst => &mut self.worst,
        }
    }

    pub fn increment(&mut self, class: ConditionClass) {
        *self.slot(class) += 1;
    }

    pub fn get(&self, class: ConditionClass) -> u64 {
        match class {
            ConditionClass::Best => self.best,
            ConditionClass::Good => self.good,
            ConditionClass::Fair => self.fair,
            ConditionClass::Poor => self.poor,
            ConditionClass::Worst => self.worst,
        }
    }

    /// Number of classified records.
    pub fn total(&self) -> u64 {
        self.best + self.good + self.fair + self.poor + self.worst
    }

    /// Share of the group in `class`, 0-100.
    ///
    /// An empty group reports 0 rather than NaN.
    pub fn percentage(&self, class: ConditionClass) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.get(class) as f64 / total as f64 * 100.0
    }

    /// Sum of the best, good and fair shares.
    pub fn fair_or_better_percentage(&self) -> f64 {
        ConditionClass::ALL
            .iter()
            .filter(|c| c.is_fair_or_better())
            .map(|&c| self.percentage(c))
            .sum()
    }

    pub fn percentages(&self) -> ClassPercentages {
        ClassPercentages {
            best: self.percentage(ConditionClass::Best),
            good: self.percentage(ConditionClass::Good),
            fair: self.percentage(ConditionClass::Fair),
            poor: self.percentage(ConditionClass::Poor),
            worst: self.percentage(ConditionClass::Worst),
            fair_or_better: self.fair_or_better_percentage(),
        }
    }
}

impl AddAssign for ClassCounts {
    fn add_assign(&mut self, other: Self) {
        self.best += other.best;
        self.good += other.good;
        self.fair += other.fair;
        self.poor += other.poor;
        self.worst += other.worst;
    }
}

/// Per-class shares (0-100) for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassPercentages {
    pub best: f64,
    pub good: f64,
    pub fair: f64,
    pub poor: f64,
    pub worst: f64,
    pub fair_or_better: f64,
}

impl ClassPercentages {
    pub fn get(&self, class: ConditionClass) -> f64 {
        match class {
            ConditionClass::Best => self.best,
            ConditionClass::Good => self.good,
            ConditionClass::Fair => self.fair,
            ConditionClass::Poor => self.poor,
            ConditionClass::Worst => self.worst,
        }
    }

    /// Sum of the five class shares.
    pub fn sum(&self) -> f64 {
        self.best + self.good + self.fair + self.poor + self.worst
    }
}
