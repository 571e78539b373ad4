//! KPI definitions and classification thresholds.
//!
//! A KPI names a measured pavement quantity, the attribute prefix its
//! per-year values are stored under, and which direction is better. Adding a
//! KPI means adding one [`KpiDefinition`] and, unless it is a visual rating,
//! one entry in the [`ThresholdTable`].

mod boundaries;
mod thresholds;

pub use boundaries::Boundaries;
pub use thresholds::{KpiThresholds, ThresholdTable};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::{Error, Result};

/// Closed range of the visual rating scale.
pub const VISUAL_RATING_RANGE: (f64, f64) = (1.0, 10.0);

/// Standard visual rating breakpoints: 9-10 best, 7-8 good, 5-6 fair,
/// 3-4 poor, 1-2 worst.
pub const VISUAL_RATING_CUT_POINTS: Boundaries = Boundaries::full(9.0, 7.0, 5.0, 3.0);

/// Which way a KPI improves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Roughness, rutting
    LowerIsBetter,
    /// Skid resistance, texture depth, visual rating
    HigherIsBetter,
}

/// How a KPI's boundaries are obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiScale {
    /// Open numeric scale, boundaries come from the threshold table
    #[default]
    Continuous,
    /// Closed 1-10 scale with fixed literal cut points
    VisualRating,
    /// Good/fair/poor only; the table carries just `good` and `fair`
    ThreeClass,
}

impl KpiScale {
    /// Whether boundaries come from the threshold table.
    pub fn uses_table(self) -> bool {
        !matches!(self, KpiScale::VisualRating)
    }
}

/// A measurable pavement-condition quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiDefinition {
    pub key: String,
    pub label: String,
    /// Attribute prefix; the value for a year lives in `<prefix>_<year>`.
    pub field_prefix: String,
    pub direction: Direction,
    #[serde(default)]
    pub scale: KpiScale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_valid: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_valid: Option<f64>,
}

impl KpiDefinition {
    pub fn continuous(
        key: impl Into<String>,
        label: impl Into<String>,
        field_prefix: impl Into<String>,
        direction: Direction,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_prefix: field_prefix.into(),
            direction,
            scale: KpiScale::Continuous,
            min_valid: None,
            max_valid: None,
        }
    }

    /// A KPI reported in three classes, such as texture depth.
    pub fn three_class(
        key: impl Into<String>,
        label: impl Into<String>,
        field_prefix: impl Into<String>,
        direction: Direction,
    ) -> Self {
        Self {
            scale: KpiScale::ThreeClass,
            ..Self::continuous(key, label, field_prefix, direction)
        }
    }

    pub fn visual_rating(
        key: impl Into<String>,
        label: impl Into<String>,
        field_prefix: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_prefix: field_prefix.into(),
            direction: Direction::HigherIsBetter,
            scale: KpiScale::VisualRating,
            min_valid: Some(VISUAL_RATING_RANGE.0),
            max_valid: Some(VISUAL_RATING_RANGE.1),
        }
    }

    pub fn with_valid_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_valid = min;
        self.max_valid = max;
        self
    }

    /// Attribute holding this KPI's value for a survey year.
    pub fn field_for(&self, year: u16) -> String {
        format!("{}_{}", self.field_prefix, year)
    }

    /// Inclusive domain of meaningful values.
    ///
    /// The visual rating scale is always 1..=10 regardless of configuration.
    pub fn valid_range(&self) -> (Option<f64>, Option<f64>) {
        match self.scale {
            KpiScale::VisualRating => (Some(VISUAL_RATING_RANGE.0), Some(VISUAL_RATING_RANGE.1)),
            KpiScale::Continuous | KpiScale::ThreeClass => (self.min_valid, self.max_valid),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(Error::configuration("KPI key must not be empty"));
        }
        if !is_identifier(&self.field_prefix) {
            return Err(Error::configuration(format!(
                "KPI '{}' field prefix '{}' is not a plain attribute name",
                self.key, self.field_prefix
            )));
        }
        if self.scale == KpiScale::VisualRating && self.direction != Direction::HigherIsBetter {
            return Err(Error::configuration(format!(
                "KPI '{}' uses the visual rating scale, which is higher-is-better",
                self.key
            )));
        }
        if let (Some(min), Some(max)) = (self.min_valid, self.max_valid) {
            if min > max {
                return Err(Error::configuration(format!(
                    "KPI '{}' has min_valid {} above max_valid {}",
                    self.key, min, max
                )));
            }
        }
        Ok(())
    }
}

/// Attribute names are emitted unquoted into WHERE clauses, so they are
/// restricted to ASCII identifiers.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Ordered set of KPI definitions, looked up by key.
#[derive(Debug, Clone, Default)]
pub struct KpiCatalog {
    kpis: Vec<KpiDefinition>,
    index: HashMap<String, usize>,
}

impl KpiCatalog {
    pub fn new(kpis: Vec<KpiDefinition>) -> Result<Self> {
        let mut index = HashMap::with_capacity(kpis.len());
        for (position, kpi) in kpis.iter().enumerate() {
            kpi.validate()?;
            if index.insert(kpi.key.clone(), position).is_some() {
                return Err(Error::configuration(format!(
                    "KPI '{}' is defined more than once",
                    kpi.key
                )));
            }
        }
        Ok(Self { kpis, index })
    }

    pub fn get(&self, key: &str) -> Option<&KpiDefinition> {
        self.index.get(key).map(|&i| &self.kpis[i])
    }

    /// Look up a KPI, treating an unknown key as a contract violation.
    pub fn require(&self, key: &str) -> Result<&KpiDefinition> {
        self.get(key).ok_or_else(|| Error::UnknownKpi(key.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &KpiDefinition> {
        self.kpis.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.kpis.iter().map(|k| k.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.kpis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kpis.is_empty()
    }
}
