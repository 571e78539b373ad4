use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::categories::Category;
use crate::core::{ClassMode, Error, Result};
use crate::kpi::{Boundaries, KpiDefinition};
use crate::output::OutputFormat;
use crate::predicate::{FieldNames, DEFAULT_MAX_SELECTIONS};

/// Root configuration structure for pavemap
///
/// Every section is optional; an absent section falls back to the national
/// defaults in [`super::presets`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PavemapConfig {
    /// Region and route attribute names
    #[serde(default)]
    pub fields: Option<FieldNames>,

    /// KPI catalog; replaces the default catalog when given
    #[serde(default)]
    pub kpis: Option<Vec<KpiDefinition>>,

    /// Threshold tables keyed by KPI; override the defaults per KPI
    #[serde(default)]
    pub thresholds: Option<BTreeMap<String, ThresholdConfig>>,

    /// Subgroup categories; replace the default set when given
    #[serde(default)]
    pub categories: Option<Vec<CategoryConfig>>,

    /// Chart selection settings
    #[serde(default)]
    pub selection: Option<SelectionConfig>,

    /// Output configuration
    #[serde(default)]
    pub output: Option<OutputConfig>,
}

/// Boundaries for one KPI plus per-year overrides.
///
/// ```toml
/// [thresholds.iri]
/// best = 2.0
/// good = 3.0
/// fair = 5.0
/// poor = 7.0
///
/// [thresholds.iri.years."2016"]
/// good = 3.5
/// fair = 5.5
/// poor = 7.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ThresholdConfig {
    #[serde(flatten)]
    pub boundaries: Boundaries,

    /// Keys are survey years; TOML table keys are always strings
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub years: BTreeMap<String, Boundaries>,
}

impl ThresholdConfig {
    /// Per-year overrides with parsed year keys.
    pub fn parsed_years(&self) -> Result<BTreeMap<u16, Boundaries>> {
        self.years
            .iter()
            .map(|(year, boundaries)| {
                year.trim()
                    .parse::<u16>()
                    .map(|y| (y, *boundaries))
                    .map_err(|_| {
                        Error::configuration(format!("'{}' is not a valid survey year", year))
                    })
            })
            .collect()
    }
}

/// One `[[categories]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub key: String,
    pub label: String,
    /// Flag attribute identifying members
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    /// Marks the catch-all category
    #[serde(default)]
    pub default: bool,
}

impl CategoryConfig {
    pub fn to_category(&self) -> Result<Category> {
        match (&self.flag, self.default) {
            (Some(field), false) => Ok(Category::flag(&self.key, &self.label, field)),
            (None, true) => Ok(Category::default_category(&self.key, &self.label)),
            (Some(_), true) => Err(Error::configuration(format!(
                "category '{}' cannot have a flag and be the default",
                self.key
            ))),
            (None, false) => Err(Error::configuration(format!(
                "category '{}' needs either `flag` or `default = true`",
                self.key
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default = "default_max_selections")]
    pub max_selections: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_selections: default_max_selections(),
        }
    }
}

pub fn default_max_selections() -> usize {
    DEFAULT_MAX_SELECTIONS
}

/// Output configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub default_format: Option<OutputFormat>,
    #[serde(default)]
    pub mode: Option<ClassMode>,
}

impl PavemapConfig {
    pub fn max_selections(&self) -> usize {
        self.selection
            .map(|s| s.max_selections)
            .unwrap_or_else(default_max_selections)
    }

    pub fn default_format(&self) -> OutputFormat {
        self.output
            .and_then(|o| o.default_format)
            .unwrap_or_default()
    }

    pub fn default_mode(&self) -> ClassMode {
        self.output.and_then(|o| o.mode).unwrap_or_default()
    }
}
