//! National default configuration.
//!
//! Five KPIs surveyed on regional roads, the standard subgroup categories
//! and the attribute names used by the national survey layer:
//!
//! | KPI  | Attribute | Direction       | best | good | fair | poor |
//! |------|-----------|-----------------|------|------|------|------|
//! | iri  | `AIRI`    | lower is better | 2    | 3    | 5    | 7    |
//! | rut  | `LRUT`    | lower is better | 6    | 9    | 15   | 20   |
//! | csc  | `CSC`     | higher is better| 0.50 | 0.45 | 0.40 | 0.35 |
//! | mpd  | `MPD`     | higher is better| -    | 0.7  | 0.6  | -    |
//! | psci | `PSCI`    | visual rating   | 9    | 7    | 5    | 3    |
//!
//! Texture depth is a three-class KPI: good, fair and poor only.

use crate::categories::{Category, CategoryRegistry};
use crate::core::Result;
use crate::kpi::{
    Boundaries, Direction, KpiCatalog, KpiDefinition, KpiThresholds, ThresholdTable,
};
use crate::model::ConditionModel;
use crate::predicate::FieldNames;

pub fn default_kpis() -> Vec<KpiDefinition> {
    vec![
        KpiDefinition::continuous("iri", "Roughness (IRI)", "AIRI", Direction::LowerIsBetter)
            .with_valid_range(Some(0.0), None),
        KpiDefinition::continuous("rut", "Rut depth", "LRUT", Direction::LowerIsBetter)
            .with_valid_range(Some(0.0), None),
        KpiDefinition::continuous(
            "csc",
            "Skid resistance (CSC)",
            "CSC",
            Direction::HigherIsBetter,
        )
        .with_valid_range(Some(0.0), None),
        KpiDefinition::three_class(
            "mpd",
            "Texture depth (MPD)",
            "MPD",
            Direction::HigherIsBetter,
        )
        .with_valid_range(Some(0.0), None),
        KpiDefinition::visual_rating("psci", "Surface rating (PSCI)", "PSCI"),
    ]
}

pub fn default_thresholds() -> ThresholdTable {
    ThresholdTable::new()
        .with("iri", KpiThresholds::new(Boundaries::full(2.0, 3.0, 5.0, 7.0)))
        .with("rut", KpiThresholds::new(Boundaries::full(6.0, 9.0, 15.0, 20.0)))
        .with("csc", KpiThresholds::new(Boundaries::full(0.50, 0.45, 0.40, 0.35)))
        .with("mpd", KpiThresholds::new(Boundaries::three_class(0.7, 0.6)))
}

pub fn default_categories() -> Vec<Category> {
    vec![
        Category::flag("dublin", "Dublin", "IsDublin"),
        Category::flag("city_town", "City/Town", "IsCityTown"),
        Category::flag("peat", "Peat", "IsPeat"),
        Category::flag("former_national", "Former National", "IsFormerNa"),
        Category::default_category("rural", "Rural"),
    ]
}

/// The national model with no configuration file.
pub fn national_model() -> Result<ConditionModel> {
    ConditionModel::new(
        KpiCatalog::new(default_kpis())?,
        default_thresholds(),
        CategoryRegistry::new(default_categories())?,
        FieldNames::default(),
    )
}

/// Contents written by `pavemap init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# pavemap configuration

[fields]
region = "LA_NAME"
route = "ROUTE"

[[kpis]]
key = "iri"
label = "Roughness (IRI)"
field_prefix = "AIRI"
direction = "lower_is_better"
min_valid = 0.0

[[kpis]]
key = "rut"
label = "Rut depth"
field_prefix = "LRUT"
direction = "lower_is_better"
min_valid = 0.0

[[kpis]]
key = "csc"
label = "Skid resistance (CSC)"
field_prefix = "CSC"
direction = "higher_is_better"
min_valid = 0.0

[[kpis]]
key = "mpd"
label = "Texture depth (MPD)"
field_prefix = "MPD"
direction = "higher_is_better"
scale = "three_class"
min_valid = 0.0

[[kpis]]
key = "psci"
label = "Surface rating (PSCI)"
field_prefix = "PSCI"
direction = "higher_is_better"
scale = "visual_rating"
min_valid = 1.0
max_valid = 10.0

[thresholds.iri]
best = 2.0
good = 3.0
fair = 5.0
poor = 7.0

[thresholds.rut]
best = 6.0
good = 9.0
fair = 15.0
poor = 20.0

[thresholds.csc]
best = 0.50
good = 0.45
fair = 0.40
poor = 0.35

# Texture depth has three classes only
[thresholds.mpd]
good = 0.7
fair = 0.6

# Per-year overrides:
# [thresholds.iri.years."2016"]
# good = 3.5
# fair = 5.5
# poor = 7.5

[[categories]]
key = "dublin"
label = "Dublin"
flag = "IsDublin"

[[categories]]
key = "city_town"
label = "City/Town"
flag = "IsCityTown"

[[categories]]
key = "peat"
label = "Peat"
flag = "IsPeat"

[[categories]]
key = "former_national"
label = "Former National"
flag = "IsFormerNa"

[[categories]]
key = "rural"
label = "Rural"
default = true

[selection]
max_selections = 10

[output]
default_format = "terminal"
mode = "full"
"#;
