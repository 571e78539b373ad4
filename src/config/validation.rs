//! Turning a parsed configuration into a validated [`ConditionModel`].

use tracing::debug;

use super::core::PavemapConfig;
use super::presets;
use crate::categories::CategoryRegistry;
use crate::core::{Result, ResultExt};
use crate::kpi::{KpiCatalog, KpiThresholds, ThresholdTable};
use crate::model::ConditionModel;

/// Build the model, filling absent sections from the national defaults.
///
/// Default threshold tables are kept only for KPIs present in the catalog,
/// then configured tables replace them per KPI.
pub fn build_model(config: &PavemapConfig) -> Result<ConditionModel> {
    let kpis = KpiCatalog::new(config.kpis.clone().unwrap_or_else(presets::default_kpis))
        .context("invalid [[kpis]]")?;

    let mut thresholds = ThresholdTable::new();
    let defaults = presets::default_thresholds();
    for key in kpis.keys() {
        if let Some(entry) = defaults.get(key) {
            thresholds.insert(key, entry.clone());
        }
    }
    if let Some(configured) = &config.thresholds {
        for (key, entry) in configured {
            let mut table = KpiThresholds::new(entry.boundaries);
            table.by_year = entry
                .parsed_years()
                .context(format!("invalid [thresholds.{}]", key))?;
            debug!(kpi = %key, years = table.by_year.len(), "configured thresholds");
            thresholds.insert(key.as_str(), table);
        }
    }

    let categories = match &config.categories {
        Some(entries) => entries
            .iter()
            .map(|entry| entry.to_category())
            .collect::<Result<Vec<_>>>()?,
        None => presets::default_categories(),
    };
    let categories = CategoryRegistry::new(categories).context("invalid [[categories]]")?;

    ConditionModel::new(
        kpis,
        thresholds,
        categories,
        config.fields.clone().unwrap_or_default(),
    )?
    .with_max_selections(config.max_selections())
}
