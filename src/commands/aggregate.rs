use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::core::{ClassMode, Record};
use crate::formatting::Styler;
use crate::io;
use crate::model::{ConditionModel, Grouping};
use crate::output::{self, AggregationOutput, OutputFormat};
use crate::predicate::FilterSpec;
use crate::stats::DEFAULT_PERCENTILES;

/// Options for one aggregation run
#[derive(Debug, Clone)]
pub struct AggregateConfig {
    pub records: PathBuf,
    pub kpi: String,
    pub filter: FilterSpec,
    pub grouping: Grouping,
    pub mode: ClassMode,
    pub stats: bool,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub parallel: bool,
}

pub fn run_aggregate(model: &ConditionModel, config: &AggregateConfig, styler: &Styler) -> Result<()> {
    let records = io::read_records(&config.records)?;
    let content = aggregate_records(model, config, &records, styler)?;

    match &config.output {
        Some(path) => io::write_file(path, &content)?,
        None => print!("{}", content),
    }
    Ok(())
}

/// Filter, aggregate and render `records`.
pub fn aggregate_records(
    model: &ConditionModel,
    config: &AggregateConfig,
    records: &[Record],
    styler: &Styler,
) -> Result<String> {
    let kpi = model.kpis().require(&config.kpi)?;
    let year = config.filter.year;

    let predicate = model.build_predicate(&config.filter);
    let selected: Vec<Record> = predicate.filter(records).cloned().collect();
    info!(
        total = records.len(),
        selected = selected.len(),
        "applied record filter"
    );

    let report = if config.parallel {
        model.aggregate_par(&selected, config.grouping, &kpi.key, year, config.mode)?
    } else {
        model.aggregate(&selected, config.grouping, &kpi.key, year, config.mode)?
    };

    let value_statistics = if config.stats {
        Some(model.value_statistics(
            &selected,
            config.grouping,
            &kpi.key,
            year,
            &DEFAULT_PERCENTILES,
        )?)
    } else {
        None
    };

    let (group_by, categories) = match config.grouping {
        Grouping::Region => ("region", None),
        Grouping::Category => ("category", Some(model.categories())),
    };
    let label_of = |key: &str| {
        categories
            .and_then(|registry| registry.get(key))
            .map(|category| category.label.clone())
            .unwrap_or_else(|| key.to_string())
    };

    let rendered = AggregationOutput::new(
        &kpi.key,
        &kpi.label,
        year,
        config.mode,
        group_by,
        &report,
        value_statistics.as_ref(),
        label_of,
    );
    output::render(&rendered, config.format, styler).context("failed to render output")
}
