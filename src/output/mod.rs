pub mod json;
pub mod terminal;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::aggregation::{AggregationReport, AggregationStatistics, ClassCounts, ClassPercentages};
use crate::core::{ClassMode, Result};
use crate::formatting::Styler;
use crate::stats::ValueStatistics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

/// One row of an aggregation table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub key: String,
    pub label: String,
    pub counts: ClassCounts,
    pub total: u64,
    pub percentages: ClassPercentages,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_statistics: Option<ValueStatistics>,
}

/// Everything rendered for one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationOutput {
    pub kpi: String,
    pub kpi_label: String,
    pub year: u16,
    pub mode: ClassMode,
    pub group_by: String,
    pub groups: Vec<GroupRow>,
    pub overall: GroupRow,
    pub statistics: AggregationStatistics,
}

impl AggregationOutput {
    /// Assemble output rows from a report.
    ///
    /// `label_of` maps a group key to its display name.
    #[allow(clippy::too_many_arguments)]
    pub fn new<F>(
        kpi: &str,
        kpi_label: &str,
        year: u16,
        mode: ClassMode,
        group_by: &str,
        report: &AggregationReport,
        value_statistics: Option<&BTreeMap<String, ValueStatistics>>,
        label_of: F,
    ) -> Self
    where
        F: Fn(&str) -> String,
    {
        let groups = report
            .groups
            .iter()
            .map(|(key, counts)| {
                row(
                    key,
                    label_of(key),
                    *counts,
                    value_statistics.and_then(|s| s.get(key)).cloned(),
                )
            })
            .collect();

        Self {
            kpi: kpi.to_string(),
            kpi_label: kpi_label.to_string(),
            year,
            mode,
            group_by: group_by.to_string(),
            groups,
            overall: row("all", "All".to_string(), report.overall(), None),
            statistics: report.statistics,
        }
    }
}

fn row(key: &str, label: String, counts: ClassCounts, stats: Option<ValueStatistics>) -> GroupRow {
    GroupRow {
        key: key.to_string(),
        label,
        counts,
        total: counts.total(),
        percentages: counts.percentages(),
        value_statistics: stats,
    }
}

pub fn render(output: &AggregationOutput, format: OutputFormat, styler: &Styler) -> Result<String> {
    match format {
        OutputFormat::Terminal => Ok(terminal::render_aggregation(output, styler)),
        OutputFormat::Json => json::render_aggregation(output),
    }
}
