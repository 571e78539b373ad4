//! Per-group KPI value statistics.
//!
//! Summary numbers for the raw measurements behind a condition chart:
//! count, extremes, mean and nearest-rank percentiles. Values outside the
//! KPI's domain are ignored, matching what classification counts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::aggregation::GroupKey;
use crate::classification::ClassRule;
use crate::core::Record;

/// Percentiles reported by default.
pub const DEFAULT_PERCENTILES: [u8; 3] = [25, 50, 75];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueStatistics {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub percentiles: BTreeMap<u8, f64>,
}

impl ValueStatistics {
    /// Statistics over `values`, `None` when there are none.
    pub fn from_values(values: &[f64], percentiles: &[u8]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let percentiles = percentiles
            .iter()
            .map(|&p| (p, nearest_rank(&sorted, p)))
            .collect();

        Some(Self {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean,
            percentiles,
        })
    }

    pub fn median(&self) -> Option<f64> {
        self.percentiles.get(&50).copied()
    }

    pub fn percentile(&self, p: u8) -> Option<f64> {
        self.percentiles.get(&p).copied()
    }
}

/// Nearest-rank percentile of a non-empty ascending slice.
fn nearest_rank(sorted: &[f64], p: u8) -> f64 {
    let p = p.min(100) as usize;
    let rank = (p * sorted.len()).div_ceil(100).max(1);
    sorted[rank.min(sorted.len()) - 1]
}

/// Value statistics per group for one KPI attribute.
///
/// Groups whose records carry no usable value are omitted.
pub fn group_statistics<'r, I, G>(
    records: I,
    grouping: &G,
    rule: &ClassRule<'_>,
    field: &str,
    percentiles: &[u8],
) -> BTreeMap<String, ValueStatistics>
where
    I: IntoIterator<Item = &'r Record>,
    G: GroupKey + ?Sized,
{
    let mut values: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in records {
        let Some(value) = record.number(field).filter(|v| rule.in_domain(*v)) else {
            continue;
        };
        if let Some(group) = grouping.group_of(record) {
            values.entry(group).or_default().push(value);
        }
    }

    values
        .into_iter()
        .filter_map(|(group, v)| {
            ValueStatistics::from_values(&v, percentiles).map(|stats| (group, stats))
        })
        .collect()
}
