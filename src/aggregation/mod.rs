//! Grouped class counts and percentages.
//!
//! A single stateless fold over the records: resolve each record's group,
//! classify its KPI value, bump the (group, class) count. Records without a
//! usable value are left out of both numerator and denominator; records
//! whose group cannot be resolved are dropped and counted in
//! [`AggregationStatistics`].
//!
//! [`aggregate_par`] splits the same fold across rayon workers and merges
//! the partial reports; groups live in a `BTreeMap` and counts add
//! commutatively, so the result is identical to [`aggregate`].

mod counts;

pub use counts::{ClassCounts, ClassPercentages};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::categories::CategoryRegistry;
use crate::classification::ClassRule;
use crate::core::{ClassMode, Record};

/// Resolves the group a record is counted under.
pub trait GroupKey {
    fn group_of(&self, record: &Record) -> Option<String>;
}

impl<F> GroupKey for F
where
    F: Fn(&Record) -> Option<String>,
{
    fn group_of(&self, record: &Record) -> Option<String> {
        self(record)
    }
}

/// Group by the text of one attribute (e.g. region name).
///
/// The attribute text is the group key as stored, so a selection built from
/// the key matches the same records. Blank text is unresolved.
#[derive(Debug, Clone)]
pub struct ByField {
    field: String,
}

impl ByField {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl GroupKey for ByField {
    fn group_of(&self, record: &Record) -> Option<String> {
        record
            .text(&self.field)
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.into_owned())
    }
}

/// Group by subgroup category key.
#[derive(Debug, Clone, Copy)]
pub struct ByCategory<'a> {
    registry: &'a CategoryRegistry,
}

impl<'a> ByCategory<'a> {
    pub fn new(registry: &'a CategoryRegistry) -> Self {
        Self { registry }
    }
}

impl GroupKey for ByCategory<'_> {
    fn group_of(&self, record: &Record) -> Option<String> {
        self.registry.category_of(record).map(|c| c.key.clone())
    }
}

/// Counters describing what happened to the input records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationStatistics {
    pub records_processed: u64,
    pub records_classified: u64,
    /// Records whose KPI value was missing, unparseable or out of domain
    pub missing_value: u64,
    /// Records whose group could not be resolved
    pub unresolved_group: u64,
}

impl AggregationStatistics {
    fn merge(&mut self, other: &AggregationStatistics) {
        self.records_processed += other.records_processed;
        self.records_classified += other.records_classified;
        self.missing_value += other.missing_value;
        self.unresolved_group += other.unresolved_group;
    }
}

/// One group's counts and derived shares
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group: String,
    pub counts: ClassCounts,
    pub total: u64,
    pub percentages: ClassPercentages,
}

/// Result of an aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationReport {
    pub groups: BTreeMap<String, ClassCounts>,
    pub statistics: AggregationStatistics,
}

impl AggregationReport {
    pub fn get(&self, group: &str) -> Option<&ClassCounts> {
        self.groups.get(group)
    }

    /// Counts summed over every group.
    pub fn overall(&self) -> ClassCounts {
        self.groups
            .values()
            .fold(ClassCounts::new(), |mut acc, counts| {
                acc += *counts;
                acc
            })
    }

    pub fn summaries(&self) -> Vec<GroupSummary> {
        self.groups
            .iter()
            .map(|(group, counts)| GroupSummary {
                group: group.clone(),
                counts: *counts,
                total: counts.total(),
                percentages: counts.percentages(),
            })
            .collect()
    }

    pub fn merge(&mut self, other: AggregationReport) {
        for (group, counts) in other.groups {
            *self.groups.entry(group).or_default() += counts;
        }
        self.statistics.merge(&other.statistics);
    }

    fn add_record<G: GroupKey + ?Sized>(
        &mut self,
        record: &Record,
        grouping: &G,
        rule: &ClassRule<'_>,
        field: &str,
        mode: ClassMode,
    ) {
        self.statistics.records_processed += 1;

        let Some(group) = grouping.group_of(record) else {
            debug!(field, "dropping record with unresolvable group");
            self.statistics.unresolved_group += 1;
            return;
        };

        let counts = self.groups.entry(group).or_default();
        match rule.classify(record.number(field), mode) {
            Some(class) => {
                counts.increment(class);
                self.statistics.records_classified += 1;
            }
            None => self.statistics.missing_value += 1,
        }
    }

    fn report_dropped(&self) {
        if self.statistics.unresolved_group > 0 {
            warn!(
                dropped = self.statistics.unresolved_group,
                processed = self.statistics.records_processed,
                "records dropped from aggregation: group could not be resolved"
            );
        }
    }
}

/// Count classified records per group.
///
/// `field` is the per-year KPI attribute the rule classifies.
pub fn aggregate<'r, I, G>(
    records: I,
    grouping: &G,
    rule: &ClassRule<'_>,
    field: &str,
    mode: ClassMode,
) -> AggregationReport
where
    I: IntoIterator<Item = &'r Record>,
    G: GroupKey + ?Sized,
{
    let mut report = AggregationReport::default();
    for record in records {
        report.add_record(record, grouping, rule, field, mode);
    }
    report.report_dropped();
    report
}

/// Parallel [`aggregate`] over a record slice.
pub fn aggregate_par<G>(
    records: &[Record],
    grouping: &G,
    rule: &ClassRule<'_>,
    field: &str,
    mode: ClassMode,
) -> AggregationReport
where
    G: GroupKey + Sync + ?Sized,
{
    let report = records
        .par_iter()
        .fold(AggregationReport::default, |mut acc, record| {
            acc.add_record(record, grouping, rule, field, mode);
            acc
        })
        .reduce(AggregationReport::default, |mut a, b| {
            a.merge(b);
            a
        });
    report.report_dropped();
    report
}
