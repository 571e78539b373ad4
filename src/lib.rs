// Export modules for library usage
pub mod aggregation;
pub mod categories;
pub mod classification;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod formatting;
pub mod io;
pub mod kpi;
pub mod model;
pub mod output;
pub mod predicate;
pub mod stats;
pub mod testkit;

// Re-export commonly used types
pub use crate::core::{AttributeValue, ClassMode, ConditionClass, Error, Record, Result};

pub use crate::aggregation::{
    aggregate, aggregate_par, AggregationReport, AggregationStatistics, ByCategory, ByField,
    ClassCounts, ClassPercentages, GroupKey,
};
pub use crate::categories::{Category, CategoryRegistry};
pub use crate::classification::{classify, simplify, ClassRule};
pub use crate::kpi::{Boundaries, Direction, KpiCatalog, KpiDefinition, KpiScale, ThresholdTable};
pub use crate::model::{ConditionModel, Grouping};
pub use crate::predicate::{
    build_predicate, build_predicate_from_selections, ChartSelection, ChartSelections, FieldNames,
    FilterSpec, Predicate,
};
pub use crate::stats::ValueStatistics;
