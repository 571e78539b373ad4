//! The validated condition model.
//!
//! Everything the classifier, predicate builder and aggregator need is
//! bundled here and checked once at construction. After that the model is
//! read-only and can be shared freely across threads.

use std::collections::BTreeMap;

use crate::aggregation::{self, AggregationReport, ByCategory, ByField, GroupKey};
use crate::categories::CategoryRegistry;
use crate::classification::ClassRule;
use crate::core::{ClassMode, ConditionClass, Error, Record, Result};
use crate::kpi::{KpiCatalog, ThresholdTable};
use crate::predicate::{
    build_predicate_from_selections, ChartSelection, ChartSelections, FieldNames, FilterSpec,
    Predicate, PredicateBuilder, DEFAULT_MAX_SELECTIONS,
};
use crate::stats::{self, ValueStatistics};

/// How aggregated records are grouped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grouping {
    /// By the region attribute
    #[default]
    Region,
    /// By subgroup category
    Category,
}

/// Group resolver chosen from a [`Grouping`] against a model's fields.
enum Grouper<'a> {
    Field(ByField),
    Category(ByCategory<'a>),
}

impl GroupKey for Grouper<'_> {
    fn group_of(&self, record: &Record) -> Option<String> {
        match self {
            Grouper::Field(by) => by.group_of(record),
            Grouper::Category(by) => by.group_of(record),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConditionModel {
    kpis: KpiCatalog,
    thresholds: ThresholdTable,
    categories: CategoryRegistry,
    fields: FieldNames,
    max_selections: usize,
}

impl ConditionModel {
    /// Assemble and validate a model.
    pub fn new(
        kpis: KpiCatalog,
        thresholds: ThresholdTable,
        categories: CategoryRegistry,
        fields: FieldNames,
    ) -> Result<Self> {
        thresholds.validate(&kpis)?;
        for (name, field) in [("region", &fields.region), ("route", &fields.route)] {
            if !crate::kpi::is_identifier(field) {
                return Err(Error::configuration(format!(
                    "{} field '{}' is not a plain attribute name",
                    name, field
                )));
            }
        }
        Ok(Self {
            kpis,
            thresholds,
            categories,
            fields,
            max_selections: DEFAULT_MAX_SELECTIONS,
        })
    }

    pub fn with_max_selections(mut self, max_selections: usize) -> Result<Self> {
        if max_selections == 0 {
            return Err(Error::configuration("max_selections must be at least 1"));
        }
        self.max_selections = max_selections;
        Ok(self)
    }

    pub fn kpis(&self) -> &KpiCatalog {
        &self.kpis
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    pub fn fields(&self) -> &FieldNames {
        &self.fields
    }

    pub fn max_selections(&self) -> usize {
        self.max_selections
    }

    /// Classification rule for a KPI and survey year.
    pub fn rule(&self, kpi: &str, year: u16) -> Result<ClassRule<'_>> {
        let definition = self.kpis.require(kpi)?;
        ClassRule::for_kpi(definition, &self.thresholds, year)
    }

    /// Attribute holding a KPI's value for a survey year.
    pub fn field_for(&self, kpi: &str, year: u16) -> Result<String> {
        Ok(self.kpis.require(kpi)?.field_for(year))
    }

    pub fn classify(
        &self,
        kpi: &str,
        year: u16,
        value: Option<f64>,
        mode: ClassMode,
    ) -> Result<Option<ConditionClass>> {
        Ok(self.rule(kpi, year)?.classify(value, mode))
    }

    /// Classify the KPI value stored on a record.
    pub fn classify_record(
        &self,
        record: &Record,
        kpi: &str,
        year: u16,
        mode: ClassMode,
    ) -> Result<Option<ConditionClass>> {
        let field = self.field_for(kpi, year)?;
        Ok(self.rule(kpi, year)?.classify(record.number(&field), mode))
    }

    /// Range predicate matching exactly the records classified as `class`.
    pub fn class_predicate(
        &self,
        kpi: &str,
        year: u16,
        class: ConditionClass,
        mode: ClassMode,
    ) -> Result<Predicate> {
        let field = self.field_for(kpi, year)?;
        Ok(self.rule(kpi, year)?.class_predicate(&field, class, mode))
    }

    pub fn predicate_builder(&self) -> PredicateBuilder<'_> {
        PredicateBuilder::new(&self.categories, &self.fields)
    }

    pub fn build_predicate(&self, spec: &FilterSpec) -> Predicate {
        self.predicate_builder().build(spec)
    }

    pub fn build_selection_predicate(
        &self,
        selections: &[ChartSelection],
        mode: ClassMode,
    ) -> Predicate {
        build_predicate_from_selections(selections, self, mode)
    }

    /// An empty selection set bounded by this model's limit.
    pub fn selections(&self) -> ChartSelections {
        ChartSelections::with_capacity(self.max_selections)
    }

    fn grouper(&self, grouping: Grouping) -> Grouper<'_> {
        match grouping {
            Grouping::Region => Grouper::Field(ByField::new(self.fields.region.as_str())),
            Grouping::Category => Grouper::Category(ByCategory::new(&self.categories)),
        }
    }

    pub fn aggregate<'r, I>(
        &self,
        records: I,
        grouping: Grouping,
        kpi: &str,
        year: u16,
        mode: ClassMode,
    ) -> Result<AggregationReport>
    where
        I: IntoIterator<Item = &'r Record>,
    {
        let rule = self.rule(kpi, year)?;
        let field = self.field_for(kpi, year)?;
        let _span = tracing::debug_span!("aggregate", kpi, year, field = %field).entered();
        Ok(aggregation::aggregate(
            records,
            &self.grouper(grouping),
            &rule,
            &field,
            mode,
        ))
    }

    /// Same result as [`ConditionModel::aggregate`], computed on the rayon pool.
    pub fn aggregate_par(
        &self,
        records: &[Record],
        grouping: Grouping,
        kpi: &str,
        year: u16,
        mode: ClassMode,
    ) -> Result<AggregationReport> {
        let rule = self.rule(kpi, year)?;
        let field = self.field_for(kpi, year)?;
        let _span = tracing::debug_span!("aggregate_par", kpi, year, field = %field).entered();
        Ok(aggregation::aggregate_par(
            records,
            &self.grouper(grouping),
            &rule,
            &field,
            mode,
        ))
    }

    pub fn value_statistics<'r, I>(
        &self,
        records: I,
        grouping: Grouping,
        kpi: &str,
        year: u16,
        percentiles: &[u8],
    ) -> Result<BTreeMap<String, ValueStatistics>>
    where
        I: IntoIterator<Item = &'r Record>,
    {
        let rule = self.rule(kpi, year)?;
        let field = self.field_for(kpi, year)?;
        Ok(stats::group_statistics(
            records,
            &self.grouper(grouping),
            &rule,
            &field,
            percentiles,
        ))
    }
}
