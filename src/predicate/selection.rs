//! Chart selections and the record filter they imply.
//!
//! Clicking a chart element yields a (group, class, KPI, year) tuple. The
//! selected tuples are OR'd into one predicate: each becomes "record is in
//! the group AND its KPI value falls in the class's range". Unlike ordinary
//! filtering, an empty selection set matches nothing.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use super::{Predicate, PredicateBuilder};
use crate::classification::ClassRule;
use crate::core::{ClassMode, ConditionClass, Error, Result};
use crate::model::ConditionModel;

/// Default upper bound on simultaneous chart selections.
pub const DEFAULT_MAX_SELECTIONS: usize = 10;

/// The chart series a selection came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "key")]
pub enum SelectionGroup {
    /// A subgroup key from the category registry
    Category(String),
    /// A region name
    Region(String),
}

impl fmt::Display for SelectionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionGroup::Category(key) => write!(f, "category:{}", key),
            SelectionGroup::Region(name) => write!(f, "region:{}", name),
        }
    }
}

/// One clicked chart element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartSelection {
    pub group: SelectionGroup,
    pub class: ConditionClass,
    pub kpi: String,
    pub year: u16,
}

impl ChartSelection {
    pub fn new(group: SelectionGroup, class: ConditionClass, kpi: impl Into<String>, year: u16) -> Self {
        Self {
            group,
            class,
            kpi: kpi.into(),
            year,
        }
    }

    pub fn category(key: impl Into<String>, class: ConditionClass, kpi: impl Into<String>, year: u16) -> Self {
        Self::new(SelectionGroup::Category(key.into()), class, kpi, year)
    }

    pub fn region(name: impl Into<String>, class: ConditionClass, kpi: impl Into<String>, year: u16) -> Self {
        Self::new(SelectionGroup::Region(name.into()), class, kpi, year)
    }
}

/// Outcome of toggling a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Added,
    Removed,
}

/// Deduplicated, bounded set of chart selections in click order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSelections {
    items: Vec<ChartSelection>,
    capacity: usize,
}

impl Default for ChartSelections {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_SELECTIONS)
    }
}

impl ChartSelections {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    /// Add a selection.
    ///
    /// Returns `Ok(false)` if it was already present. A full set rejects the
    /// new selection and leaves the existing ones untouched.
    pub fn insert(&mut self, selection: ChartSelection) -> Result<bool> {
        if self.contains(&selection) {
            return Ok(false);
        }
        if self.items.len() >= self.capacity {
            return Err(Error::SelectionLimit {
                capacity: self.capacity,
            });
        }
        self.items.push(selection);
        Ok(true)
    }

    pub fn remove(&mut self, selection: &ChartSelection) -> bool {
        let before = self.items.len();
        self.items.retain(|s| s != selection);
        self.items.len() != before
    }

    /// Add the selection if absent, remove it if present.
    pub fn toggle(&mut self, selection: ChartSelection) -> Result<SelectionChange> {
        if self.remove(&selection) {
            Ok(SelectionChange::Removed)
        } else {
            self.insert(selection).map(|_| SelectionChange::Added)
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn contains(&self, selection: &ChartSelection) -> bool {
        self.items.contains(selection)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChartSelection> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[ChartSelection] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// OR of every selection's "group AND class range" predicate.
///
/// An empty slice matches nothing. Selections naming an unknown category or
/// KPI are skipped with a warning.
pub fn build_predicate_from_selections(
    selections: &[ChartSelection],
    model: &ConditionModel,
    mode: ClassMode,
) -> Predicate {
    let builder = PredicateBuilder::new(model.categories(), model.fields());
    Predicate::or(
        selections
            .iter()
            .filter_map(|selection| selection_predicate(selection, model, &builder, mode)),
    )
}

fn selection_predicate(
    selection: &ChartSelection,
    model: &ConditionModel,
    builder: &PredicateBuilder<'_>,
    mode: ClassMode,
) -> Option<Predicate> {
    let group = match &selection.group {
        SelectionGroup::Category(key) => builder.category(key),
        SelectionGroup::Region(name) => Some(builder.region(name)),
    };
    let Some(group) = group else {
        warn!(group = %selection.group, "ignoring selection for unknown category");
        return None;
    };

    let Some(kpi) = model.kpis().get(&selection.kpi) else {
        warn!(kpi = %selection.kpi, "ignoring selection for unknown KPI");
        return None;
    };
    let rule = match ClassRule::for_kpi(kpi, model.thresholds(), selection.year) {
        Ok(rule) => rule,
        Err(e) => {
            warn!(error = %e, "ignoring selection without thresholds");
            return None;
        }
    };
    let class = rule.class_predicate(&kpi.field_for(selection.year), selection.class, mode);
    Some(Predicate::and([group, class]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConditionClass::*;

    fn pick(n: u16) -> ChartSelection {
        ChartSelection::region(format!("LA{}", n), Poor, "iri", 2018)
    }

    #[test]
    fn test_insert_deduplicates() {
        let mut selections = ChartSelections::default();
        assert!(selections.insert(pick(1)).unwrap());
        assert!(!selections.insert(pick(1)).unwrap());
        assert_eq!(selections.len(), 1);
    }

    #[test]
    fn test_overflow_is_rejected_without_dropping() {
        let mut selections = ChartSelections::with_capacity(2);
        selections.insert(pick(1)).unwrap();
        selections.insert(pick(2)).unwrap();
        let err = selections.insert(pick(3)).unwrap_err();
        assert!(matches!(err, Error::SelectionLimit { capacity: 2 }));
        assert_eq!(selections.as_slice(), &[pick(1), pick(2)]);
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut selections = ChartSelections::default();
        assert_eq!(selections.toggle(pick(1)).unwrap(), SelectionChange::Added);
        assert_eq!(selections.toggle(pick(2)).unwrap(), SelectionChange::Added);
        assert_eq!(selections.toggle(pick(1)).unwrap(), SelectionChange::Removed);
        assert_eq!(selections.as_slice(), &[pick(2)]);
    }

    #[test]
    fn test_toggle_off_works_when_full() {
        let mut selections = ChartSelections::with_capacity(1);
        selections.insert(pick(1)).unwrap();
        assert_eq!(selections.toggle(pick(1)).unwrap(), SelectionChange::Removed);
        assert!(selections.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut selections = ChartSelections::default();
        selections.insert(pick(1)).unwrap();
        selections.clear();
        assert!(selections.is_empty());
    }

    #[test]
    fn test_selections_differing_in_class_are_distinct() {
        let mut selections = ChartSelections::default();
        selections
            .insert(ChartSelection::category("rural", Good, "iri", 2018))
            .unwrap();
        selections
            .insert(ChartSelection::category("rural", Fair, "iri", 2018))
            .unwrap();
        assert_eq!(selections.len(), 2);
    }
}
