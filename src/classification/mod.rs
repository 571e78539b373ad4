//! Condition classification.
//!
//! A measurement is mapped to a [`ConditionClass`] by locating it in the
//! ordered bands derived from a KPI's boundaries. The same bands produce
//! the inverse range predicates used for chart selections, so a class
//! predicate matches exactly the values [`ClassRule::classify`] assigns to
//! that class.
//!
//! # Boundary semantics
//!
//! A value equal to a boundary belongs to the better-side class, for every
//! KPI and in both modes:
//!
//! - lower-is-better, `good = 3.0`: 3.0 is good, 3.0001 is fair
//! - higher-is-better, `good = 0.45`: 0.45 is good, 0.4499 is fair
//!
//! # Example
//!
//! ```
//! use pavemap::classification::ClassRule;
//! use pavemap::kpi::{Boundaries, Direction};
//! use pavemap::{ClassMode, ConditionClass};
//!
//! let table = Boundaries::full(2.0, 3.0, 5.0, 7.0);
//! let rule = ClassRule::new(Direction::LowerIsBetter, &table);
//!
//! assert_eq!(rule.classify(Some(2.5), ClassMode::Full), Some(ConditionClass::Good));
//! assert_eq!(rule.classify(Some(9.0), ClassMode::Simplified), Some(ConditionClass::Poor));
//! assert_eq!(rule.classify(None, ClassMode::Full), None);
//! ```

mod bands;

pub use bands::{Band, Bound};

use crate::core::{ClassMode, ConditionClass, Error, Result};
use crate::kpi::{
    Boundaries, Direction, KpiDefinition, KpiScale, ThresholdTable, VISUAL_RATING_CUT_POINTS,
};
use crate::predicate::{Comparison, Predicate};

/// Collapse a class to the good/fair/poor view.
#[inline]
pub fn simplify(class: ConditionClass) -> ConditionClass {
    class.simplify()
}

/// Classify a KPI value for a survey year.
///
/// Fails only when the KPI has no boundaries for `year`, which a validated
/// model rules out.
pub fn classify(
    kpi: &KpiDefinition,
    value: Option<f64>,
    table: &ThresholdTable,
    year: u16,
    mode: ClassMode,
) -> Result<Option<ConditionClass>> {
    Ok(ClassRule::for_kpi(kpi, table, year)?.classify(value, mode))
}

/// Resolved classification rule for one KPI and year.
///
/// Bands for both modes are derived once at construction.
#[derive(Debug, Clone)]
pub struct ClassRule<'a> {
    direction: Direction,
    boundaries: &'a Boundaries,
    min_valid: Option<f64>,
    max_valid: Option<f64>,
    full: Vec<Band>,
    simplified: Vec<Band>,
}

impl<'a> ClassRule<'a> {
    pub fn new(direction: Direction, boundaries: &'a Boundaries) -> Self {
        let full = full_bands(direction, boundaries);
        let simplified = simplified_bands(&full);
        Self {
            direction,
            boundaries,
            min_valid: None,
            max_valid: None,
            full,
            simplified,
        }
    }

    /// Restrict classification to an inclusive value domain.
    pub fn with_domain(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_valid = min;
        self.max_valid = max;
        self
    }

    /// Rule for a KPI in a given year.
    ///
    /// Visual rating KPIs use the fixed cut points and ignore the table.
    pub fn for_kpi(kpi: &'a KpiDefinition, table: &'a ThresholdTable, year: u16) -> Result<Self> {
        let boundaries = match kpi.scale {
            KpiScale::VisualRating => &VISUAL_RATING_CUT_POINTS,
            KpiScale::Continuous | KpiScale::ThreeClass => table
                .resolve(&kpi.key, year)
                .filter(|b| !b.is_empty())
                .ok_or_else(|| Error::MissingThresholds {
                    kpi: kpi.key.clone(),
                    year,
                })?,
        };
        let (min, max) = kpi.valid_range();
        Ok(Self::new(kpi.direction, boundaries).with_domain(min, max))
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn boundaries(&self) -> &Boundaries {
        self.boundaries
    }

    pub fn in_domain(&self, value: f64) -> bool {
        value.is_finite()
            && self.min_valid.is_none_or(|min| value >= min)
            && self.max_valid.is_none_or(|max| value <= max)
    }

    /// Ordered bands, best class first.
    ///
    /// In simplified mode the full bands are projected onto good/fair/poor
    /// and adjacent bands of the same class are merged, so shared boundaries
    /// break ties identically in both modes.
    pub fn bands(&self, mode: ClassMode) -> &[Band] {
        match mode {
            ClassMode::Full => &self.full,
            ClassMode::Simplified => &self.simplified,
        }
    }

    /// Classes this rule can produce in `mode`, best first.
    pub fn reachable(&self, mode: ClassMode) -> Vec<ConditionClass> {
        self.bands(mode).iter().map(|b| b.class).collect()
    }

    /// Classify a measurement.
    ///
    /// Missing, non-finite and out-of-domain values have no class.
    pub fn classify(&self, value: Option<f64>, mode: ClassMode) -> Option<ConditionClass> {
        let value = value.filter(|v| self.in_domain(*v))?;
        self.bands(mode)
            .iter()
            .find(|band| band.contains(value))
            .map(|band| band.class)
    }

    /// Predicate on `field` matching exactly the values classified as `class`.
    pub fn class_predicate(&self, field: &str, class: ConditionClass, mode: ClassMode) -> Predicate {
        let range = Predicate::or(
            self.bands(mode)
                .iter()
                .filter(|band| band.class == class)
                .map(|band| band.to_predicate(field)),
        );
        if range.is_never() {
            return range;
        }
        let domain = self
            .min_valid
            .map(|min| Predicate::compare(field, Comparison::Ge, min))
            .into_iter()
            .chain(
                self.max_valid
                    .map(|max| Predicate::compare(field, Comparison::Le, max)),
            );
        Predicate::and(domain.chain(std::iter::once(range)))
    }
}

fn full_bands(direction: Direction, boundaries: &Boundaries) -> Vec<Band> {
    let present = boundaries.present();
    let Some(&(last_class, last_value)) = present.last() else {
        return Vec::new();
    };

    let mut bands = Vec::with_capacity(present.len() + 1);
    let mut better_edge = None;
    for &(class, value) in &present {
        bands.push(band(direction, class, better_edge, Some(value)));
        better_edge = Some(value);
    }
    if let Some(tail) = last_class.worse() {
        bands.push(band(direction, tail, Some(last_value), None));
    }
    bands
}

fn simplified_bands(full: &[Band]) -> Vec<Band> {
    let mut merged: Vec<Band> = Vec::with_capacity(3);
    for band in full {
        let band = Band {
            class: band.class.simplify(),
            ..*band
        };
        match merged.last_mut() {
            Some(last) if last.class == band.class => *last = last.merge(band),
            _ => merged.push(band),
        }
    }
    merged
}

/// A band bounded by the previous (better-side) boundary, exclusive, and
/// its own boundary, inclusive.
fn band(
    direction: Direction,
    class: ConditionClass,
    better_edge: Option<f64>,
    own_edge: Option<f64>,
) -> Band {
    let better = better_edge.map(Bound::exclusive);
    let own = own_edge.map(Bound::inclusive);
    match direction {
        Direction::LowerIsBetter => Band {
            class,
            lower: better,
            upper: own,
        },
        Direction::HigherIsBetter => Band {
            class,
            lower: own,
            upper: better,
        },
    }
}
