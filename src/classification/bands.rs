use serde::Serialize;

use crate::core::ConditionClass;
use crate::predicate::{Comparison, Predicate};

/// One edge of a band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bound {
    pub value: f64,
    pub inclusive: bool,
}

impl Bound {
    pub fn inclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    pub fn exclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }
}

/// The value range assigned to one condition class.
///
/// `None` edges are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub class: ConditionClass,
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

impl Band {
    pub fn contains(&self, value: f64) -> bool {
        let above_lower = self.lower.is_none_or(|b| {
            if b.inclusive {
                value >= b.value
            } else {
                value > b.value
            }
        });
        let below_upper = self.upper.is_none_or(|b| {
            if b.inclusive {
                value <= b.value
            } else {
                value < b.value
            }
        });
        above_lower && below_upper
    }

    /// Range test on `field` equivalent to [`Band::contains`].
    pub fn to_predicate(&self, field: &str) -> Predicate {
        let lower = self.lower.map(|b| {
            let cmp = if b.inclusive {
                Comparison::Ge
            } else {
                Comparison::Gt
            };
            Predicate::compare(field, cmp, b.value)
        });
        let upper = self.upper.map(|b| {
            let cmp = if b.inclusive {
                Comparison::Le
            } else {
                Comparison::Lt
            };
            Predicate::compare(field, cmp, b.value)
        });
        match (lower, upper) {
            (None, None) => Predicate::has_value(field),
            (lower, upper) => Predicate::and(lower.into_iter().chain(upper)),
        }
    }

    /// Union with an adjacent band.
    pub(crate) fn merge(self, other: Band) -> Band {
        Band {
            class: self.class,
            lower: lowest(self.lower, other.lower),
            upper: highest(self.upper, other.upper),
        }
    }
}

fn lowest(a: Option<Bound>, b: Option<Bound>) -> Option<Bound> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.value < a.value { b } else { a }),
        _ => None,
    }
}

fn highest(a: Option<Bound>, b: Option<Bound>) -> Option<Bound> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.value > a.value { b } else { a }),
        _ => None,
    }
}
