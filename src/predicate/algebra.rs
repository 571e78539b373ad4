use serde::{Deserialize, Serialize};

use crate::core::Record;

/// Numeric comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    #[inline]
    pub fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }
}

/// Boolean filter over a record's attributes.
///
/// Build compound predicates with [`Predicate::and`], [`Predicate::or`] and
/// [`Predicate::negate`]; they fold constants away so an empty conjunction
/// is [`Predicate::Always`] and an empty disjunction is [`Predicate::Never`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    /// Matches every record
    Always,
    /// Matches no record
    Never,
    /// Boolean flag attribute is set (`= 1`) or not set
    Flag { field: String, set: bool },
    /// Numeric attribute compared to a literal
    Compare {
        field: String,
        cmp: Comparison,
        value: f64,
    },
    /// Attribute text equals one of the listed literals
    InSet { field: String, values: Vec<String> },
    /// Attribute holds a usable number
    HasValue { field: String },
    And { operands: Vec<Predicate> },
    Or { operands: Vec<Predicate> },
    Not { operand: Box<Predicate> },
}

impl Predicate {
    pub fn flag_set(field: impl Into<String>) -> Self {
        Predicate::Flag {
            field: field.into(),
            set: true,
        }
    }

    pub fn flag_unset(field: impl Into<String>) -> Self {
        Predicate::Flag {
            field: field.into(),
            set: false,
        }
    }

    pub fn compare(field: impl Into<String>, cmp: Comparison, value: f64) -> Self {
        Predicate::Compare {
            field: field.into(),
            cmp,
            value,
        }
    }

    pub fn has_value(field: impl Into<String>) -> Self {
        Predicate::HasValue {
            field: field.into(),
        }
    }

    /// Membership test; an empty value list matches nothing.
    pub fn in_set<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Predicate::Never;
        }
        let mut seen = std::collections::HashSet::new();
        values.retain(|v| seen.insert(v.clone()));
        Predicate::InSet {
            field: field.into(),
            values,
        }
    }

    /// Conjunction, dropping `Always` operands and short-circuiting on `Never`.
    pub fn and<I: IntoIterator<Item = Predicate>>(operands: I) -> Self {
        let mut kept = Vec::new();
        for operand in operands {
            match operand {
                Predicate::Always => {}
                Predicate::Never => return Predicate::Never,
                Predicate::And { operands } => kept.extend(operands),
                other => kept.push(other),
            }
        }
        match kept.len() {
            0 => Predicate::Always,
            1 => kept.remove(0),
            _ => Predicate::And { operands: kept },
        }
    }

    /// Disjunction, dropping `Never` operands and short-circuiting on `Always`.
    pub fn or<I: IntoIterator<Item = Predicate>>(operands: I) -> Self {
        let mut kept = Vec::new();
        for operand in operands {
            match operand {
                Predicate::Never => {}
                Predicate::Always => return Predicate::Always,
                Predicate::Or { operands } => kept.extend(operands),
                other => kept.push(other),
            }
        }
        match kept.len() {
            0 => Predicate::Never,
            1 => kept.remove(0),
            _ => Predicate::Or { operands: kept },
        }
    }

    pub fn negate(self) -> Self {
        match self {
            Predicate::Always => Predicate::Never,
            Predicate::Never => Predicate::Always,
            Predicate::Flag { field, set } => Predicate::Flag { field, set: !set },
            Predicate::Not { operand } => *operand,
            other => Predicate::Not {
                operand: Box::new(other),
            },
        }
    }

    /// Evaluate against one record.
    ///
    /// Comparisons against a missing or non-numeric attribute are false.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Never => false,
            Predicate::Flag { field, set } => record.flag(field) == *set,
            Predicate::Compare { field, cmp, value } => record
                .number(field)
                .is_some_and(|actual| cmp.holds(actual, *value)),
            Predicate::InSet { field, values } => record
                .text(field)
                .is_some_and(|actual| values.iter().any(|v| v.as_str() == actual.as_ref())),
            Predicate::HasValue { field } => record.number(field).is_some(),
            Predicate::And { operands } => operands.iter().all(|p| p.matches(record)),
            Predicate::Or { operands } => operands.iter().any(|p| p.matches(record)),
            Predicate::Not { operand } => !operand.matches(record),
        }
    }

    /// Keep the records this predicate matches.
    pub fn filter<'r, I>(&'r self, records: I) -> impl Iterator<Item = &'r Record> + 'r
    where
        I: IntoIterator<Item = &'r Record>,
        I::IntoIter: 'r,
    {
        records.into_iter().filter(move |r| self.matches(r))
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Predicate::Always)
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Predicate::Never)
    }
}
