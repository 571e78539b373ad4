//! WHERE-clause rendering for query services that take SQL-92 filters.
//!
//! Text literals are single-quoted with embedded quotes doubled, so a value
//! is always data and never predicate syntax. Attribute names are emitted
//! bare; configuration only admits plain identifiers.
//!
//! An unset flag includes NULL, as it does for [`Predicate::matches`], so
//! it renders as `COALESCE(F, 0) <> 1` rather than `F = 0`.

use std::fmt::Write as _;

use super::{Comparison, Predicate};

/// Converts a predicate into a collaborator-specific representation.
pub trait PredicateSerializer {
    type Output;

    fn serialize(&self, predicate: &Predicate) -> Self::Output;
}

/// Serializer producing a SQL WHERE expression.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlWhere;

impl PredicateSerializer for SqlWhere {
    type Output = String;

    fn serialize(&self, predicate: &Predicate) -> String {
        let mut out = String::new();
        write_predicate(&mut out, predicate);
        out
    }
}

/// Quote a text literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn write_predicate(out: &mut String, predicate: &Predicate) {
    match predicate {
        Predicate::Always => out.push_str("1=1"),
        Predicate::Never => out.push_str("1=0"),
        Predicate::Flag { field, set: true } => {
            let _ = write!(out, "{} = 1", field);
        }
        Predicate::Flag { field, set: false } => {
            let _ = write!(out, "COALESCE({}, 0) <> 1", field);
        }
        Predicate::Compare { field, cmp, value } => {
            let _ = write!(out, "{} {} {}", field, cmp.symbol(), format_number(*value));
        }
        Predicate::InSet { field, values } => {
            if let [single] = values.as_slice() {
                let _ = write!(out, "{} = {}", field, quote_literal(single));
            } else {
                let literals: Vec<String> = values.iter().map(|v| quote_literal(v)).collect();
                let _ = write!(out, "{} IN ({})", field, literals.join(", "));
            }
        }
        Predicate::HasValue { field } => {
            let _ = write!(out, "{} IS NOT NULL", field);
        }
        Predicate::And { operands } => write_joined(out, operands, " AND "),
        Predicate::Or { operands } => write_joined(out, operands, " OR "),
        Predicate::Not { operand } => {
            out.push_str("NOT ");
            write_grouped(out, operand);
        }
    }
}

fn write_joined(out: &mut String, operands: &[Predicate], separator: &str) {
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        write_grouped(out, operand);
    }
}

fn write_grouped(out: &mut String, predicate: &Predicate) {
    let compound = matches!(
        predicate,
        Predicate::And { .. } | Predicate::Or { .. } | Predicate::Not { .. }
    );
    if compound {
        out.push('(');
        write_predicate(out, predicate);
        out.push(')');
    } else {
        write_predicate(out, predicate);
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&SqlWhere.serialize(self))
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
