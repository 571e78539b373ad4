//! Builders for road-segment records and the national model.
//!
//! | Helper | Purpose |
//! |--------|---------|
//! | [`default_model`] | National defaults, panics if they are invalid |
//! | [`segment`] | Start a record for a segment in a region |
//! | [`SegmentBuilder`] | Add flags, routes and per-year KPI values fluently |

use crate::config::presets;
use crate::core::{AttributeValue, Record};
use crate::model::ConditionModel;

/// The national model.
///
/// # Panics
///
/// If the built-in defaults fail validation.
pub fn default_model() -> ConditionModel {
    presets::national_model().expect("national defaults are valid")
}

/// Record builder for one road segment.
pub fn segment(region: &str) -> SegmentBuilder {
    SegmentBuilder {
        record: Record::new().with("LA_NAME", region),
    }
}

#[derive(Debug, Clone)]
pub struct SegmentBuilder {
    record: Record,
}

impl SegmentBuilder {
    pub fn route(mut self, route: &str) -> Self {
        self.record.insert("ROUTE", route);
        self
    }

    /// Set a category flag attribute to 1.
    pub fn flag(mut self, field: &str) -> Self {
        self.record.insert(field, 1);
        self
    }

    /// Set a category flag attribute to 0.
    pub fn unflag(mut self, field: &str) -> Self {
        self.record.insert(field, 0);
        self
    }

    /// Raw attribute.
    pub fn attr(mut self, field: &str, value: impl Into<AttributeValue>) -> Self {
        self.record.insert(field, value);
        self
    }

    /// Value for `<prefix>_<year>`.
    pub fn value(self, prefix: &str, year: u16, value: impl Into<AttributeValue>) -> Self {
        self.attr(&format!("{}_{}", prefix, year), value)
    }

    pub fn iri(self, year: u16, value: f64) -> Self {
        self.value("AIRI", year, value)
    }

    pub fn rut(self, year: u16, value: f64) -> Self {
        self.value("LRUT", year, value)
    }

    pub fn csc(self, year: u16, value: f64) -> Self {
        self.value("CSC", year, value)
    }

    pub fn mpd(self, year: u16, value: f64) -> Self {
        self.value("MPD", year, value)
    }

    pub fn psci(self, year: u16, value: f64) -> Self {
        self.value("PSCI", year, value)
    }

    pub fn build(self) -> Record {
        self.record
    }
}
