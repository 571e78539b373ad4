use std::collections::{BTreeMap, HashMap};

use super::{Boundaries, KpiCatalog, KpiDefinition, KpiScale};
use crate::core::{Error, Result};

/// Boundaries for one KPI, with optional per-year overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiThresholds {
    pub default: Boundaries,
    pub by_year: BTreeMap<u16, Boundaries>,
}

impl KpiThresholds {
    pub fn new(default: Boundaries) -> Self {
        Self {
            default,
            by_year: BTreeMap::new(),
        }
    }

    pub fn with_year(mut self, year: u16, boundaries: Boundaries) -> Self {
        self.by_year.insert(year, boundaries);
        self
    }

    /// Boundaries in force for a survey year.
    pub fn for_year(&self, year: u16) -> &Boundaries {
        self.by_year.get(&year).unwrap_or(&self.default)
    }
}

/// Per-KPI, per-year threshold table.
///
/// Loaded once and treated as immutable while classifications run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdTable {
    entries: HashMap<String, KpiThresholds>,
}

impl ThresholdTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kpi: impl Into<String>, thresholds: KpiThresholds) -> Self {
        self.insert(kpi, thresholds);
        self
    }

    pub fn insert(&mut self, kpi: impl Into<String>, thresholds: KpiThresholds) {
        self.entries.insert(kpi.into(), thresholds);
    }

    pub fn get(&self, kpi: &str) -> Option<&KpiThresholds> {
        self.entries.get(kpi)
    }

    /// Boundaries for a KPI in a given year, falling back to its default table.
    pub fn resolve(&self, kpi: &str, year: u16) -> Option<&Boundaries> {
        self.entries.get(kpi).map(|t| t.for_year(year))
    }

    /// Check every table against the catalog.
    ///
    /// Each KPI whose boundaries come from the table needs an entry, and
    /// every entry (default and per-year) must be monotonic in its KPI's
    /// direction. Three-class KPIs take exactly `good` and `fair`. Entries
    /// for unknown KPIs or for visual rating KPIs are rejected.
    pub fn validate(&self, catalog: &KpiCatalog) -> Result<()> {
        for kpi in catalog.iter() {
            if kpi.scale.uses_table() && !self.entries.contains_key(&kpi.key) {
                return Err(Error::configuration(format!(
                    "KPI '{}' has no thresholds configured",
                    kpi.key
                )));
            }
        }

        let mut keys: Vec<_> = self.entries.keys().collect();
        keys.sort();
        for key in keys {
            let kpi = catalog.get(key).ok_or_else(|| {
                Error::configuration(format!("thresholds given for unknown KPI '{}'", key))
            })?;
            if !kpi.scale.uses_table() {
                return Err(Error::configuration(format!(
                    "KPI '{}' uses the fixed visual rating cut points and takes no thresholds",
                    key
                )));
            }
            let entry = &self.entries[key];
            check_boundaries(kpi, &entry.default).map_err(|e| {
                Error::configuration(format!("thresholds for '{}': {}", key, e))
            })?;
            for (year, boundaries) in &entry.by_year {
                check_boundaries(kpi, boundaries).map_err(|e| {
                    Error::configuration(format!("thresholds for '{}' ({}): {}", key, year, e))
                })?;
            }
        }

        Ok(())
    }
}

fn check_boundaries(
    kpi: &KpiDefinition,
    boundaries: &Boundaries,
) -> std::result::Result<(), String> {
    boundaries.validate(kpi.direction)?;
    if kpi.scale == KpiScale::ThreeClass
        && (boundaries.best.is_some()
            || boundaries.poor.is_some()
            || boundaries.good.is_none()
            || boundaries.fair.is_none())
    {
        return Err("a three-class KPI takes exactly 'good' and 'fair' boundaries".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kpi::Direction;

    const MPD: Boundaries = Boundaries {
        best: None,
        good: Some(0.7),
        fair: Some(0.6),
        poor: None,
    };

    fn catalog() -> KpiCatalog {
        KpiCatalog::new(vec![
            KpiDefinition::continuous("iri", "Roughness", "AIRI", Direction::LowerIsBetter),
            KpiDefinition::visual_rating("psci", "Visual rating", "PSCI"),
            KpiDefinition::three_class("mpd", "Texture", "MPD", Direction::HigherIsBetter),
        ])
        .unwrap()
    }

    fn table() -> ThresholdTable {
        ThresholdTable::new()
            .with("iri", KpiThresholds::new(Boundaries::full(2.0, 3.0, 5.0, 7.0)))
            .with("mpd", KpiThresholds::new(MPD))
    }

    #[test]
    fn test_year_override_takes_precedence() {
        let table = ThresholdTable::new().with(
            "iri",
            KpiThresholds::new(Boundaries::full(2.0, 3.0, 5.0, 7.0))
                .with_year(2011, Boundaries::full(2.5, 3.5, 5.5, 7.5)),
        );
        assert_eq!(table.resolve("iri", 2011).and_then(|b| b.best), Some(2.5));
        assert_eq!(table.resolve("iri", 2018).and_then(|b| b.best), Some(2.0));
        assert!(table.resolve("rut", 2018).is_none());
    }

    #[test]
    fn test_validate_requires_continuous_entries() {
        let err = ThresholdTable::new().validate(&catalog()).unwrap_err();
        assert!(err.to_string().contains("iri"));
    }

    #[test]
    fn test_validate_accepts_complete_table() {
        assert!(table().validate(&catalog()).is_ok());
    }

    #[test]
    fn test_validate_requires_three_class_entries() {
        let table = ThresholdTable::new()
            .with("iri", KpiThresholds::new(Boundaries::full(2.0, 3.0, 5.0, 7.0)));
        let err = table.validate(&catalog()).unwrap_err();
        assert!(err.to_string().contains("mpd"));
    }

    #[test]
    fn test_validate_checks_year_overrides() {
        let table = table().with(
            "iri",
            KpiThresholds::new(Boundaries::full(2.0, 3.0, 5.0, 7.0))
                .with_year(2011, Boundaries::full(7.0, 5.0, 3.0, 2.0)),
        );
        let err = table.validate(&catalog()).unwrap_err();
        assert!(err.to_string().contains("2011"));
    }

    #[test]
    fn test_validate_rejects_unknown_kpi() {
        let table = table()
            .with("iri_typo", KpiThresholds::new(Boundaries::full(2.0, 3.0, 5.0, 7.0)));
        assert!(table.validate(&catalog()).is_err());
    }

    #[test]
    fn test_validate_rejects_visual_rating_entries() {
        let table = table().with("psci", KpiThresholds::new(Boundaries::full(8.0, 6.0, 4.0, 2.0)));
        let err = table.validate(&catalog()).unwrap_err();
        assert!(err.to_string().contains("psci"));
        assert!(err.to_string().contains("visual rating"));
    }

    #[test]
    fn test_validate_rejects_extra_classes_for_three_class_kpi() {
        let with_best = table().with(
            "mpd",
            KpiThresholds::new(Boundaries {
                best: Some(0.9),
                ..MPD
            }),
        );
        assert!(with_best.validate(&catalog()).is_err());

        let with_poor_year = table().with(
            "mpd",
            KpiThresholds::new(MPD).with_year(
                2016,
                Boundaries {
                    poor: Some(0.4),
                    ..MPD
                },
            ),
        );
        let err = with_poor_year.validate(&catalog()).unwrap_err();
        assert!(err.to_string().contains("2016"));
        assert!(err.to_string().contains("three-class"));
    }

    #[test]
    fn test_validate_requires_both_three_class_boundaries() {
        let only_good = table().with(
            "mpd",
            KpiThresholds::new(Boundaries {
                fair: None,
                ..MPD
            }),
        );
        assert!(only_good.validate(&catalog()).is_err());
    }
}
