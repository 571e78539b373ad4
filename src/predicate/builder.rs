use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Predicate;
use crate::categories::CategoryRegistry;

/// Attribute names for the region and route constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    pub region: String,
    pub route: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            region: "LA_NAME".to_string(),
            route: "ROUTE".to_string(),
        }
    }
}

/// Snapshot of the user's filter choices.
///
/// `year` picks which per-year KPI attribute to read downstream; it is not
/// a row filter. An empty list means "no restriction" for that group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub year: u16,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub routes: Vec<String>,
}

impl FilterSpec {
    pub fn new(year: u16) -> Self {
        Self {
            year,
            ..Default::default()
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = regions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_routes<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.routes = routes.into_iter().map(Into::into).collect();
        self
    }
}

/// Composes filter predicates from a [`FilterSpec`].
#[derive(Debug, Clone, Copy)]
pub struct PredicateBuilder<'a> {
    registry: &'a CategoryRegistry,
    fields: &'a FieldNames,
}

impl<'a> PredicateBuilder<'a> {
    pub fn new(registry: &'a CategoryRegistry, fields: &'a FieldNames) -> Self {
        Self { registry, fields }
    }

    /// AND of each non-empty group's OR of matches.
    ///
    /// With no groups present the result is [`Predicate::Always`].
    pub fn build(&self, spec: &FilterSpec) -> Predicate {
        Predicate::and(
            [
                self.category_group(&spec.categories),
                self.membership_group(&self.fields.region, &spec.regions),
                self.membership_group(&self.fields.route, &spec.routes),
            ]
            .into_iter()
            .flatten(),
        )
    }

    /// Membership predicate for one category, `None` if the key is unknown.
    pub fn category(&self, key: &str) -> Option<Predicate> {
        self.registry.predicate_for(key).cloned()
    }

    /// Membership predicate for one region name.
    pub fn region(&self, name: &str) -> Predicate {
        Predicate::in_set(self.fields.region.as_str(), [name])
    }

    fn membership_group(&self, field: &str, values: &[String]) -> Option<Predicate> {
        if values.is_empty() {
            return None;
        }
        Some(Predicate::in_set(field, values.iter().cloned()))
    }

    /// Unknown keys contribute nothing; if none resolve the group imposes
    /// no restriction.
    fn category_group(&self, keys: &[String]) -> Option<Predicate> {
        let resolved: Vec<Predicate> = keys
            .iter()
            .filter_map(|key| {
                let predicate = self.category(key);
                if predicate.is_none() {
                    warn!(category = %key, "ignoring unknown category in filter");
                }
                predicate
            })
            .collect();
        if resolved.is_empty() {
            return None;
        }
        Some(Predicate::or(resolved))
    }
}

/// Build the filter predicate for `spec`.
pub fn build_predicate(
    spec: &FilterSpec,
    registry: &CategoryRegistry,
    fields: &FieldNames,
) -> Predicate {
    PredicateBuilder::new(registry, fields).build(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::Category;
    use crate::core::Record;
    use pretty_assertions::assert_eq;

    fn registry() -> CategoryRegistry {
        CategoryRegistry::new(vec![
            Category::flag("dublin", "Dublin", "IsDublin"),
            Category::flag("peat", "Peat", "IsPeat"),
            Category::default_category("rural", "Rural"),
        ])
        .unwrap()
    }

    fn fixture() -> Vec<Record> {
        vec![
            Record::new()
                .with("LA_NAME", "Cork")
                .with("ROUTE", "R600")
                .with("IsDublin", 0)
                .with("IsPeat", 0),
            Record::new()
                .with("LA_NAME", "Fingal")
                .with("ROUTE", "R132")
                .with("IsDublin", 1)
                .with("IsPeat", 0),
            Record::new()
                .with("LA_NAME", "Offaly")
                .with("ROUTE", "R400")
                .with("IsDublin", 0)
                .with("IsPeat", 1),
            Record::new()
                .with("LA_NAME", "O'Brien's Road")
                .with("ROUTE", "L1010")
                .with("IsDublin", 0)
                .with("IsPeat", 0),
        ]
    }

    fn matching(predicate: &Predicate) -> Vec<String> {
        fixture()
            .iter()
            .filter(|r| predicate.matches(r))
            .filter_map(|r| r.text("LA_NAME").map(|s| s.into_owned()))
            .collect()
    }

    #[test]
    fn test_empty_spec_matches_everything() {
        let registry = registry();
        let fields = FieldNames::default();
        let p = build_predicate(&FilterSpec::new(2018), &registry, &fields);
        assert_eq!(p, Predicate::Always);
        assert_eq!(matching(&p).len(), fixture().len());
    }

    #[test]
    fn test_groups_are_and_of_ors() {
        let registry = registry();
        let fields = FieldNames::default();
        let spec = FilterSpec::new(2018)
            .with_categories(["rural", "peat"])
            .with_regions(["Cork", "Offaly", "Fingal"]);
        let p = build_predicate(&spec, &registry, &fields);
        assert_eq!(matching(&p), vec!["Cork", "Offaly"]);
    }

    #[test]
    fn test_default_category_uses_negation() {
        let registry = registry();
        let fields = FieldNames::default();
        let spec = FilterSpec::new(2018).with_categories(["rural"]);
        let p = build_predicate(&spec, &registry, &fields);
        assert_eq!(p.to_string(), "COALESCE(IsDublin, 0) <> 1 AND COALESCE(IsPeat, 0) <> 1");
        assert_eq!(matching(&p), vec!["Cork", "O'Brien's Road"]);
    }

    #[test]
    fn test_quoted_region_matches_only_itself() {
        let registry = registry();
        let fields = FieldNames::default();
        let spec = FilterSpec::new(2018).with_regions(["O'Brien's Road"]);
        let p = build_predicate(&spec, &registry, &fields);
        assert_eq!(matching(&p), vec!["O'Brien's Road"]);
        assert_eq!(p.to_string(), "LA_NAME = 'O''Brien''s Road'");
    }

    #[test]
    fn test_unknown_category_is_skipped() {
        let registry = registry();
        let fields = FieldNames::default();
        let spec = FilterSpec::new(2018).with_categories(["motorway", "dublin"]);
        let p = build_predicate(&spec, &registry, &fields);
        assert_eq!(matching(&p), vec!["Fingal"]);

        let only_unknown = FilterSpec::new(2018).with_categories(["motorway"]);
        assert_eq!(
            build_predicate(&only_unknown, &registry, &fields),
            Predicate::Always
        );
    }

    #[test]
    fn test_routes_restrict_within_regions() {
        let registry = registry();
        let fields = FieldNames::default();
        let spec = FilterSpec::new(2018)
            .with_regions(["Cork", "Fingal"])
            .with_routes(["R132"]);
        let p = build_predicate(&spec, &registry, &fields);
        assert_eq!(matching(&p), vec!["Fingal"]);
    }
}
