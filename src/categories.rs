//! Road subgroup categories.
//!
//! Categories partition records: every non-default category is identified by
//! a boolean flag attribute, and the single default category is the
//! conjunction of every other flag being unset. The registry builds each
//! category's predicate once, so adding a category automatically extends
//! the default category's negation.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::core::{Error, Record, Result};
use crate::kpi::is_identifier;
use crate::predicate::Predicate;

/// How membership in a category is decided
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CategoryRule {
    /// Member iff `field = 1`
    Flag { field: String },
    /// Member iff no other category's flag is set
    Default,
}

/// One subgroup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub label: String,
    pub rule: CategoryRule,
}

impl Category {
    pub fn flag(key: impl Into<String>, label: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            rule: CategoryRule::Flag {
                field: field.into(),
            },
        }
    }

    pub fn default_category(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            rule: CategoryRule::Default,
        }
    }

    pub fn is_default(&self) -> bool {
        self.rule == CategoryRule::Default
    }

    pub fn flag_field(&self) -> Option<&str> {
        match &self.rule {
            CategoryRule::Flag { field } => Some(field),
            CategoryRule::Default => None,
        }
    }
}

/// Validated, immutable set of categories with pre-built predicates.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
    predicates: Vec<Predicate>,
    index: HashMap<String, usize>,
    default_index: usize,
}

impl CategoryRegistry {
    /// Build a registry.
    ///
    /// Requires exactly one default category, unique keys and unique flag
    /// attributes.
    pub fn new(categories: Vec<Category>) -> Result<Self> {
        let mut index = HashMap::with_capacity(categories.len());
        let mut flags = HashSet::new();
        let mut default_index = None;

        for (position, category) in categories.iter().enumerate() {
            if index.insert(category.key.clone(), position).is_some() {
                return Err(Error::configuration(format!(
                    "category '{}' is defined more than once",
                    category.key
                )));
            }
            match &category.rule {
                CategoryRule::Default => {
                    if let Some(previous) = default_index.replace(position) {
                        let previous: &Category = &categories[previous];
                        return Err(Error::configuration(format!(
                            "categories '{}' and '{}' are both marked as default",
                            previous.key, category.key
                        )));
                    }
                }
                CategoryRule::Flag { field } => {
                    if !is_identifier(field) {
                        return Err(Error::configuration(format!(
                            "category '{}' flag '{}' is not a plain attribute name",
                            category.key, field
                        )));
                    }
                    if !flags.insert(field.as_str()) {
                        return Err(Error::configuration(format!(
                            "flag '{}' is used by more than one category",
                            field
                        )));
                    }
                }
            }
        }

        let default_index = default_index
            .ok_or_else(|| Error::configuration("no default category configured"))?;

        let default_predicate = Predicate::and(
            categories
                .iter()
                .filter_map(Category::flag_field)
                .map(Predicate::flag_unset),
        );
        let predicates = categories
            .iter()
            .map(|category| match &category.rule {
                CategoryRule::Flag { field } => Predicate::flag_set(field.as_str()),
                CategoryRule::Default => default_predicate.clone(),
            })
            .collect();

        Ok(Self {
            categories,
            predicates,
            index,
            default_index,
        })
    }

    pub fn get(&self, key: &str) -> Option<&Category> {
        self.index.get(key).map(|&i| &self.categories[i])
    }

    /// Membership predicate for a category key.
    pub fn predicate_for(&self, key: &str) -> Option<&Predicate> {
        self.index.get(key).map(|&i| &self.predicates[i])
    }

    pub fn default_category(&self) -> &Category {
        &self.categories[self.default_index]
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, &Predicate)> {
        self.categories.iter().zip(self.predicates.iter())
    }

    /// Flag attributes of the non-default categories, in registry order.
    pub fn flag_fields(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().filter_map(Category::flag_field)
    }

    /// The category a record belongs to.
    ///
    /// `None` when more than one flag is set, which violates the partition.
    pub fn category_of(&self, record: &Record) -> Option<&Category> {
        let mut set = self
            .categories
            .iter()
            .filter(|c| c.flag_field().is_some_and(|f| record.flag(f)));
        match (set.next(), set.next()) {
            (None, _) => Some(self.default_category()),
            (Some(category), None) => Some(category),
            (Some(first), Some(second)) => {
                debug!(
                    first = %first.key,
                    second = %second.key,
                    "record has more than one category flag set"
                );
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry() -> CategoryRegistry {
        CategoryRegistry::new(vec![
            Category::flag("a", "A", "IsA"),
            Category::flag("b", "B", "IsB"),
            Category::flag("c", "C", "IsC"),
            Category::flag("d", "D", "IsD"),
            Category::default_category("default", "Default"),
        ])
        .unwrap()
    }

    fn record_with(flags: &[(&str, i32)]) -> Record {
        flags.iter().map(|&(f, v)| (f, v)).collect()
    }

    fn matching_keys(registry: &CategoryRegistry, record: &Record) -> Vec<String> {
        registry
            .iter()
            .filter(|(_, p)| p.matches(record))
            .map(|(c, _)| c.key.clone())
            .collect()
    }

    #[test]
    fn test_all_flags_clear_matches_only_default() {
        let registry = registry();
        let record = record_with(&[("IsA", 0), ("IsB", 0), ("IsC", 0), ("IsD", 0)]);
        assert_eq!(matching_keys(&registry, &record), vec!["default".to_string()]);
    }

    #[test]
    fn test_single_flag_matches_only_its_category() {
        let registry = registry();
        for flag in ["IsA", "IsB", "IsC", "IsD"] {
            let record = record_with(&[(flag, 1)]);
            let keys = matching_keys(&registry, &record);
            assert_eq!(keys.len(), 1, "{}", flag);
            assert_ne!(keys[0], "default");
            assert_eq!(
                registry.get(&keys[0]).and_then(|c| c.flag_field()),
                Some(flag)
            );
        }
    }

    #[test]
    fn test_default_predicate_negates_every_flag() {
        let registry = registry();
        let expected = Predicate::and(
            ["IsA", "IsB", "IsC", "IsD"]
                .into_iter()
                .map(Predicate::flag_unset),
        );
        assert_eq!(registry.predicate_for("default"), Some(&expected));
    }

    #[test]
    fn test_category_of() {
        let registry = registry();
        let b = record_with(&[("IsB", 1)]);
        assert_eq!(registry.category_of(&b).map(|c| c.key.as_str()), Some("b"));
        let none = Record::new();
        assert_eq!(
            registry.category_of(&none).map(|c| c.key.as_str()),
            Some("default")
        );
        let both = record_with(&[("IsA", 1), ("IsB", 1)]);
        assert!(registry.category_of(&both).is_none());
    }

    #[test]
    fn test_requires_exactly_one_default() {
        let none = CategoryRegistry::new(vec![Category::flag("a", "A", "IsA")]);
        assert!(none.is_err());
        let two = CategoryRegistry::new(vec![
            Category::default_category("x", "X"),
            Category::default_category("y", "Y"),
        ]);
        assert!(two.unwrap_err().to_string().contains("both marked as default"));
    }

    #[test]
    fn test_rejects_shared_flag() {
        let err = CategoryRegistry::new(vec![
            Category::flag("a", "A", "IsA"),
            Category::flag("b", "B", "IsA"),
            Category::default_category("rural", "Rural"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("IsA"));
    }

    #[test]
    fn test_default_only_registry_matches_everything() {
        let registry =
            CategoryRegistry::new(vec![Category::default_category("all", "All")]).unwrap();
        assert_eq!(registry.predicate_for("all"), Some(&Predicate::Always));
    }
}
