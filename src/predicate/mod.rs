//! Composable record predicates.
//!
//! This module provides a small predicate algebra (AND/OR/NOT over atomic
//! attribute tests), an in-memory evaluator, and a pluggable serializer for
//! query services that expect WHERE strings.
//!
//! # Design Principles
//!
//! - **Pure functions**: building and evaluating predicates has no side effects
//! - **Meaning over syntax**: correctness is defined by [`Predicate::matches`];
//!   [`SqlWhere`] is one rendering of it
//! - **Composability**: constructors fold constants, so empty groups vanish
//!
//! # Examples
//!
//! ```
//! use pavemap::predicate::{FilterSpec, Predicate};
//! use pavemap::testkit::default_model;
//! use pavemap::Record;
//!
//! let model = default_model();
//! let spec = FilterSpec::new(2018)
//!     .with_categories(["rural"])
//!     .with_regions(["Cork County Council"]);
//! let predicate = model.build_predicate(&spec);
//!
//! let record = Record::new().with("LA_NAME", "Cork County Council");
//! assert!(predicate.matches(&record));
//! assert!(model.build_predicate(&FilterSpec::new(2018)).is_always());
//! ```

mod algebra;
mod builder;
pub mod selection;
pub mod sql;

pub use algebra::{Comparison, Predicate};
pub use builder::{build_predicate, FieldNames, FilterSpec, PredicateBuilder};
pub use selection::{
    build_predicate_from_selections, ChartSelection, ChartSelections, SelectionChange,
    SelectionGroup, DEFAULT_MAX_SELECTIONS,
};
pub use sql::{PredicateSerializer, SqlWhere};
