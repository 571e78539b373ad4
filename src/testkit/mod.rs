//! Fixtures shared by unit tests, integration tests and doc examples.
//!
//! ```
//! use pavemap::testkit::{default_model, segment};
//! use pavemap::{ClassMode, ConditionClass};
//!
//! let model = default_model();
//! let record = segment("Offaly County Council").flag("IsPeat").iri(2018, 4.2).build();
//! assert_eq!(
//!     model.classify_record(&record, "iri", 2018, ClassMode::Full).unwrap(),
//!     Some(ConditionClass::Fair)
//! );
//! ```

pub mod helpers;

pub use helpers::{default_model, segment, SegmentBuilder};
