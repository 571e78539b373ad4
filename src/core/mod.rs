//! Core data types shared across the crate

pub mod errors;
pub mod record;
pub mod types;

pub use errors::{Error, Result, ResultExt};
pub use record::{AttributeValue, Record};
pub use types::{ClassMode, ConditionClass};
