//! Configuration: the `.pavemap.toml` schema, national defaults, discovery
//! and validation into a [`ConditionModel`](crate::model::ConditionModel).

mod core;
mod loader;
pub mod presets;
mod validation;

pub use self::core::{
    default_max_selections, CategoryConfig, OutputConfig, PavemapConfig, SelectionConfig,
    ThresholdConfig,
};
pub use loader::{
    directory_ancestors, find_config_file, load_config, load_config_from,
    parse_and_validate_config, resolve_config, CONFIG_FILE_NAME,
};
pub use validation::build_model;
