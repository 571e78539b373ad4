pub mod aggregate;
pub mod classify;
pub mod filter;
pub mod init;

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::{build_model, resolve_config, PavemapConfig};
use crate::core::ClassMode;
use crate::model::ConditionModel;

/// Load configuration and build the validated model.
pub fn load_model(config_path: Option<&Path>) -> Result<(PavemapConfig, ConditionModel)> {
    let config = resolve_config(config_path).context("failed to load configuration")?;
    let model = build_model(&config).context("invalid configuration")?;
    Ok((config, model))
}

/// `--simplified` wins over the configured mode.
pub fn class_mode(simplified: bool, config: &PavemapConfig) -> ClassMode {
    if simplified {
        ClassMode::Simplified
    } else {
        config.default_mode()
    }
}
