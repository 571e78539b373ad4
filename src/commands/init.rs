use anyhow::Result;
use std::path::Path;

use crate::config::{presets::DEFAULT_CONFIG_TOML, CONFIG_FILE_NAME};
use crate::io;

/// Write the national defaults to `.pavemap.toml` in `dir`.
pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG_TOML)?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);

    Ok(())
}
