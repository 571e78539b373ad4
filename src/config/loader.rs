use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::core::PavemapConfig;
use super::validation::build_model;
use crate::core::{Error, Result, ResultExt};

/// File name searched for in the working directory and its ancestors.
pub const CONFIG_FILE_NAME: &str = ".pavemap.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse a TOML configuration and check that it yields a valid model.
pub fn parse_and_validate_config(contents: &str) -> Result<PavemapConfig> {
    let config = toml::from_str::<PavemapConfig>(contents)
        .map_err(|e| Error::configuration(format!("failed to parse {}: {}", CONFIG_FILE_NAME, e)))?;
    build_model(&config)?;
    Ok(config)
}

/// Lazily yields `start` and up to `max_depth - 1` of its ancestors.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Nearest `.pavemap.toml` at or above `start`.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
}

/// Load and validate a specific configuration file.
pub fn load_config_from(path: &Path) -> Result<PavemapConfig> {
    let contents = read_config_file(path)
        .map_err(Error::from)
        .context(format!("reading {}", path.display()))?;
    let config = parse_and_validate_config(&contents).context(path.display().to_string())?;
    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// Discover and load the configuration for the working directory.
///
/// No file found means the national defaults. A file that exists but is
/// invalid is an error rather than a silent fallback.
pub fn load_config() -> Result<PavemapConfig> {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            warn!(error = %e, "failed to get current directory, using default config");
            return Ok(PavemapConfig::default());
        }
    };

    match find_config_file(&current) {
        Some(path) => load_config_from(&path),
        None => {
            debug!(
                depth = MAX_TRAVERSAL_DEPTH,
                "no {} found, using default config", CONFIG_FILE_NAME
            );
            Ok(PavemapConfig::default())
        }
    }
}

/// Explicit path if given, otherwise discovery.
pub fn resolve_config(explicit: Option<&Path>) -> Result<PavemapConfig> {
    match explicit {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
}
