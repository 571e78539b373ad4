//! Reading record files and writing outputs.
//!
//! Records are accepted either as a JSON array of attribute maps or as a
//! feature-set document, the shape a map-server query returns:
//!
//! ```json
//! {"features": [{"attributes": {"LA_NAME": "Cork County Council", "AIRI_2018": 2.4}}]}
//! ```
//!
//! GeoJSON `properties` are accepted in place of `attributes`.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::core::{Error, Record, Result, ResultExt};

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordDocument {
    Plain(Vec<Record>),
    FeatureSet { features: Vec<Feature> },
}

#[derive(Deserialize)]
struct Feature {
    #[serde(alias = "properties")]
    attributes: Record,
}

/// Parse records from JSON text.
pub fn parse_records(contents: &str) -> Result<Vec<Record>> {
    let document: RecordDocument = serde_json::from_str(contents).map_err(|e| {
        Error::InvalidRecords(format!(
            "expected a JSON array of records or a {{\"features\": [...]}} document ({})",
            e
        ))
    })?;
    Ok(match document {
        RecordDocument::Plain(records) => records,
        RecordDocument::FeatureSet { features } => {
            features.into_iter().map(|f| f.attributes).collect()
        }
    })
}

pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let contents = read_file(path)?;
    let records = parse_records(&contents).context(path.display().to_string())?;
    debug!(path = %path.display(), count = records.len(), "read records");
    Ok(records)
}

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("reading {}", path.display()))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)
        .map_err(Error::from)
        .context(format!("writing {}", path.display()))
}
