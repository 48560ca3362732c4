//! Shared loading for dbt JSON artifacts

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// `metadata` block common to dbt artifacts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    #[serde(default)]
    pub dbt_schema_version: String,
    #[serde(default)]
    pub dbt_version: String,
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub invocation_id: Option<String>,
}

/// Read and deserialize a JSON artifact
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| ArtifactError::IoError(path.display().to_string(), e.to_string()))?;

    parse_json(&contents)
}

/// Deserialize a JSON artifact from a string
pub fn parse_json<T: DeserializeOwned>(json: &str) -> Result<T, ArtifactError> {
    serde_json::from_str(json)
        .map_err(|e| ArtifactError::ParseError(e.to_string()))
}

/// Artifact loading errors
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to read {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse JSON: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reports_path() {
        let err = load_json::<ArtifactMetadata>(Path::new("target/nope.json")).unwrap_err();
        assert!(matches!(err, ArtifactError::IoError(ref p, _) if p.contains("nope.json")));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            parse_json::<ArtifactMetadata>("{not json"),
            Err(ArtifactError::ParseError(_))
        ));
    }

    #[test]
    fn metadata_fields_default() {
        let meta: ArtifactMetadata = parse_json(r#"{"dbt_version": "1.7.4"}"#).unwrap();
        assert_eq!(meta.dbt_version, "1.7.4");
        assert!(meta.invocation_id.is_none());
    }
}
