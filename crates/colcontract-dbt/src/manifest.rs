//! dbt manifest.json parsing
//!
//! Only the manifest metadata and a light view of its nodes are read. The
//! column check itself runs on the catalog.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use crate::artifact::{self, ArtifactError, ArtifactMetadata};

/// dbt manifest.json structure (subset of fields we care about)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Metadata about the manifest
    pub metadata: ArtifactMetadata,

    /// Model and test nodes
    #[serde(default)]
    pub nodes: BTreeMap<String, ManifestNode>,
}

impl Manifest {
    /// Load manifest from file
    pub fn from_file(path: &Path) -> Result<Self, ArtifactError> {
        artifact::load_json(path)
    }

    /// Parse manifest from JSON string
    pub fn from_str(json: &str) -> Result<Self, ArtifactError> {
        artifact::parse_json(json)
    }

    /// Number of enabled model nodes
    pub fn model_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|node| node.resource_type == "model" && node.config.enabled)
            .count()
    }

    /// Whether the catalog was generated by the same dbt invocation
    pub fn same_invocation(&self, other: &ArtifactMetadata) -> bool {
        match (&self.metadata.invocation_id, &other.invocation_id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// A node in the manifest (model, test, snapshot, etc.)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestNode {
    /// Node name (e.g., "orders")
    #[serde(default)]
    pub name: String,

    /// Resource type (model, test, snapshot, etc.)
    #[serde(default)]
    pub resource_type: String,

    /// Original file path
    #[serde(default)]
    pub original_file_path: String,

    /// Node configuration
    #[serde(default)]
    pub config: NodeConfig,
}

/// Node configuration (from dbt_project.yml or model config)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Whether the node is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Materialization type
    #[serde(default)]
    pub materialized: Option<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            materialized: None,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "metadata": {
            "dbt_schema_version": "https://schemas.getdbt.com/dbt/manifest/v11.json",
            "dbt_version": "1.7.4",
            "generated_at": "2024-01-10T12:00:00Z",
            "invocation_id": "abc"
        },
        "nodes": {
            "model.shop.orders": {
                "name": "orders",
                "resource_type": "model",
                "original_file_path": "models/orders.sql",
                "config": {"enabled": true, "materialized": "table"}
            },
            "model.shop.legacy": {
                "name": "legacy",
                "resource_type": "model",
                "config": {"enabled": false}
            },
            "test.shop.not_null_orders_id": {
                "name": "not_null_orders_id",
                "resource_type": "test"
            }
        },
        "sources": {}
    }"#;

    #[test]
    fn parse_manifest() {
        let manifest = Manifest::from_str(MANIFEST).unwrap();
        assert_eq!(manifest.metadata.dbt_version, "1.7.4");
        assert_eq!(manifest.nodes.len(), 3);
        assert_eq!(
            manifest.nodes["model.shop.orders"].config.materialized.as_deref(),
            Some("table")
        );
    }

    #[test]
    fn counts_enabled_models() {
        let manifest = Manifest::from_str(MANIFEST).unwrap();
        assert_eq!(manifest.model_count(), 1);
    }

    #[test]
    fn invocation_comparison() {
        let manifest = Manifest::from_str(MANIFEST).unwrap();

        let mut meta = ArtifactMetadata::default();
        assert!(!manifest.same_invocation(&meta));

        meta.invocation_id = Some("abc".to_string());
        assert!(manifest.same_invocation(&meta));
    }

    #[test]
    fn missing_metadata_fails() {
        assert!(Manifest::from_str(r#"{"nodes": {}}"#).is_err());
    }
}
