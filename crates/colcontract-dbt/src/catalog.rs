//! dbt catalog.json parsing
//!
//! The catalog holds the compiled column names and warehouse types of every
//! node, as produced by `dbt docs generate`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use crate::artifact::{self, ArtifactError, ArtifactMetadata};
use crate::files::ModelFiles;

/// dbt catalog.json structure (subset of fields we care about)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Metadata about the catalog
    #[serde(default)]
    pub metadata: ArtifactMetadata,

    /// Models, seeds and snapshots keyed by unique_id
    pub nodes: BTreeMap<String, CatalogNode>,

    /// Source tables keyed by unique_id
    #[serde(default)]
    pub sources: BTreeMap<String, CatalogNode>,
}

impl Catalog {
    /// Load catalog from file
    pub fn from_file(path: &Path) -> Result<Self, ArtifactError> {
        artifact::load_json(path)
    }

    /// Parse catalog from JSON string
    pub fn from_str(json: &str) -> Result<Self, ArtifactError> {
        artifact::parse_json(json)
    }

    /// Model nodes whose name matches one of the supplied files
    ///
    /// A node qualifies when its unique_id starts with `model.` and its last
    /// segment equals a file stem. Results are ordered by unique_id.
    pub fn models_for<'a>(&'a self, files: &'a ModelFiles) -> Vec<CatalogModel<'a>> {
        self.nodes
            .iter()
            .filter_map(|(unique_id, node)| {
                let (resource_type, name) = split_unique_id(unique_id)?;
                if resource_type != "model" {
                    return None;
                }

                let file_path = files.get(name)?;
                Some(CatalogModel {
                    unique_id,
                    name,
                    file_path,
                    node,
                })
            })
            .collect()
    }

    /// File stems with no model node in the catalog
    pub fn missing_models<'a>(&self, files: &'a ModelFiles) -> Vec<&'a str> {
        files
            .stems()
            .filter(|stem| {
                !self.nodes.keys().any(|id| {
                    split_unique_id(id) == Some(("model", *stem))
                })
            })
            .collect()
    }
}

/// Split `model.project.name` into (`model`, `name`)
fn split_unique_id(unique_id: &str) -> Option<(&str, &str)> {
    let (resource_type, rest) = unique_id.split_once('.')?;
    let name = rest.rsplit('.').next()?;
    Some((resource_type, name))
}

/// A catalog node (table or view)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogNode {
    /// Unique identifier (e.g., "model.my_project.orders")
    #[serde(default)]
    pub unique_id: Option<String>,

    /// Relation metadata
    #[serde(default)]
    pub metadata: TableMetadata,

    /// Columns keyed by name as reported by the warehouse
    #[serde(default)]
    pub columns: BTreeMap<String, CatalogColumn>,
}

impl CatalogNode {
    /// Columns in warehouse ordinal order
    ///
    /// Columns without an index sort last, ties keep key order.
    pub fn ordered_columns(&self) -> Vec<&CatalogColumn> {
        let mut columns: Vec<&CatalogColumn> = self.columns.values().collect();
        columns.sort_by_key(|c| c.index.unwrap_or(u32::MAX));
        columns
    }
}

/// Relation metadata of a catalog node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Relation type (table, view, ...)
    #[serde(rename = "type", default)]
    pub relation_type: Option<String>,

    #[serde(default)]
    pub database: Option<String>,

    #[serde(default)]
    pub schema: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default)]
    pub owner: Option<String>,
}

/// Column entry in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogColumn {
    /// Column name
    pub name: String,

    /// Warehouse data type
    #[serde(rename = "type")]
    pub data_type: String,

    /// Ordinal position
    #[serde(default)]
    pub index: Option<u32>,

    #[serde(default)]
    pub comment: Option<String>,
}

/// A catalog model selected for checking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogModel<'a> {
    /// Catalog unique_id
    pub unique_id: &'a str,

    /// Model name (last segment of the unique_id)
    pub name: &'a str,

    /// Model file as supplied by the caller
    pub file_path: &'a Path,

    /// Catalog entry
    pub node: &'a CatalogNode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CATALOG: &str = r#"{
        "metadata": {
            "dbt_schema_version": "https://schemas.getdbt.com/dbt/catalog/v1.json",
            "dbt_version": "1.7.4",
            "generated_at": "2024-01-10T12:00:00Z",
            "invocation_id": "abc",
            "env": {}
        },
        "nodes": {
            "model.shop.orders": {
                "unique_id": "model.shop.orders",
                "metadata": {"type": "BASE TABLE", "schema": "analytics", "name": "orders", "database": "db", "comment": null, "owner": "dbt"},
                "columns": {
                    "STATUS": {"type": "TEXT", "index": 2, "name": "STATUS", "comment": null},
                    "ID": {"type": "INTEGER", "index": 1, "name": "ID", "comment": null}
                },
                "stats": {}
            },
            "seed.shop.countries": {
                "metadata": {"type": "BASE TABLE"},
                "columns": {"code": {"type": "TEXT", "index": 1, "name": "code"}}
            },
            "model.shop.customers": {
                "columns": {}
            }
        },
        "sources": {},
        "errors": null
    }"#;

    #[test]
    fn parse_catalog() {
        let catalog = Catalog::from_str(CATALOG).unwrap();
        assert_eq!(catalog.metadata.dbt_version, "1.7.4");
        assert_eq!(catalog.nodes.len(), 3);

        let orders = &catalog.nodes["model.shop.orders"];
        assert_eq!(orders.metadata.relation_type.as_deref(), Some("BASE TABLE"));
        assert_eq!(orders.columns["ID"].data_type, "INTEGER");
    }

    #[test]
    fn columns_in_index_order() {
        let catalog = Catalog::from_str(CATALOG).unwrap();
        let names: Vec<&str> = catalog.nodes["model.shop.orders"]
            .ordered_columns()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["ID", "STATUS"]);
    }

    #[test]
    fn models_for_filters_by_stem_and_resource_type() {
        let catalog = Catalog::from_str(CATALOG).unwrap();
        let files = ModelFiles::from_paths(
            &["models/orders.sql", "seeds/countries.sql", "models/unknown.sql"],
            &[".sql"],
        );

        let models = catalog.models_for(&files);
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].unique_id, "model.shop.orders");
        assert_eq!(models[0].name, "orders");
        assert_eq!(models[0].file_path, Path::new("models/orders.sql"));
    }

    #[test]
    fn missing_models_lists_unmatched_stems() {
        let catalog = Catalog::from_str(CATALOG).unwrap();
        let files = ModelFiles::from_paths(&["orders.sql", "countries.sql", "unknown.sql"], &[".sql"]);
        assert_eq!(catalog.missing_models(&files), vec!["countries", "unknown"]);
    }

    #[test]
    fn column_without_type_fails_to_parse() {
        let json = r#"{"nodes": {"model.p.m": {"columns": {"a": {"name": "a"}}}}}"#;
        assert!(matches!(Catalog::from_str(json), Err(ArtifactError::ParseError(_))));
    }

    #[test]
    fn unique_id_split() {
        assert_eq!(split_unique_id("model.shop.orders"), Some(("model", "orders")));
        assert_eq!(split_unique_id("source.shop.raw.orders"), Some(("source", "orders")));
        assert_eq!(split_unique_id("orders"), None);
    }
}
