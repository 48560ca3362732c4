//! dbt artifact parsing and model file resolution
//!
//! This crate handles:
//! - Parsing catalog.json (compiled column names and types)
//! - Parsing manifest.json metadata
//! - Mapping model file paths to catalog models

pub mod artifact;
pub mod catalog;
pub mod manifest;
pub mod files;

pub use artifact::{ArtifactError, ArtifactMetadata};
pub use catalog::{Catalog, CatalogColumn, CatalogModel, CatalogNode, TableMetadata};
pub use manifest::{Manifest, ManifestNode, NodeConfig};
pub use files::ModelFiles;
