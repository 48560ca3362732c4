//! colcontract core
//!
//! Core domain model with stable, versioned types.
//! Never rename diagnostic codes - they are part of the public API.

pub mod diagnostic;
pub mod report;
pub mod config;
pub mod tokens;
pub mod rule;

pub use diagnostic::{Diagnostic, DiagnosticCode, Location};
pub use report::{Report, ReportSummary, ReportVersion};
pub use config::{Config, ConfigError, RuleConfig};
pub use tokens::TokenList;
pub use rule::{RuleParams, RuleError};
