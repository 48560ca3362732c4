//! Diagnostic codes and violation reporting
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    /// Column has a contract type but its name does not match the pattern
    ColumnTypeWithoutPattern,

    /// Column name matches the pattern but its type is not a contract type
    ColumnPatternWithoutType,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ColumnTypeWithoutPattern => "COLUMN_TYPE_WITHOUT_PATTERN",
            Self::ColumnPatternWithoutType => "COLUMN_PATTERN_WITHOUT_TYPE",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a violation was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Catalog unique id of the model (e.g. `model.jaffle_shop.orders`)
    pub model: String,

    /// Model file as supplied by the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Column name (lowercased)
    pub column: String,
}

impl Location {
    pub fn new(model: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            file: None,
            column: column.into(),
        }
    }

    /// Attach the model file path
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// A contract violation with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Human-readable message
    pub message: String,

    /// Model and column the violation belongs to
    pub location: Option<Location>,

    /// Expected value (contract types or pattern)
    pub expected: Option<String>,

    /// Actual value (column type or name)
    pub actual: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
            expected: None,
            actual: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set expected/actual values
    pub fn with_comparison(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }

    /// Column name of the violation, if located
    pub fn column(&self) -> Option<&str> {
        self.location.as_ref().map(|loc| loc.column.as_str())
    }
}
