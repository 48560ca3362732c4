//! Rule parameters for the column name contract

use regex::{Regex, RegexBuilder};
use serde_json::json;
use crate::tokens::TokenList;

/// Immutable parameters of one contract check
#[derive(Debug, Clone)]
pub struct RuleParams {
    /// Pattern as supplied, used in messages
    pattern_source: String,

    /// Compiled case-insensitive pattern
    pattern: Regex,

    /// Data types that require the naming pattern
    dtypes: TokenList,

    /// Column names exempt from the pattern test
    ignore: TokenList,

    /// Skip the type -> name direction when set
    pattern_flag: bool,
}

impl RuleParams {
    /// Build rule parameters from raw caller strings
    ///
    /// The pattern is compiled here so a malformed pattern fails before any
    /// column is visited.
    pub fn new(
        pattern: &str,
        dtype: &str,
        col_name_ignore: &str,
        pattern_flag: bool,
    ) -> Result<Self, RuleError> {
        if pattern.is_empty() {
            return Err(RuleError::EmptyPattern);
        }

        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| RuleError::InvalidPattern(pattern.to_string(), e.to_string()))?;

        Ok(Self {
            pattern_source: pattern.to_string(),
            pattern: compiled,
            dtypes: TokenList::parse(dtype),
            ignore: TokenList::parse(col_name_ignore),
            pattern_flag,
        })
    }

    /// Whether the pattern matches at the start of `name`
    ///
    /// Prefix semantics: `^dt_` and `dt_` behave the same, and `dt` matches
    /// `dt_created` without needing `.*`.
    pub fn matches_pattern(&self, name: &str) -> bool {
        self.pattern
            .find(name)
            .map_or(false, |m| m.start() == 0)
    }

    /// Whether a lowercased type is one of the contract types
    pub fn is_contract_type(&self, column_type: &str) -> bool {
        self.dtypes.contains(column_type)
    }

    /// Whether a lowercased column name is on the ignore list
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore.contains(name)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern_source
    }

    pub fn dtypes(&self) -> &TokenList {
        &self.dtypes
    }

    pub fn ignore_list(&self) -> &TokenList {
        &self.ignore
    }

    pub fn pattern_flag(&self) -> bool {
        self.pattern_flag
    }

    /// Parameters as report metadata
    pub fn to_metadata(&self) -> serde_json::Value {
        json!({
            "pattern": self.pattern_source,
            "dtype": self.dtypes.tokens(),
            "col_name_ignore": self.ignore.tokens(),
            "pattern_flg": self.pattern_flag,
        })
    }
}

/// Rule parameter errors
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Invalid regex pattern '{0}': {1}")]
    InvalidPattern(String, String),

    #[error("Regex pattern must not be empty")]
    EmptyPattern,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_is_case_insensitive() {
        let params = RuleParams::new("^DT_", "date", "", false).unwrap();
        assert!(params.matches_pattern("dt_created"));
        assert!(params.matches_pattern("Dt_Created"));
    }

    #[test]
    fn pattern_is_anchored_at_start() {
        let params = RuleParams::new("dt_", "date", "", false).unwrap();
        assert!(params.matches_pattern("dt_created"));
        assert!(!params.matches_pattern("created_dt_"));

        // prefix match, not full match
        let params = RuleParams::new("is", "boolean", "", false).unwrap();
        assert!(params.matches_pattern("is_active"));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = RuleParams::new("dt_(", "date", "", false).unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern(ref p, _) if p == "dt_("));
    }

    #[test]
    fn empty_pattern_is_rejected() {
        assert!(matches!(
            RuleParams::new("", "date", "", false),
            Err(RuleError::EmptyPattern)
        ));
    }

    #[test]
    fn lists_are_normalized() {
        let params = RuleParams::new("^dt_", "DATE, Timestamp", "Created_At|updated_at", true).unwrap();
        assert!(params.is_contract_type("date"));
        assert!(params.is_contract_type("timestamp"));
        assert!(params.is_ignored("created_at"));
        assert!(params.is_ignored("updated_at"));
        assert!(!params.is_ignored(""));
        assert!(params.pattern_flag());
    }

    #[test]
    fn metadata_lists_parameters() {
        let params = RuleParams::new("^dt_", "date", "", false).unwrap();
        let meta = params.to_metadata();
        assert_eq!(meta["pattern"], "^dt_");
        assert_eq!(meta["dtype"][0], "date");
        assert_eq!(meta["pattern_flg"], false);
    }
}
