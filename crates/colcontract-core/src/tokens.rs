//! Delimited list parsing for rule parameters
//!
//! `--dtype` and `--col_name_ignore` accept lists written as
//! `date,timestamp`, `date, timestamp` or `date|timestamp`.
//!
//! Legacy syntax: when the input has no comma at all, a single space also
//! separates tokens (`date timestamp`). Inputs that use commas keep
//! multi-word tokens such as `timestamp with time zone` intact.

use serde::{Deserialize, Serialize};

/// Ordered, lowercased tokens of a delimited list
///
/// Empty tokens and duplicates are kept: an empty input yields a single
/// empty token, which never equals a real column name or type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenList {
    tokens: Vec<String>,
}

impl TokenList {
    /// Split a delimited list into lowercase tokens
    pub fn parse(input: &str) -> Self {
        let space_delimited = !input.contains(',');

        let tokens = input
            .split(|c: char| c == ',' || c == '|' || (space_delimited && c == ' '))
            .map(|token| token.trim().to_lowercase())
            .collect();

        Self { tokens }
    }

    /// Check membership of an already-lowercased value
    pub fn contains(&self, value: &str) -> bool {
        self.tokens.iter().any(|token| token == value)
    }

    /// Tokens in input order
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Uppercased rendering used in messages, e.g. `[DATE, TIMESTAMP]`
    pub fn display_upper(&self) -> String {
        let upper: Vec<String> = self.tokens.iter().map(|t| t.to_uppercase()).collect();
        format!("[{}]", upper.join(", "))
    }
}

impl std::fmt::Display for TokenList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tokens.join("|"))
    }
}
