//! Column name / data type contract
//!
//! A column whose type is a contract type must be named after the pattern
//! (forward check), and a column named after the pattern must have a
//! contract type (reverse check). Each column is judged by exactly one of
//! the two directions, picked by whether its type is a contract type.

use colcontract_core::{Diagnostic, DiagnosticCode, Location, Report, RuleParams};
use colcontract_dbt::{Catalog, CatalogColumn, CatalogModel, ModelFiles};
use serde::Serialize;

/// Outcome for a single column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnVerdict {
    /// Column satisfies the contract
    Valid,

    /// Contract type, but the name does not match the pattern
    TypeWithoutPattern,

    /// Name matches the pattern, but the type is not a contract type
    PatternWithoutType,
}

/// Result of checking a set of models
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractOutcome {
    /// One diagnostic per violation, in evaluation order
    pub diagnostics: Vec<Diagnostic>,

    /// Number of models inspected
    pub models_checked: usize,

    /// Number of columns inspected
    pub columns_checked: usize,
}

impl ContractOutcome {
    /// 0 when every column satisfied the contract, 1 otherwise
    pub fn status_code(&self) -> i32 {
        if self.diagnostics.is_empty() { 0 } else { 1 }
    }

    pub fn passed(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Convert into a report.json document
    pub fn into_report(self) -> Report {
        let (models, columns) = (self.models_checked, self.columns_checked);
        Report::from_diagnostics(self.diagnostics).with_coverage(models, columns)
    }
}

/// Contract checker for one set of rule parameters
#[derive(Debug, Clone)]
pub struct ColumnContract {
    params: RuleParams,
}

impl ColumnContract {
    pub fn new(params: RuleParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RuleParams {
        &self.params
    }

    /// Check every catalog model that matches one of `files`
    pub fn check(&self, catalog: &Catalog, files: &ModelFiles) -> ContractOutcome {
        for stem in catalog.missing_models(files) {
            tracing::warn!(model = stem, "no catalog entry for model file, skipping");
        }

        self.check_models(&catalog.models_for(files))
    }

    /// Check the given models
    ///
    /// Evaluation never stops early: every violation of every model is
    /// reported.
    pub fn check_models(&self, models: &[CatalogModel<'_>]) -> ContractOutcome {
        let mut outcome = ContractOutcome::default();

        for model in models {
            let columns = model.node.ordered_columns();
            tracing::debug!(model = model.unique_id, columns = columns.len(), "checking model");

            for column in columns {
                let verdict = self.check_column(column);
                tracing::trace!(model = model.unique_id, column = %column.name, ?verdict);

                if let Some(diagnostic) = self.diagnostic(model, column, verdict) {
                    outcome.diagnostics.push(diagnostic);
                }
                outcome.columns_checked += 1;
            }

            outcome.models_checked += 1;
        }

        outcome
    }

    /// Judge a single column
    pub fn check_column(&self, column: &CatalogColumn) -> ColumnVerdict {
        let name = column.name.to_lowercase();
        let column_type = column.data_type.to_lowercase();
        let params = &self.params;

        if params.is_contract_type(&column_type) {
            // type -> name, waived by the pattern flag
            if params.pattern_flag() || params.is_ignored(&name) || params.matches_pattern(&name) {
                ColumnVerdict::Valid
            } else {
                ColumnVerdict::TypeWithoutPattern
            }
        } else if !params.is_ignored(&name) && params.matches_pattern(&name) {
            ColumnVerdict::PatternWithoutType
        } else {
            ColumnVerdict::Valid
        }
    }

    fn diagnostic(
        &self,
        model: &CatalogModel<'_>,
        column: &CatalogColumn,
        verdict: ColumnVerdict,
    ) -> Option<Diagnostic> {
        let name = column.name.to_lowercase();
        let column_type = column.data_type.to_lowercase();
        let pattern = self.params.pattern();
        let dtypes = self.params.dtypes().display_upper();

        let location = Location::new(model.unique_id, name.as_str())
            .with_file(model.file_path.display().to_string());

        let diagnostic = match verdict {
            ColumnVerdict::Valid => return None,
            ColumnVerdict::TypeWithoutPattern => Diagnostic::new(
                DiagnosticCode::ColumnTypeWithoutPattern,
                format!(
                    "{}: column is of type {} and does not match regex pattern {}.",
                    name, dtypes, pattern
                ),
            )
            .with_comparison(pattern, name.as_str()),
            ColumnVerdict::PatternWithoutType => Diagnostic::new(
                DiagnosticCode::ColumnPatternWithoutType,
                format!(
                    "{}: name matches regex pattern {} and is of type {} instead of {}.",
                    name, pattern, column_type, dtypes
                ),
            )
            .with_comparison(dtypes, column_type),
        };

        Some(diagnostic.with_location(location))
    }
}
