use clap::Parser;
use colored::Colorize;
use anyhow::{Context, Result};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use colcontract_core::config::CONFIG_FILE_NAME;
use colcontract_core::{Config, Diagnostic, DiagnosticCode, Report, RuleParams};
use colcontract_dbt::{Catalog, Manifest, ModelFiles};
use colcontract_engine::ColumnContract;

const HOOK_NAME: &str = "check-column-name-contract";

/// colcontract - column name / data type contract checks for dbt
#[derive(Parser, Debug)]
#[command(name = "colcontract")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Model files (or directories of models) to check
    filenames: Vec<PathBuf>,

    /// Regex pattern to match column names
    #[arg(long)]
    pattern: Option<String>,

    /// Expected data type(s) for columns matching the pattern (comma or pipe delimited)
    #[arg(long)]
    dtype: Option<String>,

    /// Only check that columns matching the pattern have an expected data type
    #[arg(long = "pattern-flg", alias = "pattern_flg")]
    pattern_flg: bool,

    /// Column names to ignore (comma or pipe delimited)
    #[arg(long = "col-name-ignore", alias = "col_name_ignore")]
    col_name_ignore: Option<String>,

    /// Path to dbt manifest.json (default: target/manifest.json)
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Path to dbt catalog.json (default: target/catalog.json)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Path to config file (default: colcontract.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a JSON report to this path
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let status = check_command(&cli)?;

    // Exit with error code if there are violations
    if status != 0 {
        std::process::exit(status);
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Load config from `--config`, or colcontract.toml if present
fn load_config(cli: &Cli) -> Result<Config> {
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        Config::from_file(Path::new(CONFIG_FILE_NAME))?
    } else {
        tracing::debug!("no config file found, using defaults");
        Config::default()
    };

    Ok(config)
}

/// Merge command line arguments over config file rule defaults
fn resolve_rule(cli: &Cli, config: &Config) -> Result<RuleParams> {
    let pattern = cli
        .pattern
        .as_deref()
        .or(config.rule.pattern.as_deref())
        .ok_or_else(|| anyhow::anyhow!(
            "--pattern is required (or set `pattern` under [rule] in {})",
            CONFIG_FILE_NAME
        ))?;

    let dtype = cli
        .dtype
        .as_deref()
        .or(config.rule.dtype.as_deref())
        .ok_or_else(|| anyhow::anyhow!(
            "--dtype is required (or set `dtype` under [rule] in {})",
            CONFIG_FILE_NAME
        ))?;

    let col_name_ignore = cli
        .col_name_ignore
        .as_deref()
        .or(config.rule.col_name_ignore.as_deref())
        .unwrap_or("");

    let pattern_flg = cli.pattern_flg || config.rule.pattern_flg;

    Ok(RuleParams::new(pattern, dtype, col_name_ignore, pattern_flg)?)
}

/// Check command - validate the column name contract, returning the status code
fn check_command(cli: &Cli) -> Result<i32> {
    let config = load_config(cli)?;
    let params = resolve_rule(cli, &config)?;

    let manifest_path = cli.manifest.clone().unwrap_or_else(|| config.manifest_path());
    let catalog_path = cli.catalog.clone().unwrap_or_else(|| config.catalog_path());

    let manifest = match Manifest::from_file(&manifest_path) {
        Ok(manifest) => manifest,
        Err(e) => {
            println!("Unable to load manifest file ({})", e);
            return Ok(1);
        }
    };

    let catalog = match Catalog::from_file(&catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            println!("Unable to load catalog file ({})", e);
            return Ok(1);
        }
    };

    tracing::debug!(
        manifest = %manifest_path.display(),
        catalog = %catalog_path.display(),
        dbt_version = %manifest.metadata.dbt_version,
        models = manifest.model_count(),
        "loaded dbt artifacts"
    );

    if !manifest.same_invocation(&catalog.metadata) {
        tracing::debug!("catalog and manifest come from different dbt invocations");
    }

    let start_time = Instant::now();

    let files = ModelFiles::from_paths(cli.filenames.as_slice(), &[".sql"]);
    let contract = ColumnContract::new(params);
    let outcome = contract.check(&catalog, &files);

    let execution_time = start_time.elapsed();
    let status = outcome.status_code();

    for diag in &outcome.diagnostics {
        print_diagnostic(diag, contract.params());
    }

    tracing::info!(
        status,
        models = outcome.models_checked,
        columns = outcome.columns_checked,
        violations = outcome.diagnostics.len(),
        "column name contract checked"
    );

    if cli.verbose {
        eprintln!(
            "{} {} models, {} columns in {:.3}s",
            "Checked".cyan(),
            outcome.models_checked,
            outcome.columns_checked,
            execution_time.as_secs_f64()
        );
    }

    if let Some(report_path) = &cli.report {
        let report = outcome.into_report().with_metadata(json!({
            "hook_name": HOOK_NAME,
            "description": "Check column name abides to contract.",
            "rule": contract.params().to_metadata(),
            "dbt_version": manifest.metadata.dbt_version,
            "catalog_generated_at": catalog.metadata.generated_at,
            "execution_time": execution_time.as_secs_f64(),
        }));

        save_report(&report, report_path)?;
    }

    Ok(status)
}

fn save_report(report: &Report, path: &Path) -> Result<()> {
    report
        .save_to_file(path)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    tracing::debug!(path = %path.display(), "report saved");
    Ok(())
}

/// Print one violation line, column name in red and rule values in yellow
fn print_diagnostic(diag: &Diagnostic, params: &RuleParams) {
    let column = diag.column().unwrap_or_default();
    let dtypes = params.dtypes().display_upper();

    match diag.code {
        DiagnosticCode::ColumnTypeWithoutPattern => println!(
            "{}: column is of type {} and does not match regex pattern {}.",
            column.red(),
            dtypes.yellow(),
            params.pattern().yellow()
        ),
        DiagnosticCode::ColumnPatternWithoutType => println!(
            "{}: name matches regex pattern {} and is of type {} instead of {}.",
            column.red(),
            params.pattern().yellow(),
            diag.actual.as_deref().unwrap_or_default().yellow(),
            dtypes.yellow()
        ),
    }
}
