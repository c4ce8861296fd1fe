//! Batch orchestration: fix every known export found in a directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use csvfix::{run, ConsoleLog, FixConfig};
//!
//! let mut log = ConsoleLog::stdout();
//! let report = run(&FixConfig::default(), &mut log)?;
//! println!("{} fixed, {} skipped", report.fixed_count(), report.skipped_count());
//! ```

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::FixResult;
use crate::logs::ConsoleLog;
use crate::schemas::RecordType;
use crate::transform::transform_file;

/// Directory holding the exports (relative to current dir)
pub const DEFAULT_BASE_DIR: &str = ".";

/// Migration that prepares the destination tables for the fixed files
pub const MIGRATION_FILE: &str = "005_fix_csv_import_issues.sql";

const BANNER_WIDTH: usize = 60;

/// One export to fix
#[derive(Debug, Clone, Serialize)]
pub struct FixJob {
    pub record_type: RecordType,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl FixJob {
    /// Job for `record_type` using its standard file names under `dir`
    pub fn in_dir(record_type: RecordType, dir: &Path) -> Self {
        Self {
            record_type,
            input: dir.join(record_type.input_file()),
            output: dir.join(record_type.output_file()),
        }
    }
}

/// Which files to fix
#[derive(Debug, Clone, Serialize)]
pub struct FixConfig {
    pub base_dir: PathBuf,
    pub jobs: Vec<FixJob>,
}

impl FixConfig {
    /// All known record types, with files under `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let base_dir = dir.as_ref().to_path_buf();
        let jobs = RecordType::ALL
            .iter()
            .map(|&record_type| FixJob::in_dir(record_type, &base_dir))
            .collect();
        Self { base_dir, jobs }
    }
}

impl Default for FixConfig {
    fn default() -> Self {
        Self::in_dir(DEFAULT_BASE_DIR)
    }
}

/// Columns removed from and added to an export by its fix
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnChange {
    pub removed: Vec<String>,
    pub added: Vec<String>,
}

impl ColumnChange {
    /// Compare the input header with the output schema, keeping each side's order
    pub fn between(input: &[String], output: &[String]) -> Self {
        Self {
            removed: input.iter().filter(|c| !output.contains(c)).cloned().collect(),
            added: output.iter().filter(|c| !input.contains(c)).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

impl fmt::Display for ColumnChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("columns unchanged");
        }
        let list = |cols: &[String]| {
            if cols.is_empty() {
                "none".to_string()
            } else {
                cols.join(", ")
            }
        };
        write!(f, "removed: {}; added: {}", list(self.removed.as_slice()), list(self.added.as_slice()))
    }
}

/// What happened to one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    Fixed { rows: usize, change: ColumnChange },
    /// Input file was not there
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub job: FixJob,
    pub outcome: JobOutcome,
}

/// Result of a full run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub jobs: Vec<JobReport>,
}

impl RunReport {
    pub fn fixed_count(&self) -> usize {
        self.jobs
            .iter()
            .filter(|j| matches!(j.outcome, JobOutcome::Fixed { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.jobs
            .iter()
            .filter(|j| j.outcome == JobOutcome::Skipped)
            .count()
    }

    pub fn outcome(&self, record_type: RecordType) -> Option<&JobOutcome> {
        self.jobs
            .iter()
            .find(|j| j.job.record_type == record_type)
            .map(|j| &j.outcome)
    }
}

/// Fix every job in `config`, in order.
///
/// A missing input is reported and skipped. A malformed input or an IO
/// failure stops the run; the output being written at that point may be
/// left truncated. The next-steps block is printed once, after all jobs.
pub fn run(config: &FixConfig, log: &mut ConsoleLog) -> FixResult<RunReport> {
    let mut report = RunReport::default();

    for job in &config.jobs {
        let outcome = fix_job(job, log)?;
        report.jobs.push(JobReport {
            job: job.clone(),
            outcome,
        });
    }

    print_summary(&report, log);
    print_next_steps(config, log);
    Ok(report)
}

/// Fix a single export, or skip it if its input is absent
pub fn fix_job(job: &FixJob, log: &mut ConsoleLog) -> FixResult<JobOutcome> {
    if !job.input.is_file() {
        log.warning(format!("File not found: {}", job.input.display()));
        info!(record_type = %job.record_type, input = %job.input.display(), "input absent, skipped");
        return Ok(JobOutcome::Skipped);
    }

    log.info(format!("Processing {}...", job.input.display()));

    let schema = job.record_type.schema();
    let stats = transform_file(&job.input, &job.output, &schema, &job.record_type.mapping())?;
    let change = ColumnChange::between(&stats.input_headers, &schema.fields);

    log.success(format!(
        "Fixed {} -> {} ({} rows)",
        job.input.display(),
        job.output.display(),
        stats.rows
    ));
    log.info_indent(format!("{} ({})", change, job.record_type.note()), 1);
    info!(record_type = %job.record_type, rows = stats.rows, %change, "fixed");

    Ok(JobOutcome::Fixed {
        rows: stats.rows,
        change,
    })
}

fn print_summary(report: &RunReport, log: &mut ConsoleLog) {
    let rule = "=".repeat(BANNER_WIDTH);
    log.info("");
    log.info(rule.clone());
    if report.skipped_count() == 0 {
        log.success("All CSV files have been fixed!");
    } else {
        log.success(format!(
            "{} file(s) fixed, {} not found",
            report.fixed_count(),
            report.skipped_count()
        ));
    }
    log.info(rule);
}

/// Import instructions, one entry per line
pub fn next_steps(config: &FixConfig) -> Vec<String> {
    let mut steps = vec![
        format!("Run migration: {}", MIGRATION_FILE),
        "Import the fixed CSV files (*_fixed.csv) to Supabase".to_string(),
    ];
    steps.extend(config.jobs.iter().map(|job| {
        format!(
            "For {}: Import {}",
            job.record_type.table(),
            job.record_type.output_file()
        )
    }));
    steps
}

fn print_next_steps(config: &FixConfig, log: &mut ConsoleLog) {
    log.info("");
    log.info("Next steps:");
    for (i, step) in next_steps(config).iter().enumerate() {
        log.info(format!("{}. {}", i + 1, step));
    }
}
