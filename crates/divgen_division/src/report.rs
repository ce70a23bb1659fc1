//! Division run report model and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::spec::SpecArtifactWritten;

/// Aggregate counters and diagnostics for one `extract_to_divisions` run.
#[derive(Debug, Default, Clone)]
pub struct ReportDivision {
    /// Registration rows read from the source.
    pub cnt_rows_read: u64,
    /// Rows per division, in layout order.
    pub rows_by_division: Vec<(String, u64)>,
    /// Workbooks the plan contains.
    pub cnt_artifacts_planned: u64,
    /// Workbooks written to disk; zero on a dry run.
    pub cnt_artifacts_written: u64,
    /// Absolute output directory; `None` on a dry run.
    pub dir_out: Option<PathBuf>,
    /// Written workbooks in emission order.
    pub artifacts_out: Vec<SpecArtifactWritten>,
    /// Non-fatal findings (unknown belt/gender values, unplaced rows).
    pub warnings: Vec<String>,
}

impl ReportDivision {
    /// Written workbook paths in emission order.
    pub fn files_out(&self) -> Vec<&Path> {
        self.artifacts_out
            .iter()
            .map(|artifact| artifact.path.as_path())
            .collect()
    }

    /// Written workbook whose file name is `file_name`.
    pub fn get_artifact(&self, file_name: &str) -> Option<&SpecArtifactWritten> {
        self.artifacts_out
            .iter()
            .find(|artifact| artifact.path.file_name().is_some_and(|name| name == file_name))
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Rows entered in division `name`, if configured.
    pub fn rows_in_division(&self, name: &str) -> Option<u64> {
        self.rows_by_division
            .iter()
            .find(|(c_name, _)| c_name == name)
            .map(|(_, n_rows)| *n_rows)
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_rows_read".to_string(), self.cnt_rows_read);
        dict_counts.insert(
            "cnt_rows_divided".to_string(),
            self.rows_by_division.iter().map(|(_, n_rows)| n_rows).sum::<u64>(),
        );
        dict_counts.insert(
            "cnt_divisions".to_string(),
            self.rows_by_division.len() as u64,
        );
        dict_counts.insert(
            "cnt_artifacts_planned".to_string(),
            self.cnt_artifacts_planned,
        );
        dict_counts.insert(
            "cnt_artifacts_written".to_string(),
            self.cnt_artifacts_written,
        );
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} rows={} divided={} divisions={} planned={} written={} warnings={}",
            dict_counts["cnt_rows_read"],
            dict_counts["cnt_rows_divided"],
            dict_counts["cnt_divisions"],
            dict_counts["cnt_artifacts_planned"],
            dict_counts["cnt_artifacts_written"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportDivision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[DIVISION]"))
    }
}

/// Mutable accumulator for division run statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportDivisionBuilder {
    /// See [`ReportDivision::cnt_rows_read`].
    pub cnt_rows_read: u64,
    /// See [`ReportDivision::rows_by_division`].
    pub rows_by_division: Vec<(String, u64)>,
    /// See [`ReportDivision::cnt_artifacts_planned`].
    pub cnt_artifacts_planned: u64,
    /// See [`ReportDivision::dir_out`].
    pub dir_out: Option<PathBuf>,
    /// See [`ReportDivision::artifacts_out`].
    pub artifacts_out: Vec<SpecArtifactWritten>,
    /// See [`ReportDivision::warnings`].
    pub warnings: Vec<String>,
}

impl ReportDivisionBuilder {
    /// Record the source row count.
    pub fn add_rows_read(&mut self, value: u64) {
        self.cnt_rows_read += value;
    }

    /// Record one division's row count.
    pub fn add_division(&mut self, name: &str, rows: u64) {
        self.rows_by_division.push((name.to_string(), rows));
    }

    /// Record the planned workbook count.
    pub fn add_artifacts_planned(&mut self, value: u64) {
        self.cnt_artifacts_planned += value;
    }

    /// Record one written workbook; its writer warnings join the run's.
    pub fn add_artifact_out(&mut self, artifact: SpecArtifactWritten) {
        self.warnings.extend(artifact.warnings.iter().cloned());
        self.artifacts_out.push(artifact);
    }

    /// Record the output directory.
    pub fn set_dir_out(&mut self, dir_out: PathBuf) {
        self.dir_out = Some(dir_out);
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportDivision {
        ReportDivision {
            cnt_rows_read: self.cnt_rows_read,
            rows_by_division: self.rows_by_division,
            cnt_artifacts_planned: self.cnt_artifacts_planned,
            cnt_artifacts_written: self.artifacts_out.len() as u64,
            dir_out: self.dir_out,
            artifacts_out: self.artifacts_out,
            warnings: self.warnings,
        }
    }
}
