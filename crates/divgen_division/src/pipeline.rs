//! End-to-end division run: read, normalize, partition, plan, export.

use std::path::Path;

use chrono::Local;
use polars::prelude::DataFrame;

use crate::error::Result;
use crate::export::{create_output_dir, export_artifacts, plan_artifacts};
use crate::ingest::read_registrations;
use crate::normalize::normalize_registrations;
use crate::partition::partition_divisions;
use crate::report::{ReportDivision, ReportDivisionBuilder};
use crate::spec::{SpecArtifactPlan, SpecDivisionLayout, SpecExtractOptions};

/// Build the artifact plan for a raw registration table without touching disk.
///
/// Counters and warnings land in `report`.
pub fn plan_from_registrations(
    df_raw: &DataFrame,
    layout: &SpecDivisionLayout,
    report: &mut ReportDivisionBuilder,
) -> Result<SpecArtifactPlan> {
    report.add_rows_read(df_raw.height() as u64);

    let (df_normalized, stats) = normalize_registrations(df_raw, layout)?;
    if stats.cnt_belt_unknown > 0 {
        report.add_warning(format!(
            "{} row(s) have a missing or unknown belt level",
            stats.cnt_belt_unknown
        ));
    }
    if stats.cnt_gender_unknown > 0 {
        report.add_warning(format!(
            "{} row(s) have a gender other than Female or Male",
            stats.cnt_gender_unknown
        ));
    }

    let l_tables = partition_divisions(&df_normalized, layout)?;
    for table in &l_tables {
        report.add_division(&table.division.name, table.df.height() as u64);
    }

    let plan = plan_artifacts(&l_tables, layout)?;
    for c_warning in &plan.warnings {
        report.add_warning(c_warning.clone());
    }
    report.add_artifacts_planned(plan.artifact_count() as u64);

    tracing::info!(
        divisions = l_tables.len(),
        artifacts = plan.artifact_count(),
        "artifacts planned"
    );
    Ok(plan)
}

/// Split a registration export into per-division roster workbooks.
///
/// Creates `output_<timestamp>` under `options.dir_out_root` and writes every
/// planned workbook into it. With `options.if_dry_run` nothing is written and
/// the report carries no output directory.
pub fn extract_to_divisions(
    path: &Path,
    layout: &SpecDivisionLayout,
    options: &SpecExtractOptions,
) -> Result<ReportDivision> {
    layout.validate()?;

    let df_raw = read_registrations(path, layout)?;
    let mut report = ReportDivisionBuilder::default();
    let plan = plan_from_registrations(&df_raw, layout, &mut report)?;

    if options.if_dry_run {
        tracing::info!("dry run; no files written");
        return Ok(report.build());
    }

    let dir_out = create_output_dir(&options.dir_out_root, &Local::now())?;
    for artifact in export_artifacts(&plan, &dir_out)? {
        report.add_artifact_out(artifact);
    }
    report.set_dir_out(dir_out);

    Ok(report.build())
}
