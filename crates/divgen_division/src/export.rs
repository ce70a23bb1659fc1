//! Bucket export: artifact planning, output directory setup and workbook writes.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use divgen_io_xlsx::{SpecSheetWriteOptions, XlsxWriter, derive_default_sheet_formats};
use polars::prelude::*;

use crate::error::{DivisionError, Result};
use crate::frame::{derive_text_values, has_column};
use crate::spec::{
    EnumDivisionKind, EnumGender, SpecArtifactPlan, SpecArtifactWritten, SpecBucketKey,
    SpecDivisionLayout, SpecDivisionTable, SpecSection, SpecSheetWritten,
};

/// Prefix of every run's output directory name.
const C_OUTPUT_DIR_PREFIX: &str = "output_";
/// Timestamp layout appended to [`C_OUTPUT_DIR_PREFIX`].
const C_OUTPUT_DIR_TIME_FORMAT: &str = "%Y_%m_%d-%H_%M_%S";
/// Workbook file extension.
const C_XLSX_EXTENSION: &str = "xlsx";

////////////////////////////////////////////////////////////////////////////////
// #region Planning

/// Group per-division tables into the workbooks one run exports.
///
/// Every (bucket, gender) workbook exists even when empty and carries one
/// section per standard division in layout order. Extra divisions become
/// standalone workbooks as-is. Rows keep the order they arrive in.
pub fn plan_artifacts(
    tables: &[SpecDivisionTable],
    layout: &SpecDivisionLayout,
) -> Result<SpecArtifactPlan> {
    let mut plan = SpecArtifactPlan::default();

    for gender in EnumGender::ALL {
        for (n_idx_bucket, c_bucket) in layout.belt_buckets.iter().enumerate() {
            plan.bucket_workbooks.insert(
                SpecBucketKey {
                    gender,
                    idx_bucket: n_idx_bucket,
                    bucket: c_bucket.clone(),
                },
                Vec::new(),
            );
        }
    }

    for table in tables {
        match table.division.kind {
            EnumDivisionKind::Extra => {
                plan.extra_workbooks.push(SpecSection {
                    name: table.division.name.clone(),
                    df: table.df.clone(),
                });
            }
            EnumDivisionKind::Standard => {
                plan_bucket_sections(&mut plan, table, layout)?;
            }
        }
    }

    Ok(plan)
}

fn plan_bucket_sections(
    plan: &mut SpecArtifactPlan,
    table: &SpecDivisionTable,
    layout: &SpecDivisionLayout,
) -> Result<()> {
    let l_row_keys = derive_row_bucket_keys(&table.df, layout)?;

    let n_rows_unplaced = l_row_keys.iter().filter(|key| key.is_none()).count();
    if n_rows_unplaced > 0 {
        let msg = format!(
            "{}: {} row(s) match no belt bucket or gender and are left out of every roster workbook",
            table.division.name, n_rows_unplaced
        );
        tracing::warn!(
            division = %table.division.name,
            rows = n_rows_unplaced,
            "rows outside every roster workbook"
        );
        plan.warnings.push(msg);
    }

    for (key, l_sections) in plan.bucket_workbooks.iter_mut() {
        let l_mask: Vec<bool> = l_row_keys
            .iter()
            .map(|row_key| *row_key == Some((key.idx_bucket, key.gender)))
            .collect();
        let df_section = table
            .df
            .filter(&BooleanChunked::from_slice("mask".into(), &l_mask))?;

        tracing::debug!(
            workbook = %key.file_stem(),
            division = %table.division.name,
            rows = df_section.height(),
            "section planned"
        );
        l_sections.push(SpecSection {
            name: table.division.name.clone(),
            df: df_section,
        });
    }
    Ok(())
}

/// Per row: (bucket index, gender), or `None` when either is out of range.
fn derive_row_bucket_keys(
    df: &DataFrame,
    layout: &SpecDivisionLayout,
) -> Result<Vec<Option<(usize, EnumGender)>>> {
    if !has_column(df, &layout.col_belt) || !has_column(df, &layout.col_gender) {
        return Ok(vec![None; df.height()]);
    }

    let l_belts = derive_text_values(df, &layout.col_belt)?;
    let l_genders = derive_text_values(df, &layout.col_gender)?;

    Ok(l_belts
        .iter()
        .zip(l_genders.iter())
        .map(|(belt, gender)| {
            let (n_idx_bucket, _) = layout.derive_belt_bucket(belt.as_deref()?)?;
            let gender = EnumGender::parse(gender.as_deref()?)?;
            Some((n_idx_bucket, gender))
        })
        .collect())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region OutputDirectory

/// Directory name for a run started at `now`, e.g. `output_2024_03_09-14_05_00`.
pub fn derive_output_dir_name(now: &DateTime<Local>) -> String {
    format!(
        "{C_OUTPUT_DIR_PREFIX}{}",
        now.format(C_OUTPUT_DIR_TIME_FORMAT)
    )
}

/// Create the run's output directory under `dir_root` and return its absolute path.
pub fn create_output_dir(dir_root: &Path, now: &DateTime<Local>) -> Result<PathBuf> {
    let dir_out = dir_root.join(derive_output_dir_name(now));
    std::fs::create_dir_all(&dir_out).map_err(|source| DivisionError::OutputDirInit {
        path: dir_out.clone(),
        source,
    })?;
    let dir_out = dir_out
        .canonicalize()
        .map_err(|source| DivisionError::OutputDirInit {
            path: dir_out.clone(),
            source,
        })?;
    tracing::info!(path = %dir_out.display(), "output directory ready");
    Ok(dir_out)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Export

/// Write every planned workbook under `dir_out`; returns what was written, in order.
///
/// Roster workbooks come first (`<Bucket>_Belt_<Gender>.xlsx`, one sheet per
/// section), then one single-sheet workbook per extra division. Each record
/// carries the sheet names, row counts and header cells the writer laid out.
pub fn export_artifacts(
    plan: &SpecArtifactPlan,
    dir_out: &Path,
) -> Result<Vec<SpecArtifactWritten>> {
    let mut l_artifacts = Vec::with_capacity(plan.artifact_count());

    for (key, l_sections) in &plan.bucket_workbooks {
        let path = dir_out.join(format!("{}.{C_XLSX_EXTENSION}", key.file_stem()));
        l_artifacts.push(write_workbook(&path, l_sections)?);
    }

    for section in &plan.extra_workbooks {
        let path = dir_out.join(format!("{}.{C_XLSX_EXTENSION}", section.name));
        l_artifacts.push(write_workbook(&path, std::slice::from_ref(section))?);
    }

    tracing::info!(
        dir = %dir_out.display(),
        artifacts = l_artifacts.len(),
        "artifacts written"
    );
    Ok(l_artifacts)
}

fn write_workbook(path: &Path, sections: &[SpecSection]) -> Result<SpecArtifactWritten> {
    let map_err = |message: String| DivisionError::XlsxWrite {
        path: path.to_path_buf(),
        message,
    };

    let options = SpecSheetWriteOptions::default();
    let mut writer = XlsxWriter::new(path, derive_default_sheet_formats());
    for section in sections {
        writer
            .write_sheet(&section.df, &section.name, &options)
            .map_err(map_err)?;
    }
    writer.close().map_err(map_err)?;

    // One writer report per section, in write order.
    let mut artifact = SpecArtifactWritten {
        path: path.to_path_buf(),
        ..Default::default()
    };
    for (section, report) in sections.iter().zip(writer.report()) {
        let l_colnames = section.df.get_column_names_str();
        for sheet_slice in report.sheets {
            artifact.sheets.push(SpecSheetWritten {
                cnt_rows: sheet_slice.row_end_exclusive - sheet_slice.row_start_inclusive,
                columns: l_colnames
                    [sheet_slice.col_start_inclusive..sheet_slice.col_end_exclusive]
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                sheet_name: sheet_slice.sheet_name,
            });
        }
        for c_warning in report.warnings {
            tracing::warn!(path = %path.display(), "{c_warning}");
            artifact
                .warnings
                .push(format!("{}: {c_warning}", path.display()));
        }
    }
    Ok(artifact)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
