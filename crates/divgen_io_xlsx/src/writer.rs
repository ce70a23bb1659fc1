//! XLSX writer that renders in-memory DataFrames as workbook sheets.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use polars::prelude::{AnyValue, Column, DataFrame};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use crate::conf::N_LEN_EXCEL_SHEET_NAME_MAX;
use crate::spec::{
    EnumCellAlign, EnumCellValue, SpecAutofitCellsPolicy, SpecCellFormat,
    SpecSheetFormats, SpecSheetSlice, SpecSheetWriteOptions, SpecXlsxReport,
};
use crate::util::{
    convert_cell_value, plan_sheet_slices, sanitize_sheet_name, validate_unique_columns,
};

/// Stateful workbook writer.
pub struct XlsxWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    formats: SpecSheetFormats,
    set_sheet_names_existing: BTreeSet<String>,
    l_reports: Vec<SpecXlsxReport>,
    if_closed: bool,
}

impl XlsxWriter {
    /// Create writer bound to output path and format presets.
    ///
    /// The workbook is buffered in memory until [`Self::close`] is called.
    pub fn new(path_file_out: impl Into<PathBuf>, formats: SpecSheetFormats) -> Self {
        Self {
            path_file_out: path_file_out.into(),
            workbook: Workbook::new(),
            formats,
            set_sheet_names_existing: BTreeSet::new(),
            l_reports: Vec::new(),
            if_closed: false,
        }
    }

    /// Output file path.
    pub fn file_out(&self) -> &Path {
        &self.path_file_out
    }

    /// Return snapshot of per-sheet write reports.
    pub fn report(&self) -> Vec<SpecXlsxReport> {
        self.l_reports.clone()
    }

    /// Flush workbook to disk. Idempotent.
    pub fn close(&mut self) -> Result<(), String> {
        if self.if_closed {
            return Ok(());
        }
        if self.set_sheet_names_existing.is_empty() {
            self.workbook.add_worksheet();
        }
        self.workbook
            .save(&self.path_file_out)
            .map_err(derive_xlsx_error_text)?;
        self.if_closed = true;
        tracing::debug!(
            path = %self.path_file_out.display(),
            sheets = self.set_sheet_names_existing.len(),
            "workbook saved"
        );
        Ok(())
    }

    /// Write one table as a sheet: header row of column names, then one row per record.
    pub fn write_sheet(
        &mut self,
        df_data: &DataFrame,
        sheet_name: &str,
        options: &SpecSheetWriteOptions,
    ) -> Result<(), String> {
        if self.if_closed {
            return Err("Cannot write after close().".to_string());
        }
        validate_policy_autofit(&options.policy_autofit)?;

        let l_colnames_df: Vec<String> = df_data
            .get_column_names_str()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        validate_unique_columns(&l_colnames_df)?;

        let set_cols_idx_numeric = derive_numeric_column_indices(df_data);
        let set_cols_idx_integer = derive_integer_column_indices(df_data);

        let mut report = SpecXlsxReport::default();
        let l_sheet_parts = plan_sheet_slices(
            df_data.height(),
            df_data.width(),
            &sanitize_sheet_name(sheet_name, "_"),
            &mut report,
        );

        let fmt_header = derive_rust_xlsx_format(&self.formats.header);
        let n_row_freeze = options.row_freeze.unwrap_or(1);

        for sheet_slice in l_sheet_parts {
            let sheet_name_unique = self.derive_unique_sheet_name(&sheet_slice.sheet_name);
            let n_width_slice = sheet_slice.col_end_exclusive - sheet_slice.col_start_inclusive;
            let n_rows_slice = sheet_slice.row_end_exclusive - sheet_slice.row_start_inclusive;

            let l_fmt_data_by_col: Vec<Format> = (sheet_slice.col_start_inclusive
                ..sheet_slice.col_end_exclusive)
                .map(|n_idx_col| {
                    if set_cols_idx_integer.contains(&n_idx_col) {
                        derive_rust_xlsx_format(&self.formats.integer)
                    } else if set_cols_idx_numeric.contains(&n_idx_col) {
                        derive_rust_xlsx_format(&self.formats.decimal)
                    } else {
                        derive_rust_xlsx_format(&self.formats.text)
                    }
                })
                .collect();

            let l_cols_slice: Vec<Column> = df_data.get_columns()
                [sheet_slice.col_start_inclusive..sheet_slice.col_end_exclusive]
                .iter()
                .map(|col| col.slice(sheet_slice.row_start_inclusive as i64, n_rows_slice))
                .collect();

            let worksheet = self.workbook.add_worksheet();
            worksheet
                .set_name(&sheet_name_unique)
                .map_err(derive_xlsx_error_text)?;

            let mut l_width_by_col_header = vec![0usize; n_width_slice];
            let mut l_width_by_col_body = vec![0usize; n_width_slice];

            for (n_idx_col, c_name) in l_colnames_df
                [sheet_slice.col_start_inclusive..sheet_slice.col_end_exclusive]
                .iter()
                .enumerate()
            {
                worksheet
                    .write_string_with_format(0, cast_col_num(n_idx_col)?, c_name, &fmt_header)
                    .map_err(derive_xlsx_error_text)?;
                l_width_by_col_header[n_idx_col] = estimate_unicode_string_width(c_name);
            }

            worksheet
                .set_freeze_panes(
                    cast_row_num(n_row_freeze)?,
                    cast_col_num(options.col_freeze)?,
                )
                .map_err(derive_xlsx_error_text)?;

            for n_row_local in 0..n_rows_slice {
                for (n_idx_col, col) in l_cols_slice.iter().enumerate() {
                    let n_idx_col_abs = sheet_slice.col_start_inclusive + n_idx_col;
                    let value_raw = derive_cell_value_from_any_value(
                        col.get(n_row_local)
                            .map_err(|err| format!("Failed to access cell value: {err}"))?,
                    );
                    let value = convert_cell_value(
                        &value_raw,
                        set_cols_idx_numeric.contains(&n_idx_col_abs),
                        set_cols_idx_integer.contains(&n_idx_col_abs),
                        options.if_keep_missing_values,
                        &options.missing_value_str,
                    );

                    l_width_by_col_body[n_idx_col] =
                        usize::max(l_width_by_col_body[n_idx_col], estimate_width_len(&value));

                    write_cell_with_format(
                        worksheet,
                        1 + n_row_local,
                        n_idx_col,
                        &value,
                        &l_fmt_data_by_col[n_idx_col],
                    )?;
                }
            }

            apply_column_widths(
                worksheet,
                &options.policy_autofit,
                &l_width_by_col_header,
                &l_width_by_col_body,
            )?;

            report.sheets.push(SpecSheetSlice {
                sheet_name: sheet_name_unique,
                ..sheet_slice
            });
        }

        for c_warning in &report.warnings {
            tracing::warn!(path = %self.path_file_out.display(), "{c_warning}");
        }
        self.l_reports.push(report);
        Ok(())
    }

    fn derive_unique_sheet_name(&mut self, name: &str) -> String {
        if !self.set_sheet_names_existing.contains(name) {
            self.set_sheet_names_existing.insert(name.to_string());
            return name.to_string();
        }

        let base_name: String = name
            .chars()
            .take(usize::max(1, N_LEN_EXCEL_SHEET_NAME_MAX - 3))
            .collect();

        let mut n_idx = 2usize;
        loop {
            let candidate: String = format!("{base_name}__{n_idx}")
                .chars()
                .take(N_LEN_EXCEL_SHEET_NAME_MAX)
                .collect();
            if !self.set_sheet_names_existing.contains(&candidate) {
                self.set_sheet_names_existing.insert(candidate.clone());
                return candidate;
            }
            n_idx += 1;
        }
    }
}

fn apply_column_widths(
    worksheet: &mut Worksheet,
    policy_autofit: &SpecAutofitCellsPolicy,
    l_width_by_col_header: &[usize],
    l_width_by_col_body: &[usize],
) -> Result<(), String> {
    for (n_idx_col, (n_width_header, n_width_body)) in l_width_by_col_header
        .iter()
        .zip(l_width_by_col_body)
        .enumerate()
    {
        let n_width_final = derive_column_width(policy_autofit, *n_width_header, *n_width_body);
        worksheet
            .set_column_width(cast_col_num(n_idx_col)?, n_width_final as f64)
            .map_err(derive_xlsx_error_text)?;
    }
    Ok(())
}

/// Width of one column: the wider of header and body plus padding, clamped.
fn derive_column_width(
    policy_autofit: &SpecAutofitCellsPolicy,
    n_width_header: usize,
    n_width_body: usize,
) -> usize {
    let n_min = usize::max(1, policy_autofit.width_cell_min);
    let n_max = usize::min(255, usize::max(n_min, policy_autofit.width_cell_max));
    let n_width_recorded = usize::max(n_width_header, n_width_body);
    usize::min(
        n_max,
        usize::max(n_min, n_width_recorded + policy_autofit.width_cell_padding),
    )
}

/// Estimate displayed width units for one normalized cell value.
pub fn estimate_width_len(value: &EnumCellValue) -> usize {
    match value {
        EnumCellValue::None => 0,
        EnumCellValue::String(s) => estimate_unicode_string_width(s),
        EnumCellValue::Number(n) => n.to_string().len(),
    }
}

fn estimate_unicode_string_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
}

fn validate_policy_autofit(policy_autofit: &SpecAutofitCellsPolicy) -> Result<(), String> {
    if policy_autofit.width_cell_min == 0 {
        return Err("policy_autofit.width_cell_min must be >= 1.".to_string());
    }
    if policy_autofit.width_cell_max < policy_autofit.width_cell_min {
        return Err(
            "policy_autofit.width_cell_max must be >= policy_autofit.width_cell_min.".to_string(),
        );
    }
    Ok(())
}

fn derive_numeric_column_indices(df: &DataFrame) -> BTreeSet<usize> {
    df.get_columns()
        .iter()
        .enumerate()
        .filter(|(_, c_col)| c_col.dtype().is_numeric())
        .map(|(n_idx, _)| n_idx)
        .collect()
}

fn derive_integer_column_indices(df: &DataFrame) -> BTreeSet<usize> {
    df.get_columns()
        .iter()
        .enumerate()
        .filter(|(_, c_col)| c_col.dtype().is_integer())
        .map(|(n_idx, _)| n_idx)
        .collect()
}

fn derive_cell_value_from_any_value(value: AnyValue<'_>) -> EnumCellValue {
    match value {
        AnyValue::Null => EnumCellValue::None,
        AnyValue::String(val) => EnumCellValue::String(val.to_string()),
        AnyValue::StringOwned(val) => EnumCellValue::String(val.to_string()),
        AnyValue::Boolean(val) => {
            EnumCellValue::String(if val { "True" } else { "False" }.to_string())
        }
        AnyValue::UInt8(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt16(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt32(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int8(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int16(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float64(val) => EnumCellValue::Number(val),
        _ => EnumCellValue::String(value.to_string()),
    }
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), String> {
    match value {
        EnumCellValue::None => {
            worksheet
                .write_blank(cast_row_num(row_idx)?, cast_col_num(col_idx)?, format)
                .map_err(derive_xlsx_error_text)?;
        }
        EnumCellValue::String(val) => {
            worksheet
                .write_string_with_format(
                    cast_row_num(row_idx)?,
                    cast_col_num(col_idx)?,
                    val,
                    format,
                )
                .map_err(derive_xlsx_error_text)?;
        }
        EnumCellValue::Number(val) => {
            worksheet
                .write_number_with_format(
                    cast_row_num(row_idx)?,
                    cast_col_num(col_idx)?,
                    *val,
                    format,
                )
                .map_err(derive_xlsx_error_text)?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if let Some(val) = spec.align {
        format = format.set_align(match val {
            EnumCellAlign::Left => FormatAlign::Left,
            EnumCellAlign::Center => FormatAlign::Center,
            EnumCellAlign::Right => FormatAlign::Right,
        });
    }
    if spec.border_bottom.unwrap_or(false) {
        format = format.set_border_bottom(FormatBorder::Thin);
    }
    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }

    format
}

fn cast_row_num(value: usize) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("row index overflow: {value}"))
}

fn cast_col_num(value: usize) -> Result<u16, String> {
    u16::try_from(value).map_err(|_| format!("column index overflow: {value}"))
}

fn derive_xlsx_error_text(err: XlsxError) -> String {
    format!("xlsx write error: {err}")
}
