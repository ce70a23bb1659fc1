//! Stateless helper utilities used by the XLSX writer.

use std::collections::{BTreeMap, BTreeSet};

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::spec::{EnumCellValue, SpecSheetSlice, SpecXlsxReport};

////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Normalize a cell value for its column kind.
///
/// Non-finite numbers are treated as missing. Integer columns keep fractional
/// values as text rather than silently truncating them.
pub fn convert_cell_value(
    value: &EnumCellValue,
    if_is_numeric_col: bool,
    if_is_integer_col: bool,
    if_keep_missing_values: bool,
    missing_value_str: &str,
) -> EnumCellValue {
    let value_missing = if if_keep_missing_values {
        EnumCellValue::String(missing_value_str.to_string())
    } else {
        EnumCellValue::None
    };

    match value {
        EnumCellValue::None => value_missing,
        EnumCellValue::String(s) => EnumCellValue::String(s.clone()),
        EnumCellValue::Number(n) if !n.is_finite() => value_missing,
        EnumCellValue::Number(n) if !if_is_numeric_col => EnumCellValue::String(n.to_string()),
        EnumCellValue::Number(n) if if_is_integer_col && n.fract() != 0.0 => {
            EnumCellValue::String(n.to_string())
        }
        EnumCellValue::Number(n) => EnumCellValue::Number(*n),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DataFrameLikeUtils

/// Validate that `columns` has no duplicated names.
pub fn validate_unique_columns(columns: &[String]) -> Result<(), String> {
    if columns.len() == columns.iter().collect::<BTreeSet<_>>().len() {
        return Ok(());
    }

    let mut dict_pos: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (n_idx, c_name) in columns.iter().enumerate() {
        dict_pos.entry(c_name).or_default().push(n_idx);
    }

    let c_msg = dict_pos
        .iter()
        .filter(|(_, l_pos)| l_pos.len() > 1)
        .map(|(c_name, l_pos)| format!("{c_name:?} x{} at indices {l_pos:?}", l_pos.len()))
        .collect::<Vec<_>>()
        .join("; ");

    Err(format!("Duplicate column names detected: {c_msg}"))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().trim_matches('\'').to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Split one table into Excel-compliant sheet slices.
///
/// A table that fits is returned as a single slice named `sheet_name`. A table
/// with zero rows still yields one slice so the header row gets written.
pub fn plan_sheet_slices(
    height_df: usize,
    width_df: usize,
    sheet_name: &str,
    report: &mut SpecXlsxReport,
) -> Vec<SpecSheetSlice> {
    // One header row per sheet.
    let n_rows_data_max = N_NROWS_EXCEL_MAX - 1;

    let mut l_col_slices = Vec::new();
    let mut n_col_start = 0;
    while n_col_start < width_df {
        let n_col_end = usize::min(width_df, n_col_start + N_NCOLS_EXCEL_MAX);
        l_col_slices.push((n_col_start, n_col_end));
        n_col_start = n_col_end;
    }
    if l_col_slices.is_empty() {
        l_col_slices.push((0, 0));
    }

    let mut l_row_slices = Vec::new();
    let mut n_row_start = 0;
    while n_row_start < height_df {
        let n_row_end = usize::min(height_df, n_row_start + n_rows_data_max);
        l_row_slices.push((n_row_start, n_row_end));
        n_row_start = n_row_end;
    }
    if l_row_slices.is_empty() {
        l_row_slices.push((0, 0));
    }

    let n_parts_total = l_col_slices.len() * l_row_slices.len();

    let mut l_sheet_parts = Vec::with_capacity(n_parts_total);
    let mut n_idx_part = 1;
    for (col_start, col_end) in &l_col_slices {
        for (row_start, row_end) in &l_row_slices {
            let c_part_sheet_name = if n_parts_total == 1 {
                sheet_name.to_string()
            } else {
                create_sheet_identifier(sheet_name, n_idx_part)
            };

            l_sheet_parts.push(SpecSheetSlice {
                sheet_name: c_part_sheet_name,
                row_start_inclusive: *row_start,
                row_end_exclusive: *row_end,
                col_start_inclusive: *col_start,
                col_end_exclusive: *col_end,
            });
            n_idx_part += 1;
        }
    }

    if n_parts_total > 1 {
        report.warn(format!(
            "Excel limit overflow: split {sheet_name:?} into {} sheets (columns-first, then rows).",
            l_sheet_parts.len()
        ));
    }

    l_sheet_parts
}

/// Create suffixed sheet name (`base_1`, `base_2`, ...), respecting length cap.
pub fn create_sheet_identifier(base_name: &str, part_idx_1based: usize) -> String {
    let c_sheet_name_suffix = format!("_{part_idx_1based}");
    let n_len_base_name_max = N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_sheet_name_suffix.len());

    let c_sheet_name_base: String = base_name
        .chars()
        .take(usize::max(1, n_len_base_name_max))
        .collect();

    format!("{c_sheet_name_base}{c_sheet_name_suffix}")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_sheet_name_replaces_illegal_and_truncates() {
        assert_eq!(sanitize_sheet_name("Forms", "_"), "Forms");
        assert_eq!(sanitize_sheet_name("Team: Forms/Kata", "_"), "Team_ Forms_Kata");
        assert_eq!(sanitize_sheet_name("   ", "_"), "Sheet");

        let c_long = "Musical Weapons - All Ages (Bonus Division)";
        assert_eq!(sanitize_sheet_name(c_long, "_").chars().count(), 31);
    }

    #[test]
    fn plan_sheet_slices_keeps_empty_table_as_one_sheet() {
        let mut report = SpecXlsxReport::default();
        let l_parts = plan_sheet_slices(0, 5, "Sparring", &mut report);

        assert_eq!(l_parts.len(), 1);
        assert_eq!(l_parts[0].sheet_name, "Sparring");
        assert_eq!(l_parts[0].row_end_exclusive, 0);
        assert_eq!(l_parts[0].col_end_exclusive, 5);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn plan_sheet_slices_splits_overflowing_rows() {
        let mut report = SpecXlsxReport::default();
        let l_parts = plan_sheet_slices(N_NROWS_EXCEL_MAX + 10, 3, "Forms", &mut report);

        assert_eq!(l_parts.len(), 2);
        assert_eq!(l_parts[0].sheet_name, "Forms_1");
        assert_eq!(l_parts[1].sheet_name, "Forms_2");
        assert_eq!(l_parts[0].row_end_exclusive, N_NROWS_EXCEL_MAX - 1);
        assert_eq!(l_parts[1].row_start_inclusive, N_NROWS_EXCEL_MAX - 1);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn create_sheet_identifier_respects_length_cap() {
        let c_name = create_sheet_identifier(&"x".repeat(40), 12);
        assert_eq!(c_name.chars().count(), N_LEN_EXCEL_SHEET_NAME_MAX);
        assert!(c_name.ends_with("_12"));
    }

    #[test]
    fn convert_cell_value_handles_missing_and_fractional_integers() {
        assert_eq!(
            convert_cell_value(&EnumCellValue::None, false, false, false, ""),
            EnumCellValue::None
        );
        assert_eq!(
            convert_cell_value(&EnumCellValue::None, false, false, true, "NA"),
            EnumCellValue::String("NA".to_string())
        );
        assert_eq!(
            convert_cell_value(&EnumCellValue::Number(f64::NAN), true, false, false, ""),
            EnumCellValue::None
        );
        assert_eq!(
            convert_cell_value(&EnumCellValue::Number(62.5), true, true, false, ""),
            EnumCellValue::String("62.5".to_string())
        );
        assert_eq!(
            convert_cell_value(&EnumCellValue::Number(150.0), true, true, false, ""),
            EnumCellValue::Number(150.0)
        );
    }

    #[test]
    fn validate_unique_columns_reports_duplicates() {
        let l_cols = vec!["Gender".to_string(), "Belt Level".to_string()];
        assert!(validate_unique_columns(&l_cols).is_ok());

        let l_cols_dup = vec!["Gender".to_string(), "Gender".to_string()];
        let c_err = validate_unique_columns(&l_cols_dup).unwrap_err();
        assert!(c_err.contains("\"Gender\" x2"));
    }
}
