//! Shared XLSX specification models.

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Horizontal cell alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumCellAlign {
    /// Left aligned.
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
}

/// Cell format specification. Every field is optional so formats can be layered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Horizontal alignment.
    pub align: Option<EnumCellAlign>,
    /// Thin bottom border.
    pub border_bottom: Option<bool>,
    /// Number format code.
    pub num_format: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            align: other.align.or(self.align),
            border_bottom: other.border_bottom.or(self.border_bottom),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
        }
    }
}

/// Format set applied by one [`crate::writer::XlsxWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetFormats {
    /// Text body cells.
    pub text: SpecCellFormat,
    /// Integer body cells.
    pub integer: SpecCellFormat,
    /// Non-integer numeric body cells.
    pub decimal: SpecCellFormat,
    /// Header row cells.
    pub header: SpecCellFormat,
}

/// Normalized cell value during conversion/write pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Column width inference policy.
///
/// Each column is sized to its widest header or body cell plus padding,
/// clamped to `[width_cell_min, width_cell_max]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecAutofitCellsPolicy {
    /// Minimum final width.
    pub width_cell_min: usize,
    /// Maximum final width.
    pub width_cell_max: usize,
    /// Width padding added after inference.
    pub width_cell_padding: usize,
}

impl Default for SpecAutofitCellsPolicy {
    fn default() -> Self {
        Self {
            width_cell_min: 8,
            width_cell_max: 60,
            width_cell_padding: 2,
        }
    }
}

/// Per-sheet write options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetWriteOptions {
    /// Number of frozen columns.
    pub col_freeze: usize,
    /// Frozen row index; defaults to below the header row when `None`.
    pub row_freeze: Option<usize>,
    /// Write `missing_value_str` instead of a blank cell for nulls.
    pub if_keep_missing_values: bool,
    /// Replacement text for nulls when `if_keep_missing_values` is set.
    pub missing_value_str: String,
    /// Column autofit policy.
    pub policy_autofit: SpecAutofitCellsPolicy,
}

impl Default for SpecSheetWriteOptions {
    fn default() -> Self {
        Self {
            col_freeze: 0,
            row_freeze: None,
            if_keep_missing_values: false,
            missing_value_str: String::new(),
            policy_autofit: SpecAutofitCellsPolicy::default(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Concrete sheet part emitted to workbook (after Excel-limit slicing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetSlice {
    /// Actual unique sheet name in workbook.
    pub sheet_name: String,
    /// Inclusive source row start.
    pub row_start_inclusive: usize,
    /// Exclusive source row end.
    pub row_end_exclusive: usize,
    /// Inclusive source column start.
    pub col_start_inclusive: usize,
    /// Exclusive source column end.
    pub col_end_exclusive: usize,
}

/// Per-write call report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Sheet slices produced by the write call.
    pub sheets: Vec<SpecSheetSlice>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_right_side_values() {
        let base = SpecCellFormat {
            font_name: Some("Calibri".to_string()),
            bold: Some(false),
            ..Default::default()
        };
        let merged = base.with_(SpecCellFormat {
            bold: Some(true),
            num_format: Some("0".to_string()),
            ..Default::default()
        });

        assert_eq!(merged.font_name.as_deref(), Some("Calibri"));
        assert_eq!(merged.bold, Some(true));
        assert_eq!(merged.num_format.as_deref(), Some("0"));
        assert_eq!(merged.align, None);
    }
}
