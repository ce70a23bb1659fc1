//! XLSX constants and default format presets.

use crate::spec::{EnumCellAlign, SpecCellFormat, SpecSheetFormats};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Build the format presets used for roster sheets.
pub fn derive_default_sheet_formats() -> SpecSheetFormats {
    let cfg_base_fmt_spec = SpecCellFormat {
        font_name: Some("Calibri".to_string()),
        font_size: Some(11),
        align: Some(EnumCellAlign::Left),
        ..Default::default()
    };

    SpecSheetFormats {
        text: cfg_base_fmt_spec.clone(),
        integer: cfg_base_fmt_spec.with_(SpecCellFormat {
            num_format: Some("0".to_string()),
            align: Some(EnumCellAlign::Right),
            ..Default::default()
        }),
        decimal: cfg_base_fmt_spec.with_(SpecCellFormat {
            num_format: Some("0.0#".to_string()),
            align: Some(EnumCellAlign::Right),
            ..Default::default()
        }),
        header: cfg_base_fmt_spec.with_(SpecCellFormat {
            bold: Some(true),
            align: Some(EnumCellAlign::Center),
            border_bottom: Some(true),
            ..Default::default()
        }),
    }
}
