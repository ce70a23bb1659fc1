//! `divgen_io_xlsx` v1:
//! Roster workbook sink.
//!
//! - `conf`   : Excel limits and format presets
//! - `spec`   : formats, policies and report models
//! - `util`   : pure helper functions
//! - `writer` : `DataFrame` -> worksheet writer
pub mod conf;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
    derive_default_sheet_formats,
};
pub use spec::{
    EnumCellAlign, EnumCellValue, SpecAutofitCellsPolicy, SpecCellFormat, SpecSheetFormats, SpecSheetSlice, SpecSheetWriteOptions, SpecXlsxReport,
};
pub use util::{plan_sheet_slices, sanitize_sheet_name};
pub use writer::XlsxWriter;
