//! `divgen_division` v1:
//! Tournament registration export -> per-division roster workbooks.
//!
//! - `conf`      : column tables and rank orderings
//! - `spec`      : layout, options and artifact models
//! - `error`     : error type
//! - `frame`     : DataFrame column helpers
//! - `ingest`    : registration CSV reader
//! - `normalize` : gender merge and competitive sort
//! - `partition` : per-division filter and projection
//! - `export`    : artifact planning and workbook export
//! - `report`    : run report model
//! - `pipeline`  : end-to-end orchestration

pub mod conf;
pub mod error;
pub mod export;
pub mod frame;
pub mod ingest;
pub mod normalize;
pub mod partition;
pub mod pipeline;
pub mod report;
pub mod spec;

pub use error::{DivisionError, Result};
pub use export::{create_output_dir, derive_output_dir_name, export_artifacts, plan_artifacts};
pub use ingest::read_registrations;
pub use normalize::{
    SpecNormalizeStats, merge_gender_columns, normalize_registrations, sort_registrations,
};
pub use partition::{duplicate_by_division, partition_divisions};
pub use pipeline::{extract_to_divisions, plan_from_registrations};
pub use report::{ReportDivision, ReportDivisionBuilder};
pub use spec::{
    EnumDivisionKind, EnumGender, SpecArtifactPlan, SpecArtifactWritten, SpecBucketKey,
    SpecDivision, SpecDivisionLayout, SpecDivisionTable, SpecExtractOptions, SpecSection,
    SpecSheetWritten,
};
