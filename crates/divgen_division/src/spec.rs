//! Division layout, pipeline options and artifact models.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use polars::prelude::DataFrame;

use crate::conf::{
    C_COL_BELT, C_COL_GENDER, C_COL_GENDER_FEMALE, C_COL_GENDER_MALE, C_COL_HEIGHT, C_COL_WEIGHT,
    C_GENDER_MISSING, TUP_BELT_DIVISIONS, TUP_BELT_LEVELS, TUP_CUSTOM_DIVISION_HEADERS,
    TUP_DIVISION_HEADERS, TUP_EXTRA_DIVISION_HEADERS, TUP_PRIMARY_HEADERS,
};
use crate::error::{DivisionError, Result};

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Gender categories in sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnumGender {
    /// Sorts first.
    Female,
    /// Sorts second.
    Male,
}

impl EnumGender {
    /// All categories in sort order.
    pub const ALL: [EnumGender; 2] = [EnumGender::Female, EnumGender::Male];

    /// Label as written in the merged gender column and in file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Female => "Female",
            Self::Male => "Male",
        }
    }

    /// Exact-match parse; anything else is out of the enumeration.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|gender| gender.as_str() == value)
    }
}

impl fmt::Display for EnumGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a division is exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumDivisionKind {
    /// Split by belt bucket and gender into the shared roster workbooks.
    Standard,
    /// Exported whole as its own workbook.
    Extra,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Layout

/// One configured division.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDivision {
    /// Source column whose non-empty value marks membership.
    pub col_membership: String,
    /// Display name, used as sheet/workbook label.
    pub name: String,
    /// Extra source columns carried only on this division's table.
    pub cols_extra: Vec<String>,
    /// Export behavior.
    pub kind: EnumDivisionKind,
}

/// Declarative description of the registration export and its divisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDivisionLayout {
    /// Columns kept on every division table.
    pub cols_primary: Vec<String>,
    /// Standard divisions first, then extra divisions, in export order.
    pub divisions: Vec<SpecDivision>,
    /// Fine-grained belt ranks in ascending order.
    pub belt_levels: Vec<String>,
    /// Belt bucket names in ascending order.
    pub belt_buckets: Vec<String>,
    /// Belt rank column.
    pub col_belt: String,
    /// Weight column.
    pub col_weight: String,
    /// Height column.
    pub col_height: String,
    /// Merged gender column.
    pub col_gender: String,
    /// Male indicator source column.
    pub col_gender_male: String,
    /// Female indicator source column.
    pub col_gender_female: String,
    /// Gender written when neither indicator is set.
    pub gender_missing: String,
}

impl Default for SpecDivisionLayout {
    fn default() -> Self {
        let dict_cols_extra: BTreeMap<&str, &[&str]> =
            TUP_CUSTOM_DIVISION_HEADERS.iter().copied().collect();

        let create_division = |(c_header, c_name): &(&str, &str), kind: EnumDivisionKind| {
            SpecDivision {
                col_membership: c_header.to_string(),
                name: c_name.to_string(),
                cols_extra: dict_cols_extra
                    .get(c_header)
                    .map(|l_cols| l_cols.iter().map(ToString::to_string).collect())
                    .unwrap_or_default(),
                kind,
            }
        };

        let divisions = TUP_DIVISION_HEADERS
            .iter()
            .map(|pair| create_division(pair, EnumDivisionKind::Standard))
            .chain(
                TUP_EXTRA_DIVISION_HEADERS
                    .iter()
                    .map(|pair| create_division(pair, EnumDivisionKind::Extra)),
            )
            .collect();

        Self {
            cols_primary: TUP_PRIMARY_HEADERS.iter().map(ToString::to_string).collect(),
            divisions,
            belt_levels: TUP_BELT_LEVELS.iter().map(ToString::to_string).collect(),
            belt_buckets: TUP_BELT_DIVISIONS.iter().map(ToString::to_string).collect(),
            col_belt: C_COL_BELT.to_string(),
            col_weight: C_COL_WEIGHT.to_string(),
            col_height: C_COL_HEIGHT.to_string(),
            col_gender: C_COL_GENDER.to_string(),
            col_gender_male: C_COL_GENDER_MALE.to_string(),
            col_gender_female: C_COL_GENDER_FEMALE.to_string(),
            gender_missing: C_GENDER_MISSING.to_string(),
        }
    }
}

impl SpecDivisionLayout {
    /// Check the invariants bucket matching and export naming rely on.
    ///
    /// - no bucket name is a prefix of another, so prefix matching is unambiguous;
    /// - every belt level starts with exactly one bucket name;
    /// - division names are unique.
    pub fn validate(&self) -> Result<()> {
        for c_prefix in &self.belt_buckets {
            for c_bucket in &self.belt_buckets {
                if std::ptr::eq(c_prefix, c_bucket) {
                    continue;
                }
                if c_bucket.starts_with(c_prefix.as_str()) {
                    return Err(DivisionError::AmbiguousBeltBucket {
                        prefix: c_prefix.clone(),
                        bucket: c_bucket.clone(),
                    });
                }
            }
        }

        for c_belt in &self.belt_levels {
            if self.derive_belt_bucket(c_belt).is_none() {
                return Err(DivisionError::UnmappedBeltLevel {
                    belt: c_belt.clone(),
                });
            }
        }

        let mut set_names = BTreeSet::new();
        for division in &self.divisions {
            if !set_names.insert(division.name.as_str()) {
                return Err(DivisionError::DuplicateDivision {
                    name: division.name.clone(),
                });
            }
        }

        Ok(())
    }

    /// Position of `belt` in the rank order, `None` when unknown.
    pub fn derive_belt_rank(&self, belt: &str) -> Option<usize> {
        self.belt_levels.iter().position(|c_level| c_level == belt)
    }

    /// Bucket index and name for `belt` by prefix match.
    pub fn derive_belt_bucket(&self, belt: &str) -> Option<(usize, &str)> {
        self.belt_buckets
            .iter()
            .enumerate()
            .find(|(_, c_bucket)| belt.starts_with(c_bucket.as_str()))
            .map(|(n_idx, c_bucket)| (n_idx, c_bucket.as_str()))
    }

    /// Divisions split by bucket and gender.
    pub fn divisions_standard(&self) -> impl Iterator<Item = &SpecDivision> {
        self.divisions
            .iter()
            .filter(|division| division.kind == EnumDivisionKind::Standard)
    }

    /// Divisions exported as standalone workbooks.
    pub fn divisions_extra(&self) -> impl Iterator<Item = &SpecDivision> {
        self.divisions
            .iter()
            .filter(|division| division.kind == EnumDivisionKind::Extra)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Options for one [`crate::pipeline::extract_to_divisions`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecExtractOptions {
    /// Directory under which the timestamped output directory is created.
    pub dir_out_root: PathBuf,
    /// Plan and report without touching the filesystem.
    pub if_dry_run: bool,
}

impl Default for SpecExtractOptions {
    fn default() -> Self {
        Self {
            dir_out_root: PathBuf::from("."),
            if_dry_run: false,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Artifacts

/// Registrants of one division, projected to that division's columns.
#[derive(Debug, Clone)]
pub struct SpecDivisionTable {
    /// Division the rows entered.
    pub division: SpecDivision,
    /// Rows in normalized order.
    pub df: DataFrame,
}

/// One labeled sheet inside a workbook.
#[derive(Debug, Clone)]
pub struct SpecSection {
    /// Sheet label (division name).
    pub name: String,
    /// Sheet rows.
    pub df: DataFrame,
}

/// Roster workbook key: one belt bucket for one gender.
///
/// Orders all female keys before male keys, each in bucket order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpecBucketKey {
    /// Gender of every row in the workbook.
    pub gender: EnumGender,
    /// Bucket position in the layout.
    pub idx_bucket: usize,
    /// Bucket name.
    pub bucket: String,
}

impl SpecBucketKey {
    /// Workbook file stem, e.g. `Brown_Belt_Male`.
    pub fn file_stem(&self) -> String {
        format!("{}_Belt_{}", self.bucket, self.gender)
    }
}

/// Everything one run exports, grouped per output workbook.
#[derive(Debug, Clone, Default)]
pub struct SpecArtifactPlan {
    /// Roster workbooks: (bucket, gender) -> one section per standard division.
    pub bucket_workbooks: BTreeMap<SpecBucketKey, Vec<SpecSection>>,
    /// Standalone workbooks, one per extra division.
    pub extra_workbooks: Vec<SpecSection>,
    /// Non-fatal findings collected while planning.
    pub warnings: Vec<String>,
}

impl SpecArtifactPlan {
    /// Number of workbooks the plan exports.
    pub fn artifact_count(&self) -> usize {
        self.bucket_workbooks.len() + self.extra_workbooks.len()
    }

    /// Section `division` of the roster workbook named `file_stem`.
    pub fn get_section(&self, file_stem: &str, division: &str) -> Option<&DataFrame> {
        self.bucket_workbooks
            .iter()
            .find(|(key, _)| key.file_stem() == file_stem)
            .and_then(|(_, l_sections)| l_sections.iter().find(|section| section.name == division))
            .map(|section| &section.df)
    }

    /// Standalone workbook of extra division `division`.
    pub fn get_extra(&self, division: &str) -> Option<&DataFrame> {
        self.extra_workbooks
            .iter()
            .find(|section| section.name == division)
            .map(|section| &section.df)
    }
}

/// One worksheet as the writer laid it out on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetWritten {
    /// Final sheet name in the workbook.
    pub sheet_name: String,
    /// Data rows below the header row.
    pub cnt_rows: usize,
    /// Header cells, left to right.
    pub columns: Vec<String>,
}

/// One workbook written by a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecArtifactWritten {
    /// Workbook path.
    pub path: PathBuf,
    /// Sheets in workbook order.
    pub sheets: Vec<SpecSheetWritten>,
    /// Non-fatal writer findings (e.g. a table split at Excel limits).
    pub warnings: Vec<String>,
}

impl SpecArtifactWritten {
    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets
            .iter()
            .map(|sheet| sheet.sheet_name.as_str())
            .collect()
    }

    /// Sheet named `sheet_name`.
    pub fn get_sheet(&self, sheet_name: &str) -> Option<&SpecSheetWritten> {
        self.sheets.iter().find(|sheet| sheet.sheet_name == sheet_name)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
