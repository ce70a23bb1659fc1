//! Record normalization: merged gender column and competitive row order.

use std::cmp::Ordering;

use polars::prelude::*;

use crate::error::Result;
use crate::frame::{derive_number_values, derive_text_values, has_column};
use crate::spec::{EnumGender, SpecDivisionLayout};

/// Counts collected while normalizing one registration table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecNormalizeStats {
    /// Rows in the table.
    pub cnt_rows: usize,
    /// Rows whose belt level is missing or outside the rank order.
    pub cnt_belt_unknown: usize,
    /// Rows whose merged gender is neither Female nor Male.
    pub cnt_gender_unknown: usize,
}

/// Sort key of one row: belt rank, gender, weight, height. `None` sorts last.
type TypeSortKey = (Option<usize>, Option<EnumGender>, Option<f64>, Option<f64>);

/// Merge the two gender indicator columns into one `Gender` column.
///
/// Takes the male indicator when set, otherwise the female indicator,
/// otherwise `layout.gender_missing`. The indicator columns are dropped and
/// the merged column is appended last.
pub fn merge_gender_columns(df: &DataFrame, layout: &SpecDivisionLayout) -> Result<DataFrame> {
    let l_male = derive_optional_text_values(df, &layout.col_gender_male)?;
    let l_female = derive_optional_text_values(df, &layout.col_gender_female)?;

    let l_gender: Vec<String> = l_male
        .into_iter()
        .zip(l_female)
        .map(|(male, female)| {
            male.or(female)
                .unwrap_or_else(|| layout.gender_missing.clone())
        })
        .collect();

    let l_cols_kept: Vec<String> = df
        .get_column_names_str()
        .into_iter()
        .filter(|c_name| {
            *c_name != layout.col_gender_male
                && *c_name != layout.col_gender_female
                && *c_name != layout.col_gender
        })
        .map(ToString::to_string)
        .collect();

    let mut df_out = df.select(l_cols_kept)?;
    df_out.with_column(Series::new(layout.col_gender.as_str().into(), l_gender))?;
    Ok(df_out)
}

/// Stable sort by belt rank, gender, weight, then height.
///
/// Belt order follows `layout.belt_levels`, not the coarse buckets. Values
/// outside the enumerations and missing numbers sort after every known value;
/// ties keep input order.
pub fn sort_registrations(
    df: &DataFrame,
    layout: &SpecDivisionLayout,
) -> Result<(DataFrame, SpecNormalizeStats)> {
    let n_rows = df.height();
    let l_belts = derive_optional_text_values(df, &layout.col_belt)?;
    let l_genders = derive_optional_text_values(df, &layout.col_gender)?;
    let l_weights = derive_optional_number_values(df, &layout.col_weight)?;
    let l_heights = derive_optional_number_values(df, &layout.col_height)?;

    let mut stats = SpecNormalizeStats {
        cnt_rows: n_rows,
        ..Default::default()
    };

    let mut l_keys: Vec<TypeSortKey> = Vec::with_capacity(n_rows);
    for n_idx in 0..n_rows {
        let n_rank = l_belts[n_idx]
            .as_deref()
            .and_then(|c_belt| layout.derive_belt_rank(c_belt));
        let gender = l_genders[n_idx].as_deref().and_then(EnumGender::parse);

        if n_rank.is_none() {
            stats.cnt_belt_unknown += 1;
        }
        if gender.is_none() {
            stats.cnt_gender_unknown += 1;
        }
        l_keys.push((n_rank, gender, l_weights[n_idx], l_heights[n_idx]));
    }

    let mut l_idx: Vec<IdxSize> = (0..n_rows as IdxSize).collect();
    l_idx.sort_by(|a, b| compare_sort_keys(&l_keys[*a as usize], &l_keys[*b as usize]));

    let df_sorted = df.take(&IdxCa::from_vec("idx".into(), l_idx))?;
    Ok((df_sorted, stats))
}

/// Gender merge followed by the competitive sort.
pub fn normalize_registrations(
    df: &DataFrame,
    layout: &SpecDivisionLayout,
) -> Result<(DataFrame, SpecNormalizeStats)> {
    let df_merged = merge_gender_columns(df, layout)?;
    let (df_sorted, stats) = sort_registrations(&df_merged, layout)?;

    if stats.cnt_belt_unknown > 0 {
        tracing::warn!(
            rows = stats.cnt_belt_unknown,
            column = %layout.col_belt,
            "belt level missing or not in rank order; rows sorted last"
        );
    }
    if stats.cnt_gender_unknown > 0 {
        tracing::warn!(
            rows = stats.cnt_gender_unknown,
            "gender is neither Female nor Male; rows sorted last"
        );
    }
    tracing::debug!(rows = stats.cnt_rows, "registrations normalized");

    Ok((df_sorted, stats))
}

fn compare_sort_keys(a: &TypeSortKey, b: &TypeSortKey) -> Ordering {
    compare_missing_last(&a.0, &b.0, Ord::cmp)
        .then_with(|| compare_missing_last(&a.1, &b.1, Ord::cmp))
        .then_with(|| compare_missing_last(&a.2, &b.2, f64::total_cmp))
        .then_with(|| compare_missing_last(&a.3, &b.3, f64::total_cmp))
}

fn compare_missing_last<T>(
    a: &Option<T>,
    b: &Option<T>,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(val_a), Some(val_b)) => cmp(val_a, val_b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn derive_optional_text_values(df: &DataFrame, col: &str) -> Result<Vec<Option<String>>> {
    if has_column(df, col) {
        derive_text_values(df, col)
    } else {
        Ok(vec![None; df.height()])
    }
}

fn derive_optional_number_values(df: &DataFrame, col: &str) -> Result<Vec<Option<f64>>> {
    if !has_column(df, col) {
        return Ok(vec![None; df.height()]);
    }
    Ok(derive_number_values(df, col)?
        .into_iter()
        .map(|value| value.filter(|val| !val.is_nan()))
        .collect())
}
