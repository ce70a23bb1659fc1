//! Column access helpers over registration DataFrames.

use polars::prelude::*;

use crate::error::Result;

/// Whether `df` has a column named `col`.
pub fn has_column(df: &DataFrame, col: &str) -> bool {
    df.get_column_index(col).is_some()
}

/// Column values as text; null and zero-length cells become `None`.
///
/// Whitespace-only cells are kept as entered.
pub fn derive_text_values(df: &DataFrame, col: &str) -> Result<Vec<Option<String>>> {
    let series = df
        .column(col)?
        .as_materialized_series()
        .cast(&DataType::String)?;

    Ok(series
        .str()?
        .into_iter()
        .map(|value| {
            value
                .filter(|val| !val.is_empty())
                .map(ToString::to_string)
        })
        .collect())
}

/// Column values as numbers; null and unparseable cells become `None`.
pub fn derive_number_values(df: &DataFrame, col: &str) -> Result<Vec<Option<f64>>> {
    let series = df
        .column(col)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;

    Ok(series.f64()?.into_iter().collect())
}

/// Row mask that is `true` where `col` holds any value, whitespace included.
///
/// A missing column yields an all-`false` mask.
pub fn derive_presence_mask(df: &DataFrame, col: &str) -> Result<BooleanChunked> {
    let l_mask: Vec<bool> = if has_column(df, col) {
        derive_text_values(df, col)?
            .iter()
            .map(Option::is_some)
            .collect()
    } else {
        vec![false; df.height()]
    };
    Ok(BooleanChunked::from_slice("mask".into(), &l_mask))
}

/// Project `df` to the `wanted` columns it actually has, keeping source order.
pub fn select_present_columns(df: &DataFrame, wanted: &[String]) -> Result<DataFrame> {
    let l_cols: Vec<String> = df
        .get_column_names_str()
        .into_iter()
        .filter(|c_name| wanted.iter().any(|c_wanted| c_wanted.as_str() == *c_name))
        .map(ToString::to_string)
        .collect();
    Ok(df.select(l_cols)?)
}
