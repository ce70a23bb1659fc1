//! Division partitioning: one filtered, projected table per division.

use polars::prelude::*;

use crate::error::Result;
use crate::frame::{derive_presence_mask, select_present_columns};
use crate::spec::{SpecDivision, SpecDivisionLayout, SpecDivisionTable};

/// Rows of `df` that entered `division`, restricted to that division's columns.
///
/// Wanted columns are the layout's primary columns, the membership column and
/// the division's extra columns; absent ones are skipped. Row order is kept.
pub fn duplicate_by_division(
    df: &DataFrame,
    division: &SpecDivision,
    layout: &SpecDivisionLayout,
) -> Result<DataFrame> {
    let mask = derive_presence_mask(df, &division.col_membership)?;
    let df_members = df.filter(&mask)?;

    let mut l_wanted = layout.cols_primary.clone();
    l_wanted.push(division.col_membership.clone());
    l_wanted.extend(division.cols_extra.iter().cloned());

    select_present_columns(&df_members, &l_wanted)
}

/// Apply [`duplicate_by_division`] to every configured division, in layout order.
pub fn partition_divisions(
    df: &DataFrame,
    layout: &SpecDivisionLayout,
) -> Result<Vec<SpecDivisionTable>> {
    let mut l_tables = Vec::with_capacity(layout.divisions.len());
    for division in &layout.divisions {
        let df_division = duplicate_by_division(df, division, layout)?;
        tracing::debug!(
            division = %division.name,
            rows = df_division.height(),
            cols = df_division.width(),
            "division partitioned"
        );
        l_tables.push(SpecDivisionTable {
            division: division.clone(),
            df: df_division,
        });
    }
    Ok(l_tables)
}
