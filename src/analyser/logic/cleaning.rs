use super::types::{ColumnKind, Stage, UnsupportedColumn, classify_columns};
use crate::error::Result;
use polars::prelude::*;

/// Output pattern for date and datetime columns.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Removes trailing whitespace from every text column. Leading whitespace
/// and nulls are left alone.
///
/// # Errors
///
/// Returns an error if polars fails to evaluate the expressions.
pub fn strip_trailing_whitespace(
    df: DataFrame,
    skipped: &mut Vec<UnsupportedColumn>,
) -> Result<DataFrame> {
    let exprs: Vec<Expr> = classify_columns(&df, Stage::Sanitize, skipped)
        .into_iter()
        .filter(|(_, kind)| *kind == ColumnKind::Text)
        .map(|(name, _)| col(name.as_str()).str().strip_chars_end(lit(NULL)))
        .collect();

    if exprs.is_empty() {
        return Ok(df);
    }
    tracing::debug!("Stripping trailing whitespace from {} columns", exprs.len());
    Ok(df.lazy().with_columns(exprs).collect()?)
}

/// Rewrites every date and datetime column as `MM/DD/YYYY` text.
///
/// The temporal type is gone afterwards.
///
/// # Errors
///
/// Returns an error if polars fails to format a column.
pub fn format_date_columns(
    df: DataFrame,
    skipped: &mut Vec<UnsupportedColumn>,
) -> Result<DataFrame> {
    let exprs: Vec<Expr> = classify_columns(&df, Stage::DateFormat, skipped)
        .into_iter()
        .filter(|(_, kind)| *kind == ColumnKind::Date)
        .map(|(name, _)| col(name.as_str()).dt().to_string(DATE_FORMAT))
        .collect();

    if exprs.is_empty() {
        return Ok(df);
    }
    tracing::debug!("Formatting {} date columns as {DATE_FORMAT}", exprs.len());
    Ok(df.lazy().with_columns(exprs).collect()?)
}
