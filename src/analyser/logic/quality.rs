use super::types::QualityFindings;
use crate::error::Result;
use polars::prelude::*;

/// Nulls in the column, plus NaN for float columns.
pub fn count_missing(column: &Column) -> usize {
    let series = column.as_materialized_series();
    let nan_count = if series.dtype().is_float() {
        series
            .cast(&DataType::Float64)
            .ok()
            .and_then(|s| {
                s.f64()
                    .ok()
                    .map(|ca| ca.into_iter().flatten().filter(|v| v.is_nan()).count())
            })
            .unwrap_or(0)
    } else {
        0
    };
    series.null_count() + nan_count
}

pub fn missing_value_counts(df: &DataFrame) -> Vec<(String, usize)> {
    df.get_columns()
        .iter()
        .map(|c| (c.name().to_string(), count_missing(c)))
        .collect()
}

pub fn missing_values_warning(df: &DataFrame) -> Option<String> {
    let affected: Vec<(String, usize)> = missing_value_counts(df)
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .collect();
    if affected.is_empty() {
        return None;
    }

    let width = affected.iter().map(|(name, _)| name.chars().count()).max().unwrap_or(0);
    let mut warning = "Warning: the following columns have missing values:".to_owned();
    for (name, count) in &affected {
        warning.push_str(&format!("\n{name:<width$}    {count}"));
    }
    Some(warning)
}

/// Rows equal to an earlier row, across all columns.
///
/// # Errors
///
/// Returns an error if polars fails to deduplicate the frame.
pub fn count_duplicate_rows(df: &DataFrame) -> Result<usize> {
    if df.width() == 0 || df.height() < 2 {
        return Ok(0);
    }
    let unique = df
        .clone()
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?;
    Ok(df.height().saturating_sub(unique.height()))
}

/// # Errors
///
/// See [`count_duplicate_rows`].
pub fn duplicates_warning(df: &DataFrame) -> Result<Option<String>> {
    let duplicates = count_duplicate_rows(df)?;
    Ok((duplicates > 0)
        .then(|| format!("Warning: there are {duplicates} duplicate rows in the dataset.")))
}

pub fn describe_dtypes(df: &DataFrame) -> String {
    let width = df
        .get_columns()
        .iter()
        .map(|c| c.name().chars().count())
        .max()
        .unwrap_or(0);
    let mut listing = "Data types:".to_owned();
    for column in df.get_columns() {
        listing.push_str(&format!(
            "\n{:<width$}    {}",
            column.name().as_str(),
            column.dtype()
        ));
    }
    listing
}

/// Runs the read-only checks: missing values, duplicates and dtypes.
///
/// # Errors
///
/// See [`count_duplicate_rows`].
pub fn check_quality(df: &DataFrame) -> Result<QualityFindings> {
    let findings = QualityFindings {
        missing_values_warning: missing_values_warning(df),
        duplicates_warning: duplicates_warning(df)?,
        data_types: describe_dtypes(df),
    };
    tracing::info!(
        missing = findings.missing_values_warning.is_some(),
        duplicates = findings.duplicates_warning.is_some(),
        "Quality checks complete"
    );
    Ok(findings)
}
