use super::{date_column, epoch_days};
use crate::analyser::logic::*;
use anyhow::Result;
use polars::prelude::*;

#[test]
fn test_trailing_whitespace_removed_leading_kept() -> Result<()> {
    let df = df!(
        "name" => &[Some(" abc  "), Some("def\t"), None],
        "qty" => &[1, 2, 3]
    )?;
    let mut skipped = Vec::new();
    let cleaned = strip_trailing_whitespace(df.clone(), &mut skipped)?;

    let names = cleaned.column("name")?.as_materialized_series().str()?.clone();
    assert_eq!(names.get(0), Some(" abc"));
    assert_eq!(names.get(1), Some("def"));
    assert_eq!(names.get(2), None, "nulls stay null");

    assert!(cleaned.column("qty")?.as_materialized_series().equals(df.column("qty")?.as_materialized_series()));
    assert!(skipped.is_empty());
    Ok(())
}

#[test]
fn test_whitespace_only_values_become_empty() -> Result<()> {
    let df = df!("note" => &["   ", "ok "])?;
    let cleaned = strip_trailing_whitespace(df, &mut Vec::new())?;
    let notes = cleaned.column("note")?.as_materialized_series().str()?.clone();
    assert_eq!(notes.get(0), Some(""));
    assert_eq!(notes.get(1), Some("ok"));
    Ok(())
}

#[test]
fn test_date_column_becomes_text() -> Result<()> {
    let df = DataFrame::new(vec![
        date_column("shipped", vec![Some(epoch_days(2024, 3, 5)), None])?,
        Column::from(Series::new("n".into(), vec![1, 2])),
    ])?;

    let formatted = format_date_columns(df, &mut Vec::new())?;
    let shipped = formatted.column("shipped")?;
    assert_eq!(shipped.dtype(), &DataType::String);
    let shipped = shipped.as_materialized_series().str()?.clone();
    assert_eq!(shipped.get(0), Some("03/05/2024"));
    assert_eq!(shipped.get(1), None);
    assert_eq!(formatted.column("n")?.dtype(), &DataType::Int32);
    Ok(())
}

#[test]
fn test_datetime_column_drops_time_of_day() -> Result<()> {
    // 2023-12-31T23:15:00Z
    let millis = 1_704_064_500_000_i64;
    let stamps = Series::new("created".into(), vec![millis])
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    let df = DataFrame::new(vec![Column::from(stamps)])?;

    let formatted = format_date_columns(df, &mut Vec::new())?;
    let created = formatted.column("created")?.as_materialized_series().str()?.clone();
    assert_eq!(created.get(0), Some("12/31/2023"));
    Ok(())
}

#[test]
fn test_unsupported_columns_are_skipped_and_recorded() -> Result<()> {
    let list = Series::new(
        "tags".into(),
        vec![
            Series::new("".into(), vec![1, 2]),
            Series::new("".into(), vec![3]),
        ],
    );
    let df = DataFrame::new(vec![
        Column::from(list),
        Column::from(Series::new("label".into(), vec!["a ", "b "])),
    ])?;

    let mut skipped = Vec::new();
    let cleaned = strip_trailing_whitespace(df, &mut skipped)?;
    let cleaned = format_date_columns(cleaned, &mut skipped)?;

    assert_eq!(cleaned.width(), 2);
    assert_eq!(skipped.len(), 2, "one record per stage");
    assert_eq!(skipped[0].column, "tags");
    assert_eq!(skipped[0].stage, Stage::Sanitize);
    assert_eq!(skipped[1].stage, Stage::DateFormat);
    assert!(matches!(
        skipped[0].to_error(),
        crate::error::ScrubError::UnsupportedColumnType { .. }
    ));
    let labels = cleaned.column("label")?.as_materialized_series().str()?.clone();
    assert_eq!(labels.get(0), Some("a"));
    Ok(())
}
