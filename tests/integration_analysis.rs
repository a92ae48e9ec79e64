//! Integration tests for the full cleaning workflow
//!
//! These tests run the complete pipeline on fixture files and verify the
//! cleaned table, the report and the saved plot specifications.

use anyhow::Result;
use polars::prelude::*;
use sheetscrub::analyser::logic::{
    FileSource, analyze_and_clean_file_flow, inspect_flow, load_df, save_df,
};
use sheetscrub::config::ScrubConfig;
use sheetscrub::error::ScrubError;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name)
}

#[test]
fn test_clean_orders_csv() -> Result<()> {
    let outcome = analyze_and_clean_file_flow(&fixture("orders.csv"), &ScrubConfig::default())?;

    assert_eq!(outcome.df.shape(), (13, 5), "cleaning keeps every row and column");
    let names: Vec<String> = outcome
        .df
        .get_column_names()
        .into_iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(
        names,
        vec!["order_id", "customer_name", "order_date", "amount", "region"]
    );

    let customers = outcome.df.column("customer_name")?.as_materialized_series().str()?.clone();
    assert_eq!(customers.get(0), Some("Ann"));
    assert_eq!(customers.get(2), Some("  Cy"));
    assert_eq!(customers.get(3), Some("Dee"));

    let dates = outcome.df.column("order_date")?.as_materialized_series().str()?.clone();
    assert_eq!(dates.get(4), Some("03/05/2024"));

    let report = &outcome.report;
    assert_eq!(
        report.missing_values_warning(),
        Some("Warning: the following columns have missing values:\namount    1")
    );
    assert_eq!(
        report.duplicates_warning(),
        Some("Warning: there are 1 duplicate rows in the dataset.")
    );
    assert!(report.data_types().starts_with("Data types:"));
    assert_eq!(
        report.box_plot_title(),
        Some("Box plot of data values for order_id, amount")
    );

    let summary = report
        .dataframe_summary()
        .ok_or_else(|| anyhow::anyhow!("expected a statistics table"))?;
    assert_eq!(summary.column_names(), vec!["order_id", "amount"]);
    let amount = summary
        .get("amount")
        .ok_or_else(|| anyhow::anyhow!("amount statistics missing"))?;
    assert_eq!(amount.count, 12);
    assert_eq!(amount.max, Some(999.0));
    Ok(())
}

#[test]
fn test_report_serialises_with_fixed_keys() -> Result<()> {
    let outcome = analyze_and_clean_file_flow(&fixture("orders.csv"), &ScrubConfig::default())?;
    let json = serde_json::to_value(&outcome.report)?;
    let object = json
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("report should serialise to an object"))?;

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "box_plot_title",
            "data_types",
            "dataframe_summary",
            "dist_plots_title",
            "duplicates_warning",
            "missing_values_warning",
        ]
    );
    Ok(())
}

#[test]
fn test_plot_specifications_written_in_request_order() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = ScrubConfig {
        plot_output_dir: Some(dir.path().join("plots")),
        ..ScrubConfig::default()
    };
    analyze_and_clean_file_flow(&fixture("orders.csv"), &config)?;

    let mut files: Vec<String> = std::fs::read_dir(dir.path().join("plots"))?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<_>>()?;
    files.sort();
    assert_eq!(
        files,
        vec![
            "01_box_plot.json",
            "02_distribution_order_id.json",
            "03_distribution_amount.json",
        ]
    );

    let box_plot: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("plots/01_box_plot.json"))?)?;
    assert_eq!(box_plot["kind"], "box_plot");
    assert_eq!(box_plot["boxes"][1]["column"], "amount");
    Ok(())
}

#[test]
fn test_cleaned_table_round_trips_through_disk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut outcome =
        analyze_and_clean_file_flow(&fixture("orders.csv"), &ScrubConfig::default())?;

    let parquet = dir.path().join("cleaned.parquet");
    save_df(&mut outcome.df, &parquet)?;
    let reloaded = load_df(&parquet)?;
    assert!(reloaded.equals_missing(&outcome.df));

    let csv = dir.path().join("cleaned.csv");
    save_df(&mut outcome.df, &csv)?;
    let reloaded = load_df(&csv)?;
    assert_eq!(reloaded.shape(), outcome.df.shape());
    Ok(())
}

#[test]
fn test_inspect_lists_source_dtypes() -> Result<()> {
    let columns = inspect_flow(&FileSource::new(fixture("orders.csv")))?;
    assert_eq!(columns.len(), 5);
    assert_eq!(columns.first(), Some(&("OrderId".to_owned(), DataType::Int64)));
    assert_eq!(columns.get(2), Some(&("Order Date".to_owned(), DataType::Date)));
    Ok(())
}

#[test]
fn test_unsupported_format_is_a_read_error() {
    let result = analyze_and_clean_file_flow(&fixture("notes.txt"), &ScrubConfig::default());
    match result {
        Err(ScrubError::SourceRead { path, .. }) => assert!(path.ends_with("notes.txt")),
        other => panic!("expected a read error, got {other:?}"),
    }
}

#[test]
fn test_missing_file_is_a_read_error() {
    let result =
        analyze_and_clean_file_flow(&fixture("does_not_exist.csv"), &ScrubConfig::default());
    assert!(matches!(result, Err(ScrubError::SourceRead { .. })));
}

fn text_column(df: &DataFrame, name: &str) -> Result<StringChunked> {
    Ok(df.column(name)?.as_materialized_series().str()?.clone())
}

#[test]
fn test_clean_orders_workbook() -> Result<()> {
    let outcome = analyze_and_clean_file_flow(&fixture("orders.xlsx"), &ScrubConfig::default())?;

    assert_eq!(outcome.df.shape(), (13, 5));
    let names: Vec<String> = outcome
        .df
        .get_column_names()
        .into_iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(
        names,
        vec!["order_id", "customer_name", "column_3", "order_date", "amount"],
        "a blank header cell is named after its position"
    );
    assert_eq!(outcome.df.column("order_id")?.dtype(), &DataType::Int64);

    let customers = text_column(&outcome.df, "customer_name")?;
    assert_eq!(customers.get(0), Some("Ann"));
    assert_eq!(customers.get(2), Some("  Cy"));
    assert_eq!(customers.get(12), Some("Mo"));

    let dates = text_column(&outcome.df, "order_date")?;
    assert_eq!(dates.get(0), Some("03/01/2024"));
    assert_eq!(dates.get(4), Some("03/05/2024"));
    assert_eq!(dates.get(12), None, "the short last row has no date");

    let notes = text_column(&outcome.df, "column_3")?;
    assert_eq!(notes.get(0), Some("note 1"));
    assert_eq!(notes.null_count(), 10);

    let report = &outcome.report;
    assert_eq!(
        report.missing_values_warning(),
        Some(
            "Warning: the following columns have missing values:\n\
             column_3      10\n\
             order_date    1\n\
             amount        1"
        )
    );
    assert!(report.duplicates_warning().is_none());
    assert!(report.data_types().contains("date"), "dates are typed before formatting");
    assert_eq!(
        report.box_plot_title(),
        Some("Box plot of data values for order_id, amount")
    );
    Ok(())
}

#[test]
fn test_workbook_1904_dates_and_durations() -> Result<()> {
    let outcome =
        analyze_and_clean_file_flow(&fixture("shifts_1904.xlsx"), &ScrubConfig::default())?;

    let shipped = text_column(&outcome.df, "shipped")?;
    assert_eq!(shipped.get(0), Some("03/05/2024"));
    assert_eq!(shipped.get(1), Some("03/06/2024"));

    let shifts = text_column(&outcome.df, "shift_length")?;
    assert_eq!(shifts.get(0), Some("PT12H0M0S"), "durations are not calendar dates");
    assert_eq!(shifts.get(1), Some("PT30H0M0S"));
    Ok(())
}

#[test]
fn test_clean_ods_dates() -> Result<()> {
    let outcome = analyze_and_clean_file_flow(&fixture("stock.ods"), &ScrubConfig::default())?;

    assert_eq!(outcome.df.shape(), (3, 3));
    let shipped = text_column(&outcome.df, "ship_date")?;
    assert_eq!(shipped.get(0), Some("03/05/2024"));
    assert_eq!(shipped.get(1), Some("03/06/2024"));
    assert_eq!(shipped.get(2), None);

    let items = text_column(&outcome.df, "item")?;
    assert_eq!(items.get(0), Some("bolts"));
    assert_eq!(outcome.df.column("qty")?.dtype(), &DataType::Int64);
    Ok(())
}

#[test]
fn test_empty_worksheet_is_a_read_error() {
    let result = analyze_and_clean_file_flow(&fixture("empty.xlsx"), &ScrubConfig::default());
    match result {
        Err(ScrubError::SourceRead { path, reason }) => {
            assert!(path.ends_with("empty.xlsx"), "got {path}");
            assert!(reason.contains("Worksheet is empty"), "got {reason}");
        }
        other => panic!("expected a read error, got {other:?}"),
    }
}

#[test]
fn test_workbook_without_sheets_is_a_read_error() {
    let result = analyze_and_clean_file_flow(&fixture("no_sheets.ods"), &ScrubConfig::default());
    match result {
        Err(ScrubError::SourceRead { reason, .. }) => {
            assert!(reason.contains("no worksheets"), "got {reason}");
        }
        other => panic!("expected a read error, got {other:?}"),
    }
}
