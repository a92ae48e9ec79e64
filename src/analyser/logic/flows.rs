use super::cleaning::{format_date_columns, strip_trailing_whitespace};
use super::io::{FileSource, TableSource};
use super::naming::normalize_schema;
use super::profiling::analyse_outliers;
use super::quality::check_quality;
use super::types::{CleanOutcome, RenameRule, Report, default_rename_rules};
use crate::config::ScrubConfig;
use crate::error::Result;
use crate::plotting::{JsonPlotSink, NullPlotSink, PlotSink};
use polars::prelude::*;
use std::path::Path;

/// Runs the whole pipeline on one table.
///
/// Stages run in order: header normalisation, quality checks, trailing
/// whitespace removal, date formatting, outlier analysis, report assembly.
/// `rules` of `None` means the default rule list, built fresh for this call.
///
/// # Errors
///
/// Fails if the source cannot be read, if two headers normalise to the same
/// name, or if polars fails while transforming the table. Columns with
/// unsupported dtypes do not fail the run; they are listed in
/// [`CleanOutcome::skipped`].
pub fn analyze_and_clean(
    source: &dyn TableSource,
    rules: Option<&[RenameRule]>,
    plots: &mut dyn PlotSink,
) -> Result<CleanOutcome> {
    let start = std::time::Instant::now();
    let rules: Vec<RenameRule> = rules.map_or_else(default_rename_rules, <[RenameRule]>::to_vec);

    tracing::info!("Reading table from {}", source.describe());
    let raw = source.read_table()?;
    let (rows, width) = raw.shape();

    let df = normalize_schema(&raw, &rules)?;
    tracing::info!("Normalised {width} column names");

    let quality = check_quality(&df)?;

    let mut skipped = Vec::new();
    let df = strip_trailing_whitespace(df, &mut skipped)?;
    let df = format_date_columns(df, &mut skipped)?;
    let outliers = analyse_outliers(&df, plots, &mut skipped)?;

    let report = Report::assemble(quality, outliers);
    debug_assert_eq!(df.shape(), (rows, width), "cleaning never changes the shape");

    tracing::info!(
        "Cleaned {rows} rows x {width} columns in {:?} ({} skipped column checks)",
        start.elapsed(),
        skipped.len()
    );

    Ok(CleanOutcome {
        df,
        report,
        skipped,
    })
}

/// Cleans a file on disk using the settings in `config`.
///
/// Plot specifications are written when `config.plot_output_dir` is set;
/// otherwise plot requests are dropped.
///
/// # Errors
///
/// See [`analyze_and_clean`]. Also fails if the plot directory cannot be
/// created.
pub fn analyze_and_clean_file_flow(path: &Path, config: &ScrubConfig) -> Result<CleanOutcome> {
    let source = FileSource::new(path);
    match &config.plot_output_dir {
        Some(dir) => {
            let mut sink = JsonPlotSink::create(dir)?;
            let outcome = analyze_and_clean(&source, Some(&config.rename_rules), &mut sink)?;
            tracing::info!(
                "Wrote {} plot specifications to {}",
                sink.written().len(),
                sink.dir().display()
            );
            Ok(outcome)
        }
        None => analyze_and_clean(&source, Some(&config.rename_rules), &mut NullPlotSink),
    }
}

/// Column name, dtype and kind for every column, without cleaning.
///
/// # Errors
///
/// Fails if the source cannot be read.
pub fn inspect_flow(source: &dyn TableSource) -> Result<Vec<(String, DataType)>> {
    let df = source.read_table()?;
    Ok(df
        .get_columns()
        .iter()
        .map(|c| (c.name().to_string(), c.dtype().clone()))
        .collect())
}
