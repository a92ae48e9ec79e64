//! Outlier and distribution analysis for numeric columns.
//!
//! Only numeric columns with more than [`MIN_DISTINCT_VALUES`] distinct
//! values take part; flags, booleans stored as 0/1 and small coded
//! categories fall below that line. For the selection this module asks the
//! plot sink for one combined box plot and one distribution plot per column,
//! then computes describe()-style statistics.
//!
//! Nulls and NaN are dropped before values reach a plot or a statistic.

use super::types::{
    ColumnStatistics, OutlierFindings, Stage, StatisticsTable, UnsupportedColumn,
    classify_columns,
};
use crate::error::Result;
use crate::plotting::{PlotSeries, PlotSink};
use polars::prelude::*;

pub const MIN_DISTINCT_VALUES: usize = 10;

pub const DIST_PLOTS_TITLE: &str = "Distribution plots for numerical columns";

pub fn box_plot_title(selection: &[String]) -> String {
    format!("Box plot of data values for {}", selection.join(", "))
}

pub fn distribution_title(column: &str) -> String {
    format!("Distribution of {column}")
}

/// Numeric columns with strictly more than [`MIN_DISTINCT_VALUES`] distinct
/// values, in table order.
///
/// # Errors
///
/// Returns an error if a distinct count cannot be computed.
pub fn select_outlier_columns(
    df: &DataFrame,
    skipped: &mut Vec<UnsupportedColumn>,
) -> Result<Vec<String>> {
    let mut selection = Vec::new();
    for (name, kind) in classify_columns(df, Stage::Outliers, skipped) {
        if !kind.is_numeric() {
            continue;
        }
        let distinct = df.column(&name)?.as_materialized_series().n_unique()?;
        if distinct > MIN_DISTINCT_VALUES {
            selection.push(name);
        } else {
            tracing::debug!("Column '{name}' has {distinct} distinct values; not analysed");
        }
    }
    Ok(selection)
}

/// Non-missing values of a numeric column as `f64`.
///
/// # Errors
///
/// Returns an error if the column cannot be cast to Float64.
pub fn numeric_values(column: &Column) -> Result<Vec<f64>> {
    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    let ca = series.f64()?;
    Ok(ca.into_iter().flatten().filter(|v| !v.is_nan()).collect())
}

/// # Errors
///
/// Returns an error if polars cannot compute a quantile.
pub fn describe_values(name: &str, values: &[f64]) -> Result<ColumnStatistics> {
    let ca = Float64Chunked::from_vec(name.into(), values.to_vec());
    Ok(ColumnStatistics {
        name: name.to_owned(),
        count: values.len(),
        mean: ca.mean(),
        std: ca.std(1),
        min: ca.min(),
        q1: ca.quantile(0.25, QuantileMethod::Linear)?,
        median: ca.quantile(0.5, QuantileMethod::Linear)?,
        q3: ca.quantile(0.75, QuantileMethod::Linear)?,
        max: ca.max(),
    })
}

/// Freedman-Diaconis bins clamped to 5..=50, falling back to a square-root
/// rule when the IQR is zero. A constant column gets 20 unit-wide bins with
/// every value in the middle one.
///
/// Returns the bin width and `(bin start, count)` pairs.
pub fn calculate_histogram(stats: &ColumnStatistics, values: &[f64]) -> (f64, Vec<(f64, usize)>) {
    let (Some(min_v), Some(max_v)) = (stats.min, stats.max) else {
        return (0.0, Vec::new());
    };

    if (max_v - min_v).abs() < f64::EPSILON {
        let bin_width = 1.0;
        let start = min_v - 10.0 * bin_width;
        let histogram = (0..20_u8)
            .map(|i| {
                let count = if i == 10 { values.len() } else { 0 };
                (start + f64::from(i) * bin_width, count)
            })
            .collect();
        return (bin_width, histogram);
    }

    let n = values.len() as f64;
    let iqr = stats.q3.unwrap_or(max_v) - stats.q1.unwrap_or(min_v);
    let h = if iqr > 0.0 {
        2.0 * iqr / n.cbrt()
    } else {
        (max_v - min_v) / n.sqrt()
    };

    let num_bins = (((max_v - min_v) / h).ceil() as usize).clamp(5, 50);
    let bin_width = (max_v - min_v) / num_bins as f64;

    let mut bins = vec![0_usize; num_bins];
    for &val in values {
        let idx = (((val - min_v) / bin_width).floor() as usize).min(num_bins - 1);
        if let Some(bin) = bins.get_mut(idx) {
            *bin += 1;
        }
    }

    let histogram = bins
        .into_iter()
        .enumerate()
        .map(|(i, count)| (min_v + i as f64 * bin_width, count))
        .collect();
    (bin_width, histogram)
}

/// Selects columns, issues plot requests in selection order and computes the
/// statistics table.
///
/// Plot failures are logged and do not stop the run.
///
/// # Errors
///
/// Returns an error if a selected column cannot be read as numbers.
pub fn analyse_outliers(
    df: &DataFrame,
    plots: &mut dyn PlotSink,
    skipped: &mut Vec<UnsupportedColumn>,
) -> Result<OutlierFindings> {
    let selection = select_outlier_columns(df, skipped)?;
    if selection.is_empty() {
        tracing::info!("No numeric columns qualify for outlier analysis");
        return Ok(OutlierFindings::default());
    }

    let series = selection
        .iter()
        .map(|name| -> Result<PlotSeries> {
            Ok(PlotSeries {
                name: name.clone(),
                values: numeric_values(df.column(name)?)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let box_title = box_plot_title(&selection);
    if let Err(e) = plots.render_box_plot(&series, &box_title) {
        tracing::warn!("Box plot request failed: {e}");
    }
    for s in &series {
        if let Err(e) = plots.render_distribution(&s.name, &s.values, &distribution_title(&s.name)) {
            tracing::warn!("Distribution plot request for '{}' failed: {e}", s.name);
        }
    }

    let summary = StatisticsTable {
        columns: series
            .iter()
            .map(|s| describe_values(&s.name, &s.values))
            .collect::<Result<Vec<_>>>()?,
    };
    tracing::info!("Outlier analysis covered {} columns", selection.len());

    Ok(OutlierFindings {
        selection,
        box_plot_title: Some(box_title),
        dist_plots_title: Some(DIST_PLOTS_TITLE.to_owned()),
        summary: Some(summary),
    })
}
