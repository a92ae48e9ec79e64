use crate::error::ScrubError;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The five column kinds the pipeline knows how to treat.
///
/// Kinds are derived from the polars dtype once, when a stage scans the
/// table. Dtypes outside this set have no kind and are skipped.
#[derive(Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Debug)]
pub enum ColumnKind {
    Text,
    Integer,
    Float,
    Date,
    Boolean,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ColumnKind {
    pub fn from_dtype(dtype: &DataType) -> Option<Self> {
        match dtype {
            DataType::String => Some(Self::Text),
            DataType::Boolean => Some(Self::Boolean),
            DataType::Date | DataType::Datetime(_, _) => Some(Self::Date),
            d if d.is_integer() => Some(Self::Integer),
            d if d.is_float() => Some(Self::Float),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Date => "Date",
            Self::Boolean => "Boolean",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

/// Pipeline stages that dispatch on column kind.
#[derive(Clone, Copy, Serialize, PartialEq, Eq, Debug)]
pub enum Stage {
    Sanitize,
    DateFormat,
    Outliers,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sanitize => "sanitize",
            Self::DateFormat => "date_format",
            Self::Outliers => "outliers",
        }
    }
}

/// A column a stage left untouched because its dtype has no [`ColumnKind`].
#[derive(Clone, Serialize, PartialEq, Eq, Debug)]
pub struct UnsupportedColumn {
    pub stage: Stage,
    pub column: String,
    pub dtype: String,
}

impl UnsupportedColumn {
    pub fn to_error(&self) -> ScrubError {
        ScrubError::UnsupportedColumnType {
            column: self.column.clone(),
            dtype: self.dtype.clone(),
        }
    }
}

/// Splits the table's columns into those with a known kind and those a
/// stage has to skip. Skips are logged and appended to `skipped`.
pub fn classify_columns(
    df: &DataFrame,
    stage: Stage,
    skipped: &mut Vec<UnsupportedColumn>,
) -> Vec<(String, ColumnKind)> {
    let mut known = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let name = column.name().to_string();
        if let Some(kind) = ColumnKind::from_dtype(column.dtype()) {
            known.push((name, kind));
        } else {
            let skip = UnsupportedColumn {
                stage,
                column: name,
                dtype: column.dtype().to_string(),
            };
            tracing::warn!(stage = stage.as_str(), "{}; skipping", skip.to_error());
            skipped.push(skip);
        }
    }
    known
}

/// Forces a specific source header to a specific target name.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq, Debug)]
pub struct RenameRule {
    pub source: String,
    pub target: String,
}

impl RenameRule {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl FromStr for RenameRule {
    type Err = ScrubError;

    /// Parses `SOURCE=target`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((source, target)) if !source.is_empty() && !target.is_empty() => {
                Ok(Self::new(source, target))
            }
            _ => Err(ScrubError::Config(format!(
                "Rename rule '{s}' must look like SOURCE=target"
            ))),
        }
    }
}

/// Builds the default rule list. A new list is built on every call.
pub fn default_rename_rules() -> Vec<RenameRule> {
    vec![RenameRule::new("EXAMPLEID", "example_id")]
}

/// Descriptive statistics for one selected numeric column.
#[derive(Clone, Deserialize, Serialize, Debug, Default, PartialEq)]
pub struct ColumnStatistics {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnStatistics {
    /// Values in `STATISTIC_LABELS` order.
    pub fn values(&self) -> [Option<f64>; 8] {
        [
            Some(self.count as f64),
            self.mean,
            self.std,
            self.min,
            self.q1,
            self.median,
            self.q3,
            self.max,
        ]
    }
}

pub const STATISTIC_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// The secondary statistics table, one entry per selected column.
#[derive(Clone, Deserialize, Serialize, Debug, Default, PartialEq)]
pub struct StatisticsTable {
    pub columns: Vec<ColumnStatistics>,
}

impl StatisticsTable {
    pub fn get(&self, name: &str) -> Option<&ColumnStatistics> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Lays the table out like a describe() frame: a leading `statistic`
    /// column followed by one Float64 column per selected column.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(Column::from(Series::new(
            "statistic".into(),
            STATISTIC_LABELS.to_vec(),
        )));
        for stats in &self.columns {
            let values = stats.values().to_vec();
            columns.push(Column::from(Series::new(stats.name.as_str().into(), values)));
        }
        DataFrame::new(columns)
    }

    pub fn render_text(&self) -> String {
        let label_width = STATISTIC_LABELS.iter().map(|l| l.len()).max().unwrap_or(0);
        let cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|c| c.values().iter().map(|v| crate::utils::fmt_opt(*v)).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .zip(&cells)
            .map(|(c, col_cells)| {
                col_cells
                    .iter()
                    .map(String::len)
                    .chain(std::iter::once(c.name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = format!("{:label_width$}", "");
        for (c, width) in self.columns.iter().zip(&widths) {
            out.push_str(&format!("  {:>width$}", c.name));
        }
        for (row, label) in STATISTIC_LABELS.iter().enumerate() {
            out.push('\n');
            out.push_str(&format!("{label:<label_width$}"));
            for (col_cells, width) in cells.iter().zip(&widths) {
                let cell = col_cells.get(row).map(String::as_str).unwrap_or_default();
                out.push_str(&format!("  {cell:>width$}"));
            }
        }
        out
    }
}

/// Output of the missing-value, duplicate and dtype checks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QualityFindings {
    pub missing_values_warning: Option<String>,
    pub duplicates_warning: Option<String>,
    pub data_types: String,
}

/// Output of the outlier stage. All fields are `None` when no column
/// qualified.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OutlierFindings {
    pub selection: Vec<String>,
    pub box_plot_title: Option<String>,
    pub dist_plots_title: Option<String>,
    pub summary: Option<StatisticsTable>,
}

/// The quality report. Built once by [`Report::assemble`], read-only after.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct Report {
    missing_values_warning: Option<String>,
    duplicates_warning: Option<String>,
    data_types: String,
    box_plot_title: Option<String>,
    dist_plots_title: Option<String>,
    dataframe_summary: Option<StatisticsTable>,
}

impl Report {
    pub fn assemble(quality: QualityFindings, outliers: OutlierFindings) -> Self {
        Self {
            missing_values_warning: quality.missing_values_warning,
            duplicates_warning: quality.duplicates_warning,
            data_types: quality.data_types,
            box_plot_title: outliers.box_plot_title,
            dist_plots_title: outliers.dist_plots_title,
            dataframe_summary: outliers.summary,
        }
    }

    pub fn missing_values_warning(&self) -> Option<&str> {
        self.missing_values_warning.as_deref()
    }

    pub fn duplicates_warning(&self) -> Option<&str> {
        self.duplicates_warning.as_deref()
    }

    pub fn data_types(&self) -> &str {
        &self.data_types
    }

    pub fn box_plot_title(&self) -> Option<&str> {
        self.box_plot_title.as_deref()
    }

    pub fn dist_plots_title(&self) -> Option<&str> {
        self.dist_plots_title.as_deref()
    }

    pub fn dataframe_summary(&self) -> Option<&StatisticsTable> {
        self.dataframe_summary.as_ref()
    }

    pub fn render_text(&self) -> String {
        let mut sections = Vec::new();
        if let Some(w) = &self.missing_values_warning {
            sections.push(w.clone());
        }
        if let Some(w) = &self.duplicates_warning {
            sections.push(w.clone());
        }
        sections.push(self.data_types.clone());
        if let Some(title) = &self.box_plot_title {
            sections.push(title.clone());
        }
        if let Some(title) = &self.dist_plots_title {
            sections.push(title.clone());
        }
        if let Some(summary) = &self.dataframe_summary {
            sections.push(summary.render_text());
        }
        sections.join("\n\n")
    }
}

/// Everything a pipeline run hands back.
#[derive(Clone, Debug)]
pub struct CleanOutcome {
    pub df: DataFrame,
    pub report: Report,
    pub skipped: Vec<UnsupportedColumn>,
}
