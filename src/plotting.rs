//! Plot sinks.
//!
//! The pipeline never draws anything itself. It hands named value series to
//! a [`PlotSink`], which may record, save, or ignore them. Which sink runs is
//! chosen by whoever calls the pipeline.

use crate::analyser::logic::profiling::{calculate_histogram, describe_values};
use crate::error::{Result, ResultExt as _, ScrubError};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One named column of non-missing numeric values.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotSeries {
    pub name: String,
    pub values: Vec<f64>,
}

pub trait PlotSink {
    /// Render one box plot covering every series, in the given order.
    ///
    /// # Errors
    ///
    /// Sink-specific; the pipeline logs and continues.
    fn render_box_plot(&mut self, columns: &[PlotSeries], title: &str) -> Result<()>;

    /// Render the value distribution of a single column.
    ///
    /// # Errors
    ///
    /// Sink-specific; the pipeline logs and continues.
    fn render_distribution(&mut self, column: &str, values: &[f64], title: &str) -> Result<()>;
}

/// Drops every request. Used for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPlotSink;

impl PlotSink for NullPlotSink {
    fn render_box_plot(&mut self, _columns: &[PlotSeries], _title: &str) -> Result<()> {
        Ok(())
    }

    fn render_distribution(&mut self, _column: &str, _values: &[f64], _title: &str) -> Result<()> {
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlotCall {
    BoxPlot {
        title: String,
        columns: Vec<PlotSeries>,
    },
    Distribution {
        column: String,
        values: Vec<f64>,
        title: String,
    },
}

impl PlotCall {
    pub fn title(&self) -> &str {
        match self {
            Self::BoxPlot { title, .. } | Self::Distribution { title, .. } => title,
        }
    }
}

/// Keeps every request, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingPlotSink {
    pub calls: Vec<PlotCall>,
}

impl RecordingPlotSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.calls.iter().map(PlotCall::title).collect()
    }
}

impl PlotSink for RecordingPlotSink {
    fn render_box_plot(&mut self, columns: &[PlotSeries], title: &str) -> Result<()> {
        self.calls.push(PlotCall::BoxPlot {
            title: title.to_owned(),
            columns: columns.to_vec(),
        });
        Ok(())
    }

    fn render_distribution(&mut self, column: &str, values: &[f64], title: &str) -> Result<()> {
        self.calls.push(PlotCall::Distribution {
            column: column.to_owned(),
            values: values.to_vec(),
            title: title.to_owned(),
        });
        Ok(())
    }
}

#[derive(Serialize)]
struct BoxSpec<'a> {
    column: &'a str,
    count: usize,
    min: Option<f64>,
    q1: Option<f64>,
    median: Option<f64>,
    q3: Option<f64>,
    max: Option<f64>,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum PlotSpec<'a> {
    BoxPlot {
        title: &'a str,
        boxes: Vec<BoxSpec<'a>>,
    },
    Distribution {
        title: &'a str,
        column: &'a str,
        bin_width: f64,
        histogram: Vec<(f64, usize)>,
    },
}

/// Writes one JSON plot specification per request into a directory.
///
/// Files are numbered in request order: `01_box_plot.json`,
/// `02_distribution_<column>.json`, ...
#[derive(Debug)]
pub struct JsonPlotSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl JsonPlotSink {
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create plot directory {}", dir.display()))?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write_spec(&mut self, stem: &str, spec: &PlotSpec<'_>) -> Result<()> {
        let path = self
            .dir
            .join(format!("{:02}_{stem}.json", self.written.len() + 1));
        let content = serde_json::to_string_pretty(spec)
            .map_err(|e| ScrubError::Plot(format!("Failed to encode plot {stem}: {e}")))?;
        std::fs::write(&path, content).map_err(|e| {
            ScrubError::Plot(format!("Failed to write plot {}: {e}", path.display()))
        })?;
        tracing::debug!("Wrote plot specification {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

fn file_stem_for(column: &str) -> String {
    column
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '-' })
        .collect()
}

impl PlotSink for JsonPlotSink {
    fn render_box_plot(&mut self, columns: &[PlotSeries], title: &str) -> Result<()> {
        let boxes = columns
            .iter()
            .map(|s| {
                describe_values(&s.name, &s.values).map(|stats| BoxSpec {
                    column: &s.name,
                    count: stats.count,
                    min: stats.min,
                    q1: stats.q1,
                    median: stats.median,
                    q3: stats.q3,
                    max: stats.max,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.write_spec("box_plot", &PlotSpec::BoxPlot { title, boxes })
    }

    fn render_distribution(&mut self, column: &str, values: &[f64], title: &str) -> Result<()> {
        let stats = describe_values(column, values)?;
        let (bin_width, histogram) = calculate_histogram(&stats, values);
        let stem = format!("distribution_{}", file_stem_for(column));
        self.write_spec(
            &stem,
            &PlotSpec::Distribution {
                title,
                column,
                bin_width,
                histogram,
            },
        )
    }
}
