use crate::error::{Result, ResultExt as _, ScrubError};
use calamine::{Data, DataType as _, Reader as _, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike as _};
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// Anything that can hand the pipeline a typed table.
pub trait TableSource {
    /// # Errors
    ///
    /// Returns [`ScrubError::SourceRead`] if the table cannot be produced.
    fn read_table(&self) -> Result<DataFrame>;

    /// Human readable origin, used in logs.
    fn describe(&self) -> String;
}

impl TableSource for DataFrame {
    fn read_table(&self) -> Result<DataFrame> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory table ({} x {})", self.height(), self.width())
    }
}

/// A table stored on disk; the format follows the extension.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSource for FileSource {
    fn read_table(&self) -> Result<DataFrame> {
        load_df(&self.path).map_err(|e| match e {
            ScrubError::SourceRead { reason, .. } => ScrubError::SourceRead {
                path: self.path.display().to_string(),
                reason,
            },
            other => ScrubError::SourceRead {
                path: self.path.display().to_string(),
                reason: other.to_string(),
            },
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase()
}

pub fn load_df(path: &Path) -> Result<DataFrame> {
    let ext = extension_of(path);

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path),
        "csv" => Ok(LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_has_header(true)
            .with_try_parse_dates(true)
            .finish()?
            .collect()?),
        "parquet" => Ok(ParquetReader::new(std::fs::File::open(path)?).finish()?),
        "json" => Ok(JsonReader::new(std::fs::File::open(path)?).finish()?),
        _ => Err(ScrubError::SourceRead {
            path: path.display().to_string(),
            reason: format!("Unsupported file extension: '{ext}'"),
        }),
    }
}

/// Reads the first worksheet. The first row holds the headers.
pub fn load_workbook(path: &Path) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ScrubError::SourceRead {
            path: path.display().to_string(),
            reason: "Workbook contains no worksheets".to_owned(),
        })??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Err(ScrubError::SourceRead {
            path: path.display().to_string(),
            reason: "Worksheet is empty".to_owned(),
        });
    };
    let body: Vec<&[Data]> = rows.collect();

    let columns = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let name = match cell {
                Data::Empty => format!("column_{}", idx + 1),
                Data::String(s) => s.clone(),
                other => other.to_string(),
            };
            let cells: Vec<&Data> = body
                .iter()
                .map(|row| row.get(idx).unwrap_or(&EMPTY_CELL))
                .collect();
            workbook_column(&name, &cells).map(Column::from)
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        "Read {} rows x {} columns from {}",
        body.len(),
        columns.len(),
        path.display()
    );
    Ok(DataFrame::new(columns)?)
}

fn is_blank(cell: &Data) -> bool {
    matches!(cell, Data::Empty | Data::Error(_))
        || matches!(cell, Data::String(s) if s.is_empty())
}

static EMPTY_CELL: Data = Data::Empty;

/// Calendar date-time of a date cell. Duration cells are not dates.
///
/// Excel serials go through calamine, which honours the workbook's 1900 or
/// 1904 date system. ODS cells carry ISO 8601 text, date-only or full.
fn cell_datetime(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::DateTime(dt) if dt.is_datetime() => dt.as_datetime(),
        Data::DateTimeIso(_) => cell
            .as_datetime()
            .or_else(|| cell.as_date().and_then(|d| d.and_hms_opt(0, 0, 0))),
        _ => None,
    }
}

/// Elapsed time as ISO 8601 text, e.g. `PT30H0M0S`.
fn duration_text(elapsed: TimeDelta) -> String {
    let secs = elapsed.num_seconds();
    format!("PT{}H{}M{}S", secs / 3600, (secs % 3600) / 60, secs % 60)
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        blank if is_blank(blank) => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::DateTime(dt) if dt.is_duration() => dt.as_duration().map(duration_text),
        other => Some(other.to_string()),
    }
}

/// Builds one typed column from its workbook cells.
///
/// Kinds are tried from narrowest to widest: booleans, integral numbers,
/// numbers, date-times; anything else is kept as text.
fn workbook_column(name: &str, cells: &[&Data]) -> Result<Series> {
    let filled: Vec<&Data> = cells.iter().copied().filter(|c| !is_blank(c)).collect();
    let name: PlSmallStr = name.into();

    if filled.is_empty() {
        let values: Vec<Option<String>> = vec![None; cells.len()];
        return Ok(Series::new(name, values));
    }

    if filled.iter().all(|c| matches!(c, Data::Bool(_))) {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                Data::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        return Ok(Series::new(name, values));
    }

    if filled.iter().all(|c| matches!(c, Data::Int(_) | Data::Float(_))) {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                Data::Int(v) => Some(*v as f64),
                Data::Float(v) => Some(*v),
                _ => None,
            })
            .collect();
        if values.iter().flatten().all(|v| v.is_finite() && v.fract() == 0.0) {
            let ints: Vec<Option<i64>> = values.iter().map(|v| v.map(|x| x as i64)).collect();
            return Ok(Series::new(name, ints));
        }
        return Ok(Series::new(name, values));
    }

    if filled.iter().all(|c| cell_datetime(c).is_some()) {
        let stamps: Vec<Option<NaiveDateTime>> = cells.iter().map(|c| cell_datetime(c)).collect();
        return temporal_series(name, &stamps);
    }

    let values: Vec<Option<String>> = cells.iter().map(|c| cell_text(c)).collect();
    Ok(Series::new(name, values))
}

/// Midnight-only columns become `Date`, the rest millisecond `Datetime`.
fn temporal_series(name: PlSmallStr, stamps: &[Option<NaiveDateTime>]) -> Result<Series> {
    let date_only = stamps
        .iter()
        .flatten()
        .all(|ts| ts.num_seconds_from_midnight() == 0 && ts.nanosecond() == 0);

    if date_only {
        let unix = NaiveDate::default();
        let days: Vec<Option<i32>> = stamps
            .iter()
            .map(|ts| ts.and_then(|ts| i32::try_from((ts.date() - unix).num_days()).ok()))
            .collect();
        return Ok(Series::new(name, days).cast(&DataType::Date)?);
    }

    let millis: Vec<Option<i64>> = stamps
        .iter()
        .map(|ts| ts.map(|ts| ts.and_utc().timestamp_millis()))
        .collect();
    Ok(Series::new(name, millis).cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?)
}

/// Writes the cleaned table as Parquet when the extension says so, CSV
/// otherwise.
pub fn save_df(df: &mut DataFrame, path: &Path) -> Result<()> {
    if extension_of(path) == "parquet" {
        let file = std::fs::File::create(path).context("Failed to create Parquet file")?;
        ParquetWriter::new(file)
            .finish(df)
            .context("Failed to write Parquet file")?;
    } else {
        let file = std::fs::File::create(path).context("Failed to create CSV file")?;
        CsvWriter::new(file)
            .include_header(true)
            .finish(df)
            .context("Failed to write CSV file")?;
    }

    Ok(())
}
