//! # Sheetscrub - one-shot spreadsheet cleaning
//!
//! Sheetscrub takes a single table (an Excel workbook, CSV, Parquet or JSON
//! file, or a polars `DataFrame` already in memory) and returns a cleaned
//! copy together with a quality [`Report`](analyser::logic::Report).
//!
//! ## Quick Start
//!
//! ```no_run
//! use sheetscrub::analyser::logic::{self, FileSource};
//! use sheetscrub::plotting::NullPlotSink;
//!
//! # fn example() -> sheetscrub::error::Result<()> {
//! let source = FileSource::new("orders.xlsx");
//! let outcome = logic::analyze_and_clean(&source, None, &mut NullPlotSink)?;
//!
//! println!("{}", outcome.report.data_types());
//! if let Some(warning) = outcome.report.missing_values_warning() {
//!     println!("{warning}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! Each run goes through the same stages, in order:
//!
//! 1. **Header normalisation** ([`analyser::logic::naming`]): `CamelCase`
//!    and spaced headers become `snake_case`; rename rules override.
//! 2. **Quality checks** ([`analyser::logic::quality`]): missing values,
//!    duplicate rows, dtype listing. Read-only.
//! 3. **Whitespace** ([`analyser::logic::cleaning`]): trailing whitespace
//!    is stripped from text columns.
//! 4. **Dates** ([`analyser::logic::cleaning`]): date columns become
//!    `MM/DD/YYYY` text.
//! 5. **Outliers** ([`analyser::logic::profiling`]): numeric columns with
//!    more than ten distinct values are plotted and summarised.
//! 6. **Report** ([`analyser::logic::types::Report`]): the findings are
//!    frozen into one value.
//!
//! Plots are delegated to a [`plotting::PlotSink`]; the library never draws.
//!
//! ## Core Modules
//!
//! - [`analyser`]: the cleaning pipeline
//! - [`config`]: JSON run configuration
//! - [`error`]: error types
//! - [`logging`]: tracing subscriber setup for the binary
//! - [`plotting`]: plot sinks

pub mod analyser;
pub mod config;
pub mod error;
pub mod logging;
pub mod plotting;
pub mod utils;
