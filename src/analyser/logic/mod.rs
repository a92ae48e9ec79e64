pub mod cleaning;
pub mod flows;
pub mod io;
pub mod naming;
pub mod profiling;
pub mod quality;
pub mod types;

pub use cleaning::{DATE_FORMAT, format_date_columns, strip_trailing_whitespace};
pub use flows::{analyze_and_clean, analyze_and_clean_file_flow, inspect_flow};
pub use io::{FileSource, TableSource, load_df, save_df};
pub use naming::{normalize_column_name, normalize_column_names, normalize_schema};
pub use profiling::{MIN_DISTINCT_VALUES, analyse_outliers, select_outlier_columns};
pub use quality::{check_quality, count_duplicate_rows, missing_value_counts};
pub use types::{
    CleanOutcome, ColumnKind, ColumnStatistics, RenameRule, Report, Stage, StatisticsTable,
    UnsupportedColumn, default_rename_rules,
};
