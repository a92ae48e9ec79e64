use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use sheetscrub::analyser::logic::types::{ColumnKind, RenameRule};
use sheetscrub::analyser::logic::{FileSource, analyze_and_clean_file_flow, inspect_flow, save_df};
use sheetscrub::config::{ScrubConfig, load_config};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "sheetscrub",
    about = "Clean a spreadsheet table and report on its quality"
)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a table and produce a quality report
    Clean {
        /// Input file (xlsx, xls, xlsb, ods, csv, parquet, json)
        #[arg(short, long)]
        file: PathBuf,

        /// Where to write the cleaned table (csv or parquet). Not saved when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Where to write the JSON report. Overrides the config file.
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Extra header override, as SOURCE=target. May be repeated.
        #[arg(long = "rename", value_name = "SOURCE=TARGET")]
        renames: Vec<RenameRule>,

        /// Path to a JSON configuration file
        #[arg(long, env = "SHEETSCRUB_CONFIG")]
        config: Option<PathBuf>,

        /// Directory for plot specifications. Overrides the config file.
        #[arg(long)]
        plots_dir: Option<PathBuf>,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List columns with their dtypes and kinds
    Inspect {
        /// Input file
        #[arg(short, long)]
        file: PathBuf,
    },
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Clean {
            file,
            output,
            report,
            renames,
            config,
            plots_dir,
            json,
        } => {
            let mut settings = match &config {
                Some(path) => load_config(path)?,
                None => ScrubConfig::default(),
            }
            .with_extra_rules(renames);
            if plots_dir.is_some() {
                settings.plot_output_dir = plots_dir;
            }
            if report.is_some() {
                settings.report_path = report;
            }
            handle_clean(&file, output.as_deref(), &settings, json)
        }
        Commands::Inspect { file } => handle_inspect(&file),
    }
}

fn handle_clean(
    file: &Path,
    output: Option<&Path>,
    settings: &ScrubConfig,
    json: bool,
) -> Result<()> {
    let mut outcome = analyze_and_clean_file_flow(file, settings)
        .with_context(|| format!("Failed to clean {}", file.display()))?;

    for skip in &outcome.skipped {
        println!(
            "Skipped column '{}' ({}) during {}",
            skip.column,
            skip.dtype,
            skip.stage.as_str()
        );
    }

    if let Some(out) = output {
        save_df(&mut outcome.df, out)
            .with_context(|| format!("Failed to save cleaned table to {}", out.display()))?;
        println!("Cleaned table saved to {}", out.display());
    }

    if let Some(report_path) = &settings.report_path {
        let content = serde_json::to_string_pretty(&outcome.report)?;
        std::fs::write(report_path, content)
            .with_context(|| format!("Failed to write report {}", report_path.display()))?;
        println!("Report saved to {}", report_path.display());
    } else if json {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    } else {
        println!("{}", outcome.report.render_text());
    }

    Ok(())
}

fn handle_inspect(file: &Path) -> Result<()> {
    let columns = inspect_flow(&FileSource::new(file))?;
    let width = columns.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
    for (name, dtype) in columns {
        let kind = ColumnKind::from_dtype(&dtype).map_or("unsupported", |k| k.as_str());
        let dtype = dtype.to_string();
        println!("{name:<width$}  {dtype:<16}  {kind}");
    }
    Ok(())
}
