//! Tracer CLI binary.
//!
//! Provides a command-line interface for the alumni tracer study pipeline.

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracer::data::SourceCache;
use tracer::data::schema::{ColumnInfo, column_registry, get_column_info};
use tracer::output::{Analysis, ExportFormat, Exporter, OutputFormat, Render, Report, render};
use tracer::{DataSource, LoadedSource, Pipeline, PipelineConfig, TracerError};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tracer")]
#[command(about = "Tracer: alumni tracer study analytics", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct SourceArgs {
    /// Dataset source (default, path or stdin)
    #[arg(long, default_value = "default")]
    source: String,

    /// CSV file read when the source is `path`
    #[arg(long)]
    path: Option<PathBuf>,

    /// JSON pipeline configuration
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the dataset and compute every metric
    Analyze {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format (text, markdown or json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the output to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show the data quality report only
    Quality {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format (text, markdown or json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the output to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Export a grouped series or the whole analysis
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// Series to export (cohort, ttfj, level, sector, status, histogram or analysis)
        #[arg(long)]
        kind: String,

        /// Export format (csv, json or pretty-json); inferred from the output extension if omitted
        #[arg(long)]
        format: Option<String>,

        /// Destination file
        #[arg(long)]
        output: PathBuf,
    },

    /// List the required dataset columns, or describe one
    Columns {
        /// Column to describe
        name: Option<String>,
    },
}

fn main() {
    if let Err(e) = run() {
        report_error(e.as_ref());
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let mut cache = SourceCache::new();

    match cli.command {
        Commands::Analyze {
            source,
            format,
            output,
        } => {
            let format: OutputFormat = format.parse()?;
            let analysis = analyze(&source, &mut cache)?;
            write_output(&render(&analysis, format)?, output.as_deref())?;
        }
        Commands::Quality {
            source,
            format,
            output,
        } => {
            let format: OutputFormat = format.parse()?;
            let pipeline = Pipeline::new(load_config(source.config.as_deref())?);
            let loaded = load_source(&source, &mut cache)?;
            let quality = with_spinner("Checking data quality...", || {
                pipeline.quality(&loaded.frame)
            })?;
            let text = match format {
                OutputFormat::Text => quality.to_ascii_table(),
                OutputFormat::Markdown => quality.to_markdown(),
                OutputFormat::Json => serde_json::to_string_pretty(&quality)?,
            };
            write_output(&text, output.as_deref())?;
        }
        Commands::Export {
            source,
            kind,
            format,
            output,
        } => {
            let (format, output) = match format {
                Some(f) => {
                    let format = parse_export_format(&f)?;
                    (format, with_default_extension(output, format))
                }
                None => (ExportFormat::from_extension(&output)?, output),
            };
            let analysis = analyze(&source, &mut cache)?;
            export(&analysis, &kind, &output, format)?;
            println!("Exported {} to {}", kind, output.display());
        }
        Commands::Columns { name } => list_columns(name.as_deref())?,
    }

    let stats = cache.stats();
    tracing::debug!(
        entries = stats.entries,
        hits = stats.hits,
        misses = stats.misses,
        "source cache"
    );
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_source(args: &SourceArgs) -> Result<DataSource, Box<dyn Error>> {
    match args.source.to_lowercase().as_str() {
        "default" => Ok(DataSource::Default),
        "path" | "file" => args
            .path
            .clone()
            .map(DataSource::Path)
            .ok_or_else(|| "--source path requires --path <FILE>".into()),
        "stdin" | "-" => Ok(DataSource::Stdin),
        other => Err(format!(
            "Unknown source '{}'. Valid sources: default, path, stdin",
            other
        )
        .into()),
    }
}

fn parse_export_format(name: &str) -> Result<ExportFormat, Box<dyn Error>> {
    match name.to_lowercase().as_str() {
        "csv" => Ok(ExportFormat::Csv),
        "json" => Ok(ExportFormat::Json),
        "pretty-json" | "pretty" => Ok(ExportFormat::PrettyJson),
        other => Err(format!(
            "Unknown export format '{}'. Valid formats: csv, json, pretty-json",
            other
        )
        .into()),
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig, Box<dyn Error>> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading pipeline config");
            Ok(PipelineConfig::from_json_file(path)?)
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn load_source(
    args: &SourceArgs,
    cache: &mut SourceCache,
) -> Result<LoadedSource, Box<dyn Error>> {
    let source = parse_source(args)?;
    with_spinner(&format!("Loading {}...", source), || source.load(cache))
}

fn analyze(args: &SourceArgs, cache: &mut SourceCache) -> Result<Analysis, Box<dyn Error>> {
    let pipeline = Pipeline::new(load_config(args.config.as_deref())?);
    let loaded = load_source(args, cache)?;
    let pipeline = pipeline.with_source(loaded.label);
    with_spinner("Cleaning and computing metrics...", || {
        pipeline.run(&loaded.frame)
    })
}

/// Run `task` behind a spinner on stderr.
fn with_spinner<T>(
    message: &str,
    task: impl FnOnce() -> tracer::Result<T>,
) -> Result<T, Box<dyn Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());

    let result = task();
    pb.finish_and_clear();
    Ok(result?)
}

fn export(
    analysis: &Analysis,
    kind: &str,
    output: &Path,
    format: ExportFormat,
) -> Result<(), Box<dyn Error>> {
    match kind.to_lowercase().as_str() {
        "cohort" => analysis
            .performance
            .salary_by_cohort
            .export_to_file(output, format)?,
        "ttfj" => analysis
            .performance
            .ttfj_by_cohort
            .export_to_file(output, format)?,
        "level" => analysis
            .comparison
            .salary_by_level
            .export_to_file(output, format)?,
        "sector" => analysis
            .breakdowns
            .field_fit_by_sector
            .export_to_file(output, format)?,
        "status" => analysis
            .summary
            .status_distribution
            .export_to_file(output, format)?,
        "histogram" => analysis
            .breakdowns
            .ttfj_histogram
            .export_to_file(output, format)?,
        "analysis" => match format {
            ExportFormat::Csv => analysis.export_to_file(output, format)?,
            ExportFormat::Json | ExportFormat::PrettyJson => {
                Report::from_analysis(analysis).write_to_file(output)?;
            }
        },
        other => {
            return Err(format!(
                "Unknown export kind '{}'. Valid kinds: cohort, ttfj, level, sector, status, histogram, analysis",
                other
            )
            .into());
        }
    }
    Ok(())
}

/// Give `output` the format's extension when it has none.
fn with_default_extension(output: PathBuf, format: ExportFormat) -> PathBuf {
    if output.extension().is_some() {
        output
    } else {
        output.with_extension(format.extension())
    }
}

fn write_output(text: &str, output: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

fn list_columns(name: Option<&str>) -> Result<(), Box<dyn Error>> {
    let Some(name) = name else {
        println!("Required columns:");
        println!("=================\n");
        column_registry().iter().for_each(print_column);
        return Ok(());
    };

    let info = get_column_info(name).ok_or_else(|| {
        format!(
            "'{}' is not a tracer study column. Run `tracer columns` to list them",
            name
        )
    })?;
    print_column(&info);
    Ok(())
}

fn print_column(info: &ColumnInfo) {
    println!(
        "  {:26} {:12} {}",
        info.name,
        format!("{:?}", info.kind),
        info.description
    );
}

fn report_error(err: &(dyn Error + 'static)) {
    let Some(e) = err.downcast_ref::<TracerError>() else {
        eprintln!("Error: {}", err);
        return;
    };

    if e.is_not_found() {
        eprintln!("Error: {}", e);
        eprintln!("Choose another source: --source path --path <FILE>, or --source stdin");
    } else if let Some(missing) = e.missing_columns() {
        eprintln!("Error: the dataset does not match the tracer study schema.");
        eprintln!("Missing columns:");
        for column in missing {
            eprintln!("  - {}", column);
        }
        eprintln!("Run `tracer columns` to see every required column.");
    } else if e.is_empty_dataset() {
        eprintln!("Error: {}", e);
        eprintln!(
            "No respondents are left to analyse. Check for missing time-to-first-job or salary values and negative durations."
        );
    } else {
        eprintln!("Error: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_path_gains_extension() {
        let path = with_default_extension(PathBuf::from("out/cohort"), ExportFormat::Csv);
        assert_eq!(path, PathBuf::from("out/cohort.csv"));
        let path = with_default_extension(PathBuf::from("analysis"), ExportFormat::PrettyJson);
        assert_eq!(path, PathBuf::from("analysis.json"));
    }

    #[test]
    fn test_export_path_extension_kept() {
        let path = with_default_extension(PathBuf::from("cohort.txt"), ExportFormat::Csv);
        assert_eq!(path, PathBuf::from("cohort.txt"));
    }
}
