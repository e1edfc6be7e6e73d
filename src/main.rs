use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use fillphase::{
    ClassificationTable, Extraction, Options, Phase, ViewportPolicy, color_report, extract_files,
    parse_phase_arg,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fillphase", version)]
#[command(about = "Classify SVG paths into per-phase fill animation data", long_about = None)]
struct Cli {
    /// Phase documents as PHASE=PATH, in phase order
    #[arg(required = true, value_parser = parse_phase_arg)]
    phases: Vec<(Phase, PathBuf)>,

    /// Output file (use - for stdout)
    #[arg(short, long, default_value = "-")]
    output: PathBuf,

    /// Classification table (JSON); the built-in table if omitted
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// Attribute carrying the explicit section hint
    #[arg(long, default_value = "data-section")]
    hint_attribute: String,

    /// Treat `<!-- [TAG] -->` comments as hints for the paths that follow
    #[arg(long)]
    comment_markers: bool,

    /// Canonical viewport source: first, last or phase:<id>
    #[arg(long, default_value = "last")]
    viewport: ViewportPolicy,

    /// Viewport used when no document declares one
    #[arg(long, default_value = fillphase::DEFAULT_VIEWPORT)]
    fallback_viewport: String,

    /// Process phases in parallel
    #[arg(long)]
    parallel: bool,

    /// Print per-phase path counts
    #[arg(short, long)]
    stats: bool,

    /// Print each phase's fill colors with their counts and table category
    #[arg(long)]
    colors: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let table = match &cli.table {
        Some(path) => ClassificationTable::from_path(path)?,
        None => ClassificationTable::builtin()?,
    };

    let options = Options {
        hint_attribute: cli.hint_attribute,
        comment_markers: cli.comment_markers,
        viewport_policy: cli.viewport,
        fallback_viewport: cli.fallback_viewport,
        parallel: cli.parallel,
    };

    let extraction = extract_files(&cli.phases, &table, &options);
    if extraction.dataset.phases.is_empty() {
        return Err(format!("no phase could be processed ({} failed)", extraction.errors.len()).into());
    }

    let mut output = serde_json::to_string_pretty(&extraction.dataset)?;
    output.push('\n');

    // Write output
    if cli.output.as_os_str() == "-" {
        io::stdout().write_all(output.as_bytes())?;
    } else {
        fs::write(&cli.output, &output)?;
    }

    if cli.stats {
        print_stats(&extraction);
    }
    if cli.colors {
        print_colors(&extraction, &table);
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn print_stats(extraction: &Extraction) {
    eprintln!("viewport: {}", extraction.dataset.viewport);
    for data in &extraction.dataset.phases {
        let counts: Vec<String> = data
            .paths
            .iter()
            .map(|(category, records)| format!("{category}={}", records.len()))
            .collect();
        eprintln!(
            "{}: {} (skipped {})",
            data.phase,
            counts.join(" "),
            data.skipped
        );
    }
    for err in &extraction.errors {
        eprintln!("failed: {err}");
    }
    if !extraction.warnings.is_empty() {
        eprintln!("{} viewport mismatch(es)", extraction.warnings.len());
    }
}

fn print_colors(extraction: &Extraction, table: &ClassificationTable) {
    for data in &extraction.dataset.phases {
        let report = color_report(data, table);
        eprintln!("{}: {} unique colors", data.phase, report.len());
        for entry in report {
            eprintln!("  {entry}");
        }
    }
}
