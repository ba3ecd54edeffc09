//! Clarke Error Grid CLI
//!
//! CSV or synthetic samples → zone tally, JSON report and SVG grid

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "clarke")]
#[command(about = "Clarke Error Grid analysis for paired glucose measurements", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct OutputArgs {
    /// Write the rendered grid as SVG
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Style file (JSON, or YAML for .yaml/.yml)
    #[arg(long)]
    style: Option<PathBuf>,

    /// Plot title (overrides the style title)
    #[arg(long)]
    title: Option<String>,

    /// Write a JSON zone report
    #[arg(long)]
    report: Option<PathBuf>,

    /// Print rounded percentages instead of counts
    #[arg(long, default_value = "false")]
    percent: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Classify paired samples from a CSV file
    Analyze {
        /// Input CSV file with a header row
        #[arg(long)]
        csv: PathBuf,

        /// Header of the reference column
        #[arg(long, default_value = clarke_cli::samples_csv::REFERENCE_COLUMN)]
        reference_column: String,

        /// Header of the prediction column
        #[arg(long, default_value = clarke_cli::samples_csv::PREDICTION_COLUMN)]
        prediction_column: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Classify synthetic CGM data
    Demo {
        /// Number of points to generate
        #[arg(long, default_value_t = clarke_cli::demo_data::DEFAULT_COUNT)]
        count: usize,

        /// RNG seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Render the empty grid
    Grid {
        /// Output SVG file path
        #[arg(long)]
        svg: PathBuf,

        /// Style file (JSON, or YAML for .yaml/.yml)
        #[arg(long)]
        style: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            csv,
            reference_column,
            prediction_column,
            output,
        } => {
            println!("🩸 Clarke Error Grid analysis");
            println!("   CSV Input:  {}", csv.display());
            println!("   Columns:    {} / {}", reference_column, prediction_column);

            let (columns, stats) =
                clarke_cli::read_paired_csv(&csv, &reference_column, &prediction_column)?;
            println!(
                "   Rows:       {} parsed, {} skipped",
                stats.parsed, stats.failed
            );

            let source = csv.display().to_string();
            run(&source, &columns.reference, &columns.prediction, output)?;
        }

        Commands::Demo {
            count,
            seed,
            output,
        } => {
            println!("🎲 Generating demo data...");
            println!("   Count: {}", count);
            println!("   Seed:  {}", seed);

            let data = clarke_cli::generate_demo_data(count, seed)?;
            run("demo", &data.reference, &data.prediction, output)?;
        }

        Commands::Grid { svg, style } => {
            let style = load_style_or_default(style.as_ref())?;
            clarke_cli::write_grid(style, &svg)?;
            println!("✅ Grid written to {}", svg.display());
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn load_style_or_default(path: Option<&PathBuf>) -> Result<clarke_core::StyleConfig> {
    match path {
        Some(p) => clarke_cli::load_style(p),
        None => Ok(clarke_core::StyleConfig::default()),
    }
}

#[cfg(feature = "cli")]
fn run(source: &str, reference: &[f64], prediction: &[f64], output: OutputArgs) -> Result<()> {
    let options = clarke_cli::AnalysisOptions {
        style: load_style_or_default(output.style.as_ref())?,
        title: output.title,
        svg_out: output.svg,
        report_out: output.report,
    };

    let tally = clarke_cli::run_analysis(source, reference, prediction, &options)?;
    print_tally(&tally, output.percent);

    if let Some(path) = &options.svg_out {
        println!("   SVG:    {}", path.display());
    }
    if let Some(path) = &options.report_out {
        println!("   Report: {}", path.display());
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn print_tally(tally: &clarke_core::ZoneTally, percent: bool) {
    println!("\n✅ {} samples classified", tally.total());
    let percentages = tally.percentages();
    for (zone, count) in tally.iter() {
        if percent {
            println!(
                "   {:<7} {:>4}%   {}",
                zone.to_string(),
                percentages[zone.index()],
                zone.description()
            );
        } else {
            println!("   {:<7} {:>5}   {}", zone.to_string(), count, zone.description());
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("clarke CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
