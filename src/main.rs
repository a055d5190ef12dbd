//! store-scout CLI
//!
//! Runs the full store report once: load the CSV files, print the data
//! overview, write the charts and print the recommendation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use store_scout::{generate_report, load_config, ReportConfig, StoreModel};

/// Store Scout - analyse retail stores and recommend the best one
#[derive(Parser, Debug)]
#[command(name = "store-scout")]
#[command(about = "Analyse store data and recommend the best-performing store", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the input CSV files
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Store CSV file name, relative to the data directory
    #[arg(long, value_name = "FILE")]
    stores: Option<String>,

    /// Product CSV file name, relative to the data directory
    #[arg(long, value_name = "FILE")]
    products: Option<String>,

    /// Directory the chart images are written to
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Length of the top-N listings
    #[arg(long, value_name = "N")]
    top_n: Option<usize>,

    /// Skip chart generation
    #[arg(long)]
    no_charts: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    /// Command-line flags win over the config file.
    fn apply(&self, config: &mut ReportConfig) {
        if let Some(dir) = &self.data_dir {
            config.input.data_dir = dir.clone();
        }
        if let Some(file) = &self.stores {
            config.input.stores_file = file.clone();
        }
        if let Some(file) = &self.products {
            config.input.products_file = file.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.chart_dir = dir.clone();
        }
        if let Some(n) = self.top_n {
            config.report.top_n = n;
        }
        if self.no_charts {
            config.output.charts = false;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    log::info!("store-scout v{}", store_scout::VERSION);

    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config file: {:?}", path))?,
        None => ReportConfig::default(),
    };
    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    let mut model = StoreModel::new(config.input.data_dir.clone());
    model
        .load_data(&config.input.stores_file, &config.input.products_file)
        .with_context(|| format!("Failed to load data from {:?}", config.input.data_dir))?;

    let summary = generate_report(&mut model, &config.report_options())
        .context("Report generation failed")?;

    println!("{}", summary.exploration);
    if !summary.charts.is_empty() {
        println!("\nCharts saved:");
        for path in &summary.charts {
            println!("  {}", path.display());
        }
    }
    println!("{}", summary.recommendations);

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
