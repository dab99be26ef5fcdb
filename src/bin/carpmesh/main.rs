//! carpmesh CLI - convert meshes into CARP simulator input files.
//!
//! Usage: carpmesh <COMMAND> [OPTIONS] <INPUT>
//!
//! Run `carpmesh --help` for available commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use env_logger::Env;

use carpmesh::config::{PurkinjeConfig, DEFAULT_CONFIG_FILE};
use carpmesh::error::{ConvertError, Result};
use carpmesh::io::{self, carp, output_path, pkje, Format};
use carpmesh::network::{
    reconstruct_with_progress, KeyMode, PurkinjeNetwork, ReconstructOptions,
    DEFAULT_SPLIT_FRACTION,
};
use carpmesh::progress::Progress;

#[derive(Parser)]
#[command(name = "carpmesh")]
#[command(author, version, about = "Convert meshes into CARP simulator files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write bulk tissue files (.pts and .elem)
    #[command(alias = "h")]
    Heart {
        /// Input mesh file
        input: PathBuf,

        /// Output base path (extension is replaced; default: input path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a Purkinje fibre network (.pkje)
    #[command(alias = "p")]
    Purkinje {
        /// Input mesh file
        input: PathBuf,

        /// Output base path (extension is replaced; default: input path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Cable parameter file, created with defaults if missing
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Match endpoints on a grid of this cell size instead of exactly
        #[arg(long)]
        cell: Option<f64>,

        /// Give up after this many splits (default: cable count + 1)
        #[arg(long)]
        max_repairs: Option<usize>,

        /// Position of split points along the parent's last edge
        #[arg(long, default_value_t = DEFAULT_SPLIT_FRACTION)]
        split_fraction: f64,
    },

    /// Display dataset information
    Info {
        /// Input mesh file
        input: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Heart { input, output } => {
            cmd_heart(&input, output.as_deref())?;
        }

        Commands::Purkinje {
            input,
            output,
            config,
            cell,
            max_repairs,
            split_fraction,
        } => {
            let mut options = ReconstructOptions::default().with_split_fraction(split_fraction);
            if let Some(cell) = cell {
                options = options.with_key_mode(KeyMode::quantized(cell)?);
            }
            if let Some(max) = max_repairs {
                options = options.with_max_repairs(max);
            }
            cmd_purkinje(&input, output.as_deref(), &config, &options)?;
        }

        Commands::Info { input } => {
            cmd_info(&input)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Only redraw when the bar moves forward.
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous {
            return;
        }
        let percent = raw_percent;

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if percent == 100 {
            eprintln!();
        }
    })
}

fn cmd_heart(input: &Path, output: Option<&Path>) -> Result<()> {
    let store = io::load(input)?;
    let base = output.unwrap_or(input);

    let start = Instant::now();
    let elem_path = output_path(base, Format::Elem);
    let written = carp::save_elements(&store, &elem_path)?;
    println!("Saved: {} ({} elements)", elem_path.display(), written);

    let pts_path = output_path(base, Format::Pts);
    match carp::save_points(&store, &pts_path) {
        Ok(()) => println!("Saved: {}", pts_path.display()),
        Err(ConvertError::EmptyDataset(name)) => {
            log::warn!("dataset '{}' is empty, {} not written", name, pts_path.display());
            eprintln!("Warning: no points, {} not written", pts_path.display());
        }
        Err(e) => return Err(e),
    }
    println!("Done ({:.2?})", start.elapsed());

    Ok(())
}

fn cmd_purkinje(
    input: &Path,
    output: Option<&Path>,
    config_path: &Path,
    options: &ReconstructOptions,
) -> Result<()> {
    let store = io::load(input)?;
    let config = PurkinjeConfig::load_or_create(config_path)?;

    let progress = create_progress();
    let start = Instant::now();
    let (network, report) = reconstruct_with_progress(&store, options, &progress)?;
    let elapsed = start.elapsed();

    println!(
        "Repaired: {} splits, {} points and {} cables added ({:.2?})",
        report.repairs, report.points_added, report.cables_added, elapsed
    );
    if !report.parent_overflows.is_empty() {
        println!(
            "Warning: {} junctions have more than two parents",
            report.parent_overflows.len()
        );
    }

    let path = output_path(output.unwrap_or(input), Format::Pkje);
    pkje::save(&network, &config, &path)?;
    println!("Saved: {} ({} cables)", path.display(), network.num_cables());

    Ok(())
}

fn cmd_info(input: &Path) -> Result<()> {
    let store = io::load(input)?;

    println!("File: {}", input.display());
    println!("Datasets: {}", store.len());
    for dataset in store.iter() {
        let width = dataset.rows().map(<[f64]>::len).max().unwrap_or(0);
        println!(
            "  {:<24} {:>4} x {:<3} {}",
            dataset.name(),
            dataset.scalar_type().name(),
            width,
            dataset.count()
        );
    }

    match PurkinjeNetwork::from_store(&store, KeyMode::Exact) {
        Ok(network) => {
            println!("Fibre network: {} cables", network.num_cables());
            println!(
                "  Junctions with more than two sons: {}",
                network.son_overflow_count()
            );
            println!(
                "  Junctions with more than two parents: {}",
                network.parent_overflows()?.len()
            );
        }
        Err(e) => println!("Not a fibre network: {}", e),
    }

    Ok(())
}
