//! Command-line driver: evaluates a ribbon description and writes the curve buffer
//! as JSON for the renderer.

use anyhow::{Context, Result};
use clap::Parser;
use lsystem_ribbon::Ribbon;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Evaluate an L-System ribbon description")]
struct Args {
    /// Path to the JSON grammar description
    description: PathBuf,
    /// Override the description's generation count (expansion is exponential)
    #[arg(long)]
    generations: Option<u32>,
    /// Override the seed used for stochastic rules
    #[arg(long)]
    seed: Option<u64>,
    /// Override the uniform curve width
    #[arg(long)]
    width: Option<f32>,
    /// Write the curve buffer here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Print the expanded command string instead of evaluating curves
    #[arg(long)]
    print_commands: bool,
}

/// `RUST_LOG` directives as given, or `info` when unset or unparsable.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_writer(std::io::stderr)
        .init();

    let mut ribbon = Ribbon::load(&args.description)
        .with_context(|| format!("loading {}", args.description.display()))?;
    if let Some(generations) = args.generations {
        ribbon = ribbon.with_generations(generations);
    }
    if let Some(seed) = args.seed {
        ribbon = ribbon.with_seed(seed);
    }
    if let Some(width) = args.width {
        ribbon = ribbon.with_width(width);
    }

    let payload = if args.print_commands {
        ribbon.command_string()?
    } else {
        let buffer = ribbon.evaluate().context("evaluating ribbon")?;
        serde_json::to_string(&buffer)?
    };

    match &args.output {
        Some(path) => std::fs::write(path, payload)
            .with_context(|| format!("writing {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{payload}")?;
        }
    }

    tracing::info!("done");
    Ok(())
}
