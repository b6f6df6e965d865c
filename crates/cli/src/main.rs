//! MESI coherence simulator CLI.
//!
//! This binary drives the `mesi-core` cache hierarchy. It performs:
//! 1. **Demo:** Replay the built-in two-core scenarios and check their results.
//! 2. **Trace run:** Replay a trace file against a configured hierarchy and report
//!    every read plus the coherence statistics, as text or JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use mesi_core::config::Config;
use mesi_core::sim::{RunReport, Scenario, Simulator, Trace, scenarios};
use mesi_core::stats::CoherenceStats;

#[derive(Parser, Debug)]
#[command(
    name = "mesi-sim",
    author,
    version,
    about = "MESI cache coherence simulator",
    long_about = "Replay memory access traces against per-core L1 caches kept coherent by an L2 directory.\n\nTrace lines are `<core> R <addr>` or `<core> W <addr> <value>`; `#` starts a comment.\n\nExamples:\n  mesi-sim demo\n  mesi-sim run --trace accesses.trace --cores 4\n  mesi-sim run --trace accesses.trace --config mesi.json --json"
)]
struct Cli {
    /// Log directory decisions (equivalent to RUST_LOG=debug).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the built-in two-core scenarios.
    Demo {
        /// Run only the named scenario.
        #[arg(short, long)]
        name: Option<String>,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Replay a trace file.
    Run {
        /// Trace file to replay.
        #[arg(short, long)]
        trace: PathBuf,

        /// JSON configuration file (defaults apply to missing fields).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the configured core count.
        #[arg(long)]
        cores: Option<usize>,

        /// Statistics sections to print (access, directory, traffic); all if omitted.
        #[arg(long, value_delimiter = ',')]
        stats: Vec<String>,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// JSON shape of one replayed trace.
#[derive(Debug, Serialize)]
struct RunOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    scenario: Option<&'a str>,
    #[serde(flatten)]
    report: &'a RunReport,
    stats: &'a CoherenceStats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Demo { name, json } => cmd_demo(name.as_deref(), json),
        Commands::Run {
            trace,
            config,
            cores,
            stats,
            json,
        } => cmd_run(&trace, config.as_deref(), cores, &stats, json),
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `--verbose` when set.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

/// Runs the built-in scenarios on fresh default hierarchies.
///
/// Fails if a scenario's reads differ from the expected values.
fn cmd_demo(name: Option<&str>, json: bool) -> Result<()> {
    let selected: Vec<Scenario> = match name {
        Some(name) => vec![
            scenarios::find(name).with_context(|| format!("no built-in scenario `{name}`"))?,
        ],
        None => scenarios::builtin(),
    };

    let config = Config::default();
    let mut outputs = Vec::with_capacity(selected.len());
    for scenario in &selected {
        let mut sim = Simulator::new(&config)?;
        let report = sim
            .run(&scenario.trace)
            .with_context(|| format!("scenario `{}`", scenario.name))?;
        if report.values() != scenario.expected {
            bail!(
                "scenario `{}` read {:?}, expected {:?}",
                scenario.name,
                report.values(),
                scenario.expected
            );
        }
        if !json {
            println!("[*] {}: {}", scenario.name, scenario.summary);
            for access in scenario.trace.accesses() {
                println!("    {access}");
            }
            println!(
                "    reads {:?}  memory loads {}  cache-to-cache {}",
                report.values(),
                sim.stats().memory_loads,
                sim.stats().cache_to_cache_transfers
            );
        }
        outputs.push((scenario.name, report, sim.stats().clone()));
    }

    if json {
        let rendered: Vec<RunOutput<'_>> = outputs
            .iter()
            .map(|(name, report, stats)| RunOutput {
                scenario: Some(*name),
                report,
                stats,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        println!("\n{} scenario(s) passed", outputs.len());
    }
    Ok(())
}

/// Replays a trace file and prints its reads and statistics.
fn cmd_run(
    trace_path: &Path,
    config_path: Option<&Path>,
    cores: Option<usize>,
    sections: &[String],
    json: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            Config::from_json(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(cores) = cores {
        config.cores = cores;
    }

    let text = fs::read_to_string(trace_path)
        .with_context(|| format!("reading trace {}", trace_path.display()))?;
    let trace = Trace::parse(&text).with_context(|| format!("parsing {}", trace_path.display()))?;
    if let Some(max) = trace.max_core()
        && max.index() >= config.cores
    {
        bail!(
            "trace uses core {} but only {} core(s) are configured",
            max.index(),
            config.cores
        );
    }
    info!(trace = %trace_path.display(), accesses = trace.len(), "loaded trace");

    let mut sim = Simulator::new(&config)?;
    let report = sim.run(&trace)?;

    if json {
        let output = RunOutput {
            scenario: None,
            report: &report,
            stats: sim.stats(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for read in &report.reads {
        println!(
            "#{:<6} core {} read {} = {}",
            read.index,
            read.core.index(),
            read.addr,
            read.value
        );
    }
    println!("\n[*] {} access(es) replayed", report.executed);
    sim.stats().print_sections(sections);
    Ok(())
}
