use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use jiff::Timestamp;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use vigil_cli::commands::{
    load_registry, read_json, read_json_or_text, run_evaluate, run_facts, run_gate, run_preprocess,
    run_validate,
};
use vigil_cli::config::load_config;
use vigil_cli::render::render_validation;
use vigil_instruments::registry::{InstrumentRegistry, standard_registry};

/// Questionnaire facts, narrative evaluation, and release gating.
#[derive(Parser)]
#[command(name = "vigil", version, about)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv). Without it RUST_LOG applies.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Config file. Defaults to the platform config dir.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Instrument registry JSON replacing the built-in one.
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score raw item rows into measurement records.
    Preprocess { rows: PathBuf },
    /// Check measurement records before fact extraction.
    Validate {
        records: PathBuf,
        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Extract per-domain facts from measurement records.
    Facts { records: PathBuf },
    /// Score a narrative against facts.
    Evaluate {
        #[arg(long)]
        facts: PathBuf,
        #[arg(long)]
        narrative: PathBuf,
    },
    /// Evaluate, decide, and apply the retry policy.
    Gate {
        #[arg(long)]
        facts: PathBuf,
        #[arg(long)]
        narrative: PathBuf,
        #[arg(long)]
        judgment: Option<PathBuf>,
        /// Regenerations already issued for this case.
        #[arg(long, default_value_t = 0)]
        attempt: u32,
    },
}

fn init_tracing(verbose: u8, json: bool) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let run_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("run", %run_id);
    let _entered = span.enter();

    let config = load_config(cli.config.as_deref())?;
    let gate_config = config.gate.clone().from_env()?;

    let loaded: InstrumentRegistry;
    let registry = match cli.registry.as_deref().or(config.registry.as_deref()) {
        Some(path) => {
            loaded = load_registry(path)?;
            &loaded
        }
        None => standard_registry(),
    };

    match cli.command {
        Command::Preprocess { rows } => print_json(&run_preprocess(read_json(&rows)?)?),
        Command::Validate { records, json } => {
            let report = run_validate(read_json(&records)?)?;
            if json {
                print_json(&report)
            } else {
                print!("{}", render_validation(&report)?);
                Ok(())
            }
        }
        Command::Facts { records } => {
            print_json(&run_facts(read_json(&records)?, registry, Timestamp::now())?)
        }
        Command::Evaluate { facts, narrative } => print_json(&run_evaluate(
            &read_json(&facts)?,
            &read_json_or_text(&narrative)?,
            registry,
        )?),
        Command::Gate {
            facts,
            narrative,
            judgment,
            attempt,
        } => {
            let judgment = judgment.as_deref().map(read_json_or_text).transpose()?;
            let run = run_gate(
                &read_json(&facts)?,
                &read_json_or_text(&narrative)?,
                judgment.as_ref(),
                attempt,
                &gate_config,
                registry,
                Timestamp::now(),
            )?;
            tracing::info!(decision = ?run.decision.decision, action = ?run.decision.action, "gate run complete");
            print_json(&run)
        }
    }
}
