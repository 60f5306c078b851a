//! qsv Command-Line Interface
//!
//! Runs quantum circuits on the local statevector simulator.
//!
//! ```text
//! qsv teleport --alpha 0.3 --beta 0.6 --shots 10000 --seed 7
//! qsv run -i circuit.json --format json
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{run, teleport, version};

/// qsv - statevector quantum-circuit simulator
#[derive(Parser)]
#[command(name = "qsv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Teleport a single-qubit state and check the received distribution
    Teleport {
        /// Amplitude of |0⟩ in the input state (normalized with --beta)
        #[arg(long, default_value = "0.3", allow_hyphen_values = true)]
        alpha: f64,

        /// Amplitude of |1⟩ in the input state
        #[arg(long, default_value = "0.6", allow_hyphen_values = true)]
        beta: f64,

        /// Number of shots
        #[arg(short, long, default_value = "1024")]
        shots: u64,

        /// Master RNG seed (overrides config and QSV_SEED)
        #[arg(long)]
        seed: Option<u64>,

        /// Simulator config file (YAML)
        #[arg(short, long, env = "QSV_CONFIG")]
        config: Option<String>,
    },

    /// Run a circuit from a JSON file
    Run {
        /// Input file (JSON)
        #[arg(short, long)]
        input: String,

        /// Number of shots
        #[arg(short, long, default_value = "1024")]
        shots: u64,

        /// Master RNG seed (overrides config and QSV_SEED)
        #[arg(long)]
        seed: Option<u64>,

        /// Simulator config file (YAML)
        #[arg(short, long, env = "QSV_CONFIG")]
        config: Option<String>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging: RUST_LOG wins when no -v is given
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Teleport {
            alpha,
            beta,
            shots,
            seed,
            config,
        } => teleport::execute(alpha, beta, shots, seed, config.as_deref()),

        Commands::Run {
            input,
            shots,
            seed,
            config,
            format,
        } => run::execute(&input, shots, seed, config.as_deref(), &format),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
