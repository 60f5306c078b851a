//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;

use qsv_ir::Circuit;
use qsv_sim::{Counts, SimConfig, Simulator};

/// Load and validate a circuit from a JSON file.
pub fn load_circuit(path: &str) -> Result<Circuit> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;

    let ext = path_obj.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !ext.is_empty() && !ext.eq_ignore_ascii_case("json") {
        anyhow::bail!("Unsupported circuit format '.{ext}': expected a JSON file");
    }

    let circuit: Circuit =
        serde_json::from_str(&source).with_context(|| format!("Failed to parse circuit: {path}"))?;
    circuit
        .validate()
        .with_context(|| format!("Invalid circuit: {path}"))?;
    Ok(circuit)
}

/// Build a simulator from an optional config file, environment overrides, and
/// an optional seed from the command line.
pub fn build_simulator(config_file: Option<&str>, seed: Option<u64>) -> Result<Simulator> {
    let mut config = SimConfig::load(config_file).context("Failed to load simulator config")?;
    if seed.is_some() {
        config.seed = seed;
    }
    tracing::debug!(?config, "Simulator config");
    Ok(Simulator::new(config))
}

/// Print counts in a table format.
pub fn print_counts(counts: &Counts, elapsed: Duration) {
    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        counts.total_shots()
    );

    let sorted = counts.sorted();
    let total = counts.total_shots() as f64;

    for (bitstring, count) in sorted.iter().take(16) {
        let prob = **count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }

    println!(
        "\n  Execution time: {} ms",
        style(elapsed.as_millis()).yellow()
    );
}
