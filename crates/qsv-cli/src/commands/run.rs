//! Run command implementation.

use std::time::Instant;

use anyhow::Result;
use console::style;

use super::common::{build_simulator, load_circuit, print_counts};

/// Execute the run command.
pub fn execute(
    input: &str,
    shots: u64,
    seed: Option<u64>,
    config: Option<&str>,
    format: &str,
) -> Result<()> {
    if !matches!(format, "table" | "json") {
        anyhow::bail!("Unknown output format: '{format}'. Available: table, json");
    }

    let circuit = load_circuit(input)?;
    let simulator = build_simulator(config, seed)?;

    let start = Instant::now();
    let counts = simulator.run(&circuit, shots)?;
    let elapsed = start.elapsed();

    match format {
        "json" => {
            let report = serde_json::json!({
                "circuit": circuit.name(),
                "num_qubits": circuit.num_qubits(),
                "num_clbits": circuit.num_clbits(),
                "shots": shots,
                "seed": simulator.config().seed,
                "execution_time_ms": elapsed.as_millis() as u64,
                "counts": counts,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!(
                "{} Running {} ({} shots)",
                style("→").cyan().bold(),
                style(input).green(),
                shots
            );
            println!(
                "  Loaded: {} qubits, {} classical bits, {} ops, {} measurements",
                circuit.num_qubits(),
                circuit.num_clbits(),
                circuit.num_ops(),
                circuit.num_measurements()
            );
            print_counts(&counts, elapsed);
        }
    }

    Ok(())
}
