//! Teleport command implementation.
//!
//! Prepares `alpha|0⟩ + beta|1⟩` on q0, teleports it onto q2 through a Bell
//! pair with classically conditioned corrections, and compares the measured
//! distribution of c2 with the input.

use std::time::Instant;

use anyhow::{Context, Result};
use console::style;

use qsv_ir::{Circuit, ClbitId, InitialState, QubitId};

use super::common::{build_simulator, print_counts};

/// Execute the teleport command.
pub fn execute(
    alpha: f64,
    beta: f64,
    shots: u64,
    seed: Option<u64>,
    config: Option<&str>,
) -> Result<()> {
    let input = InitialState::from_real([alpha, beta], [QubitId(0)])
        .context("Invalid input state")?;
    let norm = alpha.hypot(beta);
    let (p0, p1) = ((alpha / norm).powi(2), (beta / norm).powi(2));

    println!(
        "{} Teleporting {:.4}|0⟩ + {:.4}|1⟩ ({} shots)",
        style("→").cyan().bold(),
        alpha / norm,
        beta / norm,
        shots
    );

    let circuit = Circuit::teleportation(input.clone())?;
    let simulator = build_simulator(config, seed)?;

    let start = Instant::now();
    let counts = simulator.run(&circuit, shots)?;
    let elapsed = start.elapsed();
    print_counts(&counts, elapsed);

    // c2 holds the teleported qubit
    let c2 = counts.marginal(ClbitId(2));
    let total = c2.total_shots().max(1) as f64;
    println!("\n{} Teleported qubit (c2):", style("✓").green().bold());
    println!(
        "  P(0): measured {:.4}, expected {:.4}",
        c2.get("0") as f64 / total,
        p0
    );
    println!(
        "  P(1): measured {:.4}, expected {:.4}",
        c2.get("1") as f64 / total,
        p1
    );

    // Bloch vector of q2 just before readout
    let unmeasured = Circuit::teleportation_unmeasured(input)?;
    let (state, clbits) = simulator.final_state(&unmeasured)?;
    let [x, y, z] = state.bloch_vector(QubitId(2))?;
    println!(
        "\n{} Bloch vector of q2 (c1 = {}, c0 = {}):",
        style("✓").green().bold(),
        u8::from(clbits.get(ClbitId(1))?),
        u8::from(clbits.get(ClbitId(0))?)
    );
    println!(
        "  ({}, {}, {})",
        style(format!("{x:+.4}")).cyan(),
        style(format!("{y:+.4}")).cyan(),
        style(format!("{z:+.4}")).cyan()
    );

    Ok(())
}
