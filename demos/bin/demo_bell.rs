//! Bell-state demo: build a circuit, lower it to HAL words, round-trip the
//! binary form, execute 1000 shots and print the histogram.
//!
//! Run with: cargo run -p alsvid-demos --bin demo-bell

use alsvid_compile::lower;
use alsvid_engine::{Engine, EngineConfig};
use alsvid_ir::Circuit;
use alsvid_isa::Program;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let circuit = Circuit::bell()?;
    info!(qubits = circuit.num_qubits(), "built Bell circuit");

    let program = lower(&circuit)?;
    println!("Lowered program ({} words):", program.len());
    print!("{program}");

    // The binary form is what would cross the wire to real hardware.
    let bytes = program.to_bytes();
    info!(bytes = bytes.len(), "serialized program");
    let program = Program::from_bytes(&bytes)?;

    let shots = 1000;
    let mut engine = Engine::from_config(EngineConfig::new(2).with_seed(2024))?;
    let counts = engine.sample(&program, shots)?;

    let mut histogram: Vec<_> = counts.iter().collect();
    histogram.sort();
    println!("\nResults over {shots} shots:");
    for (bitstring, count) in histogram {
        println!("  |{bitstring}⟩  {count}");
    }
    println!("\nAs JSON: {}", serde_json::to_string(&counts)?);

    Ok(())
}
