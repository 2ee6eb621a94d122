//! `--compile`: verifier circuit → constraint system → keys → disk.
//!
//! Nothing is written until both compilation and setup have succeeded.

use std::time::Instant;

use anyhow::Context;
use pwrap_circuit::{compile, ConstraintSystem};
use pwrap_store::ArtifactStore;
use pwrap_zkp::ProofSystem;

use crate::{load_circuit, Settings};

/// Compile, run setup, save, and optionally export the contract.
pub fn run<P: ProofSystem>(
    system: &P,
    settings: &Settings,
    store: &ArtifactStore,
) -> anyhow::Result<()> {
    let _span = tracing::info_span!(
        "compile",
        backend = %P::BACKEND,
        circuit = %settings.circuit.name()
    )
    .entered();

    let circuit = load_circuit(&settings.circuit)?;
    let cs: P::ConstraintSystem =
        compile(&circuit).context("failed to compile the verifier circuit")?;
    tracing::warn!(
        constraints = cs.num_constraints(),
        "verifier circuit binds the inner proof and checks its encoding; \
         plonky2 FRI and gate checks are not enforced"
    );

    let started = Instant::now();
    let keys = system
        .setup(&cs, &settings.setup_mode())
        .with_context(|| format!("{} setup failed", P::BACKEND))?;
    tracing::info!(dummy = settings.dummy, elapsed = ?started.elapsed(), "setup complete");

    store
        .save_setup(&cs, &keys)
        .context("failed to save setup artifacts")?;

    if settings.contract {
        match &keys.vk {
            Some(vk) => store
                .export_contract::<P>(vk)
                .context("failed to export Solidity verifier")?,
            None => tracing::info!("no verifying key; Verifier.sol not written"),
        }
    }
    Ok(())
}
