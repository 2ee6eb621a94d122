//! `--prove`: witness → proof → disk, then a sanity re-verification
//! against the verifying key read back from disk.

use std::time::Instant;

use anyhow::{ensure, Context};
use pwrap_circuit::solve;
use pwrap_store::ArtifactStore;
use pwrap_zkp::ProofSystem;

use crate::verify::ensure_verifying_key;
use crate::{load_circuit, Settings};

/// Prove the circuit with the saved keys.
pub fn run<P: ProofSystem>(
    system: &P,
    settings: &Settings,
    store: &ArtifactStore,
) -> anyhow::Result<()> {
    let _span = tracing::info_span!(
        "prove",
        backend = %P::BACKEND,
        circuit = %settings.circuit.name()
    )
    .entered();

    let cs = store
        .load_constraint_system::<P>()
        .context("failed to load the compiled circuit (run --compile first)")?;
    let pk = store
        .load_proving_key::<P>()
        .context("failed to load the proving key")?;
    if !settings.dummy {
        ensure_verifying_key(store)?;
    }

    let circuit = load_circuit(&settings.circuit)?;
    let witness = solve(&cs, &circuit).context("failed to derive the witness")?;

    let started = Instant::now();
    let proof = system
        .prove(&cs, &pk, &witness)
        .with_context(|| format!("{} proving failed", P::BACKEND))?;
    tracing::info!(elapsed = ?started.elapsed(), "proof generated");

    let public = witness.public_witness();
    store
        .save_proof::<P>(&proof, &public)
        .context("failed to save the proof")?;

    if settings.dummy {
        return Ok(());
    }

    let vk = store
        .load_verifying_key::<P>()
        .context("failed to load the verifying key")?;
    let accepted = system
        .verify(&vk, &proof, &public)
        .context("failed to re-verify the fresh proof")?;
    ensure!(
        accepted,
        "consistency failure: fresh proof does not verify against {}",
        store.dir().verifying_key().display()
    );
    tracing::info!("fresh proof verifies");
    Ok(())
}
