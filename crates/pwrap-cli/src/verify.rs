//! `--verify`: accept or reject the saved proof.

use anyhow::{bail, ensure, Context};
use pwrap_store::ArtifactStore;
use pwrap_zkp::ProofSystem;

use crate::Settings;

/// Verify `proof.json` and `public_witness.bin` against `vk.bin`.
/// A rejected proof is an error.
pub fn run<P: ProofSystem>(
    system: &P,
    settings: &Settings,
    store: &ArtifactStore,
) -> anyhow::Result<()> {
    let _span = tracing::info_span!("verify", backend = %P::BACKEND).entered();

    if settings.dummy {
        bail!("refusing to verify in dummy mode: a dummy setup has no verifying key");
    }
    ensure_verifying_key(store)?;

    let vk = store
        .load_verifying_key::<P>()
        .context("failed to load the verifying key")?;
    let proof = store.load_proof::<P>().context("failed to load the proof")?;
    let public = store
        .load_public_witness()
        .context("failed to load the public witness")?;

    let accepted = system
        .verify(&vk, &proof, &public)
        .with_context(|| format!("{} verification failed", P::BACKEND))?;
    ensure!(accepted, "proof rejected");
    tracing::info!(
        public_inputs = public.values.len(),
        "wrapper proof accepted; the inner plonky2 proof is bound, not verified"
    );
    Ok(())
}

/// Fail early with a hint when the keys on disk came from a dummy setup.
pub(crate) fn ensure_verifying_key(store: &ArtifactStore) -> anyhow::Result<()> {
    ensure!(
        store.has_verifying_key(),
        "no verifying key at {}: the keys were generated with --dummy true; \
         rerun --compile --dummy false",
        store.dir().verifying_key().display()
    );
    Ok(())
}
