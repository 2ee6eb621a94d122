//! # On-Disk Layout
//!
//! File names read from the circuit directory and written to the data
//! directory. The data directory is always split per backend, so a
//! `plonk` and a `groth16` run never overwrite each other.

use std::path::{Path, PathBuf};

use crate::backend::Backend;

// ---------------------------------------------------------------------------
// Circuit directory (inputs)
// ---------------------------------------------------------------------------

/// Verifier-only data of the inner plonky2 circuit.
pub const VERIFIER_ONLY_CIRCUIT_DATA: &str = "verifier_only_circuit_data.json";
/// Inner plonky2 proof together with its public inputs.
pub const PROOF_WITH_PUBLIC_INPUTS: &str = "proof_with_public_inputs.json";
/// Common circuit data of the inner plonky2 circuit.
pub const COMMON_CIRCUIT_DATA: &str = "common_circuit_data.json";
/// Cached structured reference string for the PLONK backend.
pub const SRS_FILE: &str = "srs_setup";

// ---------------------------------------------------------------------------
// Data directory (outputs)
// ---------------------------------------------------------------------------

/// Serialized constraint system.
pub const CONSTRAINT_SYSTEM_FILE: &str = "r1cs.bin";
/// Serialized proving key.
pub const PROVING_KEY_FILE: &str = "pk.bin";
/// Serialized verifying key. Never written in dummy mode.
pub const VERIFYING_KEY_FILE: &str = "vk.bin";
/// JSON-encoded proof.
pub const PROOF_FILE: &str = "proof.json";
/// Serialized public witness.
pub const PUBLIC_WITNESS_FILE: &str = "public_witness.bin";
/// Generated Solidity verifier.
pub const CONTRACT_FILE: &str = "Verifier.sol";

/// Directory holding the plonky2 descriptor files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitDir {
    root: PathBuf,
}

impl CircuitDir {
    /// Wrap a circuit directory path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Last path component, used as the circuit's name in logs.
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string())
    }

    /// Path of `verifier_only_circuit_data.json`.
    pub fn verifier_only_circuit_data(&self) -> PathBuf {
        self.root.join(VERIFIER_ONLY_CIRCUIT_DATA)
    }

    /// Path of `proof_with_public_inputs.json`.
    pub fn proof_with_public_inputs(&self) -> PathBuf {
        self.root.join(PROOF_WITH_PUBLIC_INPUTS)
    }

    /// Path of `common_circuit_data.json`.
    pub fn common_circuit_data(&self) -> PathBuf {
        self.root.join(COMMON_CIRCUIT_DATA)
    }

    /// Path of the cached SRS.
    pub fn srs(&self) -> PathBuf {
        self.root.join(SRS_FILE)
    }
}

/// Backend-specific output directory (`<data>/plonk` or `<data>/groth16`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
    backend: Backend,
}

impl DataDir {
    /// Resolve the backend subdirectory under `base`.
    pub fn new(base: impl AsRef<Path>, backend: Backend) -> Self {
        Self {
            root: base.as_ref().join(backend.as_str()),
            backend,
        }
    }

    /// The backend subdirectory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Backend this directory belongs to.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Path of `r1cs.bin`.
    pub fn constraint_system(&self) -> PathBuf {
        self.root.join(CONSTRAINT_SYSTEM_FILE)
    }

    /// Path of `pk.bin`.
    pub fn proving_key(&self) -> PathBuf {
        self.root.join(PROVING_KEY_FILE)
    }

    /// Path of `vk.bin`.
    pub fn verifying_key(&self) -> PathBuf {
        self.root.join(VERIFYING_KEY_FILE)
    }

    /// Path of `proof.json`.
    pub fn proof(&self) -> PathBuf {
        self.root.join(PROOF_FILE)
    }

    /// Path of `public_witness.bin`.
    pub fn public_witness(&self) -> PathBuf {
        self.root.join(PUBLIC_WITNESS_FILE)
    }

    /// Path of `Verifier.sol`.
    pub fn contract(&self) -> PathBuf {
        self.root.join(CONTRACT_FILE)
    }
}
