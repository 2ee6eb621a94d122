//! # Proof System Trait
//!
//! Defines the interface both proving backends satisfy. The CLI matches on
//! [`Backend`] once and runs a pipeline generic over [`ProofSystem`], so the
//! two backends are interchangeable at compile time.
//!
//! ## Security Invariant
//!
//! A dummy setup never yields a verifying key: [`KeyPair::vk`] is `None`
//! and nothing downstream can verify against it.
//!
//! The trait is sealed; only the backends in this crate implement it.

use std::path::PathBuf;

use pwrap_circuit::{CircuitError, ConstraintSystem, PublicWitness, Witness};
use pwrap_core::Backend;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::raw::{ReadRaw, WriteRaw};
use crate::solidity::SolidityExport;
use crate::srs::{SrsError, SrsSource};

/// Error during key generation.
#[derive(Error, Debug)]
pub enum SetupError {
    /// The structured reference string could not be obtained.
    #[error(transparent)]
    Srs(#[from] SrsError),
    /// Groth16 parameter generation failed.
    #[error("groth16 setup failed: {0}")]
    Synthesis(#[from] ark_relations::r1cs::SynthesisError),
    /// PLONK key generation failed.
    #[error("plonk key generation failed: {0}")]
    Keygen(#[from] halo2_proofs::plonk::Error),
    /// A selector does not map into the backend's scalar field.
    #[error("field conversion failed: {0}")]
    Conversion(String),
}

/// Error during proof generation.
#[derive(Error, Debug)]
pub enum ProofError {
    /// The witness does not fit the constraint system.
    #[error(transparent)]
    Circuit(#[from] CircuitError),
    /// The proving key was generated for a different circuit.
    #[error("key mismatch: proving key expects {expected} public inputs, found {found}")]
    KeyMismatch {
        /// Inputs the key was generated for.
        expected: usize,
        /// Inputs in the constraint system.
        found: usize,
    },
    /// The proving key was generated for a different domain size.
    #[error("key mismatch: proving key has domain 2^{key}, circuit needs 2^{circuit}")]
    DomainMismatch {
        /// Domain exponent of the key.
        key: u32,
        /// Domain exponent of the circuit.
        circuit: u32,
    },
    /// The assignment violates a constraint once replayed into arkworks.
    #[error("witness does not satisfy constraint {constraint} of the groth16 system")]
    Unsatisfied {
        /// Index of the first failing constraint as arkworks reports it.
        constraint: String,
    },
    /// The Groth16 prover rejected the assignment.
    #[error("groth16 prover failed: {0}")]
    Synthesis(#[from] ark_relations::r1cs::SynthesisError),
    /// The PLONK prover failed.
    #[error("plonk prover failed: {0}")]
    Prover(#[from] halo2_proofs::plonk::Error),
    /// A witness value does not map into the backend's scalar field.
    #[error("field conversion failed: {0}")]
    Conversion(String),
}

/// Error during proof verification. A proof that is well-formed but wrong
/// is not an error; it verifies to `false`.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The public witness length does not match the verifying key.
    #[error("key mismatch: verifying key expects {expected} public inputs, found {found}")]
    KeyMismatch {
        /// Inputs the key was generated for.
        expected: usize,
        /// Inputs supplied.
        found: usize,
    },
    /// The Groth16 verifier could not process its inputs.
    #[error("groth16 verifier failed: {0}")]
    Synthesis(#[from] ark_relations::r1cs::SynthesisError),
    /// A public value does not map into the backend's scalar field.
    #[error("field conversion failed: {0}")]
    Conversion(String),
}

/// How proving and verifying keys are generated.
#[derive(Debug, Clone)]
pub enum SetupMode {
    /// Fast, insecure keys from a fixed seed. No verifying key is produced.
    Dummy,
    /// Real keys; PLONK draws its reference string from the given source.
    Trusted(SrsSource),
}

impl SetupMode {
    /// Whether this is the insecure dummy mode.
    pub fn is_dummy(&self) -> bool {
        matches!(self, Self::Dummy)
    }

    /// Trusted setup with the SRS cached at `cache`.
    pub fn trusted(cache: impl Into<PathBuf>) -> Self {
        Self::Trusted(SrsSource::new(cache))
    }
}

/// Keys produced by [`ProofSystem::setup`].
pub struct KeyPair<P: ProofSystem + ?Sized> {
    /// Proving key.
    pub pk: P::ProvingKey,
    /// Verifying key, absent after a dummy setup.
    pub vk: Option<P::VerifyingKey>,
}

mod private {
    pub trait Sealed {}
    impl Sealed for crate::Groth16ProofSystem {}
    impl Sealed for crate::PlonkProofSystem {}
}

/// A proving backend over BN254.
pub trait ProofSystem: private::Sealed + Send + Sync {
    /// Which backend this is.
    const BACKEND: Backend;

    /// Compiled constraint system consumed by the backend.
    type ConstraintSystem: ConstraintSystem + Send + Sync;
    /// Proving key.
    type ProvingKey: WriteRaw + ReadRaw + Send + Sync;
    /// Verifying key.
    type VerifyingKey: WriteRaw + ReadRaw + SolidityExport + Send + Sync;
    /// Proof, persisted as JSON.
    type Proof: Serialize + DeserializeOwned + Send + Sync;

    /// Generate keys for `cs`.
    fn setup(
        &self,
        cs: &Self::ConstraintSystem,
        mode: &SetupMode,
    ) -> Result<KeyPair<Self>, SetupError>;

    /// Prove that `witness` satisfies `cs`.
    fn prove(
        &self,
        cs: &Self::ConstraintSystem,
        pk: &Self::ProvingKey,
        witness: &Witness,
    ) -> Result<Self::Proof, ProofError>;

    /// Verify a proof against its public witness.
    fn verify(
        &self,
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public: &PublicWitness,
    ) -> Result<bool, VerifyError>;
}

/// Check that `witness` has the shape of `cs`.
pub(crate) fn check_shape<CS: ConstraintSystem>(
    cs: &CS,
    witness: &Witness,
) -> Result<(), CircuitError> {
    let shapes = [
        ("public inputs", cs.num_public(), witness.public.len()),
        ("private wires", cs.num_private(), witness.private.len()),
    ];
    for (what, expected, found) in shapes {
        if expected != found {
            return Err(CircuitError::ShapeMismatch {
                what,
                expected,
                found,
            });
        }
    }
    Ok(())
}

/// Check that `witness` has the shape of `cs` and satisfies it.
pub(crate) fn check_witness<CS: ConstraintSystem>(
    cs: &CS,
    witness: &Witness,
) -> Result<(), CircuitError> {
    check_shape(cs, witness)?;
    cs.check(witness)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_mode_is_flagged() {
        assert!(SetupMode::Dummy.is_dummy());
        assert!(!SetupMode::trusted("/tmp/srs").is_dummy());
    }

    #[test]
    fn verify_error_names_both_counts() {
        let err = VerifyError::KeyMismatch {
            expected: 4,
            found: 3,
        };
        assert_eq!(
            err.to_string(),
            "key mismatch: verifying key expects 4 public inputs, found 3"
        );
    }
}
