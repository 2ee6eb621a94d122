//! # pwrap-zkp — Proving Backends
//!
//! Turns a compiled constraint system into keys, proofs, and a Solidity
//! verifier, for either of the two supported backends.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): the sealed [`ProofSystem`] trait with
//!   `setup`, `prove`, and `verify`. The CLI dispatches on [`Backend`] once
//!   and is generic from then on.
//!
//! - **Groth16** (`groth16.rs`): `ark-groth16` on BN254 over an [`R1cs`].
//!
//! - **PLONK** (`plonk.rs`): `halo2_proofs` with KZG and SHPLONK over a
//!   [`SparseR1cs`].
//!
//! - **SRS** (`srs.rs`): the KZG reference string, cached next to the
//!   circuit and downloaded on first use.
//!
//! - **Raw** (`raw.rs`): [`WriteRaw`] / [`ReadRaw`], the binary encoding of
//!   keys, constraint systems, and public witnesses.
//!
//! - **Solidity** (`solidity.rs`): [`SolidityExport`] for both verifying
//!   key types.
//!
//! ## Setup Modes
//!
//! [`SetupMode::Dummy`] produces proving keys from a public seed and no
//! verifying key. It exists for measuring prover cost and MUST NOT be used
//! where soundness matters.
//!
//! [`Backend`]: pwrap_core::Backend
//! [`R1cs`]: pwrap_circuit::R1cs
//! [`SparseR1cs`]: pwrap_circuit::SparseR1cs

pub mod groth16;
pub mod plonk;
pub mod raw;
pub mod solidity;
pub mod srs;
pub mod traits;

#[cfg(test)]
mod testing;

pub use groth16::{Groth16Proof, Groth16ProofSystem};
pub use plonk::{PlonkProof, PlonkProofSystem, PlonkProvingKey, PlonkVerifyingKey};
pub use raw::{RawError, ReadRaw, WriteRaw};
pub use solidity::SolidityExport;
pub use srs::{SrsError, SrsSource, DEFAULT_SRS_URL};
pub use traits::{KeyPair, ProofError, ProofSystem, SetupError, SetupMode, VerifyError};
