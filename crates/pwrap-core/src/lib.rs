#![deny(missing_docs)]

//! # pwrap-core — Foundational Types for the plonky2 Wrapper
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies and knows nothing about BN254,
//! constraint systems, or proving backends.
//!
//! ## Design Principles
//!
//! 1. **Canonical Goldilocks elements.** [`GoldilocksField`] can only hold a
//!    value below `2^64 - 2^32 + 1`. Descriptors that carry anything else are
//!    rejected at parse time.
//!
//! 2. **Descriptors are validated once.** [`CircuitDescriptor::load`] reads
//!    the three plonky2 JSON files and checks every length in the inner proof
//!    against the common circuit data before anything downstream sees it.
//!
//! 3. **Single [`Backend`] enum.** Backend selection is parsed once at the CLI
//!    boundary and carried as a closed variant afterwards.
//!
//! 4. **Fixed layout.** Every file name the toolchain reads or writes lives in
//!    [`layout`].

pub mod backend;
pub mod descriptor;
pub mod error;
pub mod goldilocks;
pub mod layout;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use backend::Backend;
pub use descriptor::{
    CircuitDescriptor, CommonCircuitData, HashKind, HashOut, MerkleCap, Proof,
    ProofWithPublicInputs, VerifierOnlyCircuitData,
};
pub use error::DescriptorError;
pub use goldilocks::{ExtensionElement, GoldilocksField};
pub use layout::{CircuitDir, DataDir};
