//! # pwrap-circuit — Verifier Circuit over BN254
//!
//! Defines the circuit that wraps a plonky2 proof, and the machinery to turn
//! it into a constraint system either proving backend can consume.
//!
//! ## Architecture
//!
//! - **Front end** (`frontend.rs`): the [`Api`] trait a circuit is written
//!   against, and the [`Circuit`] trait. A circuit is defined once.
//!
//! - **Builders** (`sparse.rs`, `r1cs.rs`): two [`Api`] implementations.
//!   [`SparseBuilder`] emits PLONK gates
//!   `qL·a + qR·b + qO·c + qM·a·b + qC = 0`; [`R1csBuilder`] emits rank-1
//!   constraints `⟨A,z⟩·⟨B,z⟩ = ⟨C,z⟩`. Both track concrete values, so one
//!   pass yields the constraint system and a full witness.
//!
//! - **Witness** (`witness.rs`): [`compile`] and [`solve`]. Solving re-runs
//!   the definition and checks the result against a previously persisted
//!   constraint system.
//!
//! - **Gadgets** (`gadgets.rs`): bit decomposition and Goldilocks
//!   canonicity.
//!
//! - **Verifier** (`verifier.rs`, `variables.rs`): the plonky2 verifier
//!   circuit and the [`VerifierChip`] seam it delegates to.
//!
//! ## Field
//!
//! Everything is over the BN254 scalar field, [`ark_bn254::Fr`].

pub mod error;
pub mod field;
pub mod frontend;
pub mod gadgets;
pub mod r1cs;
pub mod sparse;
pub mod variables;
pub mod verifier;
pub mod witness;

pub use error::CircuitError;
pub use frontend::{Api, Circuit, Fr};
pub use r1cs::{R1cs, R1csBuilder};
pub use sparse::{SparseBuilder, SparseR1cs};
pub use verifier::{Plonky2VerifierChip, Plonky2VerifierCircuit, VerifierChip};
pub use witness::{compile, solve, ConstraintSystem, PublicWitness, Witness};
