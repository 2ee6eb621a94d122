//! # Circuit Front End
//!
//! A circuit is written once against [`Api`] and compiled by whichever
//! builder the backend needs. Every allocation carries its concrete value,
//! so the same definition serves both compilation and witness solving.
//!
//! Assertions never fail at definition time. A violated assertion produces
//! an unsatisfied constraint, which [`crate::witness::solve`] reports.

use std::fmt::Debug;

use crate::error::CircuitError;

/// The BN254 scalar field every circuit is defined over.
pub use ark_bn254::Fr;

/// Constraint-building interface.
pub trait Api {
    /// Handle to a value inside the circuit.
    type Var: Clone + Debug;

    /// Allocate a public input.
    fn public_input(&mut self, value: Fr) -> Self::Var;

    /// Allocate a private input or intermediate hint.
    fn secret_input(&mut self, value: Fr) -> Self::Var;

    /// A constant. Free in both builders.
    fn constant(&mut self, value: Fr) -> Self::Var;

    /// `a + b`.
    fn add(&mut self, a: &Self::Var, b: &Self::Var) -> Self::Var;

    /// `a * c` for a constant `c`.
    fn mul_const(&mut self, a: &Self::Var, c: Fr) -> Self::Var;

    /// `a * b`.
    fn mul(&mut self, a: &Self::Var, b: &Self::Var) -> Self::Var;

    /// Constrain `a == b`.
    fn assert_is_equal(&mut self, a: &Self::Var, b: &Self::Var);

    /// Constrain `a ∈ {0, 1}`.
    fn assert_is_boolean(&mut self, a: &Self::Var);

    /// Concrete value of `a`.
    fn value(&self, a: &Self::Var) -> Fr;

    /// `a - b`.
    fn sub(&mut self, a: &Self::Var, b: &Self::Var) -> Self::Var {
        let neg_b = self.mul_const(b, -Fr::from(1u64));
        self.add(a, &neg_b)
    }
}

/// A circuit definition.
pub trait Circuit {
    /// Emit the circuit's allocations and constraints.
    fn define<A: Api>(&self, api: &mut A) -> Result<(), CircuitError>;
}
