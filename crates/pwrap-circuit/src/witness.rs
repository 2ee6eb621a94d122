//! # Compilation and Witness Solving
//!
//! [`compile`] runs a circuit definition through a builder and keeps the
//! constraint system. [`solve`] runs the same definition again and checks the
//! outcome against a constraint system loaded from disk: the shapes must
//! match exactly and every constraint must hold. Solving is deterministic
//! for identical descriptor files.

use std::fmt::Debug;
use std::time::Instant;

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::error::CircuitError;
use crate::frontend::{Api, Circuit, Fr};

/// A full assignment, public values first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
    /// Public wire values, in allocation order.
    pub public: Vec<Fr>,
    /// Private wire values, in allocation order.
    pub private: Vec<Fr>,
}

impl Witness {
    /// The part of the witness a verifier sees.
    pub fn public_witness(&self) -> PublicWitness {
        PublicWitness {
            values: self.public.clone(),
        }
    }
}

/// Public witness, persisted as `public_witness.bin`.
#[derive(Debug, Clone, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct PublicWitness {
    /// Public values in wire order.
    pub values: Vec<Fr>,
}

/// A builder that can be turned into a constraint system plus witness.
pub trait Builder: Api + Default {
    /// The constraint system it produces.
    type System;

    /// Consume the builder.
    fn finish(self) -> (Self::System, Witness);
}

/// A compiled constraint system.
pub trait ConstraintSystem:
    CanonicalSerialize + CanonicalDeserialize + PartialEq + Debug + Sized
{
    /// Builder producing this system.
    type Builder: Builder<System = Self>;

    /// Number of public wires.
    fn num_public(&self) -> usize;

    /// Number of private wires.
    fn num_private(&self) -> usize;

    /// Number of gates or rank-1 constraints.
    fn num_constraints(&self) -> usize;

    /// Check every constraint against `witness`.
    fn check(&self, witness: &Witness) -> Result<(), CircuitError>;
}

/// Compile `circuit` into a constraint system.
pub fn compile<CS: ConstraintSystem>(circuit: &impl Circuit) -> Result<CS, CircuitError> {
    let started = Instant::now();
    let mut builder = CS::Builder::default();
    circuit.define(&mut builder)?;
    let (cs, _) = builder.finish();
    tracing::info!(
        public = cs.num_public(),
        private = cs.num_private(),
        constraints = cs.num_constraints(),
        elapsed = ?started.elapsed(),
        "circuit compiled"
    );
    Ok(cs)
}

/// Derive the witness of `circuit` for the compiled system `cs`.
pub fn solve<CS: ConstraintSystem>(
    cs: &CS,
    circuit: &impl Circuit,
) -> Result<Witness, CircuitError> {
    let started = Instant::now();
    let mut builder = CS::Builder::default();
    circuit.define(&mut builder)?;
    let (defined, witness) = builder.finish();

    let shapes = [
        ("public inputs", cs.num_public(), defined.num_public()),
        ("private wires", cs.num_private(), defined.num_private()),
        ("constraint count", cs.num_constraints(), defined.num_constraints()),
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
    if defined != *cs {
        return Err(CircuitError::ConstraintsDiffer);
    }
    ConstraintSystem::check(cs, &witness)?;

    tracing::info!(
        public = witness.public.len(),
        private = witness.private.len(),
        elapsed = ?started.elapsed(),
        "witness solved"
    );
    Ok(witness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r1cs::R1cs;
    use crate::sparse::SparseR1cs;

    /// `x · y == z` with `z` public.
    struct Product {
        x: u64,
        y: u64,
        z: u64,
    }

    impl Circuit for Product {
        fn define<A: Api>(&self, api: &mut A) -> Result<(), CircuitError> {
            let z = api.public_input(Fr::from(self.z));
            let x = api.secret_input(Fr::from(self.x));
            let y = api.secret_input(Fr::from(self.y));
            let p = api.mul(&x, &y);
            api.assert_is_equal(&p, &z);
            Ok(())
        }
    }

    /// Emits a different number of gates depending on `x`.
    struct DataDependent {
        x: u64,
    }

    impl Circuit for DataDependent {
        fn define<A: Api>(&self, api: &mut A) -> Result<(), CircuitError> {
            let mut acc = api.secret_input(Fr::from(self.x));
            for _ in 0..self.x {
                acc = api.mul(&acc, &acc);
            }
            Ok(())
        }
    }

    #[test]
    fn solve_matches_compiled_sparse_system() {
        let cs: SparseR1cs = compile(&Product { x: 6, y: 7, z: 42 }).unwrap();
        let witness = solve(&cs, &Product { x: 6, y: 7, z: 42 }).unwrap();
        assert_eq!(witness.public_witness().values, vec![Fr::from(42u64)]);
    }

    #[test]
    fn compiled_system_is_independent_of_values() {
        let a: R1cs = compile(&Product { x: 6, y: 7, z: 42 }).unwrap();
        let b: R1cs = compile(&Product { x: 2, y: 3, z: 6 }).unwrap();
        assert_eq!(a, b);
        let witness = solve(&a, &Product { x: 2, y: 3, z: 6 }).unwrap();
        assert_eq!(witness.public, vec![Fr::from(6u64)]);
    }

    #[test]
    fn unsatisfied_assignment_fails() {
        let cs: R1cs = compile(&Product { x: 6, y: 7, z: 42 }).unwrap();
        let err = solve(&cs, &Product { x: 6, y: 7, z: 41 }).unwrap_err();
        assert!(matches!(err, CircuitError::Unsatisfied { .. }));
    }

    #[test]
    fn shape_change_is_detected() {
        let cs: SparseR1cs = compile(&DataDependent { x: 2 }).unwrap();
        let err = solve(&cs, &DataDependent { x: 3 }).unwrap_err();
        assert!(matches!(
            err,
            CircuitError::ShapeMismatch { what: "private wires", expected: 3, found: 4 }
        ));
    }

    #[test]
    fn solving_is_deterministic() {
        let cs: SparseR1cs = compile(&Product { x: 3, y: 5, z: 15 }).unwrap();
        let a = solve(&cs, &Product { x: 3, y: 5, z: 15 }).unwrap();
        let b = solve(&cs, &Product { x: 3, y: 5, z: 15 }).unwrap();
        assert_eq!(a, b);
    }
}
