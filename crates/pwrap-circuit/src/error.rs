//! Circuit definition and witness errors.

use pwrap_core::DescriptorError;
use thiserror::Error;

/// Error while defining, compiling, or solving a circuit.
#[derive(Error, Debug)]
pub enum CircuitError {
    /// The descriptor could not be loaded or is inconsistent.
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    /// A value is not a canonical BN254 scalar.
    #[error("invalid BN254 field element {0:?}")]
    InvalidFieldElement(String),

    /// The assignment violates a constraint.
    #[error("constraint {index} of {total} is not satisfied")]
    Unsatisfied {
        /// Index of the first failing constraint.
        index: usize,
        /// Total number of constraints.
        total: usize,
    },

    /// A constraint references a wire the assignment does not have.
    #[error("constraint references wire {index} but the assignment has {wires} wires")]
    WireOutOfRange {
        /// Referenced wire index.
        index: usize,
        /// Length of the assignment.
        wires: usize,
    },

    /// A freshly defined circuit differs from the compiled one.
    #[error("{what} differs from the compiled circuit: expected {expected}, found {found}")]
    ShapeMismatch {
        /// What was compared.
        what: &'static str,
        /// Value in the compiled constraint system.
        expected: usize,
        /// Value in the freshly defined circuit.
        found: usize,
    },

    /// The circuit defines the same counts but different constraints.
    #[error("circuit definition differs from the compiled constraint system")]
    ConstraintsDiffer,
}
