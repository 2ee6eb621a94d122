//! # Descriptor Errors
//!
//! Failures while reading or validating the plonky2 descriptor files. Every
//! variant that involves a file carries its path so the CLI can report the
//! operation and location without extra context.

use std::path::PathBuf;

use thiserror::Error;

/// Error loading or validating a circuit descriptor.
#[derive(Error, Debug)]
pub enum DescriptorError {
    /// A descriptor file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A descriptor file is not valid JSON for its expected shape.
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        /// File that failed.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// A Goldilocks element is not in canonical form.
    #[error("non-canonical Goldilocks element {0}")]
    NonCanonical(u64),

    /// A BN254 hash value is not a decimal integer.
    #[error("invalid BN254 hash value {0:?}")]
    InvalidHash(String),

    /// The descriptor mixes Goldilocks and BN254 hash values.
    #[error("descriptor mixes Goldilocks and BN254 hash values")]
    MixedHashKinds,

    /// A sequence in the inner proof has the wrong length for the common data.
    #[error("{what}: expected length {expected}, found {found}")]
    LengthMismatch {
        /// Which part of the proof.
        what: String,
        /// Length implied by the common circuit data.
        expected: usize,
        /// Length present in the descriptor.
        found: usize,
    },

    /// The FRI reduction arities fold below a degree-1 polynomial.
    #[error("FRI reduction arity bits sum to {arity_bits}, exceeding degree_bits {degree_bits}")]
    ArityExceedsDegree {
        /// Sum of all reduction arity bits.
        arity_bits: usize,
        /// Degree bits of the inner circuit.
        degree_bits: usize,
    },

    /// A size derived from the common data does not fit in memory.
    #[error("common circuit data out of range: {what}")]
    Overflow {
        /// The offending parameter.
        what: String,
    },
}

impl DescriptorError {
    pub(crate) fn length(what: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::LengthMismatch {
            what: what.into(),
            expected,
            found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_path() {
        let err = DescriptorError::Io {
            path: PathBuf::from("/tmp/circuit/common_circuit_data.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = format!("{err}");
        assert!(msg.contains("common_circuit_data.json"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn length_mismatch_display() {
        let err = DescriptorError::length("openings.wires", 135, 12);
        assert_eq!(
            format!("{err}"),
            "openings.wires: expected length 135, found 12"
        );
    }

    #[test]
    fn arity_display() {
        let err = DescriptorError::ArityExceedsDegree {
            arity_bits: 9,
            degree_bits: 4,
        };
        assert!(format!("{err}").contains("exceeding degree_bits 4"));
    }
}
