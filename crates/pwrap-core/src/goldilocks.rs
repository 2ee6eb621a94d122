//! # Goldilocks Elements
//!
//! The inner plonky2 proof lives over the Goldilocks field
//! `p = 2^64 - 2^32 + 1`. Descriptors serialize elements as plain JSON
//! integers; this module gives them a newtype that can only hold canonical
//! values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DescriptorError;

/// A canonical element of the Goldilocks field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct GoldilocksField(u64);

/// An element of the quadratic extension used by plonky2 openings.
pub type ExtensionElement = [GoldilocksField; 2];

impl GoldilocksField {
    /// The field order `2^64 - 2^32 + 1`.
    pub const ORDER: u64 = 0xFFFF_FFFF_0000_0001;

    /// The additive identity.
    pub const ZERO: Self = Self(0);

    /// Build an element from a value that must already be canonical.
    pub fn from_canonical(value: u64) -> Result<Self, DescriptorError> {
        if value < Self::ORDER {
            Ok(Self(value))
        } else {
            Err(DescriptorError::NonCanonical(value))
        }
    }

    /// Build an element by reducing an arbitrary `u64`.
    pub fn from_noncanonical(value: u64) -> Self {
        if value >= Self::ORDER {
            Self(value - Self::ORDER)
        } else {
            Self(value)
        }
    }

    /// The canonical integer representative.
    pub fn to_canonical_u64(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for GoldilocksField {
    type Error = DescriptorError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::from_canonical(value)
    }
}

impl From<GoldilocksField> for u64 {
    fn from(value: GoldilocksField) -> Self {
        value.0
    }
}

impl fmt::Display for GoldilocksField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
