//! # Raw Binary Encoding
//!
//! Byte-sink capability shared by constraint systems, both backends' key
//! types, and the public witness. arkworks types use their uncompressed
//! canonical encoding, validated on read; the PLONK keys implement the
//! traits themselves on top of halo2's raw formats.

use std::io::{self, Read, Write};

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use thiserror::Error;

/// Error while encoding or decoding a raw artifact.
#[derive(Error, Debug)]
pub enum RawError {
    /// The underlying reader or writer failed, including short reads.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// The bytes do not decode to a valid value.
    #[error("malformed encoding: {0}")]
    Serialization(#[from] SerializationError),
}

/// Write `self` in its raw binary form.
pub trait WriteRaw {
    /// Encode into `writer`.
    fn write_raw<W: Write>(&self, writer: &mut W) -> Result<(), RawError>;
}

/// Read a value back from its raw binary form.
pub trait ReadRaw: Sized {
    /// Decode from `reader`. Truncated or invalid input is an error.
    fn read_raw<R: Read>(reader: &mut R) -> Result<Self, RawError>;
}

impl<T: CanonicalSerialize> WriteRaw for T {
    fn write_raw<W: Write>(&self, writer: &mut W) -> Result<(), RawError> {
        self.serialize_uncompressed(writer)?;
        Ok(())
    }
}

impl<T: CanonicalDeserialize> ReadRaw for T {
    fn read_raw<R: Read>(reader: &mut R) -> Result<Self, RawError> {
        Ok(T::deserialize_uncompressed(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwrap_circuit::{Fr, PublicWitness};

    #[test]
    fn public_witness_survives_raw_encoding() {
        let pw = PublicWitness {
            values: vec![Fr::from(7u64), Fr::from(u64::MAX)],
        };
        let mut bytes = Vec::new();
        pw.write_raw(&mut bytes).unwrap();
        let back = PublicWitness::read_raw(&mut bytes.as_slice()).unwrap();
        assert_eq!(back, pw);
    }

    #[test]
    fn truncated_input_is_rejected() {
        let pw = PublicWitness {
            values: vec![Fr::from(1u64)],
        };
        let mut bytes = Vec::new();
        pw.write_raw(&mut bytes).unwrap();
        bytes.pop();
        assert!(PublicWitness::read_raw(&mut bytes.as_slice()).is_err());
    }

    #[test]
    fn non_canonical_scalar_is_rejected() {
        let mut bytes = Vec::new();
        1u64.serialize_uncompressed(&mut bytes).unwrap();
        bytes.extend_from_slice(&[0xff; 32]);
        let err = PublicWitness::read_raw(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, RawError::Serialization(_)));
    }
}
