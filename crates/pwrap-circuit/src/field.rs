//! Decimal encoding of prime field elements.
//!
//! plonky2 writes BN254 digests as decimal strings, and the Groth16 proof
//! JSON uses the same encoding for base field coordinates. Parsing is strict:
//! a value at or above the modulus is rejected rather than reduced.

use std::str::FromStr;

use ark_ff::PrimeField;

/// Parse a canonical decimal representation.
pub fn from_decimal<F: PrimeField>(s: &str) -> Option<F> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value = F::from_str(s).ok()?;
    let trimmed = s.trim_start_matches('0');
    let expected = if trimmed.is_empty() { "0" } else { trimmed };
    (to_decimal(&value) == expected).then_some(value)
}

/// Canonical decimal representation.
pub fn to_decimal<F: PrimeField>(value: &F) -> String {
    value.into_bigint().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    const MODULUS: &str =
        "21888242871839275222246405745257275088548364400416034343698204186575808495617";

    #[test]
    fn small_values() {
        assert_eq!(from_decimal::<Fr>("0"), Some(Fr::from(0u64)));
        assert_eq!(from_decimal::<Fr>("0042"), Some(Fr::from(42u64)));
        assert_eq!(to_decimal(&Fr::from(42u64)), "42");
    }

    #[test]
    fn modulus_is_rejected() {
        assert_eq!(from_decimal::<Fr>(MODULUS), None);
    }

    #[test]
    fn modulus_minus_one_is_accepted() {
        let max = "21888242871839275222246405745257275088548364400416034343698204186575808495616";
        let value = from_decimal::<Fr>(max).unwrap();
        assert_eq!(value + Fr::from(1u64), Fr::from(0u64));
        assert_eq!(to_decimal(&value), max);
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(from_decimal::<Fr>(""), None);
        assert_eq!(from_decimal::<Fr>("-1"), None);
        assert_eq!(from_decimal::<Fr>("0x10"), None);
        assert_eq!(from_decimal::<Fr>("1 2"), None);
    }
}
