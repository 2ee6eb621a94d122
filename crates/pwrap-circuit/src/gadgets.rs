//! # Gadgets
//!
//! Bit decomposition and Goldilocks canonicity checks, generic over [`Api`].

use ark_ff::{BigInteger, One, PrimeField, Zero};

use crate::frontend::{Api, Fr};

/// Decompose `x` into `n_bits` little-endian bits and constrain the
/// recomposition to equal `x`. Fails to satisfy when `x ≥ 2^n_bits`.
pub fn to_binary<A: Api>(api: &mut A, x: &A::Var, n_bits: usize) -> Vec<A::Var> {
    let repr = api.value(x).into_bigint();
    let bits: Vec<A::Var> = (0..n_bits)
        .map(|i| {
            let bit = api.secret_input(Fr::from(u64::from(repr.get_bit(i))));
            api.assert_is_boolean(&bit);
            bit
        })
        .collect();
    let recomposed = from_binary(api, &bits);
    api.assert_is_equal(&recomposed, x);
    bits
}

/// `Σ bits[i] · 2^i`.
pub fn from_binary<A: Api>(api: &mut A, bits: &[A::Var]) -> A::Var {
    let mut acc = api.constant(Fr::zero());
    let mut weight = Fr::one();
    for bit in bits {
        let term = api.mul_const(bit, weight);
        acc = api.add(&acc, &term);
        weight += weight;
    }
    acc
}

/// Product of all `bits`; one iff every bit is set.
pub fn all_set<A: Api>(api: &mut A, bits: &[A::Var]) -> A::Var {
    match bits.split_first() {
        None => api.constant(Fr::one()),
        Some((first, rest)) => rest
            .iter()
            .fold(first.clone(), |acc, bit| api.mul(&acc, bit)),
    }
}

/// Constrain `x` to be a canonical Goldilocks element, `x < 2^64 - 2^32 + 1`.
///
/// With `x = hi·2^32 + lo` over 64 bits, `x` is canonical unless `hi` is
/// all ones and `lo` is non-zero.
pub fn assert_goldilocks_canonical<A: Api>(api: &mut A, x: &A::Var) {
    let bits = to_binary(api, x, 64);
    let (lo_bits, hi_bits) = bits.split_at(32);
    let hi_all_ones = all_set(api, hi_bits);
    let lo = from_binary(api, lo_bits);
    let overflow = api.mul(&hi_all_ones, &lo);
    let zero = api.constant(Fr::zero());
    api.assert_is_equal(&overflow, &zero);
}
