//! # Test Fixtures
//!
//! Small descriptors whose shapes are consistent with their common data.
//! The values are arbitrary canonical elements; they do not form a valid
//! plonky2 proof, which the wrapper never needs to check natively.
//!
//! Enabled for this crate's tests and, through the `test-fixtures` feature,
//! for tests in downstream crates.

use std::fs;
use std::io;
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::descriptor::{
    CircuitConfig, CircuitDescriptor, CommonCircuitData, FriConfig, FriInitialTreeProof,
    FriParams, FriProof, FriQueryRound, FriQueryStep, HashOut, MerkleCap, MerkleProof,
    OpeningSet, PolynomialCoeffs, Proof, ProofWithPublicInputs, VerifierOnlyCircuitData,
};
use crate::goldilocks::{ExtensionElement, GoldilocksField};
use crate::layout::{COMMON_CIRCUIT_DATA, PROOF_WITH_PUBLIC_INPUTS, VERIFIER_ONLY_CIRCUIT_DATA};

/// Seeded value source; the same seed always yields the same descriptor.
struct Values(ChaCha8Rng);

impl Values {
    fn next_u64(&mut self) -> u64 {
        self.0.gen()
    }

    fn element(&mut self) -> GoldilocksField {
        GoldilocksField::from_noncanonical(self.0.gen_range(0..GoldilocksField::ORDER))
    }

    fn elements(&mut self, n: usize) -> Vec<GoldilocksField> {
        (0..n).map(|_| self.element()).collect()
    }

    fn ext(&mut self) -> ExtensionElement {
        [self.element(), self.element()]
    }

    fn exts(&mut self, n: usize) -> Vec<ExtensionElement> {
        (0..n).map(|_| self.ext()).collect()
    }
}

/// The smallest interesting shape: two public inputs, one FRI query with
/// one folding step, BN254 digests.
pub fn tiny_descriptor() -> CircuitDescriptor {
    build(|values| HashOut::Bn254(values.next_u64().to_string()))
}

/// Same shape as [`tiny_descriptor`] with Goldilocks digests.
pub fn tiny_goldilocks_descriptor() -> CircuitDescriptor {
    build(|values| HashOut::Goldilocks {
        elements: [
            values.element(),
            values.element(),
            values.element(),
            values.element(),
        ],
    })
}

/// Write the three descriptor files into `dir`.
pub fn write_circuit_dir(dir: &Path, descriptor: &CircuitDescriptor) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(
        dir.join(VERIFIER_ONLY_CIRCUIT_DATA),
        serde_json::to_vec(&descriptor.verifier_only)?,
    )?;
    fs::write(
        dir.join(PROOF_WITH_PUBLIC_INPUTS),
        serde_json::to_vec(&descriptor.proof_with_public_inputs)?,
    )?;
    fs::write(
        dir.join(COMMON_CIRCUIT_DATA),
        serde_json::to_vec(&descriptor.common)?,
    )?;
    Ok(())
}

fn build(mut hash: impl FnMut(&mut Values) -> HashOut) -> CircuitDescriptor {
    let mut values = Values(ChaCha8Rng::seed_from_u64(0x5EED));
    let fri_config = FriConfig {
        rate_bits: 1,
        cap_height: 0,
        proof_of_work_bits: 0,
        num_query_rounds: 1,
        reduction_strategy: serde_json::json!({ "Fixed": [1] }),
    };
    let common = CommonCircuitData {
        config: CircuitConfig {
            num_wires: 2,
            num_routed_wires: 2,
            num_constants: 1,
            use_base_arithmetic_gate: true,
            security_bits: 1,
            num_challenges: 1,
            zero_knowledge: false,
            max_quotient_degree_factor: 8,
            fri_config: fri_config.clone(),
        },
        fri_params: FriParams {
            config: fri_config,
            hiding: false,
            degree_bits: 2,
            reduction_arity_bits: vec![1],
        },
        gates: vec![serde_json::json!("NoopGate")],
        quotient_degree_factor: 1,
        num_gate_constraints: 1,
        num_constants: 1,
        num_public_inputs: 2,
        k_is: vec![GoldilocksField::from_noncanonical(1), GoldilocksField::from_noncanonical(7)],
        num_partial_products: 1,
        num_lookup_polys: 0,
    };

    let mut path = |values: &mut Values, len: usize| MerkleProof {
        siblings: (0..len).map(|_| hash(values)).collect(),
    };
    // (leaf length, path length) for the four initial oracles
    let initial: Vec<_> = [3, 2, 2, 1]
        .into_iter()
        .map(|leaf| (values.elements(leaf), path(&mut values, 3)))
        .collect();
    let step = FriQueryStep {
        evals: values.exts(2),
        merkle_proof: path(&mut values, 2),
    };
    let commit_cap = MerkleCap(path(&mut values, 1).siblings);
    let wires_cap = MerkleCap(path(&mut values, 1).siblings);
    let zs_cap = MerkleCap(path(&mut values, 1).siblings);
    let quotient_cap = MerkleCap(path(&mut values, 1).siblings);
    let constants_sigmas_cap = MerkleCap(path(&mut values, 1).siblings);
    let circuit_digest = path(&mut values, 1).siblings.remove(0);

    let proof = Proof {
        wires_cap,
        plonk_zs_partial_products_cap: zs_cap,
        quotient_polys_cap: quotient_cap,
        openings: OpeningSet {
            constants: values.exts(1),
            plonk_sigmas: values.exts(2),
            wires: values.exts(2),
            plonk_zs: values.exts(1),
            plonk_zs_next: values.exts(1),
            partial_products: values.exts(1),
            quotient_polys: values.exts(1),
            lookup_zs: Vec::new(),
            lookup_zs_next: Vec::new(),
        },
        opening_proof: FriProof {
            commit_phase_merkle_caps: vec![commit_cap],
            query_round_proofs: vec![FriQueryRound {
                initial_trees_proof: FriInitialTreeProof {
                    evals_proofs: initial,
                },
                steps: vec![step],
            }],
            final_poly: PolynomialCoeffs {
                coeffs: values.exts(2),
            },
            pow_witness: values.element(),
        },
    };

    CircuitDescriptor {
        proof_with_public_inputs: ProofWithPublicInputs {
            proof,
            public_inputs: values.elements(2),
        },
        verifier_only: VerifierOnlyCircuitData {
            constants_sigmas_cap,
            circuit_digest,
        },
        common,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_are_reproducible() {
        assert_eq!(tiny_descriptor(), tiny_descriptor());
        assert_eq!(tiny_goldilocks_descriptor(), tiny_goldilocks_descriptor());
        assert_ne!(
            tiny_descriptor().verifier_only.circuit_digest,
            tiny_goldilocks_descriptor().verifier_only.circuit_digest
        );
    }

    #[test]
    fn seeded_values_differ_across_draws() {
        let mut values = Values(ChaCha8Rng::seed_from_u64(0x5EED));
        let drawn = values.elements(16);
        let first = drawn[0];
        assert!(drawn.iter().any(|e| *e != first));
        assert!(drawn.iter().all(|e| e.to_canonical_u64() < GoldilocksField::ORDER));
    }
}
