//! # Circuit Variables for plonky2 Data
//!
//! Mirrors of the descriptor types with every element replaced by a circuit
//! variable. Goldilocks elements become one BN254 variable each; a BN254
//! digest is one variable and a Goldilocks digest is four.

use pwrap_core::descriptor::{FriProof, OpeningSet};
use pwrap_core::{GoldilocksField, HashOut, MerkleCap, Proof, VerifierOnlyCircuitData};

use crate::error::CircuitError;
use crate::field::from_decimal;
use crate::frontend::{Api, Fr};

/// Whether allocations are public inputs or private witness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Part of the public witness.
    Public,
    /// Private to the prover.
    Secret,
}

/// A digest inside the circuit.
#[derive(Debug, Clone)]
pub struct HashVariable<V> {
    /// One limb for BN254 digests, four for Goldilocks digests.
    pub limbs: Vec<V>,
}

/// An element of the quadratic extension.
pub type ExtVariable<V> = [V; 2];

/// Verifier-only data inside the circuit.
#[derive(Debug, Clone)]
pub struct VerifierDataVariable<V> {
    /// Cap of the constants and sigma polynomials.
    pub constants_sigmas_cap: Vec<HashVariable<V>>,
    /// Digest of the inner circuit.
    pub circuit_digest: HashVariable<V>,
}

/// Opening values, in plonky2 order.
#[derive(Debug, Clone)]
pub struct OpeningSetVariable<V> {
    pub constants: Vec<ExtVariable<V>>,
    pub plonk_sigmas: Vec<ExtVariable<V>>,
    pub wires: Vec<ExtVariable<V>>,
    pub plonk_zs: Vec<ExtVariable<V>>,
    pub plonk_zs_next: Vec<ExtVariable<V>>,
    pub partial_products: Vec<ExtVariable<V>>,
    pub quotient_polys: Vec<ExtVariable<V>>,
    pub lookup_zs: Vec<ExtVariable<V>>,
    pub lookup_zs_next: Vec<ExtVariable<V>>,
}

impl<V> OpeningSetVariable<V> {
    /// Every opening, in plonky2 order.
    pub fn iter(&self) -> impl Iterator<Item = &ExtVariable<V>> {
        self.constants
            .iter()
            .chain(&self.plonk_sigmas)
            .chain(&self.wires)
            .chain(&self.plonk_zs)
            .chain(&self.plonk_zs_next)
            .chain(&self.partial_products)
            .chain(&self.quotient_polys)
            .chain(&self.lookup_zs)
            .chain(&self.lookup_zs_next)
    }
}

/// One FRI query round inside the circuit.
#[derive(Debug, Clone)]
pub struct FriQueryRoundVariable<V> {
    /// Leaf values and paths of the initial oracles.
    pub initial_trees: Vec<(Vec<V>, Vec<HashVariable<V>>)>,
    /// Folding step evaluations and paths.
    pub steps: Vec<(Vec<ExtVariable<V>>, Vec<HashVariable<V>>)>,
}

/// The FRI proof inside the circuit.
#[derive(Debug, Clone)]
pub struct FriProofVariable<V> {
    pub commit_phase_merkle_caps: Vec<Vec<HashVariable<V>>>,
    pub query_round_proofs: Vec<FriQueryRoundVariable<V>>,
    pub final_poly: Vec<ExtVariable<V>>,
    pub pow_witness: V,
}

/// The inner proof inside the circuit.
#[derive(Debug, Clone)]
pub struct ProofVariable<V> {
    pub wires_cap: Vec<HashVariable<V>>,
    pub plonk_zs_partial_products_cap: Vec<HashVariable<V>>,
    pub quotient_polys_cap: Vec<HashVariable<V>>,
    pub openings: OpeningSetVariable<V>,
    pub opening_proof: FriProofVariable<V>,
}

impl<V> ProofVariable<V> {
    /// Every digest in the proof.
    pub fn digests(&self) -> Vec<&HashVariable<V>> {
        let fri = &self.opening_proof;
        let mut out: Vec<&HashVariable<V>> = self
            .wires_cap
            .iter()
            .chain(&self.plonk_zs_partial_products_cap)
            .chain(&self.quotient_polys_cap)
            .collect();
        out.extend(fri.commit_phase_merkle_caps.iter().flatten());
        for round in &fri.query_round_proofs {
            for (_, path) in &round.initial_trees {
                out.extend(path);
            }
            for (_, path) in &round.steps {
                out.extend(path);
            }
        }
        out
    }

    /// Every Goldilocks element in the proof, digests excluded.
    pub fn goldilocks_elements(&self) -> Vec<&V> {
        let fri = &self.opening_proof;
        let mut out: Vec<&V> = self.openings.iter().flatten().collect();
        for round in &fri.query_round_proofs {
            for (leaf, _) in &round.initial_trees {
                out.extend(leaf);
            }
            for (evals, _) in &round.steps {
                out.extend(evals.iter().flatten());
            }
        }
        out.extend(fri.final_poly.iter().flatten());
        out.push(&fri.pow_witness);
        out
    }
}

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

/// Allocates descriptor values with a fixed visibility.
pub struct Allocator<'a, A: Api> {
    api: &'a mut A,
    visibility: Visibility,
}

impl<'a, A: Api> Allocator<'a, A> {
    /// Allocate through `api` with `visibility`.
    pub fn new(api: &'a mut A, visibility: Visibility) -> Self {
        Self { api, visibility }
    }

    fn input(&mut self, value: Fr) -> A::Var {
        match self.visibility {
            Visibility::Public => self.api.public_input(value),
            Visibility::Secret => self.api.secret_input(value),
        }
    }

    /// One Goldilocks element.
    pub fn goldilocks(&mut self, x: GoldilocksField) -> A::Var {
        self.input(Fr::from(x.to_canonical_u64()))
    }

    /// A sequence of Goldilocks elements.
    pub fn goldilocks_vec(&mut self, xs: &[GoldilocksField]) -> Vec<A::Var> {
        xs.iter().map(|&x| self.goldilocks(x)).collect()
    }

    /// An extension element.
    pub fn ext(&mut self, x: &[GoldilocksField; 2]) -> ExtVariable<A::Var> {
        [self.goldilocks(x[0]), self.goldilocks(x[1])]
    }

    fn exts(&mut self, xs: &[[GoldilocksField; 2]]) -> Vec<ExtVariable<A::Var>> {
        xs.iter().map(|x| self.ext(x)).collect()
    }

    /// A digest.
    pub fn hash(&mut self, h: &HashOut) -> Result<HashVariable<A::Var>, CircuitError> {
        let limbs = match h {
            HashOut::Bn254(decimal) => {
                let value = from_decimal::<Fr>(decimal)
                    .ok_or_else(|| CircuitError::InvalidFieldElement(decimal.clone()))?;
                vec![self.input(value)]
            }
            HashOut::Goldilocks { elements } => self.goldilocks_vec(elements),
        };
        Ok(HashVariable { limbs })
    }

    /// A sequence of digests.
    pub fn hashes(&mut self, hs: &[HashOut]) -> Result<Vec<HashVariable<A::Var>>, CircuitError> {
        hs.iter().map(|h| self.hash(h)).collect()
    }

    fn cap(&mut self, cap: &MerkleCap) -> Result<Vec<HashVariable<A::Var>>, CircuitError> {
        self.hashes(&cap.0)
    }

    /// Verifier-only data.
    pub fn verifier_data(
        &mut self,
        data: &VerifierOnlyCircuitData,
    ) -> Result<VerifierDataVariable<A::Var>, CircuitError> {
        Ok(VerifierDataVariable {
            constants_sigmas_cap: self.cap(&data.constants_sigmas_cap)?,
            circuit_digest: self.hash(&data.circuit_digest)?,
        })
    }

    fn openings(&mut self, o: &OpeningSet) -> OpeningSetVariable<A::Var> {
        OpeningSetVariable {
            constants: self.exts(&o.constants),
            plonk_sigmas: self.exts(&o.plonk_sigmas),
            wires: self.exts(&o.wires),
            plonk_zs: self.exts(&o.plonk_zs),
            plonk_zs_next: self.exts(&o.plonk_zs_next),
            partial_products: self.exts(&o.partial_products),
            quotient_polys: self.exts(&o.quotient_polys),
            lookup_zs: self.exts(&o.lookup_zs),
            lookup_zs_next: self.exts(&o.lookup_zs_next),
        }
    }

    fn fri(&mut self, fri: &FriProof) -> Result<FriProofVariable<A::Var>, CircuitError> {
        let commit_phase_merkle_caps = fri
            .commit_phase_merkle_caps
            .iter()
            .map(|cap| self.cap(cap))
            .collect::<Result<_, _>>()?;
        let mut query_round_proofs = Vec::with_capacity(fri.query_round_proofs.len());
        for round in &fri.query_round_proofs {
            let mut initial_trees = Vec::new();
            for (leaf, path) in &round.initial_trees_proof.evals_proofs {
                initial_trees.push((self.goldilocks_vec(leaf), self.hashes(&path.siblings)?));
            }
            let mut steps = Vec::new();
            for step in &round.steps {
                steps.push((self.exts(&step.evals), self.hashes(&step.merkle_proof.siblings)?));
            }
            query_round_proofs.push(FriQueryRoundVariable {
                initial_trees,
                steps,
            });
        }
        Ok(FriProofVariable {
            commit_phase_merkle_caps,
            query_round_proofs,
            final_poly: self.exts(&fri.final_poly.coeffs),
            pow_witness: self.goldilocks(fri.pow_witness),
        })
    }

    /// The inner proof.
    pub fn proof(&mut self, proof: &Proof) -> Result<ProofVariable<A::Var>, CircuitError> {
        Ok(ProofVariable {
            wires_cap: self.cap(&proof.wires_cap)?,
            plonk_zs_partial_products_cap: self.cap(&proof.plonk_zs_partial_products_cap)?,
            quotient_polys_cap: self.cap(&proof.quotient_polys_cap)?,
            openings: self.openings(&proof.openings),
            opening_proof: self.fri(&proof.opening_proof)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::witness::Builder;
    use crate::R1csBuilder;
    use pwrap_core::fixtures;

    #[test]
    fn public_allocation_counts() {
        let descriptor = fixtures::tiny_descriptor();
        let mut api = R1csBuilder::default();
        let mut alloc = Allocator::new(&mut api, Visibility::Public);
        let pis = alloc.goldilocks_vec(descriptor.public_inputs());
        let vd = alloc.verifier_data(&descriptor.verifier_only).unwrap();
        assert_eq!(pis.len(), 2);
        assert_eq!(vd.constants_sigmas_cap.len(), 1);
        assert_eq!(vd.circuit_digest.limbs.len(), 1);
        let (r1cs, _) = api.finish();
        assert_eq!(r1cs.num_public, 4);
        assert_eq!(r1cs.num_private, 0);
    }

    #[test]
    fn proof_element_inventory() {
        let descriptor = fixtures::tiny_descriptor();
        let mut api = R1csBuilder::default();
        let proof = Allocator::new(&mut api, Visibility::Secret)
            .proof(descriptor.proof())
            .unwrap();
        // openings 9 ext + leaves 8 + step evals 2 ext + final poly 2 ext + pow
        assert_eq!(proof.goldilocks_elements().len(), 18 + 8 + 4 + 4 + 1);
        // 3 caps + 1 commit cap + 4 initial paths of 3 + 1 step path of 2
        assert_eq!(proof.digests().len(), 3 + 1 + 12 + 2);
    }

    #[test]
    fn goldilocks_digests_have_four_limbs() {
        let descriptor = fixtures::tiny_goldilocks_descriptor();
        let mut api = R1csBuilder::default();
        let vd = Allocator::new(&mut api, Visibility::Public)
            .verifier_data(&descriptor.verifier_only)
            .unwrap();
        assert_eq!(vd.circuit_digest.limbs.len(), 4);
    }

    #[test]
    fn out_of_range_bn254_digest_is_rejected() {
        let mut api = R1csBuilder::default();
        let modulus =
            "21888242871839275222246405745257275088548364400416034343698204186575808495617";
        let err = Allocator::new(&mut api, Visibility::Public)
            .hash(&HashOut::Bn254(modulus.into()))
            .unwrap_err();
        assert!(matches!(err, CircuitError::InvalidFieldElement(_)));
    }
}
