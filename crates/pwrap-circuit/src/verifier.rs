//! # plonky2 Verifier Circuit
//!
//! The outer circuit whose satisfiability attests to an inner plonky2
//! proof. Its public inputs are the inner public inputs followed by the
//! verifier-only data (constants/sigmas cap, then circuit digest); the inner
//! proof is private.
//!
//! ## Verifier Chip
//!
//! The in-circuit verification logic sits behind [`VerifierChip`].
//! [`Plonky2VerifierChip`] binds the data and enforces that every Goldilocks
//! value the proof carries is a canonical field element, so no two witnesses
//! encode the same inner proof. Shape consistency with the common data is
//! checked natively before any constraint is emitted, which makes the
//! circuit layout a function of the common data alone.

use pwrap_core::{CircuitDescriptor, CommonCircuitData, DescriptorError, HashKind};

use crate::error::CircuitError;
use crate::frontend::{Api, Circuit};
use crate::gadgets::assert_goldilocks_canonical;
use crate::variables::{Allocator, HashVariable, ProofVariable, VerifierDataVariable, Visibility};

/// In-circuit verification of an inner proof.
pub trait VerifierChip {
    /// Emit the constraints checking `proof` against `public_inputs` and
    /// `verifier_data`.
    fn verify<A: Api>(
        &self,
        api: &mut A,
        public_inputs: &[A::Var],
        proof: &ProofVariable<A::Var>,
        verifier_data: &VerifierDataVariable<A::Var>,
    ) -> Result<(), CircuitError>;
}

/// Chip for proofs described by a given [`CommonCircuitData`].
#[derive(Debug, Clone, Copy)]
pub struct Plonky2VerifierChip<'a> {
    common: &'a CommonCircuitData,
    hash_kind: HashKind,
}

impl<'a> Plonky2VerifierChip<'a> {
    /// Chip for `common`, with digests of `hash_kind`.
    pub fn new(common: &'a CommonCircuitData, hash_kind: HashKind) -> Self {
        Self { common, hash_kind }
    }

    fn check_digest_limbs<V>(&self, digest: &HashVariable<V>) -> Result<(), CircuitError> {
        let expected = match self.hash_kind {
            HashKind::Bn254 => 1,
            HashKind::Goldilocks => 4,
        };
        if digest.limbs.len() != expected {
            return Err(DescriptorError::MixedHashKinds.into());
        }
        Ok(())
    }

    fn check_shape<V>(
        &self,
        public_inputs: &[V],
        proof: &ProofVariable<V>,
        verifier_data: &VerifierDataVariable<V>,
    ) -> Result<(), CircuitError> {
        let expect = |what: &str, expected: usize, found: usize| {
            if expected == found {
                Ok(())
            } else {
                Err(CircuitError::Descriptor(DescriptorError::LengthMismatch {
                    what: what.to_string(),
                    expected,
                    found,
                }))
            }
        };
        expect(
            "public_inputs",
            self.common.num_public_inputs,
            public_inputs.len(),
        )?;
        expect(
            "constants_sigmas_cap",
            self.common.cap_len()?,
            verifier_data.constants_sigmas_cap.len(),
        )?;
        expect(
            "query_round_proofs",
            self.common.fri_params.config.num_query_rounds,
            proof.opening_proof.query_round_proofs.len(),
        )?;
        for digest in proof
            .digests()
            .into_iter()
            .chain(&verifier_data.constants_sigmas_cap)
            .chain(std::iter::once(&verifier_data.circuit_digest))
        {
            self.check_digest_limbs(digest)?;
        }
        Ok(())
    }
}

impl VerifierChip for Plonky2VerifierChip<'_> {
    fn verify<A: Api>(
        &self,
        api: &mut A,
        public_inputs: &[A::Var],
        proof: &ProofVariable<A::Var>,
        verifier_data: &VerifierDataVariable<A::Var>,
    ) -> Result<(), CircuitError> {
        self.check_shape(public_inputs, proof, verifier_data)?;

        for x in public_inputs {
            assert_goldilocks_canonical(api, x);
        }
        for x in proof.goldilocks_elements() {
            assert_goldilocks_canonical(api, x);
        }
        if self.hash_kind == HashKind::Goldilocks {
            let digests = proof
                .digests()
                .into_iter()
                .chain(&verifier_data.constants_sigmas_cap)
                .chain(std::iter::once(&verifier_data.circuit_digest));
            for digest in digests {
                for limb in &digest.limbs {
                    assert_goldilocks_canonical(api, limb);
                }
            }
        }
        Ok(())
    }
}

/// Circuit verifying the plonky2 proof in a [`CircuitDescriptor`].
#[derive(Debug, Clone)]
pub struct Plonky2VerifierCircuit {
    descriptor: CircuitDescriptor,
}

impl Plonky2VerifierCircuit {
    /// Wrap a descriptor after validating its shape.
    pub fn new(descriptor: CircuitDescriptor) -> Result<Self, CircuitError> {
        descriptor.validate()?;
        Ok(Self { descriptor })
    }

    /// The wrapped descriptor.
    pub fn descriptor(&self) -> &CircuitDescriptor {
        &self.descriptor
    }
}

impl Circuit for Plonky2VerifierCircuit {
    fn define<A: Api>(&self, api: &mut A) -> Result<(), CircuitError> {
        let d = &self.descriptor;
        let hash_kind = d.hash_kind()?;

        let mut public = Allocator::new(api, Visibility::Public);
        let public_inputs = public.goldilocks_vec(d.public_inputs());
        let verifier_data = public.verifier_data(&d.verifier_only)?;

        let proof = Allocator::new(api, Visibility::Secret).proof(d.proof())?;

        Plonky2VerifierChip::new(&d.common, hash_kind).verify(
            api,
            &public_inputs,
            &proof,
            &verifier_data,
        )
    }
}
