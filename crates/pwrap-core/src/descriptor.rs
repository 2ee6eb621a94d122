//! # plonky2 Circuit Descriptors
//!
//! Serde model of the three JSON files a plonky2 wrapping run leaves in the
//! circuit directory:
//!
//! - `common_circuit_data.json`: parameters shared by prover and verifier.
//! - `verifier_only_circuit_data.json`: constants/sigmas cap and circuit digest.
//! - `proof_with_public_inputs.json`: the inner proof and its public inputs.
//!
//! Only the fields the wrapper needs are modelled; unknown fields are
//! ignored so descriptors from newer plonky2 versions still load.
//!
//! ## Hash Values
//!
//! A wrapping-friendly plonky2 config hashes with Poseidon over BN254 and
//! writes each digest as a decimal string. The default config writes
//! Goldilocks digests as `{"elements": [u64; 4]}`. Both are accepted, but a
//! single descriptor must use one kind throughout.
//!
//! ## Shape Validation
//!
//! [`CircuitDescriptor::validate`] checks every length in the proof against
//! what the common data implies. The verifier circuit's layout is a pure
//! function of the common data, so a proof that passes validation always
//! fits the compiled circuit.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::DescriptorError;
use crate::goldilocks::{ExtensionElement, GoldilocksField};
use crate::layout::CircuitDir;

// ---------------------------------------------------------------------------
// Hashes and Merkle data
// ---------------------------------------------------------------------------

/// A hash digest as written by plonky2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HashOut {
    /// A single BN254 scalar, decimal encoded.
    Bn254(String),
    /// Four Goldilocks elements.
    Goldilocks {
        /// Digest limbs.
        elements: [GoldilocksField; 4],
    },
}

/// Which hash family a descriptor uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashKind {
    /// Poseidon over BN254; one field element per digest.
    Bn254,
    /// Goldilocks Poseidon; four limbs per digest.
    Goldilocks,
}

impl HashOut {
    /// Hash family of this digest.
    pub fn kind(&self) -> HashKind {
        match self {
            HashOut::Bn254(_) => HashKind::Bn254,
            HashOut::Goldilocks { .. } => HashKind::Goldilocks,
        }
    }

    fn check_encoding(&self) -> Result<(), DescriptorError> {
        match self {
            HashOut::Bn254(s) if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) => {
                Err(DescriptorError::InvalidHash(s.clone()))
            }
            _ => Ok(()),
        }
    }
}

/// The top layer of a Merkle tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerkleCap(pub Vec<HashOut>);

/// Authentication path from a leaf up to the cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Sibling digests, leaf level first.
    pub siblings: Vec<HashOut>,
}

// ---------------------------------------------------------------------------
// Inner proof
// ---------------------------------------------------------------------------

/// Claimed openings of every committed polynomial at `zeta` (and `g·zeta`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningSet {
    /// Constant and selector polynomials.
    pub constants: Vec<ExtensionElement>,
    /// Permutation sigma polynomials.
    pub plonk_sigmas: Vec<ExtensionElement>,
    /// Wire polynomials.
    pub wires: Vec<ExtensionElement>,
    /// Permutation `Z` polynomials.
    pub plonk_zs: Vec<ExtensionElement>,
    /// Permutation `Z` polynomials at the next row.
    pub plonk_zs_next: Vec<ExtensionElement>,
    /// Partial products of the permutation argument.
    pub partial_products: Vec<ExtensionElement>,
    /// Chunks of the quotient polynomial.
    pub quotient_polys: Vec<ExtensionElement>,
    /// Lookup `Z` polynomials.
    #[serde(default)]
    pub lookup_zs: Vec<ExtensionElement>,
    /// Lookup `Z` polynomials at the next row.
    #[serde(default)]
    pub lookup_zs_next: Vec<ExtensionElement>,
}

/// Openings of the four initial FRI oracles at one query index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriInitialTreeProof {
    /// Leaf values and Merkle path per oracle.
    pub evals_proofs: Vec<(Vec<GoldilocksField>, MerkleProof)>,
}

/// One folding step of a FRI query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriQueryStep {
    /// The coset evaluations for this step.
    pub evals: Vec<ExtensionElement>,
    /// Path into this step's commit-phase tree.
    pub merkle_proof: MerkleProof,
}

/// One FRI query round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriQueryRound {
    /// Openings of the initial oracles.
    pub initial_trees_proof: FriInitialTreeProof,
    /// Folding steps, one per reduction arity.
    pub steps: Vec<FriQueryStep>,
}

/// Coefficients of the final FRI polynomial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolynomialCoeffs {
    /// Coefficients, lowest degree first.
    pub coeffs: Vec<ExtensionElement>,
}

/// The FRI opening proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriProof {
    /// Caps committed during the folding phase.
    pub commit_phase_merkle_caps: Vec<MerkleCap>,
    /// Query rounds.
    pub query_round_proofs: Vec<FriQueryRound>,
    /// Final low-degree polynomial.
    pub final_poly: PolynomialCoeffs,
    /// Grinding witness.
    pub pow_witness: GoldilocksField,
}

/// A plonky2 proof without public inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Cap of the wire commitments.
    pub wires_cap: MerkleCap,
    /// Cap of the `Z` and partial product commitments.
    pub plonk_zs_partial_products_cap: MerkleCap,
    /// Cap of the quotient commitments.
    pub quotient_polys_cap: MerkleCap,
    /// Opening values.
    pub openings: OpeningSet,
    /// FRI proof for the openings.
    pub opening_proof: FriProof,
}

/// Contents of `proof_with_public_inputs.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofWithPublicInputs {
    /// The inner proof.
    pub proof: Proof,
    /// Public inputs of the inner circuit.
    pub public_inputs: Vec<GoldilocksField>,
}

/// Contents of `verifier_only_circuit_data.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierOnlyCircuitData {
    /// Cap of the constants and sigma polynomials.
    pub constants_sigmas_cap: MerkleCap,
    /// Digest binding the whole inner circuit.
    pub circuit_digest: HashOut,
}

// ---------------------------------------------------------------------------
// Common circuit data
// ---------------------------------------------------------------------------

/// FRI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriConfig {
    /// `log2` of the blowup factor.
    pub rate_bits: usize,
    /// Height of the Merkle caps.
    pub cap_height: usize,
    /// Grinding difficulty.
    pub proof_of_work_bits: u32,
    /// Number of query rounds.
    pub num_query_rounds: usize,
    /// Reduction strategy, kept opaque.
    #[serde(default)]
    pub reduction_strategy: serde_json::Value,
}

/// FRI parameters derived for this circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriParams {
    /// FRI configuration.
    pub config: FriConfig,
    /// Whether the initial oracles are salted.
    #[serde(default)]
    pub hiding: bool,
    /// `log2` of the trace length.
    pub degree_bits: usize,
    /// Arity bits per folding step.
    pub reduction_arity_bits: Vec<usize>,
}

/// plonky2 circuit configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitConfig {
    /// Total wires per row.
    pub num_wires: usize,
    /// Wires taking part in the permutation argument.
    pub num_routed_wires: usize,
    /// Constant columns.
    pub num_constants: usize,
    /// Whether arithmetic uses base-field gates.
    #[serde(default)]
    pub use_base_arithmetic_gate: bool,
    /// Target security level.
    pub security_bits: usize,
    /// Number of independent challenges.
    pub num_challenges: usize,
    /// Whether the proof is zero knowledge.
    #[serde(default)]
    pub zero_knowledge: bool,
    /// Upper bound on the quotient degree factor.
    pub max_quotient_degree_factor: usize,
    /// FRI configuration.
    pub fri_config: FriConfig,
}

/// Contents of `common_circuit_data.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonCircuitData {
    /// Circuit configuration.
    pub config: CircuitConfig,
    /// FRI parameters.
    pub fri_params: FriParams,
    /// Gate descriptions, kept for logging.
    #[serde(default)]
    pub gates: Vec<serde_json::Value>,
    /// Quotient degree factor.
    pub quotient_degree_factor: usize,
    /// Number of gate constraints.
    pub num_gate_constraints: usize,
    /// Number of constant polynomials, selectors included.
    pub num_constants: usize,
    /// Number of public inputs.
    pub num_public_inputs: usize,
    /// Coset shifts of the permutation argument.
    #[serde(default)]
    pub k_is: Vec<GoldilocksField>,
    /// Number of partial products per challenge.
    pub num_partial_products: usize,
    /// Number of lookup polynomials.
    #[serde(default)]
    pub num_lookup_polys: usize,
}

impl CommonCircuitData {
    /// Number of digests in every Merkle cap.
    pub fn cap_len(&self) -> Result<usize, DescriptorError> {
        pow2("fri_config.cap_height", self.fri_params.config.cap_height)
    }

    /// `log2` of the low-degree extension size.
    pub fn lde_bits(&self) -> Result<usize, DescriptorError> {
        self.fri_params
            .degree_bits
            .checked_add(self.fri_params.config.rate_bits)
            .ok_or(DescriptorError::Overflow {
                what: "degree_bits + rate_bits".into(),
            })
    }

    /// Number of coefficients of the final FRI polynomial.
    pub fn final_poly_len(&self) -> Result<usize, DescriptorError> {
        let arity_bits = self
            .fri_params
            .reduction_arity_bits
            .iter()
            .try_fold(0usize, |acc, &bits| acc.checked_add(bits))
            .ok_or(DescriptorError::Overflow {
                what: "reduction_arity_bits".into(),
            })?;
        let degree_bits = self.fri_params.degree_bits;
        if arity_bits > degree_bits {
            return Err(DescriptorError::ArityExceedsDegree {
                arity_bits,
                degree_bits,
            });
        }
        pow2("final_poly degree", degree_bits - arity_bits)
    }
}

/// `2^bits`, or an error when it does not fit a `usize`.
fn pow2(what: &str, bits: usize) -> Result<usize, DescriptorError> {
    u32::try_from(bits)
        .ok()
        .and_then(|bits| 1usize.checked_shl(bits))
        .ok_or_else(|| DescriptorError::Overflow {
            what: format!("{what} = {bits}"),
        })
}

fn product(what: &str, a: usize, b: usize) -> Result<usize, DescriptorError> {
    a.checked_mul(b).ok_or_else(|| DescriptorError::Overflow { what: what.into() })
}

// ---------------------------------------------------------------------------
// Descriptor
// ---------------------------------------------------------------------------

/// Everything the verifier circuit is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitDescriptor {
    /// Inner proof with its public inputs.
    pub proof_with_public_inputs: ProofWithPublicInputs,
    /// Verifier-only data of the inner circuit.
    pub verifier_only: VerifierOnlyCircuitData,
    /// Common data of the inner circuit.
    pub common: CommonCircuitData,
}

impl CircuitDescriptor {
    /// Read and validate the three descriptor files in `dir`.
    pub fn load(dir: &CircuitDir) -> Result<Self, DescriptorError> {
        let descriptor = Self {
            verifier_only: read_json(&dir.verifier_only_circuit_data())?,
            proof_with_public_inputs: read_json(&dir.proof_with_public_inputs())?,
            common: read_json(&dir.common_circuit_data())?,
        };
        descriptor.validate()?;
        tracing::debug!(
            circuit = %dir.name(),
            public_inputs = descriptor.common.num_public_inputs,
            degree_bits = descriptor.common.fri_params.degree_bits,
            query_rounds = descriptor.common.fri_params.config.num_query_rounds,
            "loaded circuit descriptor"
        );
        Ok(descriptor)
    }

    /// The inner public inputs.
    pub fn public_inputs(&self) -> &[GoldilocksField] {
        &self.proof_with_public_inputs.public_inputs
    }

    /// The inner proof.
    pub fn proof(&self) -> &Proof {
        &self.proof_with_public_inputs.proof
    }

    /// Hash family used throughout the descriptor.
    pub fn hash_kind(&self) -> Result<HashKind, DescriptorError> {
        let hashes = self.hashes();
        let kind = self.verifier_only.circuit_digest.kind();
        for hash in hashes {
            hash.check_encoding()?;
            if hash.kind() != kind {
                return Err(DescriptorError::MixedHashKinds);
            }
        }
        Ok(kind)
    }

    /// Check every length in the inner proof against the common data.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        let common = &self.common;
        let config = &common.config;
        let proof = self.proof();

        expect_len(
            "public_inputs",
            common.num_public_inputs,
            self.public_inputs().len(),
        )?;

        let cap_len = common.cap_len()?;
        expect_len(
            "constants_sigmas_cap",
            cap_len,
            self.verifier_only.constants_sigmas_cap.0.len(),
        )?;
        expect_len("wires_cap", cap_len, proof.wires_cap.0.len())?;
        expect_len(
            "plonk_zs_partial_products_cap",
            cap_len,
            proof.plonk_zs_partial_products_cap.0.len(),
        )?;
        expect_len("quotient_polys_cap", cap_len, proof.quotient_polys_cap.0.len())?;

        let openings = &proof.openings;
        let challenges = config.num_challenges;
        expect_len("openings.constants", common.num_constants, openings.constants.len())?;
        expect_len(
            "openings.plonk_sigmas",
            config.num_routed_wires,
            openings.plonk_sigmas.len(),
        )?;
        expect_len("openings.wires", config.num_wires, openings.wires.len())?;
        expect_len("openings.plonk_zs", challenges, openings.plonk_zs.len())?;
        expect_len("openings.plonk_zs_next", challenges, openings.plonk_zs_next.len())?;
        expect_len(
            "openings.partial_products",
            product("num_challenges * num_partial_products", challenges, common.num_partial_products)?,
            openings.partial_products.len(),
        )?;
        expect_len(
            "openings.quotient_polys",
            product("num_challenges * quotient_degree_factor", challenges, common.quotient_degree_factor)?,
            openings.quotient_polys.len(),
        )?;
        expect_len(
            "openings.lookup_zs",
            product("num_challenges * num_lookup_polys", challenges, common.num_lookup_polys)?,
            openings.lookup_zs.len(),
        )?;

        self.validate_fri()?;
        self.hash_kind()?;
        Ok(())
    }

    fn validate_fri(&self) -> Result<(), DescriptorError> {
        let common = &self.common;
        let params = &common.fri_params;
        let fri = &self.proof().opening_proof;
        let arities = &params.reduction_arity_bits;
        let cap_height = params.config.cap_height;
        let cap_len = common.cap_len()?;

        expect_len(
            "commit_phase_merkle_caps",
            arities.len(),
            fri.commit_phase_merkle_caps.len(),
        )?;
        for (i, cap) in fri.commit_phase_merkle_caps.iter().enumerate() {
            expect_len(format!("commit_phase_merkle_caps[{i}]"), cap_len, cap.0.len())?;
        }
        expect_len(
            "final_poly.coeffs",
            common.final_poly_len()?,
            fri.final_poly.coeffs.len(),
        )?;
        expect_len(
            "query_round_proofs",
            params.config.num_query_rounds,
            fri.query_round_proofs.len(),
        )?;

        let lde_bits = common.lde_bits()?;
        let initial_path = lde_bits.saturating_sub(cap_height);
        for (q, round) in fri.query_round_proofs.iter().enumerate() {
            for (t, (_, path)) in round.initial_trees_proof.evals_proofs.iter().enumerate() {
                expect_len(
                    format!("query_round_proofs[{q}].initial_trees_proof[{t}].siblings"),
                    initial_path,
                    path.siblings.len(),
                )?;
            }
            expect_len(
                format!("query_round_proofs[{q}].steps"),
                arities.len(),
                round.steps.len(),
            )?;
            let mut folded_bits = 0;
            for (s, (step, arity)) in round.steps.iter().zip(arities).enumerate() {
                folded_bits += arity;
                expect_len(
                    format!("query_round_proofs[{q}].steps[{s}].evals"),
                    pow2("reduction_arity_bits", *arity)?,
                    step.evals.len(),
                )?;
                expect_len(
                    format!("query_round_proofs[{q}].steps[{s}].siblings"),
                    lde_bits.saturating_sub(folded_bits.saturating_add(cap_height)),
                    step.merkle_proof.siblings.len(),
                )?;
            }
        }
        Ok(())
    }

    /// Every digest in the descriptor, verifier data first.
    pub fn hashes(&self) -> Vec<&HashOut> {
        let proof = self.proof();
        let fri = &proof.opening_proof;
        let mut out = vec![&self.verifier_only.circuit_digest];
        out.extend(&self.verifier_only.constants_sigmas_cap.0);
        out.extend(&proof.wires_cap.0);
        out.extend(&proof.plonk_zs_partial_products_cap.0);
        out.extend(&proof.quotient_polys_cap.0);
        for cap in &fri.commit_phase_merkle_caps {
            out.extend(&cap.0);
        }
        for round in &fri.query_round_proofs {
            for (_, path) in &round.initial_trees_proof.evals_proofs {
                out.extend(&path.siblings);
            }
            for step in &round.steps {
                out.extend(&step.merkle_proof.siblings);
            }
        }
        out
    }
}

fn expect_len(what: impl Into<String>, expected: usize, found: usize) -> Result<(), DescriptorError> {
    if expected == found {
        Ok(())
    } else {
        Err(DescriptorError::length(what, expected, found))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DescriptorError> {
    let bytes = fs::read(path).map_err(|source| DescriptorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| DescriptorError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn tiny_fixture_is_valid() {
        let descriptor = fixtures::tiny_descriptor();
        descriptor.validate().unwrap();
        assert_eq!(descriptor.hash_kind().unwrap(), HashKind::Bn254);
    }

    #[test]
    fn goldilocks_fixture_is_valid() {
        let descriptor = fixtures::tiny_goldilocks_descriptor();
        descriptor.validate().unwrap();
        assert_eq!(descriptor.hash_kind().unwrap(), HashKind::Goldilocks);
    }

    #[test]
    fn load_roundtrips_written_fixture() {
        let tmp = tempfile::tempdir().unwrap();
        let descriptor = fixtures::tiny_descriptor();
        fixtures::write_circuit_dir(tmp.path(), &descriptor).unwrap();
        let loaded = CircuitDescriptor::load(&CircuitDir::new(tmp.path())).unwrap();
        assert_eq!(loaded, descriptor);
    }

    #[test]
    fn load_missing_file_names_path() {
        let tmp = tempfile::tempdir().unwrap();
        let err = CircuitDescriptor::load(&CircuitDir::new(tmp.path())).unwrap_err();
        assert!(matches!(err, DescriptorError::Io { .. }));
        assert!(err.to_string().contains("verifier_only_circuit_data.json"));
    }

    #[test]
    fn load_malformed_json_is_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        fixtures::write_circuit_dir(tmp.path(), &fixtures::tiny_descriptor()).unwrap();
        fs::write(tmp.path().join("common_circuit_data.json"), b"{\"config\": ").unwrap();
        let err = CircuitDescriptor::load(&CircuitDir::new(tmp.path())).unwrap_err();
        assert!(matches!(err, DescriptorError::Json { .. }));
        assert!(err.to_string().contains("common_circuit_data.json"));
    }

    #[test]
    fn public_input_count_mismatch() {
        let mut descriptor = fixtures::tiny_descriptor();
        descriptor
            .proof_with_public_inputs
            .public_inputs
            .push(GoldilocksField::ZERO);
        let err = descriptor.validate().unwrap_err();
        assert!(
            matches!(err, DescriptorError::LengthMismatch { ref what, .. } if what == "public_inputs")
        );
    }

    #[test]
    fn wrong_wire_openings_rejected() {
        let mut descriptor = fixtures::tiny_descriptor();
        descriptor.proof_with_public_inputs.proof.openings.wires.pop();
        let err = descriptor.validate().unwrap_err();
        assert!(err.to_string().starts_with("openings.wires"));
    }

    #[test]
    fn short_merkle_path_rejected() {
        let mut descriptor = fixtures::tiny_descriptor();
        let round = &mut descriptor.proof_with_public_inputs.proof.opening_proof.query_round_proofs[0];
        round.initial_trees_proof.evals_proofs[2].1.siblings.pop();
        let err = descriptor.validate().unwrap_err();
        assert!(err.to_string().contains("initial_trees_proof[2].siblings"));
    }

    #[test]
    fn arity_larger_than_degree_rejected() {
        let mut descriptor = fixtures::tiny_descriptor();
        descriptor.common.fri_params.reduction_arity_bits = vec![8];
        let err = descriptor.common.final_poly_len().unwrap_err();
        assert!(matches!(err, DescriptorError::ArityExceedsDegree { arity_bits: 8, .. }));
    }

    #[test]
    fn oversized_cap_height_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut descriptor = fixtures::tiny_descriptor();
        descriptor.common.fri_params.config.cap_height = 64;
        fixtures::write_circuit_dir(tmp.path(), &descriptor).unwrap();
        let err = CircuitDescriptor::load(&CircuitDir::new(tmp.path())).unwrap_err();
        assert!(matches!(err, DescriptorError::Overflow { .. }));
        assert!(err.to_string().contains("cap_height"));
    }

    #[test]
    fn oversized_degree_and_counts_are_errors() {
        let mut descriptor = fixtures::tiny_descriptor();
        descriptor.common.fri_params.degree_bits = usize::MAX;
        assert!(matches!(
            descriptor.common.lde_bits().unwrap_err(),
            DescriptorError::Overflow { .. }
        ));
        assert!(matches!(
            descriptor.common.final_poly_len().unwrap_err(),
            DescriptorError::Overflow { .. }
        ));

        let mut descriptor = fixtures::tiny_descriptor();
        descriptor.common.num_partial_products = usize::MAX;
        assert!(matches!(
            descriptor.validate().unwrap_err(),
            DescriptorError::Overflow { .. }
        ));

        let mut descriptor = fixtures::tiny_descriptor();
        descriptor.common.fri_params.reduction_arity_bits = vec![usize::MAX, 1];
        assert!(matches!(
            descriptor.common.final_poly_len().unwrap_err(),
            DescriptorError::Overflow { .. }
        ));
    }

    #[test]
    fn mixed_hash_kinds_rejected() {
        let mut descriptor = fixtures::tiny_descriptor();
        descriptor.verifier_only.constants_sigmas_cap.0[0] = HashOut::Goldilocks {
            elements: [GoldilocksField::ZERO; 4],
        };
        assert!(matches!(
            descriptor.validate().unwrap_err(),
            DescriptorError::MixedHashKinds
        ));
    }

    #[test]
    fn non_decimal_bn254_hash_rejected() {
        let mut descriptor = fixtures::tiny_descriptor();
        descriptor.verifier_only.circuit_digest = HashOut::Bn254("0x12".into());
        assert!(matches!(
            descriptor.validate().unwrap_err(),
            DescriptorError::InvalidHash(_)
        ));
    }

    #[test]
    fn hash_out_json_forms() {
        let bn: HashOut = serde_json::from_str("\"123456789\"").unwrap();
        assert_eq!(bn.kind(), HashKind::Bn254);
        let gl: HashOut = serde_json::from_str(r#"{"elements":[1,2,3,4]}"#).unwrap();
        assert_eq!(gl.kind(), HashKind::Goldilocks);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{"constants_sigmas_cap":["1"],"circuit_digest":"2","extra":true}"#;
        let data: VerifierOnlyCircuitData = serde_json::from_str(json).unwrap();
        assert_eq!(data.circuit_digest, HashOut::Bn254("2".into()));
    }

    #[test]
    fn hashes_counts_every_digest() {
        let descriptor = fixtures::tiny_descriptor();
        // digest + 4 caps of 1 + 1 commit cap + 4 initial paths of 3 + 1 step path of 2
        assert_eq!(descriptor.hashes().len(), 1 + 4 + 1 + 12 + 2);
    }
}
