//! # Groth16 Proof System
//!
//! Groth16 over BN254 via `ark-groth16`. The persisted [`R1cs`] is replayed
//! into an arkworks constraint system by [`R1csSynthesizer`], so setup and
//! proving see exactly the constraints that were compiled.
//!
//! ## Properties
//!
//! - **Proof size:** three group elements, independent of circuit size.
//! - **Verification time:** constant, one multi-pairing.
//! - **Trusted setup:** circuit specific. The dummy setup skips key
//!   generation entirely: every key element is one seeded random point, so
//!   proving runs at full cost while the key carries no verifying material.
//!
//! ## Proof Encoding
//!
//! `proof.json` holds the affine coordinates as decimal strings:
//!
//! ```text
//! {"Ar":{"X":..,"Y":..},"Bs":{"X":{"A0":..,"A1":..},"Y":{..}},"Krs":{"X":..,"Y":..}}
//! ```
//!
//! The point at infinity is written as all-zero coordinates. Decoding
//! rejects non-canonical coordinates and points outside the prime-order
//! subgroup.

use std::time::Instant;

use ark_bn254::{Bn254, Fq, Fq2, Fr, G1Affine, G2Affine};
use ark_ec::short_weierstrass::{Affine, SWCurveConfig};
use ark_ff::{UniformRand, Zero};
use ark_groth16::{Groth16, Proof, ProvingKey, VerifyingKey};
use ark_poly::{EvaluationDomain, GeneralEvaluationDomain};
use ark_relations::r1cs::{
    ConstraintSynthesizer, ConstraintSystem as ArkConstraintSystem, ConstraintSystemRef,
    LinearCombination, OptimizationGoal, SynthesisError, SynthesisMode, Variable,
};
use ark_snark::{CircuitSpecificSetupSNARK, SNARK};
use pwrap_circuit::field::{from_decimal, to_decimal};
use pwrap_circuit::r1cs::Term;
use pwrap_circuit::{PublicWitness, R1cs, Witness};
use pwrap_core::Backend;
use rand::rngs::OsRng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::srs::DUMMY_SEED;
use crate::traits::{
    check_shape, KeyPair, ProofError, ProofSystem, SetupError, SetupMode, VerifyError,
};

type G16 = Groth16<Bn254>;

/// Replays an [`R1cs`] into arkworks. Without a witness only the shape is
/// available, which is all key generation needs.
struct R1csSynthesizer<'a> {
    r1cs: &'a R1cs,
    witness: Option<&'a Witness>,
}

impl R1csSynthesizer<'_> {
    fn lc(terms: &[Term], vars: &[Variable]) -> Result<LinearCombination<Fr>, SynthesisError> {
        terms
            .iter()
            .map(|t| {
                vars.get(t.index as usize)
                    .map(|&v| (t.coeff, v))
                    .ok_or(SynthesisError::Unsatisfiable)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(LinearCombination)
    }
}

impl ConstraintSynthesizer<Fr> for R1csSynthesizer<'_> {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let num_public = self.r1cs.num_public as usize;
        let num_private = self.r1cs.num_private as usize;
        let mut vars = Vec::with_capacity(1 + num_public + num_private);
        vars.push(Variable::One);

        for i in 0..num_public {
            let value = self.witness.and_then(|w| w.public.get(i).copied());
            vars.push(cs.new_input_variable(|| value.ok_or(SynthesisError::AssignmentMissing))?);
        }
        for i in 0..num_private {
            let value = self.witness.and_then(|w| w.private.get(i).copied());
            vars.push(cs.new_witness_variable(|| value.ok_or(SynthesisError::AssignmentMissing))?);
        }
        for c in &self.r1cs.constraints {
            cs.enforce_constraint(
                Self::lc(&c.a, &vars)?,
                Self::lc(&c.b, &vars)?,
                Self::lc(&c.c, &vars)?,
            )?;
        }
        Ok(())
    }
}

/// Proving key with the shape key generation would produce and none of its
/// structure. Proofs made with it are well formed and never verify.
fn dummy_proving_key(r1cs: &R1cs) -> Result<ProvingKey<Bn254>, SynthesisError> {
    let shape = ArkConstraintSystem::<Fr>::new_ref();
    shape.set_optimization_goal(OptimizationGoal::Constraints);
    shape.set_mode(SynthesisMode::Setup);
    R1csSynthesizer { r1cs, witness: None }.generate_constraints(shape.clone())?;
    shape.finalize();

    let num_instance = shape.num_instance_variables();
    let num_witness = shape.num_witness_variables();
    let domain_size =
        GeneralEvaluationDomain::<Fr>::new(shape.num_constraints() + num_instance)
            .ok_or(SynthesisError::PolynomialDegreeTooLarge)?
            .size();

    let mut rng = ChaCha20Rng::seed_from_u64(DUMMY_SEED);
    let g1 = G1Affine::rand(&mut rng);
    let g2 = G2Affine::rand(&mut rng);
    let num_variables = num_instance + num_witness;
    Ok(ProvingKey {
        // gamma material stays at the identity: only its length is read back
        vk: VerifyingKey {
            alpha_g1: g1,
            beta_g2: g2,
            gamma_g2: G2Affine::identity(),
            delta_g2: g2,
            gamma_abc_g1: vec![G1Affine::identity(); num_instance],
        },
        beta_g1: g1,
        delta_g1: g1,
        a_query: vec![g1; num_variables],
        b_g1_query: vec![g1; num_variables],
        b_g2_query: vec![g2; num_variables],
        h_query: vec![g1; domain_size - 1],
        l_query: vec![g1; num_witness],
    })
}

/// Replay the witness into an arkworks constraint system and report the
/// first constraint it leaves unsatisfied.
fn check_satisfied(r1cs: &R1cs, witness: &Witness) -> Result<(), ProofError> {
    let replay = ArkConstraintSystem::<Fr>::new_ref();
    R1csSynthesizer {
        r1cs,
        witness: Some(witness),
    }
    .generate_constraints(replay.clone())?;
    match replay.which_is_unsatisfied()? {
        None => Ok(()),
        Some(constraint) => Err(ProofError::Unsatisfied { constraint }),
    }
}

/// Groth16 proof system implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Groth16ProofSystem;

impl ProofSystem for Groth16ProofSystem {
    const BACKEND: Backend = Backend::Groth16;

    type ConstraintSystem = R1cs;
    type ProvingKey = ProvingKey<Bn254>;
    type VerifyingKey = VerifyingKey<Bn254>;
    type Proof = Groth16Proof;

    fn setup(&self, cs: &R1cs, mode: &SetupMode) -> Result<KeyPair<Self>, SetupError> {
        let started = Instant::now();
        let keys = match mode {
            SetupMode::Dummy => KeyPair {
                pk: dummy_proving_key(cs)?,
                vk: None,
            },
            SetupMode::Trusted(_) => {
                let circuit = R1csSynthesizer {
                    r1cs: cs,
                    witness: None,
                };
                let (pk, vk) =
                    <G16 as CircuitSpecificSetupSNARK<Fr>>::circuit_specific_setup(circuit, &mut OsRng)?;
                KeyPair { pk, vk: Some(vk) }
            }
        };
        tracing::info!(
            backend = %Self::BACKEND,
            dummy = mode.is_dummy(),
            constraints = cs.constraints.len(),
            elapsed = ?started.elapsed(),
            "setup complete"
        );
        Ok(keys)
    }

    fn prove(
        &self,
        cs: &R1cs,
        pk: &ProvingKey<Bn254>,
        witness: &Witness,
    ) -> Result<Groth16Proof, ProofError> {
        let expected = pk.vk.gamma_abc_g1.len().saturating_sub(1);
        if expected != cs.num_public as usize {
            return Err(ProofError::KeyMismatch {
                expected,
                found: cs.num_public as usize,
            });
        }
        check_shape(cs, witness)?;
        check_satisfied(cs, witness)?;

        let started = Instant::now();
        let circuit = R1csSynthesizer {
            r1cs: cs,
            witness: Some(witness),
        };
        let proof = <G16 as SNARK<Fr>>::prove(pk, circuit, &mut OsRng)?;
        tracing::info!(
            backend = %Self::BACKEND,
            elapsed = ?started.elapsed(),
            "proof generated"
        );
        Ok(Groth16Proof(proof))
    }

    fn verify(
        &self,
        vk: &VerifyingKey<Bn254>,
        proof: &Groth16Proof,
        public: &PublicWitness,
    ) -> Result<bool, VerifyError> {
        let expected = vk.gamma_abc_g1.len().saturating_sub(1);
        if public.values.len() != expected {
            return Err(VerifyError::KeyMismatch {
                expected,
                found: public.values.len(),
            });
        }
        let started = Instant::now();
        let valid = <G16 as SNARK<Fr>>::verify(vk, &public.values, &proof.0)?;
        tracing::info!(
            backend = %Self::BACKEND,
            valid,
            elapsed = ?started.elapsed(),
            "proof verified"
        );
        Ok(valid)
    }
}

// ---------------------------------------------------------------------------
// Proof JSON
// ---------------------------------------------------------------------------

/// Error decoding a curve point from `proof.json`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PointError {
    /// A coordinate is not a canonical decimal base field element.
    #[error("invalid coordinate {0:?}")]
    Coordinate(String),
    /// The coordinates do not satisfy the curve equation.
    #[error("{0} is not on the curve")]
    NotOnCurve(&'static str),
    /// The point is on the curve but outside the prime-order subgroup.
    #[error("{0} is not in the prime-order subgroup")]
    NotInSubgroup(&'static str),
}

/// A Groth16 proof with the `proof.json` encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProofJson", into = "ProofJson")]
pub struct Groth16Proof(pub Proof<Bn254>);

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct G1Json {
    #[serde(rename = "X")]
    x: String,
    #[serde(rename = "Y")]
    y: String,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct E2Json {
    #[serde(rename = "A0")]
    a0: String,
    #[serde(rename = "A1")]
    a1: String,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct G2Json {
    #[serde(rename = "X")]
    x: E2Json,
    #[serde(rename = "Y")]
    y: E2Json,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProofJson {
    #[serde(rename = "Ar")]
    ar: G1Json,
    #[serde(rename = "Bs")]
    bs: G2Json,
    #[serde(rename = "Krs")]
    krs: G1Json,
}

fn coordinate(s: &str) -> Result<Fq, PointError> {
    from_decimal(s).ok_or_else(|| PointError::Coordinate(s.to_string()))
}

fn validated<P: SWCurveConfig>(
    point: Affine<P>,
    name: &'static str,
) -> Result<Affine<P>, PointError> {
    if !point.is_on_curve() {
        return Err(PointError::NotOnCurve(name));
    }
    if !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(PointError::NotInSubgroup(name));
    }
    Ok(point)
}

impl G1Json {
    fn encode(p: &G1Affine) -> Self {
        if p.infinity {
            return Self {
                x: "0".into(),
                y: "0".into(),
            };
        }
        Self {
            x: to_decimal(&p.x),
            y: to_decimal(&p.y),
        }
    }

    fn decode(&self, name: &'static str) -> Result<G1Affine, PointError> {
        let (x, y) = (coordinate(&self.x)?, coordinate(&self.y)?);
        if x.is_zero() && y.is_zero() {
            return Ok(G1Affine::identity());
        }
        validated(G1Affine::new_unchecked(x, y), name)
    }
}

impl E2Json {
    fn encode(v: &Fq2) -> Self {
        Self {
            a0: to_decimal(&v.c0),
            a1: to_decimal(&v.c1),
        }
    }

    fn decode(&self) -> Result<Fq2, PointError> {
        Ok(Fq2::new(coordinate(&self.a0)?, coordinate(&self.a1)?))
    }
}

impl G2Json {
    fn encode(p: &G2Affine) -> Self {
        if p.infinity {
            return Self::encode_coordinates(&Fq2::zero(), &Fq2::zero());
        }
        Self::encode_coordinates(&p.x, &p.y)
    }

    fn encode_coordinates(x: &Fq2, y: &Fq2) -> Self {
        Self {
            x: E2Json::encode(x),
            y: E2Json::encode(y),
        }
    }

    fn decode(&self, name: &'static str) -> Result<G2Affine, PointError> {
        let (x, y) = (self.x.decode()?, self.y.decode()?);
        if x.is_zero() && y.is_zero() {
            return Ok(G2Affine::identity());
        }
        validated(G2Affine::new_unchecked(x, y), name)
    }
}

impl From<Groth16Proof> for ProofJson {
    fn from(proof: Groth16Proof) -> Self {
        Self {
            ar: G1Json::encode(&proof.0.a),
            bs: G2Json::encode(&proof.0.b),
            krs: G1Json::encode(&proof.0.c),
        }
    }
}

impl TryFrom<ProofJson> for Groth16Proof {
    type Error = PointError;

    fn try_from(json: ProofJson) -> Result<Self, PointError> {
        Ok(Self(Proof {
            a: json.ar.decode("Ar")?,
            b: json.bs.decode("Bs")?,
            c: json.krs.decode("Krs")?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::product;
    use crate::raw::{ReadRaw, WriteRaw};
    use ark_ec::AffineRepr;

    fn trusted() -> SetupMode {
        SetupMode::trusted("unused-srs")
    }

    #[test]
    fn trusted_setup_prove_verify() {
        let (cs, witness) = product::<R1cs>();
        let keys = Groth16ProofSystem.setup(&cs, &trusted()).unwrap();
        let vk = keys.vk.unwrap();
        let proof = Groth16ProofSystem.prove(&cs, &keys.pk, &witness).unwrap();
        let public = witness.public_witness();
        assert!(Groth16ProofSystem.verify(&vk, &proof, &public).unwrap());

        let mut wrong = public.clone();
        wrong.values[0] += Fr::from(1u64);
        assert!(!Groth16ProofSystem.verify(&vk, &proof, &wrong).unwrap());
    }

    #[test]
    fn dummy_setup_has_no_verifying_key() {
        let (cs, witness) = product::<R1cs>();
        let keys = Groth16ProofSystem.setup(&cs, &SetupMode::Dummy).unwrap();
        assert!(keys.vk.is_none());
        Groth16ProofSystem.prove(&cs, &keys.pk, &witness).unwrap();
    }

    #[test]
    fn dummy_key_has_prover_shape_and_no_verifying_material() {
        let (cs, witness) = product::<R1cs>();
        let dummy = Groth16ProofSystem.setup(&cs, &SetupMode::Dummy).unwrap().pk;
        let real = Groth16ProofSystem.setup(&cs, &trusted()).unwrap().pk;

        assert_eq!(dummy.a_query.len(), real.a_query.len());
        assert_eq!(dummy.b_g2_query.len(), real.b_g2_query.len());
        assert_eq!(dummy.h_query.len(), real.h_query.len());
        assert_eq!(dummy.l_query.len(), real.l_query.len());
        assert_eq!(dummy.vk.gamma_abc_g1.len(), real.vk.gamma_abc_g1.len());
        assert!(dummy.vk.gamma_g2.is_zero());
        assert!(dummy.vk.gamma_abc_g1.iter().all(|p| p.is_zero()));

        let proof = Groth16ProofSystem.prove(&cs, &dummy, &witness).unwrap();
        let real_vk = Groth16ProofSystem.setup(&cs, &trusted()).unwrap().vk.unwrap();
        assert!(!Groth16ProofSystem
            .verify(&real_vk, &proof, &witness.public_witness())
            .unwrap());
    }

    #[test]
    fn dummy_setup_is_deterministic() {
        let (cs, _) = product::<R1cs>();
        let encode = || {
            let keys = Groth16ProofSystem.setup(&cs, &SetupMode::Dummy).unwrap();
            let mut bytes = Vec::new();
            keys.pk.write_raw(&mut bytes).unwrap();
            bytes
        };
        assert_eq!(encode(), encode());
    }

    #[test]
    fn unsatisfied_witness_is_not_proven() {
        let (cs, mut witness) = product::<R1cs>();
        let keys = Groth16ProofSystem.setup(&cs, &SetupMode::Dummy).unwrap();
        witness.private[0] += Fr::from(1u64);
        let err = Groth16ProofSystem
            .prove(&cs, &keys.pk, &witness)
            .unwrap_err();
        assert!(matches!(err, ProofError::Unsatisfied { .. }), "{err}");
    }

    #[test]
    fn missing_private_wire_is_a_shape_error() {
        let (cs, mut witness) = product::<R1cs>();
        let keys = Groth16ProofSystem.setup(&cs, &SetupMode::Dummy).unwrap();
        witness.private.pop();
        let err = Groth16ProofSystem
            .prove(&cs, &keys.pk, &witness)
            .unwrap_err();
        assert!(matches!(err, ProofError::Circuit(_)));
    }

    #[test]
    fn public_input_count_must_match_key() {
        let (cs, witness) = product::<R1cs>();
        let keys = Groth16ProofSystem.setup(&cs, &trusted()).unwrap();
        let proof = Groth16ProofSystem.prove(&cs, &keys.pk, &witness).unwrap();
        let mut public = witness.public_witness();
        public.values.pop();
        let err = Groth16ProofSystem
            .verify(keys.vk.as_ref().unwrap(), &proof, &public)
            .unwrap_err();
        assert!(matches!(err, VerifyError::KeyMismatch { expected: 2, found: 1 }));
    }

    #[test]
    fn keys_survive_raw_encoding() {
        let (cs, _) = product::<R1cs>();
        let keys = Groth16ProofSystem.setup(&cs, &trusted()).unwrap();
        let vk = keys.vk.unwrap();
        let mut bytes = Vec::new();
        vk.write_raw(&mut bytes).unwrap();
        let back = VerifyingKey::<Bn254>::read_raw(&mut bytes.as_slice()).unwrap();
        assert_eq!(back, vk);
        assert!(VerifyingKey::<Bn254>::read_raw(&mut &bytes[..bytes.len() / 2]).is_err());
    }

    #[test]
    fn proof_json_layout() {
        let (cs, witness) = product::<R1cs>();
        let keys = Groth16ProofSystem.setup(&cs, &SetupMode::Dummy).unwrap();
        let proof = Groth16ProofSystem.prove(&cs, &keys.pk, &witness).unwrap();
        let json = serde_json::to_value(&proof).unwrap();
        assert!(json["Ar"]["X"].is_string());
        assert!(json["Bs"]["Y"]["A1"].is_string());
        assert!(json["Krs"]["Y"].is_string());
        let back: Groth16Proof = serde_json::from_value(json).unwrap();
        assert_eq!(back, proof);
    }

    #[test]
    fn identity_encodes_as_zeros() {
        let proof = Groth16Proof(Proof {
            a: G1Affine::identity(),
            b: G2Affine::generator(),
            c: G1Affine::generator(),
        });
        let json = serde_json::to_value(&proof).unwrap();
        assert_eq!(json["Ar"]["X"], "0");
        assert_eq!(json["Ar"]["Y"], "0");
        let back: Groth16Proof = serde_json::from_value(json).unwrap();
        assert!(back.0.a.is_zero());
    }

    #[test]
    fn point_off_curve_is_rejected() {
        let proof = Groth16Proof(Proof {
            a: G1Affine::generator(),
            b: G2Affine::generator(),
            c: G1Affine::generator(),
        });
        let mut json = serde_json::to_value(&proof).unwrap();
        json["Krs"]["Y"] = "3".into();
        let err = serde_json::from_value::<Groth16Proof>(json).unwrap_err();
        assert!(err.to_string().contains("Krs is not on the curve"));
    }

    #[test]
    fn non_canonical_coordinate_is_rejected() {
        let proof = Groth16Proof(Proof {
            a: G1Affine::generator(),
            b: G2Affine::generator(),
            c: G1Affine::generator(),
        });
        let mut json = serde_json::to_value(&proof).unwrap();
        json["Ar"]["X"] =
            "21888242871839275222246405745257275088696311157297823662689037894645226208583".into();
        assert!(serde_json::from_value::<Groth16Proof>(json).is_err());
    }
}
