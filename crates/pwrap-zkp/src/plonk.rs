//! # PLONK Proof System
//!
//! PLONK over BN254 via `halo2_proofs` with KZG commitments and the SHPLONK
//! multi-opening argument. A [`SparseR1cs`] maps onto one fixed halo2 layout:
//!
//! - advice columns `a`, `b`, `c` carry the left, right and output wires;
//! - fixed columns `qL`, `qR`, `qO`, `qM`, `qC` carry the selectors;
//! - one instance column carries the public witness.
//!
//! The first rows hold the public wires in column `a`, each bound to its
//! instance row. Every gate takes the following row. Each wire's first cell
//! is its canonical cell; later occurrences are copy-constrained to it.
//!
//! Keys embed the KZG parameters they were generated with, so proving and
//! verifying need nothing besides the key files. `proof.json` holds the
//! transcript as `{"proof": "0x…"}`.

use std::io::{Read, Write};
use std::time::Instant;

use ark_ff::{BigInteger, PrimeField};
use halo2_proofs::circuit::{Cell, Layouter, SimpleFloorPlanner, Value};
use halo2_proofs::halo2curves::bn256::{Bn256, Fr as Halo2Fr, G1Affine};
use halo2_proofs::plonk::{
    self, create_proof, keygen_pk, keygen_vk, verify_proof, Advice, Circuit, Column,
    ConstraintSystem as Halo2ConstraintSystem, Fixed, Instance, ProvingKey, VerifyingKey,
};
use halo2_proofs::poly::commitment::Params;
use halo2_proofs::poly::kzg::commitment::{KZGCommitmentScheme, ParamsKZG};
use halo2_proofs::poly::kzg::multiopen::{ProverSHPLONK, VerifierSHPLONK};
use halo2_proofs::poly::kzg::strategy::SingleStrategy;
use halo2_proofs::poly::Rotation;
use halo2_proofs::transcript::{
    Blake2bRead, Blake2bWrite, Challenge255, TranscriptReadBuffer, TranscriptWriterBuffer,
};
use halo2_proofs::SerdeFormat;
use pwrap_circuit::{Fr, PublicWitness, SparseR1cs, Witness};
use pwrap_core::Backend;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::raw::{RawError, ReadRaw, WriteRaw};
use crate::srs::dummy_params;
use crate::traits::{
    check_witness, KeyPair, ProofError, ProofSystem, SetupError, SetupMode, VerifyError,
};

/// Smallest supported domain.
const MIN_K: u32 = 4;

/// Rows halo2 reserves at the end of the domain for blinding.
const RESERVED_ROWS: usize = 8;

const KEY_FORMAT: SerdeFormat = SerdeFormat::RawBytes;

/// Map an arkworks scalar into halo2's representation of the same field.
pub fn to_halo2(x: &Fr) -> Result<Halo2Fr, String> {
    let bytes = x.into_bigint().to_bytes_le();
    let mut repr = [0u8; 32];
    repr.copy_from_slice(&bytes);
    Option::from(Halo2Fr::from_bytes(&repr)).ok_or_else(|| format!("{x} is not a BN254 scalar"))
}

fn to_halo2_vec(xs: &[Fr]) -> Result<Vec<Halo2Fr>, String> {
    xs.iter().map(to_halo2).collect()
}

/// Column layout shared by every wrapped circuit.
#[derive(Debug, Clone)]
pub struct PlonkConfig {
    wires: [Column<Advice>; 3],
    selectors: [Column<Fixed>; 5],
    instance: Column<Instance>,
}

#[derive(Debug, Clone)]
struct Row {
    wires: [Option<usize>; 3],
    selectors: [Halo2Fr; 5],
}

/// A [`SparseR1cs`] as a halo2 circuit, with or without wire values.
#[derive(Debug, Clone, Default)]
pub struct PlonkCircuit {
    num_public: usize,
    num_wires: usize,
    rows: Vec<Row>,
    values: Option<Vec<Halo2Fr>>,
}

impl PlonkCircuit {
    /// Lay out `cs`. `witness`, when present, must fit its shape.
    pub fn new(cs: &SparseR1cs, witness: Option<&Witness>) -> Result<Self, String> {
        let num_wires = cs.num_wires();
        let rows = cs
            .gates
            .iter()
            .enumerate()
            .map(|(index, gate)| {
                let wires = gate.wires();
                if let Some(w) = wires.iter().flatten().find(|&&w| w >= num_wires) {
                    return Err(format!("gate {index} references wire {w} of {num_wires}"));
                }
                Ok(Row {
                    wires,
                    selectors: [
                        to_halo2(&gate.ql)?,
                        to_halo2(&gate.qr)?,
                        to_halo2(&gate.qo)?,
                        to_halo2(&gate.qm)?,
                        to_halo2(&gate.qc)?,
                    ],
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let values = witness
            .map(|w| to_halo2_vec(&SparseR1cs::assignment(w)))
            .transpose()?;
        if let Some(found) = values.as_ref().map(Vec::len).filter(|&n| n != num_wires) {
            return Err(format!("witness has {found} wires, circuit has {num_wires}"));
        }
        Ok(Self {
            num_public: cs.num_public as usize,
            num_wires,
            rows,
            values,
        })
    }

    /// Domain size exponent: the smallest `k` whose `2^k` rows fit the
    /// public rows, the gates, and halo2's reserved rows.
    pub fn k(&self) -> u32 {
        let rows = self.num_public + self.rows.len() + RESERVED_ROWS;
        rows.next_power_of_two().trailing_zeros().max(MIN_K)
    }

    fn value(&self, wire: usize) -> Value<Halo2Fr> {
        match &self.values {
            Some(values) => Value::known(values[wire]),
            None => Value::unknown(),
        }
    }
}

impl Circuit<Halo2Fr> for PlonkCircuit {
    type Config = PlonkConfig;
    type FloorPlanner = SimpleFloorPlanner;

    fn without_witnesses(&self) -> Self {
        Self {
            values: None,
            ..self.clone()
        }
    }

    fn configure(meta: &mut Halo2ConstraintSystem<Halo2Fr>) -> PlonkConfig {
        let wires = [(); 3].map(|_| meta.advice_column());
        let selectors = [(); 5].map(|_| meta.fixed_column());
        let instance = meta.instance_column();
        for column in wires {
            meta.enable_equality(column);
        }
        meta.enable_equality(instance);

        meta.create_gate("qL·a + qR·b + qO·c + qM·a·b + qC", |meta| {
            let [a, b, c] = wires.map(|col| meta.query_advice(col, Rotation::cur()));
            let [ql, qr, qo, qm, qc] = selectors.map(|col| meta.query_fixed(col, Rotation::cur()));
            vec![ql * a.clone() + qr * b.clone() + qo * c + qm * a * b + qc]
        });

        PlonkConfig {
            wires,
            selectors,
            instance,
        }
    }

    fn synthesize(
        &self,
        config: PlonkConfig,
        mut layouter: impl Layouter<Halo2Fr>,
    ) -> Result<(), plonk::Error> {
        let public_cells = layouter.assign_region(
            || "gates",
            |mut region| {
                let mut canonical: Vec<Option<Cell>> = vec![None; self.num_wires];
                for (row, slot) in canonical.iter_mut().enumerate().take(self.num_public) {
                    let cell = region.assign_advice(
                        || "public",
                        config.wires[0],
                        row,
                        || self.value(row),
                    )?;
                    *slot = Some(cell.cell());
                }
                for (index, gate) in self.rows.iter().enumerate() {
                    let row = self.num_public + index;
                    for (column, q) in config.selectors.into_iter().zip(gate.selectors) {
                        region.assign_fixed(|| "selector", column, row, || Value::known(q))?;
                    }
                    for (column, wire) in config.wires.into_iter().zip(gate.wires) {
                        let Some(wire) = wire else { continue };
                        let cell = region
                            .assign_advice(|| "wire", column, row, || self.value(wire))?
                            .cell();
                        match canonical[wire] {
                            Some(first) => region.constrain_equal(first, cell)?,
                            None => canonical[wire] = Some(cell),
                        }
                    }
                }
                Ok(canonical
                    .into_iter()
                    .take(self.num_public)
                    .flatten()
                    .collect::<Vec<_>>())
            },
        )?;
        for (row, cell) in public_cells.into_iter().enumerate() {
            layouter.constrain_instance(cell, config.instance, row)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Keys and proofs
// ---------------------------------------------------------------------------

/// PLONK proving key with the parameters it was generated under.
#[derive(Debug, Clone)]
pub struct PlonkProvingKey {
    /// KZG parameters, truncated to the circuit's domain.
    pub params: ParamsKZG<Bn256>,
    /// halo2 proving key.
    pub pk: ProvingKey<G1Affine>,
}

/// PLONK verifying key with the parameters it was generated under.
#[derive(Debug, Clone)]
pub struct PlonkVerifyingKey {
    /// Number of public inputs the circuit exposes.
    pub num_public: u32,
    /// KZG parameters, truncated to the circuit's domain.
    pub params: ParamsKZG<Bn256>,
    /// halo2 verifying key.
    pub vk: VerifyingKey<G1Affine>,
}

impl WriteRaw for PlonkProvingKey {
    fn write_raw<W: Write>(&self, writer: &mut W) -> Result<(), RawError> {
        self.params.write(writer)?;
        self.pk.write(writer, KEY_FORMAT)?;
        Ok(())
    }
}

impl ReadRaw for PlonkProvingKey {
    fn read_raw<R: Read>(reader: &mut R) -> Result<Self, RawError> {
        let params = ParamsKZG::<Bn256>::read(reader)?;
        let pk = ProvingKey::<G1Affine>::read::<_, PlonkCircuit>(reader, KEY_FORMAT)?;
        Ok(Self { params, pk })
    }
}

impl WriteRaw for PlonkVerifyingKey {
    fn write_raw<W: Write>(&self, writer: &mut W) -> Result<(), RawError> {
        writer.write_all(&self.num_public.to_le_bytes())?;
        self.params.write(writer)?;
        self.vk.write(writer, KEY_FORMAT)?;
        Ok(())
    }
}

impl ReadRaw for PlonkVerifyingKey {
    fn read_raw<R: Read>(reader: &mut R) -> Result<Self, RawError> {
        let mut num_public = [0u8; 4];
        reader.read_exact(&mut num_public)?;
        let params = ParamsKZG::<Bn256>::read(reader)?;
        let vk = VerifyingKey::<G1Affine>::read::<_, PlonkCircuit>(reader, KEY_FORMAT)?;
        Ok(Self {
            num_public: u32::from_le_bytes(num_public),
            params,
            vk,
        })
    }
}

/// A PLONK proof transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlonkProof {
    /// Transcript bytes, hex-encoded with a `0x` prefix in JSON.
    #[serde(with = "hex_bytes")]
    pub proof: Vec<u8>,
}

/// Serde helper for `0x`-prefixed hex byte strings.
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| serde::de::Error::custom("proof must start with 0x"))?;
        hex::decode(digits).map_err(serde::de::Error::custom)
    }
}

/// PLONK proof system implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlonkProofSystem;

impl ProofSystem for PlonkProofSystem {
    const BACKEND: Backend = Backend::Plonk;

    type ConstraintSystem = SparseR1cs;
    type ProvingKey = PlonkProvingKey;
    type VerifyingKey = PlonkVerifyingKey;
    type Proof = PlonkProof;

    fn setup(&self, cs: &SparseR1cs, mode: &SetupMode) -> Result<KeyPair<Self>, SetupError> {
        let started = Instant::now();
        let circuit = PlonkCircuit::new(cs, None).map_err(SetupError::Conversion)?;
        let k = circuit.k();
        let params = match mode {
            SetupMode::Dummy => dummy_params(k),
            SetupMode::Trusted(source) => source.load(k)?,
        };
        let vk = keygen_vk(&params, &circuit)?;
        let pk = keygen_pk(&params, vk.clone(), &circuit)?;
        let vk = match mode {
            SetupMode::Dummy => None,
            SetupMode::Trusted(_) => Some(PlonkVerifyingKey {
                num_public: cs.num_public,
                params: params.clone(),
                vk,
            }),
        };
        tracing::info!(
            backend = %Self::BACKEND,
            dummy = mode.is_dummy(),
            k,
            gates = cs.gates.len(),
            elapsed = ?started.elapsed(),
            "setup complete"
        );
        Ok(KeyPair {
            pk: PlonkProvingKey { params, pk },
            vk,
        })
    }

    fn prove(
        &self,
        cs: &SparseR1cs,
        pk: &PlonkProvingKey,
        witness: &Witness,
    ) -> Result<PlonkProof, ProofError> {
        check_witness(cs, witness)?;
        let circuit = PlonkCircuit::new(cs, Some(witness)).map_err(ProofError::Conversion)?;
        let key = pk.pk.get_vk().get_domain().k();
        if circuit.k() != key {
            return Err(ProofError::DomainMismatch {
                key,
                circuit: circuit.k(),
            });
        }
        let instances = to_halo2_vec(&witness.public).map_err(ProofError::Conversion)?;

        let started = Instant::now();
        let mut transcript = Blake2bWrite::<_, G1Affine, Challenge255<_>>::init(vec![]);
        create_proof::<
            KZGCommitmentScheme<Bn256>,
            ProverSHPLONK<'_, Bn256>,
            Challenge255<G1Affine>,
            _,
            Blake2bWrite<Vec<u8>, G1Affine, Challenge255<G1Affine>>,
            _,
        >(
            &pk.params,
            &pk.pk,
            &[circuit],
            &[&[instances.as_slice()]],
            OsRng,
            &mut transcript,
        )?;
        let proof = transcript.finalize();
        tracing::info!(
            backend = %Self::BACKEND,
            bytes = proof.len(),
            elapsed = ?started.elapsed(),
            "proof generated"
        );
        Ok(PlonkProof { proof })
    }

    fn verify(
        &self,
        vk: &PlonkVerifyingKey,
        proof: &PlonkProof,
        public: &PublicWitness,
    ) -> Result<bool, VerifyError> {
        if public.values.len() != vk.num_public as usize {
            return Err(VerifyError::KeyMismatch {
                expected: vk.num_public as usize,
                found: public.values.len(),
            });
        }
        let instances = to_halo2_vec(&public.values).map_err(VerifyError::Conversion)?;

        let started = Instant::now();
        let mut transcript =
            Blake2bRead::<_, G1Affine, Challenge255<_>>::init(proof.proof.as_slice());
        let valid = verify_proof::<
            KZGCommitmentScheme<Bn256>,
            VerifierSHPLONK<'_, Bn256>,
            Challenge255<G1Affine>,
            Blake2bRead<&[u8], G1Affine, Challenge255<G1Affine>>,
            SingleStrategy<'_, Bn256>,
        >(
            &vk.params,
            &vk.vk,
            SingleStrategy::new(&vk.params),
            &[&[instances.as_slice()]],
            &mut transcript,
        )
        .is_ok();
        tracing::info!(
            backend = %Self::BACKEND,
            valid,
            elapsed = ?started.elapsed(),
            "proof verified"
        );
        Ok(valid)
    }
}
