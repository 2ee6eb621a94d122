//! Shared setup for the end-to-end tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use pwrap_circuit::{compile, Plonky2VerifierCircuit, SparseR1cs};
use pwrap_cli::{Cli, Settings};
use pwrap_core::fixtures::{tiny_descriptor, write_circuit_dir};
use pwrap_core::{Backend, CircuitDescriptor, DataDir};
use pwrap_store::ArtifactStore;
use pwrap_zkp::plonk::PlonkCircuit;

/// Never reachable; any download attempt fails fast.
pub const OFFLINE_SRS_URL: &str = "http://127.0.0.1:9/srs-{k}";

/// A circuit directory with the tiny fixture and an empty data directory.
pub struct Workspace {
    _tmp: tempfile::TempDir,
    pub circuit: PathBuf,
    pub data: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        Self::with_descriptor(&tiny_descriptor())
    }

    pub fn with_descriptor(descriptor: &CircuitDescriptor) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let circuit = tmp.path().join("circuit");
        let data = tmp.path().join("data");
        write_circuit_dir(&circuit, descriptor).unwrap();
        Self {
            _tmp: tmp,
            circuit,
            data,
        }
    }

    /// Settings for `backend` with `extra` flags appended.
    pub fn settings(&self, backend: Backend, extra: &[&str]) -> Settings {
        let mut args = vec![
            "pwrap".to_string(),
            "--circuit".into(),
            self.circuit.display().to_string(),
            "--data".into(),
            self.data.display().to_string(),
            "--proof-system".into(),
            backend.to_string(),
            "--srs-url".into(),
            OFFLINE_SRS_URL.into(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Settings::from(Cli::try_parse_from(args).unwrap())
    }

    pub fn store(&self, backend: Backend) -> ArtifactStore {
        ArtifactStore::new(DataDir::new(&self.data, backend))
    }

    /// Pre-seed `srs_setup` one size above what the PLONK circuit needs, so
    /// loading has to downsize it.
    pub fn seed_srs(&self) {
        use halo2_proofs::halo2curves::bn256::Bn256;
        use halo2_proofs::poly::commitment::Params;
        use halo2_proofs::poly::kzg::commitment::ParamsKZG;
        use rand::SeedableRng;

        let descriptor = CircuitDescriptor::load(&pwrap_core::CircuitDir::new(&self.circuit)).unwrap();
        let cs: SparseR1cs = compile(&Plonky2VerifierCircuit::new(descriptor).unwrap()).unwrap();
        let k = PlonkCircuit::new(&cs, None).unwrap().k();
        let params = ParamsKZG::<Bn256>::setup(k + 1, rand_chacha::ChaCha20Rng::from_seed([3; 32]));
        let mut file = fs::File::create(self.circuit.join("srs_setup")).unwrap();
        params.write(&mut file).unwrap();
    }
}

/// Flip one bit of the byte at `offset` in `path`.
pub fn flip_byte(path: &Path, offset: usize) {
    let mut bytes = fs::read(path).unwrap();
    bytes[offset] ^= 0x01;
    fs::write(path, bytes).unwrap();
}
