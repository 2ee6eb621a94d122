//! # pwrap-store — Artifact Persistence
//!
//! Saves and loads everything the wrapper writes to its data directory:
//!
//! ```text
//! <data>/<backend>/r1cs.bin            constraint system (raw)
//! <data>/<backend>/pk.bin              proving key (raw)
//! <data>/<backend>/vk.bin              verifying key (raw, trusted setup only)
//! <data>/<backend>/proof.json          proof
//! <data>/<backend>/public_witness.bin  public witness (raw)
//! <data>/<backend>/Verifier.sol        Solidity verifier
//! ```
//!
//! ## Integrity Invariant
//!
//! Loading never yields a default or partially decoded value. A truncated
//! file, an invalid point, or trailing data after the encoded value is an
//! error naming the file.
//!
//! Every save and load logs the path and the elapsed time.

pub mod error;

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use pwrap_circuit::PublicWitness;
use pwrap_core::DataDir;
use pwrap_zkp::{KeyPair, ProofSystem, ReadRaw, SolidityExport, WriteRaw};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use error::StoreError;

/// Artifacts of one backend under a data directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: DataDir,
}

impl ArtifactStore {
    /// Store over `dir`. Nothing is created until the first save.
    pub fn new(dir: DataDir) -> Self {
        Self { dir }
    }

    /// The backend data directory.
    pub fn dir(&self) -> &DataDir {
        &self.dir
    }

    /// Persist the compiled constraint system and the keys. `vk.bin` is
    /// written only when a verifying key exists; otherwise any `vk.bin` and
    /// `Verifier.sol` left by an earlier setup are removed.
    pub fn save_setup<P: ProofSystem>(
        &self,
        cs: &P::ConstraintSystem,
        keys: &KeyPair<P>,
    ) -> Result<(), StoreError> {
        self.create_dir()?;
        write_raw(&self.dir.constraint_system(), cs)?;
        write_raw(&self.dir.proving_key(), &keys.pk)?;
        match &keys.vk {
            Some(vk) => write_raw(&self.dir.verifying_key(), vk),
            None => {
                remove_stale(&self.dir.verifying_key())?;
                remove_stale(&self.dir.contract())
            }
        }
    }

    /// Load `r1cs.bin`.
    pub fn load_constraint_system<P: ProofSystem>(
        &self,
    ) -> Result<P::ConstraintSystem, StoreError> {
        read_raw(&self.dir.constraint_system())
    }

    /// Load `pk.bin`.
    pub fn load_proving_key<P: ProofSystem>(&self) -> Result<P::ProvingKey, StoreError> {
        read_raw(&self.dir.proving_key())
    }

    /// Load `vk.bin`.
    pub fn load_verifying_key<P: ProofSystem>(&self) -> Result<P::VerifyingKey, StoreError> {
        read_raw(&self.dir.verifying_key())
    }

    /// Whether `vk.bin` exists.
    pub fn has_verifying_key(&self) -> bool {
        self.dir.verifying_key().is_file()
    }

    /// Persist `proof.json` and `public_witness.bin`.
    pub fn save_proof<P: ProofSystem>(
        &self,
        proof: &P::Proof,
        public: &PublicWitness,
    ) -> Result<(), StoreError> {
        self.create_dir()?;
        write_json(&self.dir.proof(), proof)?;
        write_raw(&self.dir.public_witness(), public)
    }

    /// Load `proof.json`.
    pub fn load_proof<P: ProofSystem>(&self) -> Result<P::Proof, StoreError> {
        read_json(&self.dir.proof())
    }

    /// Load `public_witness.bin`.
    pub fn load_public_witness(&self) -> Result<PublicWitness, StoreError> {
        read_raw(&self.dir.public_witness())
    }

    /// Write `Verifier.sol` for `vk`.
    pub fn export_contract<P: ProofSystem>(&self, vk: &P::VerifyingKey) -> Result<(), StoreError> {
        self.create_dir()?;
        let path = self.dir.contract();
        let started = Instant::now();
        let source = vk.export_solidity();
        fs::write(&path, &source).map_err(StoreError::io("write", &path))?;
        tracing::info!(
            path = %path.display(),
            bytes = source.len(),
            elapsed = ?started.elapsed(),
            "contract exported"
        );
        Ok(())
    }

    fn create_dir(&self) -> Result<(), StoreError> {
        let root = self.dir.root();
        fs::create_dir_all(root).map_err(StoreError::io("create", root))
    }
}

fn remove_stale(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "removed stale artifact");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::io("remove", path)(e)),
    }
}

fn create(path: &Path) -> Result<BufWriter<File>, StoreError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(StoreError::io("create", path))
}

fn open(path: &Path) -> Result<BufReader<File>, StoreError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(StoreError::io("open", path))
}

fn write_raw<T: WriteRaw>(path: &Path, value: &T) -> Result<(), StoreError> {
    let started = Instant::now();
    let mut writer = create(path)?;
    value
        .write_raw(&mut writer)
        .map_err(|source| StoreError::Raw {
            path: path.to_path_buf(),
            source,
        })?;
    writer.flush().map_err(StoreError::io("write", path))?;
    tracing::info!(path = %path.display(), elapsed = ?started.elapsed(), "saved");
    Ok(())
}

fn read_raw<T: ReadRaw>(path: &Path) -> Result<T, StoreError> {
    let started = Instant::now();
    let mut reader = open(path)?;
    let value = T::read_raw(&mut reader).map_err(|source| StoreError::Raw {
        path: path.to_path_buf(),
        source,
    })?;
    let rest = reader.fill_buf().map_err(StoreError::io("read", path))?;
    if !rest.is_empty() {
        return Err(StoreError::TrailingBytes {
            path: path.to_path_buf(),
        });
    }
    tracing::info!(path = %path.display(), elapsed = ?started.elapsed(), "loaded");
    Ok(value)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let started = Instant::now();
    let mut writer = create(path)?;
    serde_json::to_writer(&mut writer, value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(StoreError::io("write", path))?;
    tracing::info!(path = %path.display(), elapsed = ?started.elapsed(), "saved");
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let started = Instant::now();
    let value = serde_json::from_reader(open(path)?).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), elapsed = ?started.elapsed(), "loaded");
    Ok(value)
}
