//! # pwrap-cli — plonky2 Wrapper Command-Line Interface
//!
//! Wraps a plonky2 proof in a BN254 proof that an Ethereum contract can
//! check. One invocation runs any of three stages, always in this order:
//!
//! - `--compile`: compile the verifier circuit, run setup, save the
//!   constraint system and keys, and export `Verifier.sol`
//! - `--prove`: derive the witness, prove, save the proof and public witness
//! - `--verify`: check the persisted proof against the persisted key
//!
//! ## Crate Policy
//!
//! - Argument parsing ([`Cli`]) is separated from the resolved
//!   configuration ([`Settings`]).
//! - The backend is matched exactly once, in [`run`]. Every stage is
//!   generic over [`ProofSystem`].
//! - Handlers delegate to the library crates and add context to errors.

pub mod compile;
pub mod prove;
pub mod verify;

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use pwrap_circuit::Plonky2VerifierCircuit;
use pwrap_core::{Backend, CircuitDescriptor, CircuitDir, DataDir};
use pwrap_store::ArtifactStore;
use pwrap_zkp::{
    Groth16ProofSystem, PlonkProofSystem, ProofSystem, SetupMode, SrsSource, DEFAULT_SRS_URL,
};

use anyhow::Context;

/// Wrap plonky2 proofs in PLONK or Groth16 proofs over BN254.
#[derive(Parser, Debug, Clone)]
#[command(name = "pwrap", version, about)]
pub struct Cli {
    /// Directory holding the plonky2 descriptor files.
    #[arg(long, value_name = "DIR")]
    pub circuit: PathBuf,

    /// Output directory. A `plonk` or `groth16` subdirectory is appended.
    #[arg(long, value_name = "DIR")]
    pub data: PathBuf,

    /// Outer proof system: `plonk` or `groth16`.
    #[arg(long, value_name = "SYSTEM", default_value = "groth16")]
    pub proof_system: Backend,

    /// Insecure setup from a public seed. No verifying key is produced.
    #[arg(long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    pub dummy: bool,

    /// Compile the circuit, run setup, and save the keys.
    #[arg(long)]
    pub compile: bool,

    /// Derive the witness, prove, and save the proof.
    #[arg(long)]
    pub prove: bool,

    /// Verify the saved proof.
    #[arg(long)]
    pub verify: bool,

    /// Export `Verifier.sol` after compiling.
    #[arg(long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    pub contract: bool,

    /// SRS download URL; `{k}` is replaced by the domain size exponent.
    #[arg(long, value_name = "TEMPLATE", default_value = DEFAULT_SRS_URL)]
    pub srs_url: String,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,

    /// More output per occurrence (`-v` debug, `-vv` trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Resolved configuration of one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub circuit: CircuitDir,
    pub data: DataDir,
    pub backend: Backend,
    pub dummy: bool,
    pub compile: bool,
    pub prove: bool,
    pub verify: bool,
    pub contract: bool,
    pub srs_url: String,
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        Self {
            circuit: CircuitDir::new(cli.circuit),
            data: DataDir::new(cli.data, cli.proof_system),
            backend: cli.proof_system,
            dummy: cli.dummy,
            compile: cli.compile,
            prove: cli.prove,
            verify: cli.verify,
            contract: cli.contract,
            srs_url: cli.srs_url,
        }
    }
}

impl Settings {
    /// Setup mode; the SRS is cached inside the circuit directory.
    pub fn setup_mode(&self) -> SetupMode {
        if self.dummy {
            SetupMode::Dummy
        } else {
            SetupMode::Trusted(
                SrsSource::new(self.circuit.srs()).with_url_template(self.srs_url.clone()),
            )
        }
    }
}

/// Default log level for a `-v` count. `RUST_LOG` takes precedence.
pub fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Run the requested stages.
pub fn run(settings: &Settings) -> anyhow::Result<()> {
    match settings.backend {
        Backend::Plonk => pipeline(&PlonkProofSystem, settings),
        Backend::Groth16 => pipeline(&Groth16ProofSystem, settings),
    }
}

fn pipeline<P: ProofSystem>(system: &P, settings: &Settings) -> anyhow::Result<()> {
    let store = ArtifactStore::new(settings.data.clone());
    if !(settings.compile || settings.prove || settings.verify) {
        tracing::warn!("nothing to do: pass --compile, --prove, or --verify");
    }
    if settings.dummy {
        tracing::warn!("dummy setup: keys are insecure and proofs cannot be verified");
    }
    if settings.compile {
        compile::run(system, settings, &store)?;
    }
    if settings.prove {
        prove::run(system, settings, &store)?;
    }
    if settings.verify {
        verify::run(system, settings, &store)?;
    }
    Ok(())
}

/// Load the descriptor files and build the verifier circuit.
pub(crate) fn load_circuit(dir: &CircuitDir) -> anyhow::Result<Plonky2VerifierCircuit> {
    let descriptor = CircuitDescriptor::load(dir)
        .with_context(|| format!("failed to load circuit {}", dir.root().display()))?;
    Plonky2VerifierCircuit::new(descriptor).context("circuit descriptor is not usable")
}
