//! Dummy setup: keys without a verifying key, proofs that are never checked.

mod common;

use common::Workspace;
use pwrap_core::Backend;

#[test]
fn dummy_run_writes_no_verifying_key_or_contract() {
    for backend in Backend::ALL {
        let ws = Workspace::new();
        pwrap_cli::run(&ws.settings(backend, &["--compile", "--prove"])).unwrap();

        let dir = ws.store(backend).dir().clone();
        assert!(dir.constraint_system().is_file());
        assert!(dir.proving_key().is_file());
        assert!(dir.proof().is_file());
        assert!(dir.public_witness().is_file());
        assert!(!dir.verifying_key().exists(), "{backend}: vk.bin written");
        assert!(!dir.contract().exists(), "{backend}: Verifier.sol written");
    }
}

#[test]
fn verify_is_refused_in_dummy_mode() {
    let ws = Workspace::new();
    let err = pwrap_cli::run(&ws.settings(Backend::Groth16, &["--compile", "--prove", "--verify"]))
        .unwrap_err();
    assert!(err.to_string().contains("dummy mode"));
}

#[test]
fn verify_with_real_flag_after_dummy_setup_finds_no_key() {
    let ws = Workspace::new();
    pwrap_cli::run(&ws.settings(Backend::Groth16, &["--compile", "--prove"])).unwrap();
    let err = pwrap_cli::run(&ws.settings(Backend::Groth16, &["--dummy", "false", "--verify"]))
        .unwrap_err();
    assert!(format!("{err:#}").contains("vk.bin"));
}

#[test]
fn dummy_setup_is_deterministic() {
    let a = Workspace::new();
    let b = Workspace::new();
    pwrap_cli::run(&a.settings(Backend::Groth16, &["--compile"])).unwrap();
    pwrap_cli::run(&b.settings(Backend::Groth16, &["--compile"])).unwrap();
    assert_eq!(
        std::fs::read(a.store(Backend::Groth16).dir().proving_key()).unwrap(),
        std::fs::read(b.store(Backend::Groth16).dir().proving_key()).unwrap()
    );
}

#[test]
fn dummy_compile_over_real_compile_leaves_no_verifying_key() {
    let ws = Workspace::new();
    pwrap_cli::run(&ws.settings(Backend::Groth16, &["--dummy", "false", "--compile"])).unwrap();
    let dir = ws.store(Backend::Groth16).dir().clone();
    assert!(dir.verifying_key().is_file());
    assert!(dir.contract().is_file());

    pwrap_cli::run(&ws.settings(Backend::Groth16, &["--dummy", "true", "--compile"])).unwrap();
    assert!(!dir.verifying_key().exists());
    assert!(!dir.contract().exists());
    assert!(dir.proving_key().is_file());
}
