//! Proving fails cleanly when its inputs are missing or invalid.

mod common;

use std::fs;

use common::Workspace;
use pwrap_core::layout::PROOF_WITH_PUBLIC_INPUTS;
use pwrap_core::Backend;
use pwrap_store::StoreError;
use pwrap_zkp::Groth16ProofSystem;

#[test]
fn missing_constraint_system_is_an_io_error() {
    let ws = Workspace::new();
    let err = pwrap_cli::run(&ws.settings(Backend::Groth16, &["--prove"])).unwrap_err();
    let store_err = err
        .chain()
        .find_map(|e| e.downcast_ref::<StoreError>())
        .unwrap();
    assert!(store_err.is_not_found());
    assert!(format!("{err:#}").contains("r1cs.bin"));

    let direct = ws
        .store(Backend::Groth16)
        .load_constraint_system::<Groth16ProofSystem>()
        .unwrap_err();
    assert!(direct.is_not_found());
}

#[test]
fn non_canonical_goldilocks_input_fails_witness_derivation() {
    let ws = Workspace::new();
    pwrap_cli::run(&ws.settings(Backend::Groth16, &["--compile"])).unwrap();

    let path = ws.circuit.join(PROOF_WITH_PUBLIC_INPUTS);
    let mut json: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    json["public_inputs"][0] = serde_json::json!(u64::MAX);
    fs::write(&path, serde_json::to_vec(&json).unwrap()).unwrap();

    let err = pwrap_cli::run(&ws.settings(Backend::Groth16, &["--prove"])).unwrap_err();
    assert!(format!("{err:#}").contains("non-canonical"));
    assert!(!ws.store(Backend::Groth16).dir().proof().exists());
}

#[test]
fn descriptor_with_wrong_shape_fails_compile() {
    let ws = Workspace::new();
    let path = ws.circuit.join(PROOF_WITH_PUBLIC_INPUTS);
    let mut json: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    json["public_inputs"].as_array_mut().unwrap().push(serde_json::json!(1));
    fs::write(&path, serde_json::to_vec(&json).unwrap()).unwrap();

    assert!(pwrap_cli::run(&ws.settings(Backend::Groth16, &["--compile"])).is_err());
    assert!(!ws.store(Backend::Groth16).dir().root().exists());
}

#[test]
fn changed_inputs_after_compile_still_prove() {
    let ws = Workspace::new();
    pwrap_cli::run(&ws.settings(Backend::Groth16, &["--dummy", "false", "--compile"])).unwrap();

    let path = ws.circuit.join(PROOF_WITH_PUBLIC_INPUTS);
    let mut json: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    json["public_inputs"][1] = serde_json::json!(12345u64);
    fs::write(&path, serde_json::to_vec(&json).unwrap()).unwrap();

    pwrap_cli::run(&ws.settings(Backend::Groth16, &["--dummy", "false", "--prove", "--verify"]))
        .unwrap();
}
