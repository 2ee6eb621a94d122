//! # Solidity Export
//!
//! Renders a verifying key as a Solidity contract for `Verifier.sol`.
//!
//! - **Groth16**: a complete verifier over the BN254 precompiles (`0x06`
//!   add, `0x07` scalar multiplication, `0x08` pairing) with the key
//!   embedded as constants.
//! - **PLONK**: the key material an on-chain halo2 KZG verifier needs:
//!   domain size and generator, fixed and permutation commitments, the
//!   transcript representative, and the two KZG `G2` points.
//!
//! `G2` coordinates are laid out as `(x.c1, x.c0, y.c1, y.c0)`, the order
//! the pairing precompile reads them in.

use std::fmt::Write;

use ark_bn254::{Bn254, Fq, G1Affine, G2Affine};
use ark_ff::PrimeField;
use ark_groth16::VerifyingKey;
use halo2_proofs::halo2curves::bn256 as halo2_bn256;
use pwrap_circuit::field::to_decimal;

use crate::plonk::PlonkVerifyingKey;

/// Render a verifying key as Solidity source.
pub trait SolidityExport {
    /// Complete `Verifier.sol` contents.
    fn export_solidity(&self) -> String;
}

const HEADER: &str = "// SPDX-License-Identifier: MIT\npragma solidity ^0.8.19;\n";

const PRIME_Q: &str =
    "21888242871839275222246405745257275088696311157297823662689037894645226208583";
const SCALAR_FIELD: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

fn g1_decimal(p: &G1Affine) -> [String; 2] {
    if p.infinity {
        return ["0".into(), "0".into()];
    }
    [to_decimal(&p.x), to_decimal(&p.y)]
}

fn g2_decimal(p: &G2Affine) -> [String; 4] {
    if p.infinity {
        return ["0".into(), "0".into(), "0".into(), "0".into()];
    }
    [
        to_decimal(&p.x.c1),
        to_decimal(&p.x.c0),
        to_decimal(&p.y.c1),
        to_decimal(&p.y.c0),
    ]
}

fn constant(out: &mut String, name: &str, value: &str) {
    let _ = writeln!(out, "    uint256 constant {name} = {value};");
}

fn g2_constants(out: &mut String, name: &str, p: &[String; 4]) {
    for (suffix, value) in ["X_1", "X_0", "Y_1", "Y_0"].iter().zip(p) {
        constant(out, &format!("{name}_{suffix}"), value);
    }
}

const GROTH16_BODY: &str = r#"
    function negate(uint256 y) internal pure returns (uint256) {
        return y == 0 ? 0 : PRIME_Q - (y % PRIME_Q);
    }

    function ecAdd(uint256[2] memory p, uint256[2] memory q) internal view returns (uint256[2] memory r) {
        uint256[4] memory input = [p[0], p[1], q[0], q[1]];
        bool ok;
        assembly {
            ok := staticcall(gas(), 0x06, input, 0x80, r, 0x40)
        }
        require(ok, "ecAdd failed");
    }

    function ecMul(uint256[2] memory p, uint256 s) internal view returns (uint256[2] memory r) {
        uint256[3] memory input = [p[0], p[1], s];
        bool ok;
        assembly {
            ok := staticcall(gas(), 0x07, input, 0x60, r, 0x40)
        }
        require(ok, "ecMul failed");
    }

    /// @notice Verify a Groth16 proof.
    /// @param a Proof element A as (x, y).
    /// @param b Proof element B as ((x.c1, x.c0), (y.c1, y.c0)).
    /// @param c Proof element C as (x, y).
    /// @param input Public inputs, in wire order.
    function verifyProof(
        uint256[2] calldata a,
        uint256[2][2] calldata b,
        uint256[2] calldata c,
        uint256[] calldata input
    ) public view returns (bool) {
        require(input.length == NUM_PUBLIC_INPUTS, "wrong number of public inputs");
        uint256[2] memory vkX = [IC_X[0], IC_Y[0]];
        for (uint256 i = 0; i < NUM_PUBLIC_INPUTS; i++) {
            require(input[i] < SNARK_SCALAR_FIELD, "public input not in field");
            vkX = ecAdd(vkX, ecMul([IC_X[i + 1], IC_Y[i + 1]], input[i]));
        }

        uint256[24] memory p = [
            a[0], negate(a[1]), b[0][0], b[0][1], b[1][0], b[1][1],
            ALPHA_X, ALPHA_Y, BETA_X_1, BETA_X_0, BETA_Y_1, BETA_Y_0,
            vkX[0], vkX[1], GAMMA_X_1, GAMMA_X_0, GAMMA_Y_1, GAMMA_Y_0,
            c[0], c[1], DELTA_X_1, DELTA_X_0, DELTA_Y_1, DELTA_Y_0
        ];
        uint256[1] memory out;
        bool ok;
        assembly {
            ok := staticcall(gas(), 0x08, p, 0x300, out, 0x20)
        }
        return ok && out[0] == 1;
    }
}
"#;

impl SolidityExport for VerifyingKey<Bn254> {
    fn export_solidity(&self) -> String {
        let num_public = self.gamma_abc_g1.len().saturating_sub(1);
        let mut out = String::from(HEADER);
        out.push_str(
            "\n/// @title Groth16 verifier\n\
             /// @notice Generated by pwrap. Accepts iff\n\
             /// e(-A, B) * e(alpha, beta) * e(vk_x, gamma) * e(C, delta) == 1.\n\
             contract Verifier {\n",
        );
        constant(&mut out, "PRIME_Q", PRIME_Q);
        constant(&mut out, "SNARK_SCALAR_FIELD", SCALAR_FIELD);
        constant(&mut out, "NUM_PUBLIC_INPUTS", &num_public.to_string());
        out.push('\n');

        let [alpha_x, alpha_y] = g1_decimal(&self.alpha_g1);
        constant(&mut out, "ALPHA_X", &alpha_x);
        constant(&mut out, "ALPHA_Y", &alpha_y);
        g2_constants(&mut out, "BETA", &g2_decimal(&self.beta_g2));
        g2_constants(&mut out, "GAMMA", &g2_decimal(&self.gamma_g2));
        g2_constants(&mut out, "DELTA", &g2_decimal(&self.delta_g2));
        out.push('\n');

        let (xs, ys): (Vec<String>, Vec<String>) = self
            .gamma_abc_g1
            .iter()
            .map(|p| {
                let [x, y] = g1_decimal(p);
                (x, y)
            })
            .unzip();
        let n = self.gamma_abc_g1.len();
        let _ = writeln!(
            out,
            "    uint256[{n}] IC_X = [uint256({})];",
            xs.join(", ")
        );
        let _ = writeln!(
            out,
            "    uint256[{n}] IC_Y = [uint256({})];",
            ys.join(", ")
        );
        out.push_str(GROTH16_BODY);
        out
    }
}

// ---------------------------------------------------------------------------
// PLONK
// ---------------------------------------------------------------------------

fn halo2_fq(x: &halo2_bn256::Fq) -> String {
    to_decimal(&Fq::from_le_bytes_mod_order(&x.to_bytes()))
}

fn halo2_fr(x: &halo2_bn256::Fr) -> String {
    to_decimal(&ark_bn254::Fr::from_le_bytes_mod_order(&x.to_bytes()))
}

fn halo2_g2(p: &halo2_bn256::G2Affine) -> [String; 4] {
    [
        halo2_fq(&p.x.c1),
        halo2_fq(&p.x.c0),
        halo2_fq(&p.y.c1),
        halo2_fq(&p.y.c0),
    ]
}

fn g1_list(out: &mut String, function: &str, points: &[halo2_bn256::G1Affine]) {
    let _ = writeln!(
        out,
        "\n    function {function}() external pure returns (uint256[2][] memory points) {{"
    );
    let _ = writeln!(out, "        points = new uint256[2][]({});", points.len());
    for (i, p) in points.iter().enumerate() {
        let _ = writeln!(
            out,
            "        points[{i}] = [uint256({}), {}];",
            halo2_fq(&p.x),
            halo2_fq(&p.y)
        );
    }
    out.push_str("    }\n");
}

impl SolidityExport for PlonkVerifyingKey {
    fn export_solidity(&self) -> String {
        let domain = self.vk.get_domain();
        let mut out = String::from(HEADER);
        out.push_str(
            "\n/// @title PLONK verifying key\n\
             /// @notice Generated by pwrap. Key material of a halo2 circuit proven with\n\
             /// KZG commitments, SHPLONK openings and a Blake2b transcript.\n\
             contract Verifier {\n",
        );
        constant(&mut out, "K", &domain.k().to_string());
        constant(&mut out, "NUM_PUBLIC_INPUTS", &self.num_public.to_string());
        constant(&mut out, "OMEGA", &halo2_fr(&domain.get_omega()));
        constant(&mut out, "TRANSCRIPT_REPR", &halo2_fr(&self.vk.transcript_repr()));
        out.push('\n');
        g2_constants(&mut out, "G2", &halo2_g2(&self.params.g2()));
        g2_constants(&mut out, "S_G2", &halo2_g2(&self.params.s_g2()));

        g1_list(&mut out, "fixedCommitments", self.vk.fixed_commitments());
        g1_list(
            &mut out,
            "permutationCommitments",
            self.vk.permutation().commitments(),
        );
        out.push_str("}\n");
        out
    }
}
