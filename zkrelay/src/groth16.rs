//! Local checks on the proof before it is sent on-chain.
//!
//! Points are always checked to be BN254 group elements. Full Groth16
//! verification runs only when a verifying key is configured.

use std::path::Path;

use ark_bn254::{Bn254, Fq, Fq2, Fr, G1Affine, G2Affine};
use ark_groth16::{Groth16, Proof, VerifyingKey};
use ark_serialize::CanonicalDeserialize;
use ark_snark::SNARK;
use log::{debug, info};

use crate::{error::RequestError, request::ProofBundle, utils::field_from_string};

pub fn load_verification_key<P: AsRef<Path>>(path: P) -> anyhow::Result<VerifyingKey<Bn254>> {
    let vk_bytes = std::fs::read(path.as_ref())?;
    let vk = VerifyingKey::deserialize_uncompressed(&*vk_bytes)?;
    info!(
        "Verification key loaded from {} ({} public inputs)",
        path.as_ref().display(),
        vk.gamma_abc_g1.len().saturating_sub(1)
    );
    Ok(vk)
}

/// Parses the snarkjs coordinates into affine points.
pub fn proof_from_bundle(bundle: &ProofBundle) -> Result<Proof<Bn254>, RequestError> {
    Ok(Proof {
        a: g1_point("pi_a", &bundle.pi_a)?,
        b: g2_point("pi_b", &bundle.pi_b)?,
        c: g1_point("pi_c", &bundle.pi_c)?,
    })
}

pub fn verify(
    vk: &VerifyingKey<Bn254>,
    proof: &Proof<Bn254>,
    pub_signals: &[String],
) -> Result<(), RequestError> {
    let inputs: Vec<Fr> = pub_signals
        .iter()
        .enumerate()
        .map(|(i, s)| {
            field_from_string(s).map_err(|e| RequestError::invalid_field(format!("pub_signals[{i}]"), e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let verified = Groth16::<Bn254>::verify(vk, &inputs, proof)
        .map_err(|e| RequestError::Verification(e.to_string()))?;
    debug!("Local proof verification result: {}", verified);

    if !verified {
        return Err(RequestError::ProofRejected);
    }
    Ok(())
}

fn fq(field: String, value: &str) -> Result<Fq, RequestError> {
    field_from_string(value).map_err(|e| RequestError::invalid_field(field, e))
}

fn g1_point(field: &'static str, coords: &[String]) -> Result<G1Affine, RequestError> {
    RequestError::ensure_len(field, coords.len(), 2)?;

    let x = fq(format!("{field}[0]"), &coords[0])?;
    let y = fq(format!("{field}[1]"), &coords[1])?;

    let point = G1Affine::new(x, y, false);
    if !point.is_on_curve() {
        return Err(RequestError::InvalidPoint(field));
    }
    Ok(point)
}

// snarkjs lists each G2 coordinate as [c0, c1].
fn g2_point(field: &'static str, rows: &[Vec<String>]) -> Result<G2Affine, RequestError> {
    RequestError::ensure_len(field, rows.len(), 2)?;

    let mut coords = Vec::with_capacity(2);
    for (i, row) in rows.iter().take(2).enumerate() {
        RequestError::ensure_len(format!("{field}[{i}]"), row.len(), 2)?;
        let c0 = fq(format!("{field}[{i}][0]"), &row[0])?;
        let c1 = fq(format!("{field}[{i}][1]"), &row[1])?;
        coords.push(Fq2::new(c0, c1));
    }

    let point = G2Affine::new(coords[0], coords[1], false);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(RequestError::InvalidPoint(field));
    }
    Ok(point)
}
