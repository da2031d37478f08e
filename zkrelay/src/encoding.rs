//! ABI layout of the Groth16 proof expected by the verifier contract:
//! `(uint256[2] a, uint256[2][2] b, uint256[2] c)`.
//!
//! The pairing precompile takes G2 coordinates as `(c1, c0)`, so each row of
//! `pi_b` is swapped relative to the snarkjs output. Only the first two
//! entries of every array are used; the trailing projective coordinate is
//! dropped.

use alloy::{primitives::{Bytes, U256}, sol_types::SolValue};

use crate::{error::RequestError, request::ProofBundle, utils::decimal_to_u256};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolidityProof {
    pub a: [U256; 2],
    pub b: [[U256; 2]; 2],
    pub c: [U256; 2],
}

impl SolidityProof {
    pub fn from_bundle(bundle: &ProofBundle) -> Result<Self, RequestError> {
        Ok(Self {
            a: g1("pi_a", &bundle.pi_a)?,
            b: g2("pi_b", &bundle.pi_b)?,
            c: g1("pi_c", &bundle.pi_c)?,
        })
    }

    pub fn abi_encode(&self) -> Bytes {
        (self.a, self.b, self.c).abi_encode_params().into()
    }
}

pub fn encode_proof(bundle: &ProofBundle) -> Result<Bytes, RequestError> {
    SolidityProof::from_bundle(bundle).map(|proof| proof.abi_encode())
}

fn g1(field: &str, coords: &[String]) -> Result<[U256; 2], RequestError> {
    RequestError::ensure_len(field, coords.len(), 2)?;
    Ok([
        uint(format!("{field}[0]"), &coords[0])?,
        uint(format!("{field}[1]"), &coords[1])?,
    ])
}

fn g2(field: &str, rows: &[Vec<String>]) -> Result<[[U256; 2]; 2], RequestError> {
    RequestError::ensure_len(field, rows.len(), 2)?;

    let mut out = [[U256::ZERO; 2]; 2];
    for (i, row) in rows.iter().take(2).enumerate() {
        let [c0, c1] = g1(&format!("{field}[{i}]"), row)?;
        out[i] = [c1, c0];
    }
    Ok(out)
}

fn uint(field: String, value: &str) -> Result<U256, RequestError> {
    decimal_to_u256(value).map_err(|e| RequestError::invalid_field(field, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bundle(values: [u64; 8]) -> ProofBundle {
        let s = |i: usize| values[i].to_string();
        ProofBundle {
            pi_a: vec![s(0), s(1), "1".into()],
            pi_b: vec![vec![s(2), s(3)], vec![s(4), s(5)], vec!["1".into(), "0".into()]],
            pi_c: vec![s(6), s(7), "1".into()],
        }
    }

    fn words(encoded: &[u8]) -> Vec<U256> {
        encoded.chunks(32).map(U256::from_be_slice).collect()
    }

    #[test]
    fn encodes_eight_static_words() {
        let encoded = encode_proof(&bundle([1, 2, 3, 4, 5, 6, 7, 8])).unwrap();

        assert_eq!(encoded.len(), 8 * 32);
        let expected: Vec<U256> = [1u64, 2, 4, 3, 6, 5, 7, 8].into_iter().map(U256::from).collect();
        assert_eq!(words(&encoded), expected);
    }

    #[test]
    fn rejects_short_arrays() {
        let mut short = bundle([1; 8]);
        short.pi_a.truncate(1);
        assert_eq!(
            encode_proof(&short),
            Err(RequestError::TooShort {
                field: "pi_a".into(),
                expected: 2,
                actual: 1,
            })
        );

        let mut short = bundle([1; 8]);
        short.pi_b[1].truncate(1);
        assert_eq!(
            encode_proof(&short),
            Err(RequestError::TooShort {
                field: "pi_b[1]".into(),
                expected: 2,
                actual: 1,
            })
        );

        let mut short = bundle([1; 8]);
        short.pi_b.truncate(1);
        assert!(matches!(
            encode_proof(&short),
            Err(RequestError::TooShort { field, .. }) if field == "pi_b"
        ));
    }

    #[test]
    fn rejects_non_decimal_coordinates() {
        let mut bad = bundle([1; 8]);
        bad.pi_c[1] = "not-a-number".into();
        assert!(matches!(
            encode_proof(&bad),
            Err(RequestError::InvalidField { field, .. }) if field == "pi_c[1]"
        ));
    }

    proptest! {
        #[test]
        fn g2_rows_are_swapped(values in any::<[u64; 8]>()) {
            let proof = SolidityProof::from_bundle(&bundle(values)).unwrap();
            let u = |i: usize| U256::from(values[i]);

            prop_assert_eq!(proof.a, [u(0), u(1)]);
            prop_assert_eq!(proof.b, [[u(3), u(2)], [u(5), u(4)]]);
            prop_assert_eq!(proof.c, [u(6), u(7)]);
        }
    }
}
