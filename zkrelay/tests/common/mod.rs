#![allow(dead_code)]

use std::{collections::HashSet, sync::Mutex};

use alloy::primitives::{address, keccak256, Address, TxHash, B256};
use ark_bn254::{G1Affine, G2Affine};
use ark_ec::AffineCurve;
use async_trait::async_trait;
use zkrelay::{
    contract::{Confirmation, EmailProof, ProofContract},
    error::SubmitError,
    request::{signal, JwtHeader, JwtPayload, ProofBundle, SubmitProofRequest},
    utils::field_to_string,
};

pub const BLOCK_NUMBER: u64 = 12_345_678;
pub const CHAIN_ID: u64 = 31337;
pub const CONTRACT: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
pub const SIGNER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

pub const NULLIFIER_USED: &str = "execution reverted: email nullifier already used";

/// In-memory stand-in for the deployed verifier. Rejects a nullifier the
/// second time it is submitted.
#[derive(Default)]
pub struct MockContract {
    pub fail_submit: Option<String>,
    pub fail_confirm: Option<String>,
    pub(crate) nullifiers: Mutex<HashSet<B256>>,
    pub(crate) submitted: Mutex<Vec<EmailProof>>,
}

impl MockContract {
    pub fn submitted(&self) -> Vec<EmailProof> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProofContract for MockContract {
    async fn simulate(&self, proof: &EmailProof) -> Result<bool, SubmitError> {
        if self.nullifiers.lock().unwrap().contains(&proof.emailNullifier) {
            return Err(SubmitError::Simulation(NULLIFIER_USED.to_string()));
        }
        Ok(true)
    }

    async fn submit(&self, proof: &EmailProof) -> Result<TxHash, SubmitError> {
        if let Some(reason) = &self.fail_submit {
            return Err(SubmitError::Submission(reason.clone()));
        }

        self.nullifiers.lock().unwrap().insert(proof.emailNullifier);
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(proof.clone());
        Ok(keccak256((submitted.len() as u64).to_be_bytes()))
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<Confirmation, SubmitError> {
        if let Some(reason) = &self.fail_confirm {
            return Err(SubmitError::Confirmation {
                tx_hash,
                reason: reason.clone(),
            });
        }
        Ok(Confirmation {
            block_number: BLOCK_NUMBER,
            success: true,
        })
    }

    fn address(&self) -> Address {
        CONTRACT
    }

    fn signer(&self) -> Address {
        SIGNER
    }

    fn chain_id(&self) -> u64 {
        CHAIN_ID
    }
}

/// A proof made of the BN254 generators; valid group elements, not a valid proof.
pub fn generator_bundle() -> ProofBundle {
    let g1 = G1Affine::prime_subgroup_generator();
    let g2 = G2Affine::prime_subgroup_generator();

    ProofBundle {
        pi_a: vec![field_to_string(g1.x), field_to_string(g1.y), "1".into()],
        pi_b: vec![
            vec![field_to_string(g2.x.c0), field_to_string(g2.x.c1)],
            vec![field_to_string(g2.y.c0), field_to_string(g2.y.c1)],
            vec!["1".into(), "0".into()],
        ],
        pi_c: vec![field_to_string(g1.x), field_to_string(g1.y), "1".into()],
    }
}

pub fn valid_request() -> SubmitProofRequest {
    let mut signals: Vec<String> = vec!["0".to_string(); signal::MIN_LEN];
    signals[signal::PUBLIC_KEY_HASH] = "255".into();
    signals[signal::EMAIL_NULLIFIER] = "4096".into();
    signals[signal::TIMESTAMP] = "1700000000".into();
    signals[signal::ACCOUNT_SALT] = "1".into();
    signals[signal::IS_CODE_EXIST] = "1".into();

    SubmitProofRequest {
        proof: Some(generator_bundle()),
        pub_signals: Some(signals),
        header: Some(JwtHeader {
            kid: Some("abc".into()),
            ..Default::default()
        }),
        payload: Some(JwtPayload {
            iss: Some("def".into()),
            azp: Some("ghi".into()),
            nonce: Some("Send 0.12 TEST to 0xabc".into()),
        }),
    }
}
