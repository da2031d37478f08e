use alloy::primitives::TxHash;
use log::{debug, info, warn};

use crate::{
    contract::{EmailProof, ProofContract},
    error::SubmitError,
};

/// A mined `verifyEmailProof` transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub tx_hash: TxHash,
    pub block_number: u64,
}

/// Runs simulate → submit → confirm. There is no retry: the first failing
/// stage aborts the pipeline.
pub async fn submit_proof(
    contract: &dyn ProofContract,
    proof: &EmailProof,
) -> Result<Submission, SubmitError> {
    debug!("Simulating verifyEmailProof on {}", contract.address());
    if !contract.simulate(proof).await? {
        warn!("Contract reports the proof as invalid; submitting anyway");
    }

    let tx_hash = contract.submit(proof).await?;
    info!("Transaction {} broadcast, waiting for receipt", tx_hash);

    let confirmation = contract.confirm(tx_hash).await?;
    if !confirmation.success {
        return Err(SubmitError::Reverted {
            tx_hash,
            block_number: confirmation.block_number,
        });
    }

    info!(
        "Transaction {} mined in block {}",
        tx_hash, confirmation.block_number
    );
    Ok(Submission {
        tx_hash,
        block_number: confirmation.block_number,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use alloy::primitives::{Address, Bytes, B256, U256};
    use async_trait::async_trait;

    use super::*;
    use crate::contract::Confirmation;

    #[derive(Default)]
    struct ScriptedContract {
        fail_at: Option<&'static str>,
        reverted: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl ScriptedContract {
        fn step(&self, stage: &'static str) -> Result<(), String> {
            self.calls.lock().unwrap().push(stage);
            match self.fail_at {
                Some(s) if s == stage => Err(format!("{stage} exploded")),
                _ => Ok(()),
            }
        }
    }

    #[async_trait]
    impl ProofContract for ScriptedContract {
        async fn simulate(&self, _proof: &EmailProof) -> Result<bool, SubmitError> {
            self.step("simulate").map_err(SubmitError::Simulation)?;
            Ok(true)
        }

        async fn submit(&self, _proof: &EmailProof) -> Result<TxHash, SubmitError> {
            self.step("submit").map_err(SubmitError::Submission)?;
            Ok(B256::repeat_byte(0xab))
        }

        async fn confirm(&self, tx_hash: TxHash) -> Result<Confirmation, SubmitError> {
            self.step("confirm")
                .map_err(|reason| SubmitError::Confirmation { tx_hash, reason })?;
            Ok(Confirmation {
                block_number: 42,
                success: !self.reverted,
            })
        }

        fn address(&self) -> Address {
            Address::ZERO
        }

        fn signer(&self) -> Address {
            Address::ZERO
        }

        fn chain_id(&self) -> u64 {
            31337
        }
    }

    fn proof() -> EmailProof {
        EmailProof {
            domainName: "abc|def|ghi".into(),
            publicKeyHash: B256::ZERO,
            timestamp: U256::from(1u8),
            maskedCommand: String::new(),
            emailNullifier: B256::ZERO,
            accountSalt: B256::ZERO,
            isCodeExist: false,
            proof: Bytes::new(),
        }
    }

    #[tokio::test]
    async fn runs_stages_in_order() {
        let contract = ScriptedContract::default();
        let submission = submit_proof(&contract, &proof()).await.unwrap();

        assert_eq!(submission.tx_hash, B256::repeat_byte(0xab));
        assert_eq!(submission.block_number, 42);
        assert_eq!(*contract.calls.lock().unwrap(), ["simulate", "submit", "confirm"]);
    }

    #[tokio::test]
    async fn failed_simulation_never_broadcasts() {
        let contract = ScriptedContract {
            fail_at: Some("simulate"),
            ..Default::default()
        };
        let err = submit_proof(&contract, &proof()).await.unwrap_err();

        assert_eq!(err, SubmitError::Simulation("simulate exploded".into()));
        assert_eq!(err.tx_hash(), None);
        assert_eq!(*contract.calls.lock().unwrap(), ["simulate"]);
    }

    #[tokio::test]
    async fn confirmation_failure_keeps_hash() {
        let contract = ScriptedContract {
            fail_at: Some("confirm"),
            ..Default::default()
        };
        let err = submit_proof(&contract, &proof()).await.unwrap_err();

        assert_eq!(err.tx_hash(), Some(B256::repeat_byte(0xab)));
        assert_eq!(err.to_string(), "confirm exploded");
    }

    #[tokio::test]
    async fn reverted_receipt_is_an_error() {
        let contract = ScriptedContract {
            reverted: true,
            ..Default::default()
        };
        let err = submit_proof(&contract, &proof()).await.unwrap_err();

        assert_eq!(
            err,
            SubmitError::Reverted {
                tx_hash: B256::repeat_byte(0xab),
                block_number: 42,
            }
        );
    }
}
