use std::time::Duration;

use alloy::{
    network::{EthereumWallet, ReceiptResponse},
    primitives::{address, Address, TxHash},
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    sol,
};
use async_trait::async_trait;
use log::{debug, info};

use crate::{config::ServerConfig, error::SubmitError};

/// `JwtVerifier` deployment on Base Sepolia.
pub const JWT_VERIFIER_ADDRESS: Address = address!("0x04Dd7D48dbe268A957A7aED7FA6206D833c6A3bF");

sol! {
    #[sol(rpc, all_derives)]
    contract JwtVerifier {
        struct EmailProof {
            string domainName;
            bytes32 publicKeyHash;
            uint256 timestamp;
            string maskedCommand;
            bytes32 emailNullifier;
            bytes32 accountSalt;
            bool isCodeExist;
            bytes proof;
        }

        function verifyEmailProof(EmailProof memory proof) public returns (bool);
    }
}

pub use JwtVerifier::EmailProof;

/// Outcome of waiting for a transaction receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub block_number: u64,
    pub success: bool,
}

/// The on-chain verifier, one method per submission stage.
#[async_trait]
pub trait ProofContract: Send + Sync {
    /// Executes the call without broadcasting it and returns the contract's verdict.
    async fn simulate(&self, proof: &EmailProof) -> Result<bool, SubmitError>;

    /// Signs and broadcasts the call, returning as soon as the node accepts it.
    async fn submit(&self, proof: &EmailProof) -> Result<TxHash, SubmitError>;

    /// Waits until the transaction is mined.
    async fn confirm(&self, tx_hash: TxHash) -> Result<Confirmation, SubmitError>;

    fn address(&self) -> Address;

    fn signer(&self) -> Address;

    fn chain_id(&self) -> u64;
}

/// [`ProofContract`] backed by a JSON-RPC node and a local signing key.
pub struct JwtVerifierClient {
    contract: JwtVerifier::JwtVerifierInstance<DynProvider>,
    signer: Address,
    chain_id: u64,
    gas_limit: u64,
    receipt_timeout: Option<Duration>,
}

impl JwtVerifierClient {
    /// Builds an HTTP provider that signs with `signer` and checks that the
    /// node serves the configured chain.
    pub async fn connect(config: &ServerConfig, signer: PrivateKeySigner) -> anyhow::Result<Self> {
        let from = signer.address();
        let rpc_url: url::Url = config.rpc_url.parse()?;

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(rpc_url)
            .erased();

        Self::from_provider(config, provider, from).await
    }

    /// Wraps a ready provider. `signer` must be an account its wallet signs for.
    pub async fn from_provider(
        config: &ServerConfig,
        provider: DynProvider,
        signer: Address,
    ) -> anyhow::Result<Self> {
        let chain_id = provider.get_chain_id().await?;
        if chain_id != config.chain_id {
            anyhow::bail!(
                "node at `{}` serves chain {chain_id}, expected {}",
                config.rpc_url,
                config.chain_id
            );
        }
        info!(
            "Connected to chain {} at {} as {}",
            chain_id, config.rpc_url, signer
        );

        Ok(Self {
            contract: JwtVerifier::new(config.contract_address, provider),
            signer,
            chain_id,
            gas_limit: config.gas_limit,
            receipt_timeout: config.receipt_timeout(),
        })
    }
}

fn confirmation<R: ReceiptResponse>(tx_hash: TxHash, receipt: &R) -> Result<Confirmation, SubmitError> {
    let block_number = receipt.block_number().ok_or_else(|| SubmitError::Confirmation {
        tx_hash,
        reason: "receipt has no block number".to_string(),
    })?;

    Ok(Confirmation {
        block_number,
        success: receipt.status(),
    })
}

#[async_trait]
impl ProofContract for JwtVerifierClient {
    async fn simulate(&self, proof: &EmailProof) -> Result<bool, SubmitError> {
        debug!("Simulating verifyEmailProof with gas limit {}", self.gas_limit);
        self.contract
            .verifyEmailProof(proof.clone())
            .from(self.signer)
            .gas(self.gas_limit)
            .call()
            .await
            .map_err(|e| SubmitError::Simulation(e.to_string()))
    }

    async fn submit(&self, proof: &EmailProof) -> Result<TxHash, SubmitError> {
        let pending = self
            .contract
            .verifyEmailProof(proof.clone())
            .from(self.signer)
            .gas(self.gas_limit)
            .send()
            .await
            .map_err(|e| SubmitError::Submission(e.to_string()))?;

        Ok(*pending.tx_hash())
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<Confirmation, SubmitError> {
        let root = self.contract.provider().root().clone();
        let receipt = PendingTransactionBuilder::new(root, tx_hash)
            .with_timeout(self.receipt_timeout)
            .get_receipt()
            .await
            .map_err(|e| SubmitError::Confirmation {
                tx_hash,
                reason: e.to_string(),
            })?;

        confirmation(tx_hash, &receipt)
    }

    fn address(&self) -> Address {
        *self.contract.address()
    }

    fn signer(&self) -> Address {
        self.signer
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }
}
