use alloy::primitives::{Bytes, B256};
use serde::{Deserialize, Serialize};

use crate::{
    contract::EmailProof,
    encoding,
    error::{FieldError, RequestError},
    utils::{
        canonical_decimal, decimal_to_bytes32, decimal_to_u256, domain_name, is_code_exist,
    },
};

/// Positions of the public signals read by the relay. The layout is fixed by
/// the circuit that produced the proof.
pub mod signal {
    pub const PUBLIC_KEY_HASH: usize = 3;
    pub const EMAIL_NULLIFIER: usize = 4;
    pub const TIMESTAMP: usize = 5;
    pub const ACCOUNT_SALT: usize = 26;
    pub const IS_CODE_EXIST: usize = 30;

    /// Signals must cover the highest index above.
    pub const MIN_LEN: usize = IS_CODE_EXIST + 1;
}

/// Groth16 proof in the snarkjs JSON layout, every coordinate a decimal string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofBundle {
    pub pi_a: Vec<String>,
    pub pi_b: Vec<Vec<String>>,
    pub pi_c: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azp: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

/// Body of `POST /api/submitProofToContract`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitProofRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<ProofBundle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_signals: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<JwtHeader>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<JwtPayload>,
}

impl SubmitProofRequest {
    /// The proof and its public signals, both of which are required.
    pub fn parts(&self) -> Result<(&ProofBundle, &[String]), RequestError> {
        match (&self.proof, &self.pub_signals) {
            (Some(proof), Some(signals)) => Ok((proof, signals.as_slice())),
            _ => Err(RequestError::MissingProofOrSignals),
        }
    }

    fn kid(&self) -> Option<&str> {
        self.header.as_ref()?.kid.as_deref()
    }

    // `iss` and `azp` are payload claims; some callers send them in the header.
    fn iss(&self) -> Option<&str> {
        let from_payload = self.payload.as_ref().and_then(|p| p.iss.as_deref());
        from_payload.or_else(|| self.header.as_ref()?.iss.as_deref())
    }

    fn azp(&self) -> Option<&str> {
        let from_payload = self.payload.as_ref().and_then(|p| p.azp.as_deref());
        from_payload.or_else(|| self.header.as_ref()?.azp.as_deref())
    }

    fn nonce(&self) -> Option<&str> {
        self.payload.as_ref()?.nonce.as_deref()
    }
}

/// Arguments of `verifyEmailProof`, derived from a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtProof {
    pub domain_name: String,
    pub public_key_hash: B256,
    pub timestamp: String,
    pub masked_command: String,
    pub email_nullifier: B256,
    pub account_salt: B256,
    pub is_code_exist: bool,
    pub proof: Bytes,
}

impl JwtProof {
    pub fn from_request(request: &SubmitProofRequest) -> Result<Self, RequestError> {
        let (proof, signals) = request.parts()?;

        let kid = request.kid().ok_or(RequestError::MissingClaim("kid"))?;
        let iss = request.iss().ok_or(RequestError::MissingClaim("iss"))?;
        let azp = request.azp().ok_or(RequestError::MissingClaim("azp"))?;
        let nonce = request.nonce().ok_or(RequestError::MissingClaim("nonce"))?;

        RequestError::ensure_len("pub_signals", signals.len(), signal::MIN_LEN)?;

        Ok(Self {
            domain_name: domain_name(kid, iss, azp),
            public_key_hash: bytes32_signal(signals, signal::PUBLIC_KEY_HASH)?,
            timestamp: convert_signal(signals, signal::TIMESTAMP, canonical_decimal)?,
            masked_command: nonce.to_string(),
            email_nullifier: bytes32_signal(signals, signal::EMAIL_NULLIFIER)?,
            account_salt: bytes32_signal(signals, signal::ACCOUNT_SALT)?,
            is_code_exist: is_code_exist(&signals[signal::IS_CODE_EXIST]),
            proof: encoding::encode_proof(proof)?,
        })
    }
}

impl TryFrom<&JwtProof> for EmailProof {
    type Error = FieldError;

    fn try_from(proof: &JwtProof) -> Result<Self, Self::Error> {
        Ok(EmailProof {
            domainName: proof.domain_name.clone(),
            publicKeyHash: proof.public_key_hash,
            timestamp: decimal_to_u256(&proof.timestamp)?,
            maskedCommand: proof.masked_command.clone(),
            emailNullifier: proof.email_nullifier,
            accountSalt: proof.account_salt,
            isCodeExist: proof.is_code_exist,
            proof: proof.proof.clone(),
        })
    }
}

fn bytes32_signal(signals: &[String], index: usize) -> Result<B256, RequestError> {
    convert_signal(signals, index, decimal_to_bytes32)
}

fn convert_signal<T>(
    signals: &[String],
    index: usize,
    convert: impl FnOnce(&str) -> Result<T, FieldError>,
) -> Result<T, RequestError> {
    convert(&signals[index]).map_err(|e| RequestError::invalid_field(format!("pub_signals[{index}]"), e))
}
