use serde::{Deserialize, Serialize};

use crate::{
    error::{RequestError, Stage, SubmitError},
    submission::Submission,
};

pub const SUBMITTED_MESSAGE: &str = "Proof submitted successfully";
pub const FAILURE_LABEL: &str = "Failed to submit proof to contract";

/// `200 OK`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub message: String,
    pub transaction_hash: String,
    /// Decimal string; block numbers are not bounded by JSON's safe integer range.
    pub block_number: String,
}

impl From<&Submission> for SubmissionResponse {
    fn from(submission: &Submission) -> Self {
        Self {
            message: SUBMITTED_MESSAGE.to_string(),
            transaction_hash: submission.tx_hash.to_string(),
            block_number: submission.block_number.to_string(),
        }
    }
}

/// `400 Bad Request`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionResponse {
    pub error: String,
}

impl From<&RequestError> for RejectionResponse {
    fn from(error: &RequestError) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

/// `500 Internal Server Error`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureResponse {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    /// Present when the transaction was broadcast before the failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
}

impl From<&SubmitError> for FailureResponse {
    fn from(error: &SubmitError) -> Self {
        Self {
            error: FAILURE_LABEL.to_string(),
            message: error.to_string(),
            stage: Some(error.stage()),
            transaction_hash: error.tx_hash().map(|hash| hash.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub chain_id: u64,
    pub contract: String,
    pub signer: String,
}

/// What the relay answered, as seen by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Submitted(SubmissionResponse),
    Rejected(RejectionResponse),
    Failed(FailureResponse),
}
