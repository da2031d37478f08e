use crate::{
    request::SubmitProofRequest,
    response::{FailureResponse, RejectionResponse, SubmissionOutcome, SubmissionResponse},
    utils::SUBMIT_PATH,
};
use log::{debug, info};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Instant};
use url::Url;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    pub server_url: Url,
    pub bundle_path: PathBuf,
}

pub struct ClientApp {
    config: ClientConfig,
    http: Client,
}

impl ClientApp {
    pub fn new(config: ClientConfig) -> Self {
        debug!("Creating new ClientApp instance");
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Reads a request body (proof, public signals and JWT claims) from disk.
    pub fn load_bundle(&self) -> Result<SubmitProofRequest, anyhow::Error> {
        let path = &self.config.bundle_path;
        debug!("Loading proof bundle from {}", path.display());

        let json = std::fs::read_to_string(path)?;
        let request = serde_json::from_str(&json)?;
        info!("Proof bundle loaded from {}", path.display());
        Ok(request)
    }

    pub async fn submit(
        &self,
        request: &SubmitProofRequest,
    ) -> Result<SubmissionOutcome, anyhow::Error> {
        let url = self.config.server_url.join(SUBMIT_PATH)?;
        debug!("Sending proof to {}", url);
        let start = Instant::now();

        let resp = self.http.post(url).json(request).send().await?;
        let status = resp.status();
        debug!("Received {} from server in {:?}", status, start.elapsed());

        let outcome = match status {
            s if s.is_success() => SubmissionOutcome::Submitted(resp.json::<SubmissionResponse>().await?),
            StatusCode::BAD_REQUEST => SubmissionOutcome::Rejected(resp.json::<RejectionResponse>().await?),
            StatusCode::INTERNAL_SERVER_ERROR => {
                SubmissionOutcome::Failed(resp.json::<FailureResponse>().await?)
            }
            other => anyhow::bail!("unexpected response {}: {}", other, resp.text().await?),
        };
        Ok(outcome)
    }

    pub async fn load_and_submit(&self) -> Result<SubmissionOutcome, anyhow::Error> {
        let request = self.load_bundle()?;
        self.submit(&request).await
    }

    pub fn get_server_url(&self) -> &Url {
        &self.config.server_url
    }

    pub fn get_bundle_path(&self) -> &PathBuf {
        &self.config.bundle_path
    }
}
