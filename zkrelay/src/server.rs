use std::{net::SocketAddr, sync::Arc};

use actix_web::{
    dev::Server,
    error::{InternalError, JsonPayloadError},
    http::header::{self, ContentType},
    middleware::Logger,
    web, App, HttpRequest, HttpResponse, HttpServer,
};
use alloy::signers::local::PrivateKeySigner;
use ark_bn254::Bn254;
use ark_groth16::VerifyingKey;
use log::{debug, error, info, warn};

use crate::{
    config::ServerConfig,
    contract::{EmailProof, JwtVerifierClient, ProofContract},
    error::{RequestError, SubmitError},
    groth16,
    request::{JwtProof, SubmitProofRequest},
    response::{FailureResponse, HealthResponse, RejectionResponse, SubmissionResponse},
    submission::{submit_proof, Submission},
    utils::{HEALTH_PATH, SUBMIT_PATH},
};

pub type SubmittedHandler =
    Box<dyn Fn(&JwtProof, &Submission) -> Result<(), anyhow::Error> + Send + Sync>;
pub type ErrorHandler = Box<dyn Fn(&SubmitError) -> Result<(), anyhow::Error> + Send + Sync>;

pub struct ServerApp {
    config: ServerConfig,
    contract: Arc<dyn ProofContract>,
    verification_key: Option<VerifyingKey<Bn254>>,
    submitted_handler: Option<SubmittedHandler>,
    error_handler: Option<ErrorHandler>,
}

impl ServerApp {
    pub fn new(config: ServerConfig, contract: Arc<dyn ProofContract>) -> Result<Self, anyhow::Error> {
        debug!("Creating new ServerApp instance");
        let verification_key = config
            .verification_key_path
            .as_ref()
            .map(groth16::load_verification_key)
            .transpose()?;

        Ok(Self {
            config,
            contract,
            verification_key,
            submitted_handler: None,
            error_handler: None,
        })
    }

    /// Connects to the configured node with the given signer.
    pub async fn connect(config: ServerConfig, signer: PrivateKeySigner) -> Result<Self, anyhow::Error> {
        let contract = JwtVerifierClient::connect(&config, signer).await?;
        Self::new(config, Arc::new(contract))
    }

    pub fn with_submitted_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&JwtProof, &Submission) -> Result<(), anyhow::Error> + Send + Sync + 'static,
    {
        self.submitted_handler = Some(Box::new(handler));
        self
    }

    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&SubmitError) -> Result<(), anyhow::Error> + Send + Sync + 'static,
    {
        self.error_handler = Some(Box::new(handler));
        self
    }

    /// Validates the request and derives the contract arguments.
    pub fn prepare(&self, request: &SubmitProofRequest) -> Result<(JwtProof, EmailProof), RequestError> {
        let jwt_proof = JwtProof::from_request(request)?;
        let (bundle, pub_signals) = request.parts()?;

        let proof = groth16::proof_from_bundle(bundle)?;
        if let Some(vk) = &self.verification_key {
            groth16::verify(vk, &proof, pub_signals)?;
        }

        let call = EmailProof::try_from(&jwt_proof)
            .map_err(|e| RequestError::invalid_field("timestamp", e))?;
        Ok((jwt_proof, call))
    }

    async fn submit_handler(
        request: web::Json<SubmitProofRequest>,
        app: web::Data<Self>,
    ) -> HttpResponse {
        debug!("Received proof submission: {:?}", request);

        let (jwt_proof, call) = match app.prepare(&request) {
            Ok(prepared) => prepared,
            Err(e) => {
                warn!("Rejected proof submission: {}", e);
                return HttpResponse::BadRequest().json(RejectionResponse::from(&e));
            }
        };
        debug!(
            "JWT proof: {}",
            serde_json::to_string(&jwt_proof).unwrap_or_default()
        );

        match submit_proof(app.contract.as_ref(), &call).await {
            Ok(submission) => {
                if let Some(handler) = &app.submitted_handler {
                    if let Err(e) = handler(&jwt_proof, &submission) {
                        error!("Submitted handler failed: {}", e);
                    }
                }
                HttpResponse::Ok().json(SubmissionResponse::from(&submission))
            }
            Err(e) => {
                error!("Error submitting proof to contract ({:?} stage): {}", e.stage(), e);
                if let Some(handler) = &app.error_handler {
                    if let Err(handler_err) = handler(&e) {
                        error!("Error handler failed: {}", handler_err);
                    }
                }
                HttpResponse::InternalServerError().json(FailureResponse::from(&e))
            }
        }
    }

    async fn health_handler(app: web::Data<Self>) -> HttpResponse {
        HttpResponse::Ok().json(HealthResponse {
            status: "ok".to_string(),
            chain_id: app.contract.chain_id(),
            contract: app.contract.address().to_checksum(None),
            signer: app.contract.signer().to_checksum(None),
        })
    }

    /// Binds the listener and returns the server future with the bound addresses.
    pub fn bind(self) -> std::io::Result<(Server, Vec<SocketAddr>)> {
        let address = self.config.listen_address.clone();
        info!("Starting server on {}", address);

        let app = web::Data::new(self);
        let server = HttpServer::new(move || {
            App::new()
                .wrap(Logger::default())
                .app_data(app.clone())
                .configure(configure)
        })
        .bind(address)?;

        let addrs = server.addrs();
        Ok((server.run(), addrs))
    }

    pub async fn run(self) -> std::io::Result<()> {
        let (server, _) = self.bind()?;
        server.await
    }

    pub fn get_listen_address(&self) -> &str {
        &self.config.listen_address
    }
}

/// Registers the relay routes. Expects `web::Data<ServerApp>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .content_type_required(false)
            .error_handler(json_error_handler),
    )
    .service(
        web::resource(SUBMIT_PATH)
            .route(web::post().to(ServerApp::submit_handler))
            .default_service(web::route().to(method_not_allowed)),
    )
    .service(web::resource(HEALTH_PATH).route(web::get().to(ServerApp::health_handler)));
}

async fn method_not_allowed(req: HttpRequest) -> HttpResponse {
    HttpResponse::MethodNotAllowed()
        .insert_header((header::ALLOW, "POST"))
        .content_type(ContentType::plaintext())
        .body(format!("Method {} Not Allowed", req.method()))
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let rejection = RequestError::InvalidBody(err.to_string());
    warn!("Rejected proof submission: {}", rejection);

    let response = HttpResponse::BadRequest().json(RejectionResponse::from(&rejection));
    InternalError::from_response(err, response).into()
}
