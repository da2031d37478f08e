//! # zkrelay - Zero Knowledge proof relay
//!
//! A Rust library for relaying Groth16 (BN254) email/JWT proofs to an on-chain
//! verifier. The relay accepts a snarkjs proof bundle together with its public
//! signals and JWT claims over HTTP, turns them into the `EmailProof` argument
//! of `verifyEmailProof`, and submits the transaction on behalf of the caller.
//!
//! ## Quick Start
//!
//! Add the following to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! zkrelay = "0.1.0"
//! ```
//!
//! ## Basic Usage
//!
//! ### 1. Server
//!
//! The signing key is read from the `PRIVATE_KEY` environment variable (or a
//! `.env` file). Defaults target the `JwtVerifier` deployment on Base Sepolia.
//!
//! ```rust,no_run
//! use zkrelay::config::{self, ServerConfig};
//! use zkrelay::server::ServerApp;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ServerConfig::default();
//! let signer = config::load_signer()?;
//!
//! let server = ServerApp::connect(config, signer)
//!     .await?
//!     .with_submitted_handler(|proof, submission| {
//!         println!("{} accepted in block {}", proof.domain_name, submission.block_number);
//!         Ok(())
//!     })
//!     .with_error_handler(|error| {
//!         println!("submission failed at {:?}: {}", error.stage(), error);
//!         Ok(())
//!     });
//!
//! server.run().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. Client
//!
//! Post a JSON bundle (`proof`, `pub_signals`, `header`, `payload`) to a
//! running relay:
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use url::Url;
//! use zkrelay::client::{ClientApp, ClientConfig};
//! use zkrelay::response::SubmissionOutcome;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = ClientApp::new(ClientConfig {
//!     server_url: Url::parse("http://127.0.0.1:3000")?,
//!     bundle_path: PathBuf::from("proof.json"),
//! });
//!
//! if let SubmissionOutcome::Submitted(ok) = client.load_and_submit().await? {
//!     println!("{} in block {}", ok.transaction_hash, ok.block_number);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Public signal layout
//!
//! The relay reads signals 3, 4, 5, 26 and 30 (see [`request::signal`]); the
//! layout is defined by the circuit and at least 31 signals are required.
//!
//! ## Testing against a mock chain
//!
//! [`contract::ProofContract`] is the seam to the chain. Implement it to run
//! the HTTP surface without a node, then mount [`server::configure`] on an
//! actix-web `App` with a `web::Data<ServerApp>`.

pub mod client;
pub mod config;
pub mod contract;
pub mod encoding;
pub mod error;
pub mod groth16;
pub mod request;
pub mod response;
pub mod server;
pub mod submission;
pub mod utils;
