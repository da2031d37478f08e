use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use url::Url;
use zkrelay::client::{ClientApp, ClientConfig};
use zkrelay::config::{self, ServerConfig};
use zkrelay::response::SubmissionOutcome;
use zkrelay::server::ServerApp;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the relay. Reads the signing key from PRIVATE_KEY.
    Server {
        /// TOML file with server settings
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        address: Option<String>,
        #[arg(long)]
        rpc_url: Option<String>,
        #[arg(long)]
        verification_key: Option<PathBuf>,
    },
    /// Post a proof bundle to a running relay.
    Client {
        #[arg(short, long, default_value = "http://127.0.0.1:3000")]
        server_url: String,
        #[arg(short, long, default_value = "proof.json")]
        bundle: PathBuf,
    },
}

fn load_server_config(
    path: Option<PathBuf>,
    address: Option<String>,
    rpc_url: Option<String>,
    verification_key: Option<PathBuf>,
) -> Result<ServerConfig, anyhow::Error> {
    let mut config = match path {
        Some(path) => ServerConfig::from_path(path)?,
        None => ServerConfig::default(),
    };

    if let Some(address) = address {
        config.listen_address = address;
    }
    if let Some(rpc_url) = rpc_url {
        config.rpc_url = rpc_url;
    }
    if verification_key.is_some() {
        config.verification_key_path = verification_key;
    }
    Ok(config)
}

async fn run_server(config: ServerConfig) -> Result<(), anyhow::Error> {
    let signer = config::load_signer()?;
    info!(
        "Relaying to {} on chain {} as {}",
        config.contract_address,
        config.chain_id,
        signer.address()
    );

    let server = ServerApp::connect(config, signer)
        .await?
        .with_submitted_handler(|proof, submission| {
            info!(
                "Proof for {} accepted: tx {} in block {}",
                proof.domain_name, submission.tx_hash, submission.block_number
            );
            Ok(())
        })
        .with_error_handler(|error| {
            info!("Submission failed at {:?} stage: {}", error.stage(), error);
            Ok(())
        });

    info!("Listening for proofs on {}", server.get_listen_address());
    server.run().await?;
    Ok(())
}

async fn run_client(server_url: String, bundle: PathBuf) -> Result<(), anyhow::Error> {
    let client = ClientApp::new(ClientConfig {
        server_url: Url::parse(&server_url)?,
        bundle_path: bundle,
    });

    info!(
        "Submitting {} to {}",
        client.get_bundle_path().display(),
        client.get_server_url()
    );

    match client.load_and_submit().await? {
        SubmissionOutcome::Submitted(ok) => {
            info!(
                "{}: tx {} in block {}",
                ok.message, ok.transaction_hash, ok.block_number
            );
        }
        SubmissionOutcome::Rejected(rejection) => {
            info!("Request rejected: {}", rejection.error);
        }
        SubmissionOutcome::Failed(failure) => {
            info!("{}: {}", failure.error, failure.message);
            if let Some(tx_hash) = failure.transaction_hash {
                info!("Transaction {} was broadcast before the failure", tx_hash);
            }
        }
    }

    Ok(())
}

fn init_logging() {
    let log_level = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info".to_string())
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::Info);

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    info!("Logging initialized with level: {}", log_level);
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server {
            config,
            address,
            rpc_url,
            verification_key,
        } => {
            let config = load_server_config(config, address, rpc_url, verification_key)?;
            run_server(config).await?;
        }
        Commands::Client { server_url, bundle } => run_client(server_url, bundle).await?,
    }

    Ok(())
}
