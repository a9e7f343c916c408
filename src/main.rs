use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use regdesk::client::{MultipartTransport, PhotoFile, RegistrationClient, RelayTransport, SubmitTransport};
use regdesk::config::Config;
use regdesk::models::RegistrationFields;
use regdesk::records;
use regdesk::storage::LocalStorage;
use regdesk::{create_router, AppState};

/// regdesk - event registration endpoint and client
#[derive(Parser, Debug)]
#[command(name = "regdesk")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the registration endpoint (default)
    Serve,

    /// Submit one registration
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        college: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        mobile: String,
        /// Path to a JPEG or PNG photo
        #[arg(long)]
        photo: PathBuf,
        /// Send to the configured relay instead of the endpoint
        #[arg(long)]
        relay: bool,
        /// Endpoint base URL
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        server: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "regdesk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(Config::load()?);
    tracing::info!("Configuration loaded");

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Submit {
            name,
            college,
            email,
            mobile,
            photo,
            relay,
            server,
        } => {
            let fields = RegistrationFields {
                name,
                college,
                email,
                mobile,
            };
            submit(&config, fields, photo, relay, &server).await
        }
    }
}

async fn serve(config: Arc<Config>) -> anyhow::Result<()> {
    tracing::info!("Starting regdesk...");

    config.ensure_directories()?;
    let records = records::open(&config).await?;
    let photos = Arc::new(LocalStorage::from_config(&config.storage));
    tracing::info!("Storing photos under {:?}", photos.base_path());

    let state = AppState::new(config.clone(), records, photos);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn submit(
    config: &Config,
    fields: RegistrationFields,
    photo_path: PathBuf,
    relay: bool,
    server: &str,
) -> anyhow::Result<()> {
    let photo = PhotoFile::from_path(&photo_path)
        .await
        .with_context(|| format!("Failed to read photo {:?}", photo_path))?;

    let http = reqwest::Client::new();
    let transport: Box<dyn SubmitTransport> = if relay {
        let url = config
            .relay
            .url
            .clone()
            .context("relay.url is not configured")?;
        let token = config
            .relay
            .token
            .clone()
            .context("relay.token is not configured")?;
        Box::new(RelayTransport::new(http, url, token))
    } else {
        Box::new(MultipartTransport::for_server(http, server))
    };

    let mut client = RegistrationClient::new(transport);
    let success = client.submit(fields, Some(photo)).await?;

    match success.record_id {
        Some(id) => println!("Registration Successful! Record {}", id),
        None => println!("Registration Successful!"),
    }
    Ok(())
}
