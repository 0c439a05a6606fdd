use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use push_relay_lib::config::{apply_overrides, Overrides, RelayConfig};
use push_relay_lib::push::{FcmTransport, TokenStore};
use push_relay_lib::server::{self, ServerAppState};
use push_relay_lib::shutdown::{register_signal_handlers, ShutdownState};

/// Push Relay - forwards tracking events to registered devices via FCM
#[derive(Parser, Debug)]
#[command(name = "push-relay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to bind the server to
    #[arg(long, env = "PUSH_RELAY_PORT")]
    port: Option<u16>,

    /// Address to bind the server to
    #[arg(long, env = "PUSH_RELAY_BIND")]
    bind: Option<String>,

    /// TOML config file (defaults to ~/.push-relay/config.toml when present)
    #[arg(long, env = "PUSH_RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// JSON file holding registered push tokens
    #[arg(long, env = "PUSH_RELAY_TOKENS_FILE")]
    tokens_file: Option<PathBuf>,

    /// Google service-account JSON for Firebase Cloud Messaging
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    credentials: Option<PathBuf>,

    /// Bearer token required on /api routes (or set PUSH_RELAY_API_TOKEN)
    #[arg(long, env = "PUSH_RELAY_API_TOKEN")]
    api_token: Option<String>,

    /// Allowed CORS origin; repeat for several. Any origin when omitted.
    #[arg(long = "cors-origin")]
    cors_origins: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::init();

    let file_config = match RelayConfig::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let config = apply_overrides(
        file_config,
        Overrides {
            port: cli.port,
            bind: cli.bind,
            tokens_file: cli.tokens_file,
            credentials_file: cli.credentials,
            api_token: cli.api_token,
            cors_origins: cli.cors_origins,
        },
    );

    // Unusable push credentials are fatal before any request is accepted
    let Some(credentials) = config.fcm.credentials_file.clone() else {
        log::error!(
            "No FCM credentials configured; pass --credentials or set GOOGLE_APPLICATION_CREDENTIALS"
        );
        std::process::exit(1);
    };
    let transport = match FcmTransport::from_service_account_file(&credentials) {
        Ok(transport) => match config.fcm.base_url.as_deref() {
            Some(base_url) => {
                log::info!("Sending FCM requests to {}", base_url);
                Arc::new(transport.with_base_url(base_url))
            }
            None => Arc::new(transport),
        },
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(async {
        let shutdown_state = ShutdownState::new();
        if let Err(e) = register_signal_handlers(shutdown_state.clone()) {
            log::warn!("Failed to register signal handlers: {}", e);
        }

        let state = ServerAppState::new(
            TokenStore::new(config.tokens_file()),
            transport,
            push_relay_lib::identity_resolver_for(&config),
            shutdown_state,
        );

        if let Err(e) = server::run_server(&config.server, state).await {
            log::error!("Server error: {}", e);
            std::process::exit(1);
        }
    });
}
