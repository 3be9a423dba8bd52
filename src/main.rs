use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};

use transcribe_service::config::{Config, ProviderKind};
use transcribe_service::provider::SttProvider;
use transcribe_service::server::{self, AppState};

/// Web service for audio transcription with speaker diarization
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// STT provider to proxy uploads to ("cartesia" or "deepgram");
    /// falls back to the STT_PROVIDER environment variable
    #[arg(short, long)]
    provider: Option<String>,

    /// Address to bind (IP address)
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let provider = resolve_provider(args.provider.as_deref())?;
    let config = Config::from_env(provider, args.host, args.port);

    info!("Transcription service starting...");
    info!("Provider: {}", config.provider);

    let provider = SttProvider::from_config(&config)
        .context("Failed to initialize STT provider client")?;
    if provider.is_none() {
        warn!(
            "{} is not set; transcription requests will fail until it is configured",
            config.api_key_var()
        );
    }

    let state = AppState {
        provider: provider.map(Arc::new),
        provider_kind: config.provider,
    };
    let app = server::build_router(state);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Provider selection: CLI flag, then STT_PROVIDER, then the default.
fn resolve_provider(cli_value: Option<&str>) -> Result<ProviderKind> {
    let value = match cli_value {
        Some(value) => Some(value.to_string()),
        None => std::env::var("STT_PROVIDER").ok().filter(|v| !v.is_empty()),
    };

    match value {
        Some(value) => value
            .parse::<ProviderKind>()
            .map_err(anyhow::Error::msg),
        None => Ok(ProviderKind::default()),
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("Received Ctrl+C, shutting down...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_provider_from_cli() {
        assert_eq!(
            resolve_provider(Some("deepgram")).unwrap(),
            ProviderKind::Deepgram
        );
    }

    #[test]
    fn test_resolve_provider_rejects_unknown() {
        assert!(resolve_provider(Some("whisper")).is_err());
    }
}
