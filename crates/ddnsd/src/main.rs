// # ddnsd - DDNS Daemon
//
// Keeps one Cloudflare DNS record pointed at this host's public IP.
//
// This is a THIN integration layer: it reads configuration, sets up logging
// and the runtime, wires the HTTP IP source and the Cloudflare provider into
// the engine, and runs the engine until a shutdown signal arrives. All
// reconciliation logic lives in ddns-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Required
// - `CLOUDFLARE_API_TOKEN`: API token with Zone:DNS:Edit permission
// - `CLOUDFLARE_ZONE_ID`: Zone holding the record
// - `CLOUDFLARE_RECORD_NAME`: Fully qualified record name
//
// ### Optional
// - `CLOUDFLARE_RECORD_TTL`: TTL in seconds (default 3600)
// - `CLOUDFLARE_RECORD_PROXY`: Proxy through Cloudflare (default false)
// - `REFRESH_INTERVAL`: Minutes between ticks (default 5)
// - `DDNS_IP_SOURCE_URL`: IP echo service (default https://ifconfig.me/ip)
// - `DDNS_SKIP_UNCHANGED`: Skip the update when the record already holds the IP (default false)
// - `DDNS_MODE`: `live` or `dry-run` (default live)
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export CLOUDFLARE_API_TOKEN=your_token
// export CLOUDFLARE_ZONE_ID=023e105f4ecef8ad9ca31a8372d0c353
// export CLOUDFLARE_RECORD_NAME=home.example.com
// export REFRESH_INTERVAL=10
//
// ddnsd
// ```

use anyhow::Result;
use ddns_core::{DdnsConfig, DdnsEngine};
use ddns_ip_http::HttpIpSource;
use ddns_provider_cloudflare::CloudflareProvider;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    // Load configuration from environment, before anything touches the network
    let config = match DdnsConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(&config.log_level))
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Starting ddnsd daemon");
    info!(
        "Managing record {} in zone {} (ttl: {}, proxied: {}, interval: {} min)",
        config.record.name,
        config.provider.zone_id,
        config.record.ttl,
        config.record.proxied,
        config.engine.interval_minutes
    );

    let provider = match CloudflareProvider::from_config(&config) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to create Cloudflare provider: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };
    let ip_source = HttpIpSource::new(config.ip_source.url.clone());

    let engine = DdnsEngine::new(Box::new(ip_source), Box::new(provider), &config);

    // One tick at a time: a single-threaded runtime is all the loop needs
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(run_daemon(engine));

    match result {
        Ok(()) => DdnsExitCode::CleanShutdown.into(),
        Err(e) => {
            error!("Daemon error: {}", e);
            DdnsExitCode::RuntimeError.into()
        }
    }
}

/// Map a validated level name to a tracing level
fn log_level(name: &str) -> Level {
    match name {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Run the engine until SIGTERM or SIGINT
async fn run_daemon(engine: DdnsEngine) -> Result<()> {
    let shutdown = shutdown_signal()?;

    engine
        .run_until(async {
            match shutdown.await {
                Ok(signal) => info!("Received shutdown signal: {}", signal),
                Err(e) => error!("Failed to wait for shutdown signal: {}", e),
            }
        })
        .await;

    info!("Shutting down daemon");
    Ok(())
}

/// Install SIGTERM and SIGINT handlers
///
/// Handlers are installed before the engine starts so an early signal is not
/// lost. The returned future resolves with the name of the first signal received.
#[cfg(unix)]
fn shutdown_signal() -> Result<impl Future<Output = Result<&'static str>>> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(async move {
        let name = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };
        Ok::<_, anyhow::Error>(name)
    })
}

/// Wait for CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
fn shutdown_signal() -> Result<impl Future<Output = Result<&'static str>>> {
    Ok(async {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
        Ok::<_, anyhow::Error>("SIGINT")
    })
}
