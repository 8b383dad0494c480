//! Pokedex - a terminal Pokedex client
//!
//! Explores the PokeAPI from an interactive prompt, caching every response.

use anyhow::Context;
use tokio::io::BufReader;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pokedex::{repl, CachedFetcher, Config, HttpTransport, PokeApi, Session, TtlCache};

/// Main entry point for the Pokedex client.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging (stderr, so the prompt stays clean)
/// 2. Load and validate configuration from environment variables
/// 3. Create the response cache, which starts its reaper
/// 4. Wire the HTTP transport, cached fetcher and API client into a session
/// 5. Run the prompt until `exit`, end of input, or Ctrl+C/SIGTERM
/// 6. Stop the reaper
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "warn" so routine logs do not interleave with the prompt,
    // can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pokedex=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    config.validate().context("invalid configuration")?;
    info!(
        cache_ttl = config.cache_ttl,
        reap_interval = ?config.reap_interval,
        base_url = %config.base_url,
        "Configuration loaded"
    );

    let cache = TtlCache::with_config(config.cache_config());
    let transport =
        HttpTransport::new(config.http_timeout()).context("failed to build HTTP client")?;
    let api = PokeApi::new(CachedFetcher::new(cache.clone(), transport), &config.base_url);
    let mut session = Session::new(api);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    tokio::select! {
        result = repl::run(&mut session, stdin, &mut stdout) => result?,
        _ = shutdown_signal() => println!(),
    }

    cache.close().await;
    info!("Pokedex closed");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}
