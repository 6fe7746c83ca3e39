//! Verity HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use verity::config::Config;
use verity::embedding::{Embedder, SentenceEmbedder};
use verity::engine::{FactChecker, FactCheckerHandle};
use verity::gateway::{HandlerState, create_router_with_state};
use verity::index::SemanticIndex;
use verity::scoring::EntailmentScorer;
use verity::sync::SqliteRecordSource;
use verity::vectordb::QdrantIndex;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

type Checker = FactCheckerHandle<QdrantIndex, SqliteRecordSource>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
██╗   ██╗███████╗██████╗ ██╗████████╗██╗   ██╗
██║   ██║██╔════╝██╔══██╗██║╚══██╔══╝╚██╗ ██╔╝
██║   ██║█████╗  ██████╔╝██║   ██║    ╚████╔╝
╚██╗ ██╔╝██╔══╝  ██╔══██╗██║   ██║     ╚██╔╝
 ╚████╔╝ ███████╗██║  ██║██║   ██║      ██║
  ╚═══╝  ╚══════╝╚═╝  ╚═╝╚═╝   ╚═╝      ╚═╝

        RETRIEVE. ENTAIL. DECIDE.
                                        AGPL-3.0
"#
    );

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        qdrant_url = %config.qdrant_url,
        records_db = %config.records_db.display(),
        "Verity starting"
    );

    if config.embedder_path.is_none() {
        tracing::warn!("No VERITY_EMBEDDER_PATH configured, running embedder in stub mode");
    }
    let embedder: Arc<dyn Embedder> = Arc::new(SentenceEmbedder::load(config.embedder_config())?);

    if config.nli_path.is_none() {
        tracing::warn!("No VERITY_NLI_PATH configured, running NLI scorer in stub mode");
    }
    let scorer = EntailmentScorer::new(config.nli_config())?;

    let backend = QdrantIndex::new(&config.qdrant_url).await?;
    let index = SemanticIndex::new(backend, embedder, &config.collection);
    let source = SqliteRecordSource::new(config.records_db.clone());

    let checker: Checker =
        FactChecker::new(index, source, scorer, config.sync_config())?.into();
    checker.prepare().await?;

    tracing::info!("Running startup sync...");
    match checker.sync().await {
        Ok(report) => tracing::info!(
            new_count = report.new_count,
            total_count = report.total_count,
            "Startup sync complete"
        ),
        Err(e) => tracing::warn!("Startup sync failed: {}. Serving the existing index.", e),
    }

    if let Some(interval) = config.sync_interval {
        spawn_periodic_sync(checker.clone(), interval);
    }

    let app = create_router_with_state(HandlerState::new(checker));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Verity shutdown complete");
    Ok(())
}

fn spawn_periodic_sync(checker: Checker, every: Duration) {
    tracing::info!(interval_secs = every.as_secs(), "Periodic sync enabled");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick fires immediately and the startup sync already ran.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match checker.sync().await {
                Ok(report) if report.new_count > 0 || report.is_partial() => tracing::info!(
                    new_count = report.new_count,
                    failed_chunks = report.failed_chunks.len(),
                    total_count = report.total_count,
                    "Periodic sync complete"
                ),
                Ok(_) => tracing::debug!("Periodic sync found nothing new"),
                Err(e) => tracing::warn!("Periodic sync failed: {}", e),
            }
        }
    });
}

fn run_health_check() -> i32 {
    let port = std::env::var("VERITY_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
        let Ok(client) = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return 1;
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
