//! Server binary for docr.
//!
//! A thin shim over the library crate: parse flags (all of them overridable
//! via environment variables for container deployments), build the
//! recognition engine once, and serve the HTTP facade until shutdown.

use anyhow::Result;
use clap::Parser;
use docr::server::{app, AppState};
use docr::{EngineSettings, ProcessOptions, RemoteEngine, TextRecognizer};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "docr-server", version, about = "HTTP OCR service for images and PDFs")]
struct Args {
    /// Address to listen on
    #[arg(long, env = "APP_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "APP_PORT", default_value_t = 8000)]
    port: u16,

    /// Base URL of the OCR model server
    #[arg(long, env = "OCR_ENGINE_URL", default_value = "http://127.0.0.1:9292")]
    engine_url: String,

    /// Run recognition on a hardware accelerator
    #[arg(long, env = "USE_GPU", default_value_t = true, action = clap::ArgAction::Set)]
    use_gpu: bool,

    /// Accelerator memory budget in megabytes
    #[arg(long, env = "GPU_MEM", default_value_t = 4000)]
    gpu_mem: u32,

    /// Enable the text-orientation classification stage
    #[arg(long, env = "USE_ANGLE_CLS", default_value_t = true, action = clap::ArgAction::Set)]
    angle_cls: bool,

    /// Recognition language code
    #[arg(long, env = "OCR_LANG", default_value = "ch")]
    lang: String,

    /// Concurrent recognition calls per document (1 = strictly sequential)
    #[arg(long, env = "OCR_CONCURRENCY", default_value_t = 1)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docr=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let settings = EngineSettings::builder()
        .use_gpu(args.use_gpu)
        .gpu_memory_mb(args.gpu_mem)
        .angle_classification(args.angle_cls)
        .language(args.lang.clone())
        .build();

    tracing::info!(
        "initialising recognition engine: {} (gpu={}, lang={})",
        args.engine_url,
        settings.use_gpu,
        settings.language
    );
    let engine: Arc<dyn TextRecognizer> =
        Arc::new(RemoteEngine::new(args.engine_url.clone(), settings));

    if !engine.is_available().await {
        tracing::warn!(
            "engine at {} is not reachable yet; /ocr will fail until it comes up",
            args.engine_url
        );
    }

    let state = AppState::new(engine, ProcessOptions::with_concurrency(args.concurrency));
    let router = app(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    tracing::info!("docr-server v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

/// Graceful shutdown on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        },
    }
}
