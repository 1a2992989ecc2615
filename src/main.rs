//! PolicyAlign HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use policyalign::config::Config;
use policyalign::embedding::{Embedder, SentenceEmbedder, SentenceEmbedderConfig};
use policyalign::gateway::{AppState, create_router_with_state};
use policyalign::judge::{GenaiJudge, JudgmentService, LexicalJudge};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
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
        judge_model = %config.judge_model,
        reuse_penalty = config.reuse_penalty,
        "PolicyAlign starting"
    );

    let embedder_config = match &config.embedding_model_path {
        Some(path) => SentenceEmbedderConfig::new(path.clone()),
        None => {
            tracing::warn!(
                "No POLICYALIGN_EMBEDDING_MODEL_PATH configured, running embedder in stub mode"
            );
            SentenceEmbedderConfig::stub()
        }
    };
    let embedder: Arc<dyn Embedder> = Arc::new(SentenceEmbedder::load(embedder_config)?);

    let judge: Arc<dyn JudgmentService> = if config.mock_provider {
        tracing::warn!("Mock provider enabled, judgment calls answered locally");
        Arc::new(LexicalJudge::new())
    } else {
        Arc::new(GenaiJudge::new(config.judge_model.clone()))
    };

    let state = AppState::from_parts(embedder, judge, &config);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("PolicyAlign shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("POLICYALIGN_PORT")
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
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
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
