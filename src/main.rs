use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use diabotik::config::SkillConfig;
use diabotik::skill::{DialogEngine, InMemorySessionStore, LogisticOracle, PredictionOracle, skill_routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = SkillConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    // Initialize tracing; keep the guard alive so the file writer flushes
    let _log_guard = init_tracing(&config);

    eprintln!("🩺 Diabotik v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Webhook: http://{}/post", config.listen_addr());

    // ── Prediction oracle ───────────────────────────────────────────────
    let oracle: Option<Arc<dyn PredictionOracle>> = match &config.model_path {
        Some(path) => {
            let oracle = LogisticOracle::load(path)
                .await
                .with_context(|| format!("loading prediction model {}", path.display()))?;
            eprintln!("   Prediction: enabled ({})", path.display());
            Some(Arc::new(oracle))
        }
        None => {
            eprintln!("   Prediction: disabled (set DIABOTIK_MODEL_PATH to enable)");
            None
        }
    };

    // ── Dialog engine + server ──────────────────────────────────────────
    let engine = Arc::new(DialogEngine::new(
        Arc::new(InMemorySessionStore::new()),
        oracle,
    ));
    let app = skill_routes(engine);

    let listener = tokio::net::TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("binding {}", config.listen_addr()))?;
    tracing::info!(addr = %config.listen_addr(), "Skill webhook server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Skill webhook server stopped");
    Ok(())
}

fn init_tracing(config: &SkillConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter());

    match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "diabotik.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter());
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(stderr_layer).init();
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
