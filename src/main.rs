//! Wiring & DI. Entry point: bootstrap adapters, inject into the coordinator, run UI.
//! No business logic here.

use doc_chat::adapters::http::{HttpTransport, MockTransport};
use doc_chat::adapters::ui::notices::TerminalNotices;
use doc_chat::adapters::ui::progress::SpinnerProgress;
use doc_chat::adapters::ui::tui::{TuiInputPort, apply_theme};
use doc_chat::ports::{InputPort, NoticePort, ProgressPort, TransportPort};
use doc_chat::shared::config::AppConfig;
use doc_chat::usecases::Coordinator;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_loaded = dotenv();
    // Default to warn: log lines would otherwise interleave with the prompts.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!("no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "invalid configuration, using defaults");
        AppConfig::default()
    });

    // --- Transport: HTTP backend, or in-process mock for offline use ---
    let (transport, backend): (Arc<dyn TransportPort>, String) = if cfg.is_mock() {
        let latency = cfg.mock_latency_ms_or_default();
        warn!(latency_ms = latency, "DOC_CHAT_MOCK set, using mock backend");
        (
            Arc::new(MockTransport::with_delay(latency)),
            "mock".to_string(),
        )
    } else {
        let base_url = cfg.base_url_or_default();
        info!(url = %base_url, "using HTTP backend");
        (Arc::new(HttpTransport::new(base_url.clone())), base_url)
    };

    if cfg.show_banner() {
        doc_chat::adapters::ui::init_ui(&backend);
    } else {
        apply_theme();
    }

    // --- Presentation capabilities injected into the sessions ---
    let progress: Arc<dyn ProgressPort> = Arc::new(SpinnerProgress::new("Waiting for backend..."));
    let notices: Arc<dyn NoticePort> = Arc::new(TerminalNotices);

    let coordinator = Arc::new(Coordinator::new(
        transport,
        progress,
        Arc::clone(&notices),
    ));

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(coordinator, notices));
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
