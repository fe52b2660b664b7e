use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inkflow_alimtalk::{BizgoConfig, BizgoGateway, ConsoleGateway, Dispatcher, NotificationGateway};
use inkflow_api::config::ServerConfig;
use inkflow_api::router::build_app_router;
use inkflow_api::state::AppState;
use inkflow_api::background;
use inkflow_rewrite::{AnthropicConfig, AnthropicGateway, RewriteGateway};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkflow_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = inkflow_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    inkflow_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    inkflow_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Gateways ---
    let notifier = Arc::new(Dispatcher::new(
        build_notification_gateway(),
        Duration::from_millis(config.send_interval_ms),
    ));
    tracing::info!(provider = notifier.gateway_name(), "Notification gateway ready");

    let rewriter = build_rewrite_gateway();

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        notifier,
        rewriter,
    };

    // --- Background sweep (auto-approve + reminders) ---
    let sweep_cancel = tokio_util::sync::CancellationToken::new();
    let sweep_handle = tokio::spawn(background::sweep::run(
        state.clone(),
        sweep_cancel.clone(),
    ));

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sweep_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sweep_handle).await;
    tracing::info!("Manuscript sweep stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Select the notification provider from `ALIMTALK_PROVIDER`.
///
/// `bizgo` uses the production adapter (requires `BIZGO_API_KEY` and
/// `BIZGO_SENDER_KEY`); anything else falls back to the console stub.
/// Swapping providers is configuration, not a code change.
fn build_notification_gateway() -> Arc<dyn NotificationGateway> {
    match std::env::var("ALIMTALK_PROVIDER").as_deref() {
        Ok("bizgo") => {
            let api_key = std::env::var("BIZGO_API_KEY").unwrap_or_default();
            let sender_key = std::env::var("BIZGO_SENDER_KEY").unwrap_or_default();
            if api_key.is_empty() || sender_key.is_empty() {
                tracing::warn!("Bizgo selected but credentials are missing; sends will fail");
            }
            Arc::new(BizgoGateway::new(BizgoConfig::new(api_key, sender_key)))
        }
        _ => Arc::new(ConsoleGateway),
    }
}

/// Build the rewrite gateway from `ANTHROPIC_API_KEY` / `ANTHROPIC_MODEL`.
fn build_rewrite_gateway() -> Arc<dyn RewriteGateway> {
    let api_key = std::env::var("ANTHROPIC_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        tracing::warn!("ANTHROPIC_API_KEY is not set; rewrite requests will fail");
    }
    let model = std::env::var("ANTHROPIC_MODEL").ok();
    Arc::new(AnthropicGateway::new(AnthropicConfig::new(api_key, model)))
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
