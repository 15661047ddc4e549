use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tidings_api::config::ServerConfig;
use tidings_api::router::build_app_router;
use tidings_api::state::AppState;
use tidings_events::{
    Dispatcher, EmailConfig, Hooks, LogTransport, MailTransport, NotificationConfig,
    NotificationRegistry, SmtpMailer,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tidings_api=debug,tidings_events=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let notification_config = NotificationConfig::from_env();
    if notification_config.admin_email.is_empty() {
        tracing::warn!("ADMIN_EMAIL not set, admin notices will not be sent");
    }

    // --- Mail transport ---
    let transport = build_transport();

    // --- Dispatcher ---
    let registry = NotificationRegistry::with_builtins(&notification_config);
    let hooks = Hooks::from_config(&notification_config);
    let dispatcher = Dispatcher::new(registry, hooks, transport);
    tracing::info!(
        enabled = dispatcher.list_entries(true).len(),
        plain_text = notification_config.plain_text,
        "Notification dispatcher ready"
    );

    // --- Router ---
    let state = AppState::new(config.clone(), dispatcher);
    let app = build_app_router(state);

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

    tracing::info!("Graceful shutdown complete");
}

/// SMTP when `SMTP_HOST` is configured, otherwise the log-only transport.
fn build_transport() -> Arc<dyn MailTransport> {
    let Some(email_config) = EmailConfig::from_env() else {
        tracing::info!("SMTP_HOST not set, notifications will be logged only");
        return Arc::new(LogTransport);
    };

    match SmtpMailer::new(email_config) {
        Ok(mailer) => {
            tracing::info!(?mailer, "SMTP transport configured");
            Arc::new(mailer)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to build SMTP transport, logging notifications");
            Arc::new(LogTransport)
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
