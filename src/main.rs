use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use contact_relay::config::{RelayConfig, ServerConfig};
use contact_relay::relay::{ContactRelay, MailTransport, SmtpMailer};
use contact_relay::routes::contact_routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let relay_config = RelayConfig::from_env().context("invalid SMTP configuration")?;
    let server_config = ServerConfig::from_env().context("invalid server configuration")?;

    if relay_config.account().is_none() {
        tracing::warn!("EMAIL_USER / EMAIL_PASS not set; submissions will fail until configured");
    }

    tracing::info!(
        smtp_host = %relay_config.smtp.host,
        smtp_port = relay_config.smtp.port,
        security = ?relay_config.smtp.security,
        "Contact relay v{}",
        env!("CARGO_PKG_VERSION")
    );

    let transport: Arc<dyn MailTransport> = Arc::new(SmtpMailer::new(relay_config.smtp.clone()));
    let relay = Arc::new(ContactRelay::new(relay_config, transport));
    let app = contact_routes(relay, &server_config);

    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("Listening on http://{addr} (POST /api/contact)");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
