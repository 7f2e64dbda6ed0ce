use anyhow::Context;
use futures_util::future::join_all;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

use regdesk::config::{Config, DEFAULT_CONFIG_FILE};
use regdesk::credentials::CredentialStore;
use regdesk::{server, tls, AppState};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(r#"
  ____             ____            _
 |  _ \ ___  __ _ |  _ \  ___  ___| | __
 | |_) / _ \/ _` || | | |/ _ \/ __| |/ /
 |  _ <  __/ (_| || |_| |  __/\__ \   <
 |_| \_\___|\__, ||____/ \___||___/_|\_\
            |___/
 Course registration admin dashboard
"#);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "regdesk=info,tower_http=info".into()),
        )
        .init();

    let config_path = std::env::var_os("REGDESK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = Config::load_or_create(&config_path).await?;

    let credentials = CredentialStore::open_or_disable(&config.admin);
    let state = AppState::new(config.clone(), credentials);
    let app = server::router(state);

    let mut tasks = Vec::new();

    let addr: SocketAddr = config
        .listen_addr()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.listen_addr()))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "HTTP listening");

    let http_app = app.clone();
    tasks.push(tokio::spawn(async move {
        axum::serve(listener, http_app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")
    }));

    if let Some(tls_config) = &config.tls {
        let tls_addr: SocketAddr = format!("{}:{}", config.server.host, tls_config.port)
            .parse()
            .context("invalid TLS listen address")?;
        let acceptor = tls::acceptor(tls_config)?;
        let tls_app = app.clone();
        tasks.push(tokio::spawn(async move {
            tokio::select! {
                result = tls::serve(tls_addr, acceptor, tls_app) => result,
                _ = shutdown_signal() => Ok(()),
            }
        }));
    }

    for result in join_all(tasks).await {
        result.context("listener task panicked")??;
    }

    Ok(())
}
