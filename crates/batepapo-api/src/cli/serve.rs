//! `batepapo serve`: REST API plus the background sweeper.

use anyhow::Result;
use console::style;
use tokio_util::sync::CancellationToken;

use batepapo_core::sweeper::spawn_sweeper;

use crate::http;
use crate::state::AppState;

pub async fn serve(state: AppState, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| state.config.host.clone());
    let port = port.unwrap_or(state.config.port);
    let addr = format!("{host}:{port}");
    let schedule = state.sweep_schedule()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let cancel = CancellationToken::new();
    let sweeper = spawn_sweeper(
        state.presence_service.clone(),
        schedule,
        cancel.clone(),
    );

    println!(
        "  {} Batepapo listening on {}",
        style("⚡").bold(),
        style(format!("http://{addr}")).cyan()
    );
    println!("  {}", style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    cancel.cancel();
    if let Err(e) = sweeper.await {
        tracing::warn!(error = %e, "sweeper task ended abnormally");
    }
    served?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
