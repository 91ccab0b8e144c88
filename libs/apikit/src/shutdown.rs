//! Process shutdown signal.

/// Resolves on the first of SIGTERM (unix), SIGINT or Ctrl+C.
pub async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut term, mut int) = match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(term), Ok(int)) => (term, int),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(error = %e, "cannot install unix signal handlers, using ctrl_c only");
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("shutdown: ctrl_c");
                return;
            }
        };

        tokio::select! {
            _ = term.recv() => tracing::info!("shutdown: SIGTERM"),
            _ = int.recv() => tracing::info!("shutdown: SIGINT"),
            _ = tokio::signal::ctrl_c() => tracing::info!("shutdown: ctrl_c"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown: ctrl_c");
    }
}
