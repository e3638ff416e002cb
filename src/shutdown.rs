use log::{info, warn};
use std::io;
use tokio::sync::watch;

/// Flips to true on Ctrl-C or SIGTERM.
pub fn listen() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);

    tokio::spawn(async move {
        let signal = tokio::select! {
            res = tokio::signal::ctrl_c() => res.map(|_| "SIGINT"),
            res = terminate() => res.map(|_| "SIGTERM"),
        };

        match signal {
            Ok(name) => {
                info!("Got {}, shutting down after the current cycle", name);
                let _ = tx.send(true);
            }
            Err(e) => warn!("Error installing signal handler: {}", e),
        }
    });

    rx
}

#[cfg(unix)]
async fn terminate() -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    signal(SignalKind::terminate())?.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn terminate() -> io::Result<()> {
    futures::future::pending().await
}
