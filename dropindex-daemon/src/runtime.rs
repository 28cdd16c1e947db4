use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use dropindex_core::Settings;

use crate::error::{io_err, DaemonError};
use crate::manifest::ManifestScheduler;
use crate::notifier::NotificationScheduler;

/// How long exit waits for abandoned blocking reads and open alerts.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Install the global subscriber, writing to stderr. `RUST_LOG` overrides the
/// default `info` filter. Calling twice is harmless.
pub fn init_tracing(format: LogFormat) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// Start every configured scheduler and block the current thread until
/// ctrl-c.
pub fn start_blocking(settings: Settings) -> Result<(), DaemonError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    let result = runtime.block_on(run(settings));
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

/// Run until ctrl-c.
pub async fn run(settings: Settings) -> Result<(), DaemonError> {
    let (shutdown_tx, _) = broadcast::channel::<()>(16);

    let signal_handle = {
        let shutdown = shutdown_tx.clone();
        let mut shutdown_rx = shutdown.subscribe();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown_rx.recv() => Ok(()),
                signal = tokio::signal::ctrl_c() => {
                    match signal {
                        Ok(()) => {
                            tracing::info!("received ctrl-c, shutting down");
                            let _ = shutdown.send(());
                            Ok(())
                        }
                        Err(err) => Err(DaemonError::Join(format!("ctrl-c handler failed: {err}"))),
                    }
                }
            }
        })
    };

    let result = run_with_shutdown(settings, shutdown_tx.clone()).await;
    let _ = shutdown_tx.send(());
    handle_join("signal_handler", signal_handle.await)?;
    result
}

/// Run every scheduler in `settings` until `shutdown` fires.
///
/// Settings are validated up front; nothing starts if any entry is invalid.
/// Each scheduler is an independent task with its own state.
pub async fn run_with_shutdown(
    settings: Settings,
    shutdown: broadcast::Sender<()>,
) -> Result<(), DaemonError> {
    settings.validate()?;
    let read_timeout = settings.read_timeout();

    let mut handles: Vec<(String, JoinHandle<Result<(), DaemonError>>)> = Vec::new();

    for manifest in settings.manifests {
        let name = format!("manifest:{}", manifest.root.display());
        let scheduler = ManifestScheduler::from_settings(manifest, read_timeout)?;
        let shutdown = shutdown.clone();
        let shutdown_rx = shutdown.subscribe();
        let handle = tokio::spawn(async move {
            let result = scheduler.run(shutdown_rx).await;
            let _ = shutdown.send(());
            result
        });
        handles.push((name, handle));
    }

    for notifier in &settings.notifiers {
        let name = format!("notifier:{}", notifier.watch_folder.display());
        let scheduler = NotificationScheduler::from_settings(notifier, read_timeout);
        let shutdown = shutdown.clone();
        let shutdown_rx = shutdown.subscribe();
        let handle = tokio::spawn(async move {
            let result = scheduler.run(shutdown_rx).await;
            let _ = shutdown.send(());
            result
        });
        handles.push((name, handle));
    }

    // Any task exiting brings the others down, so joining in order cannot stall.
    let mut first_err = None;
    for (name, handle) in handles {
        if let Err(err) = handle_join(&name, handle.await) {
            tracing::error!(task = %name, error = %err, "scheduler exited with error");
            first_err.get_or_insert(err);
        }
    }

    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn handle_join(
    task: &str,
    result: Result<Result<(), DaemonError>, tokio::task::JoinError>,
) -> Result<(), DaemonError> {
    match result {
        Ok(inner) => inner,
        Err(err) => Err(DaemonError::Join(format!("{task} task join failure: {err}"))),
    }
}
