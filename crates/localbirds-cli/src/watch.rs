//! Scheduled digests via `tokio-cron-scheduler`.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler};

use crate::digest::{run_once, DigestContext};

/// Registers the digest job on `schedule` and runs until Ctrl-C or SIGTERM.
///
/// A failed run is logged and the schedule continues.
pub(crate) async fn run_watch(ctx: Arc<DigestContext>, schedule: &str) -> anyhow::Result<()> {
    let mut scheduler = JobScheduler::new().await?;

    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let ctx = Arc::clone(&ctx);

        Box::pin(async move {
            tracing::info!("scheduler: starting digest run");
            match run_once(&ctx, false, false).await {
                Ok(()) => tracing::info!("scheduler: digest run complete"),
                Err(e) => tracing::error!(error = %e, "scheduler: digest run failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    tracing::info!(schedule, "watching for new sightings");

    shutdown_signal().await;
    scheduler.shutdown().await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, stopping scheduler");
}
