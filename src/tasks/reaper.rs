//! TTL Reaper Task
//!
//! Background task that periodically removes cache entries older than the ttl.
//! The sweep loop runs under a supervisor that restarts it if it panics, and
//! both stop when the owning cache closes or is dropped.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::cache::CacheStore;
use crate::tasks::ReaperHealth;

/// Pause between a sweep loop panic and its restart.
const RESTART_BACKOFF: Duration = Duration::from_millis(100);

// == Reaper Handle ==
/// Owning handle to a running reaper.
///
/// Dropping the handle drops the shutdown sender, which ends the task at its
/// next wake-up. [`ReaperHandle::shutdown`] does the same and waits for it.
#[derive(Debug)]
pub struct ReaperHandle {
    shutdown: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
    health: Arc<ReaperHealth>,
}

impl ReaperHandle {
    pub fn health(&self) -> &Arc<ReaperHealth> {
        &self.health
    }

    // == Shutdown ==
    /// Signals the reaper to stop and waits until it has exited.
    ///
    /// Concurrent callers all return only after the task has exited. Calling
    /// this again later is a no-op.
    pub async fn shutdown(&self) {
        let _ = self.shutdown.send(true);

        // Held across the join so later callers queue behind the first
        let mut task = self.task.lock().await;
        if let Some(handle) = task.take() {
            if let Err(err) = handle.await {
                error!(error = %err, "Reaper task ended abnormally");
            }
        }
    }
}

/// Spawns the reaper for `store`, sweeping every `interval`.
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(CacheStore::new(Duration::from_secs(60))));
/// let reaper = spawn_reaper(store.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// reaper.shutdown().await;
/// ```
pub fn spawn_reaper(store: Arc<RwLock<CacheStore>>, interval: Duration) -> ReaperHandle {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let health = Arc::new(ReaperHealth::new(interval));
    // Alive from the moment it is spawned, not from its first poll
    health.set_running(true);

    info!(
        interval_ms = interval.as_millis() as u64,
        "Starting TTL reaper"
    );

    let task = {
        let health = health.clone();
        let sweep_health = health.clone();
        let sweep_shutdown = shutdown_rx.clone();
        tokio::spawn(supervise(
            move || {
                sweep_loop(
                    store.clone(),
                    interval,
                    sweep_shutdown.clone(),
                    sweep_health.clone(),
                )
            },
            shutdown_rx,
            health,
        ))
    };

    ReaperHandle {
        shutdown: shutdown_tx,
        task: Mutex::new(Some(task)),
        health,
    }
}

// == Supervisor ==
/// Runs the task produced by `make_task` until it returns cleanly or shutdown
/// is requested, respawning it whenever it panics.
pub(crate) async fn supervise<F, Fut>(
    mut make_task: F,
    shutdown: watch::Receiver<bool>,
    health: Arc<ReaperHealth>,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    health.set_running(true);

    loop {
        let stopping = *shutdown.borrow();
        if stopping {
            break;
        }

        match tokio::spawn(make_task()).await {
            Ok(()) => break,
            Err(err) if err.is_panic() => {
                health.record_restart();
                error!(
                    restarts = health.restarts(),
                    "Reaper sweep loop panicked, restarting"
                );
                tokio::time::sleep(RESTART_BACKOFF).await;
            }
            Err(_) => break,
        }
    }

    health.set_running(false);
    info!("TTL reaper stopped");
}

// == Sweep Loop ==
/// Sleeps for `interval`, then removes expired entries under the write lock.
///
/// Returns when shutdown is signalled or the shutdown sender is dropped.
async fn sweep_loop(
    store: Arc<RwLock<CacheStore>>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
    health: Arc<ReaperHealth>,
) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown.changed() => break,
        }

        // Whole pass under one guard so readers never see a partial sweep
        let removed = {
            let mut guard = store.write().await;
            guard.remove_expired()
        };
        health.record_sweep(removed);

        if removed > 0 {
            info!(removed, "TTL reaper removed expired entries");
        } else {
            debug!("TTL reaper: no expired entries found");
        }
    }
}
