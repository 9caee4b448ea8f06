use std::future::Future;

use anyhow::Context;
use tokio::{runtime::Runtime, sync::broadcast, task::JoinHandle};
use tracing::{debug, info};

/// Owns the tokio runtime the node's long-running services are driven on, and a broadcast
/// channel used to tell them to stop.
pub struct ReamExecutor {
    runtime: Runtime,
    shutdown: broadcast::Sender<()>,
}

impl ReamExecutor {
    pub fn new() -> anyhow::Result<Self> {
        let runtime = Runtime::new().context("Failed to build tokio runtime")?;
        Ok(Self::with_runtime(runtime))
    }

    /// Creates a new executor with an existing runtime
    pub fn with_runtime(runtime: Runtime) -> Self {
        let (shutdown, _) = broadcast::channel(1);
        Self { runtime, shutdown }
    }

    /// Spawns a task that is dropped when shutdown is triggered. Resolves to `None` in that case.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<Option<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let mut shutdown = self.shutdown.subscribe();
        self.runtime.spawn(async move {
            tokio::select! {
                result = future => Some(result),
                _ = shutdown.recv() => {
                    debug!("Task cancelled due to shutdown");
                    None
                }
            }
        })
    }

    /// Spawns a task that is handed the shutdown receiver so it can wind down on its own terms.
    pub fn spawn_cancellable<F, Fut, T>(&self, future_fn: F) -> JoinHandle<T>
    where
        F: FnOnce(broadcast::Receiver<()>) -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let shutdown = self.shutdown.subscribe();
        self.runtime.spawn(future_fn(shutdown))
    }

    /// Runs a future to completion on the executor's runtime, blocking the current thread.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Triggers a shutdown signal to all spawned tasks
    pub fn shutdown(&self) {
        info!("Shutting down executor");
        let _ = self.shutdown.send(());
    }

    /// Get a reference to the underlying runtime
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }
}
