//! Task spawning helpers for the native and browser runtimes.

use std::future::Future;

/// Spawn onto the Dioxus runtime of the current component scope.
pub fn spawn_future<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    dioxus::prelude::spawn(future);
}

/// Run blocking work (sheet I/O) off the UI loop. Returns `None` if the worker
/// panicked or was cancelled.
#[cfg(not(target_arch = "wasm32"))]
pub async fn run_blocking<T, F>(work: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::error!(%err, "blocking task failed");
            None
        }
    }
}

/// The browser has no blocking pool; `localStorage` access is synchronous and short.
#[cfg(target_arch = "wasm32")]
pub async fn run_blocking<T, F>(work: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    Some(work())
}
