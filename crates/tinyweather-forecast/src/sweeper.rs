//! Periodic removal of stale cache entries.

use std::time::Duration;

use tinyweather_core::{AppContext, Component};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::cache_key::SWEEP_INTERVAL_SECS;
use crate::shared::SharedWeatherCache;

/// Background task owned by the host application. Started on
/// [`Component::initialize`] (or [`CacheSweeper::start`]) and cancelled on
/// shutdown.
#[derive(Debug)]
pub struct CacheSweeper {
    cache: SharedWeatherCache,
    interval: Duration,
    cancel: Option<CancellationToken>,
    task: Option<JoinHandle<()>>,
}

impl CacheSweeper {
    pub fn new(cache: SharedWeatherCache) -> Self {
        Self::with_interval(cache, Duration::from_secs(SWEEP_INTERVAL_SECS))
    }

    pub fn with_interval(cache: SharedWeatherCache, interval: Duration) -> Self {
        Self {
            cache,
            interval,
            cancel: None,
            task: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Spawn the sweep loop on `runtime`. Sweeps once immediately, then on
    /// every interval tick. Calling this while running does nothing.
    pub fn start(&mut self, runtime: &Handle) {
        if self.is_running() {
            return;
        }

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let cache = self.cache.clone();
        let interval = self.interval;

        self.task = Some(runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        let removed = cache.sweep();
                        if removed > 0 {
                            tracing::debug!("Swept {} stale weather cache entries", removed);
                        }
                    }
                }
            }
            tracing::debug!("Weather cache sweeper stopped");
        }));
        self.cancel = Some(token);
        tracing::info!("Weather cache sweeper started ({:?} interval)", self.interval);
    }

    /// Cancel the loop without waiting for it to exit
    pub fn stop(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        self.task = None;
    }

    /// Cancel the loop and wait for it to finish
    pub async fn stop_and_wait(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Weather cache sweeper ended abnormally: {}", e);
            }
        }
    }
}

impl Component for CacheSweeper {
    fn id(&self) -> &str {
        "cache-sweeper"
    }

    fn name(&self) -> &str {
        "Weather cache sweeper"
    }

    fn initialize(&mut self, ctx: &AppContext) -> anyhow::Result<()> {
        self.interval = ctx.config.cache.sweep_interval();
        let runtime = Handle::try_current()
            .map_err(|e| anyhow::anyhow!("Cache sweeper needs a tokio runtime: {}", e))?;
        self.start(&runtime);
        Ok(())
    }

    fn shutdown(&mut self) -> anyhow::Result<()> {
        self.stop();
        Ok(())
    }
}

impl Drop for CacheSweeper {
    fn drop(&mut self) {
        self.stop();
    }
}
