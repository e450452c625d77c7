pub mod app;
pub mod component;
pub mod config;
pub mod error;
pub mod retry;

pub use app::App;
pub use component::{AppContext, Component};
pub use config::{
    CacheConfig, Config, ForecastConfig, HistoryConfig, LocationConfig, NarrationConfig,
    SearchConfig, ValidationResult,
};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt, WeatherError};
pub use retry::{with_retry, RetryConfig};

use anyhow::Result;

/// Initialize logging for the application binary
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("TinyWeather core initialized");
    Ok(())
}
