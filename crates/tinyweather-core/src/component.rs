use anyhow::Result;
use std::sync::Arc;

use crate::Config;

/// A long-lived piece of the application with an explicit start and stop,
/// such as a background sweep or a persistence adapter.
pub trait Component: Send {
    /// Unique identifier for this component
    fn id(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Start the component. Called once, in registration order.
    fn initialize(&mut self, ctx: &AppContext) -> Result<()>;

    /// Stop the component. Called once, in reverse registration order.
    fn shutdown(&mut self) -> Result<()>;
}

/// Context provided to components during initialization
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
}

impl AppContext {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}
