use anyhow::Result;
use std::sync::Arc;

use crate::{AppContext, Component, Config};

/// Application state and lifecycle manager
pub struct App {
    config: Arc<Config>,
    components: Vec<Box<dyn Component>>,
    context: AppContext,
    started: bool,
}

impl App {
    /// Create an application from the on-disk configuration
    pub fn new() -> Result<Self> {
        let (config, _) = Config::load_validated()?;
        Ok(Self::with_config(config))
    }

    /// Create an application from an explicit configuration
    pub fn with_config(config: Config) -> Self {
        let config = Arc::new(config);
        let context = AppContext::new(config.clone());

        Self {
            config,
            components: Vec::new(),
            context,
            started: false,
        }
    }

    /// Register a component; it is started by [`App::initialize`]
    pub fn register(&mut self, component: Box<dyn Component>) {
        tracing::info!("Registering component: {}", component.name());
        self.components.push(component);
    }

    /// Initialize all registered components
    pub fn initialize(&mut self) -> Result<()> {
        tracing::info!(
            "Initializing application with {} components",
            self.components.len()
        );

        for component in &mut self.components {
            tracing::debug!("Initializing component: {}", component.name());
            component.initialize(&self.context)?;
        }
        self.started = true;

        tracing::info!("Application initialized successfully");
        Ok(())
    }

    /// Shut down components in reverse order. Errors are logged, not returned,
    /// so one failing component does not keep the others running.
    pub fn shutdown(&mut self) -> Result<()> {
        if !self.started {
            return Ok(());
        }
        tracing::info!("Shutting down application");

        for component in self.components.iter_mut().rev() {
            tracing::debug!("Shutting down component: {}", component.name());
            if let Err(e) = component.shutdown() {
                tracing::error!("Error shutting down component {}: {}", component.name(), e);
            }
        }
        self.started = false;

        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn shared_config(&self) -> Arc<Config> {
        self.config.clone()
    }

    pub fn components(&self) -> &[Box<dyn Component>] {
        &self.components
    }
}
