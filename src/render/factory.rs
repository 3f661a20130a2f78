//! Backend selection with silent degradation to the portable writer.
use tracing::{info, warn};

use crate::config::{DeckConfig, RenderConfig};
use crate::design::DesignContext;
use crate::error::{Error, Result};
use crate::layout::LayoutGrid;

use super::RenderBackend;
use super::native::{AutomationHost, NativeBackend, PowerShellHost};
use super::portable::PortableBackend;

/// Picks the backend for one deck.
///
/// The native backend is tried first when enabled. Any handshake failure is
/// logged and the portable backend is used instead; the caller only sees an
/// error when neither can be built.
pub struct BackendFactory<H: AutomationHost = PowerShellHost> {
    render: RenderConfig,
    grid: LayoutGrid,
    host: Option<H>,
    title: String,
}

impl BackendFactory<PowerShellHost> {
    pub fn new(config: &DeckConfig) -> Self {
        Self::with_host(config, PowerShellHost::from_config(&config.render))
    }

    /// Factory that always builds the portable backend.
    pub fn without_native(config: &DeckConfig) -> Self {
        Self {
            render: config.render.clone(),
            grid: LayoutGrid::from_canvas(&config.canvas),
            host: None,
            title: String::new(),
        }
    }
}

impl<H: AutomationHost + 'static> BackendFactory<H> {
    pub fn with_host(config: &DeckConfig, host: H) -> Self {
        Self {
            render: config.render.clone(),
            grid: LayoutGrid::from_canvas(&config.canvas),
            host: Some(host),
            title: String::new(),
        }
    }

    /// Document title recorded by the portable writer.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn grid(&self) -> &LayoutGrid {
        &self.grid
    }

    pub fn select(self, design: &DesignContext) -> Result<Box<dyn RenderBackend>> {
        let native = match self.host {
            Some(host) if self.render.prefer_native => {
                match NativeBackend::connect(host, &self.grid, self.render.handshake_timeout()) {
                    Ok(backend) => {
                        info!(backend = "native", "render backend selected");
                        return Ok(Box::new(backend));
                    },
                    Err(e) => {
                        warn!(error = %e, "native backend unavailable, using portable backend");
                        e.to_string()
                    },
                }
            },
            Some(_) => "disabled by configuration".to_string(),
            None => "no automation host".to_string(),
        };

        match PortableBackend::new(&self.grid, design) {
            Ok(backend) => {
                info!(backend = "portable", "render backend selected");
                Ok(Box::new(backend.with_title(self.title)))
            },
            Err(e) => Err(Error::NoRenderBackend {
                native,
                portable: e.to_string(),
            }),
        }
    }
}
