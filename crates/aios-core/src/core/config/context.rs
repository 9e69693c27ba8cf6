use std::sync::Arc;

use aios_domain::Result;

use crate::config::{Config, GlobalOptions};
use crate::inventory::{FileInventoryStore, InventoryService};
use crate::links::FsLinkDriver;
use crate::reconcile::Reconciler;

/// Per-invocation wiring of configuration into the workspace components.
pub struct CommandContext<'a> {
    pub global: &'a GlobalOptions,
    config: Config,
}

impl<'a> CommandContext<'a> {
    /// Creates a context from the process environment.
    ///
    /// # Errors
    /// Returns an error if the workspace root cannot be resolved.
    pub fn new(global: &'a GlobalOptions) -> Result<Self> {
        Ok(Self::with_config(global, Config::from_env()?))
    }

    #[must_use]
    pub fn with_config(global: &'a GlobalOptions, config: Config) -> Self {
        Self { global, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn inventory(&self) -> InventoryService {
        let store = FileInventoryStore::new(self.config.workspace().inventory_path());
        InventoryService::new(Arc::new(store))
    }

    pub fn link_driver(&self) -> FsLinkDriver {
        FsLinkDriver::new(self.config.workspace().links_root())
    }

    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(Arc::new(self.inventory()), Arc::new(self.link_driver()))
    }
}
