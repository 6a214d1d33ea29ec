/*!
 * Connector registry.
 *
 * Connectors are registered explicitly at startup and looked up by alias.
 */

use anyhow::{anyhow, Result};
use log::{debug, info};
use parking_lot::RwLock;
use std::sync::Arc;

use super::TranslationConnector;

/// Registered connectors, in registration order
#[derive(Default)]
pub struct ConnectorRegistry {
    connectors: RwLock<Vec<Arc<dyn TranslationConnector>>>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connector; aliases must be unique
    pub fn register(&self, connector: Arc<dyn TranslationConnector>) -> Result<()> {
        let mut connectors = self.connectors.write();
        if connectors.iter().any(|c| c.alias().eq_ignore_ascii_case(connector.alias())) {
            return Err(anyhow!("A connector with alias '{}' is already registered", connector.alias()));
        }

        info!("Registered connector '{}' ({})", connector.name(), connector.alias());
        connectors.push(connector);
        Ok(())
    }

    /// Look a connector up by alias
    pub fn get(&self, alias: &str) -> Option<Arc<dyn TranslationConnector>> {
        self.connectors
            .read()
            .iter()
            .find(|c| c.alias().eq_ignore_ascii_case(alias))
            .cloned()
    }

    /// Connectors whose configuration makes them usable right now
    pub fn active(&self) -> Vec<Arc<dyn TranslationConnector>> {
        self.connectors
            .read()
            .iter()
            .filter(|c| c.is_active())
            .cloned()
            .collect()
    }

    pub fn aliases(&self) -> Vec<String> {
        self.connectors
            .read()
            .iter()
            .map(|c| c.alias().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.connectors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.read().is_empty()
    }

    /// Ask every connector to pick up configuration changes
    pub fn reload_all(&self) {
        for connector in self.connectors.read().iter() {
            debug!("Reloading connector '{}'", connector.alias());
            connector.reload();
        }
    }
}
