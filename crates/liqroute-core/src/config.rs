use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Configuration for a connector's routing table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    /// This connector's own identifier; routes keyed by it are local.
    #[serde(default = "default_connector_id")]
    pub connector_id: String,
    /// How long a peer-learned route stays valid (milliseconds).
    #[serde(default = "default_max_age_ms")]
    pub max_age_ms: u64,
    /// Point budget for curves handed to the broadcast transport.
    #[serde(default = "default_export_max_points")]
    pub export_max_points: usize,
}

fn default_connector_id() -> String {
    "liqroute-connector".into()
}
fn default_max_age_ms() -> u64 {
    45_000
}
fn default_export_max_points() -> usize {
    10
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            connector_id: default_connector_id(),
            max_age_ms: default_max_age_ms(),
            export_max_points: default_export_max_points(),
        }
    }
}

impl TableConfig {
    pub fn max_age(&self) -> Duration {
        Duration::from_millis(self.max_age_ms)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.connector_id.trim().is_empty() {
            return Err(CoreError::InvalidConfig("connector_id is empty".into()));
        }
        if self.max_age_ms == 0 {
            return Err(CoreError::InvalidConfig("max_age_ms must be positive".into()));
        }
        if self.export_max_points < 2 {
            return Err(CoreError::InvalidConfig(format!(
                "export_max_points must be at least 2, got {}",
                self.export_max_points
            )));
        }
        Ok(())
    }
}
