use serde::{Deserialize, Serialize};

/// Feature flags of the Harvester cluster behind the gateway.
///
/// The default value (`""`, `false`) is what the dashboard assumes when the
/// capabilities endpoint cannot be reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    #[serde(default)]
    pub harvester_version: String,
    #[serde(default)]
    pub has_advanced_power: bool,
}

impl Capabilities {
    /// Notice shown when the cluster version is known but lacks advanced options.
    pub fn compatibility_notice(&self) -> Option<String> {
        if self.has_advanced_power || self.harvester_version.is_empty() {
            return None;
        }
        Some(format!(
            "Harvester {} detected: advanced migration options (power control, \
             interface models, disk bus) require v1.6.0 or later and are hidden.",
            self.harvester_version
        ))
    }
}
