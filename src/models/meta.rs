use serde::{Deserialize, Serialize};
use std::fmt;

/// Facts the server reports about its own configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiMeta {
    /// Whether the certificate authority pages are enabled.
    #[serde(rename = "CaEnabled")]
    pub ca_enabled: bool,

    /// Hours after which a node counts as unreported.
    #[serde(rename = "UnreportedHours")]
    pub unreported_hours: f64,
}

/// The server's software version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiVersion {
    #[serde(rename = "Version")]
    pub version: String,
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.version)
    }
}
