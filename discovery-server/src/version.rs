use serde::{Deserialize, Serialize};
use std::fmt;

pub const PRODUCT_NAME: &str = "Discovery";
pub const API_VERSION: &str = "1";

/// Server's version and build info
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub name: String,
    pub version: String,
    pub api_version: String,
    pub build_date: String,
    pub experimental: bool,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            name: PRODUCT_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            api_version: API_VERSION.to_string(),
            build_date: option_env!("DISCOVERY_BUILD_DATE")
                .unwrap_or_default()
                .to_string(),
            experimental: option_env!("DISCOVERY_EXPERIMENTAL").is_some_and(|v| v == "true"),
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}
