use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::SerializerKind;
use crate::store::StoreBackend;

/// Port to run the application on
pub const ENV_PORT: &str = "PORT";

/// Directory holding the database file
pub const ENV_DATABASE_PATH: &str = "DATABASE_PATH";

/// Database file name inside `DATABASE_PATH`
pub const DATABASE_FILE: &str = "discovery.db";

/// Main server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: Server,
    pub store: StoreConfig,
    pub cluster: ClusterConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    pub host: String,
    pub port: u16,
    /// Grace period for in-flight requests on shutdown
    pub shutdown_timeout_secs: u64,
    /// Where `GET /` redirects to
    pub docs_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub path: PathBuf,
    pub ttl_sweep_interval_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub serializer: SerializerKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            shutdown_timeout_secs: 5,
            docs_url: "https://docs.storageos.com/".to_string(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Disk,
            path: PathBuf::from(DATABASE_FILE),
            ttl_sweep_interval_ms: 1000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: ServerConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Apply `PORT` and `DATABASE_PATH` from the process environment
    pub fn apply_env(&mut self) -> anyhow::Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env_from<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(ENV_PORT).filter(|p| !p.is_empty()) {
            self.server.port = port
                .parse()
                .with_context(|| format!("invalid port: {port}"))?;
        }

        if let Some(dir) = lookup(ENV_DATABASE_PATH).filter(|d| !d.is_empty()) {
            self.store.path = Path::new(&dir).join(DATABASE_FILE);
        }

        Ok(())
    }

    /// Get server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn ttl_sweep_interval(&self) -> Duration {
        Duration::from_millis(self.store.ttl_sweep_interval_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8081");
        assert_eq!(config.store.backend, StoreBackend::Disk);
        assert_eq!(config.store.path, PathBuf::from("discovery.db"));
        assert_eq!(config.cluster.serializer, SerializerKind::Json);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServerConfig::default();
        config
            .apply_env_from(env(&[("PORT", "9000"), ("DATABASE_PATH", "/var/lib/discovery")]))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.store.path,
            PathBuf::from("/var/lib/discovery/discovery.db")
        );
    }

    #[test]
    fn test_invalid_port_env() {
        let mut config = ServerConfig::default();
        let err = config
            .apply_env_from(env(&[("PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("invalid port"));
    }

    #[test]
    fn test_empty_env_ignored() {
        let mut config = ServerConfig::default();
        config
            .apply_env_from(env(&[("PORT", ""), ("DATABASE_PATH", "")]))
            .unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.store.path, PathBuf::from("discovery.db"));
    }

    #[test]
    fn test_partial_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  port: 9100\nstore:\n  backend: memory\ncluster:\n  serializer: msgpack\n"
        )
        .unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.ttl_sweep_interval_ms, 1000);
        assert_eq!(config.cluster.serializer, SerializerKind::Msgpack);
        assert_eq!(config.logging.level, "info");
    }
}
