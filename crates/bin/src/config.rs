//! Native client configuration.

use client::ViewportConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file, looked up in the working directory.
pub const CONFIG_FILE: &str = "wormflow.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from `wormflow.toml` or use defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load from `path`, writing the defaults there when it does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            Ok(default_config)
        }
    }
}

/// Where to connect.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Worm server socket URL.
    #[serde(default = "default_url")]
    pub url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { url: default_url() }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_url() -> String {
    "ws://127.0.0.1:8080/worms".to_string()
}
fn default_filter() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            url = "ws://worms.example:9000/worms"

            [viewport]
            cell_size = 12
            "#,
        )
        .unwrap();
        assert_eq!(config.server.url, "ws://worms.example:9000/worms");
        assert_eq!(config.viewport.cell_size, 12);
        assert_eq!(config.viewport.cols, 50);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_empty_file() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.url, default_url());
        assert_eq!(config.viewport, ViewportConfig::default());
    }

    #[test]
    fn test_load_writes_default_file() {
        let dir = std::env::temp_dir().join(format!("wormflow-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE);
        let _ = std::fs::remove_file(&path);

        let written = Config::load_from(&path).unwrap();
        assert!(path.exists());
        let reread = Config::load_from(&path).unwrap();
        assert_eq!(reread.server.url, written.server.url);
        assert_eq!(reread.viewport, written.viewport);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
