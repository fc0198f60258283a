use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::{
    CONFIG_FILE_NAME, DEFAULT_DATA_DIR, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_RELOAD_SECS,
};

/// Whether the host binds all interfaces
pub fn is_all_interfaces(host: &str) -> bool {
    host == "0.0.0.0" || host == "::"
}

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Dataset configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatasetFileConfig {
    /// Directory containing the five source CSV relations
    pub dir: Option<PathBuf>,
    /// Snapshot staleness window in seconds (0 disables background reloads)
    pub reload_secs: Option<u64>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub dataset: Option<DatasetFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Dataset configuration
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Directory containing the five source CSV relations
    pub dir: PathBuf,
    /// Snapshot staleness window in seconds (0 disables background reloads)
    pub reload_secs: u64,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Local directory config OR CLI-specified config path
    /// 3. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let file_path = if let Some(ref path) = cli.config {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path.clone())
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        let file_config = match file_path {
            Some(path) => {
                let config = FileConfig::load_from_file(&path)?;
                config.warn_unknown_fields();
                tracing::debug!(path = %path.display(), "Config file loaded");
                config
            }
            None => FileConfig::default(),
        };

        let file_server = file_config.server.unwrap_or_default();
        let file_dataset = file_config.dataset.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let data_dir = cli
            .data_dir
            .clone()
            .or(file_dataset.dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let reload_secs = cli
            .reload_secs
            .or(file_dataset.reload_secs)
            .unwrap_or(DEFAULT_RELOAD_SECS);

        let config = Self {
            server: ServerConfig { host, port },
            dataset: DatasetConfig {
                dir: data_dir,
                reload_secs,
            },
        };

        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            data_dir = %config.dataset.dir.display(),
            reload_secs = config.dataset.reload_secs,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        // Port 0 would cause bind failure
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if self.dataset.dir.as_os_str().is_empty() {
            anyhow::bail!("Configuration error: dataset.dir must not be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli_defaults() -> CliConfig {
        CliConfig {
            host: None,
            port: None,
            config: None,
            data_dir: None,
            reload_secs: None,
        }
    }

    #[test]
    fn test_defaults_when_nothing_configured() {
        let config = AppConfig::load(&cli_defaults()).unwrap();
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.dataset.dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.dataset.reload_secs, DEFAULT_RELOAD_SECS);
    }

    #[test]
    fn test_cli_overrides_file_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"server": {{"host": "10.0.0.1", "port": 9000}}, "dataset": {{"reload_secs": 60}}}}"#
        )
        .unwrap();

        let cli = CliConfig {
            port: Some(7777),
            config: Some(file.path().to_path_buf()),
            ..cli_defaults()
        };

        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.server.host, "10.0.0.1");
        assert_eq!(config.server.port, 7777);
        assert_eq!(config.dataset.reload_secs, 60);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/marquee.json")),
            ..cli_defaults()
        };
        assert!(AppConfig::load(&cli).is_err());
    }

    #[test]
    fn test_port_zero_rejected() {
        let cli = CliConfig {
            port: Some(0),
            ..cli_defaults()
        };
        assert!(AppConfig::load(&cli).is_err());
    }

    #[test]
    fn test_is_all_interfaces() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("::"));
        assert!(!is_all_interfaces("127.0.0.1"));
    }
}
