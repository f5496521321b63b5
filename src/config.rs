use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::analytics::DEFAULT_TOP_N;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub db_path: Option<String>,
    pub csv_path: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/election-dashboard/config.toml")
    }

    /// Reads the TOML config at `path` (or the default location). A missing
    /// file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(db_path) = overrides.db_path {
            self.storage.db_path = db_path;
        }
        if let Some(csv_path) = overrides.csv_path {
            self.dataset.csv_path = csv_path;
        }
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
    }

    /// Writes the commented default config. An existing file is kept unless
    /// `overwrite` is set.
    pub fn write_template(path: &Path, overwrite: bool) -> Result<()> {
        if path.exists() && !overwrite {
            bail!(
                "config already exists at {}; pass --force to replace it",
                path.display()
            );
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    pub fn resolved_csv_path(&self) -> PathBuf {
        expand_tilde(&self.dataset.csv_path)
    }

    pub fn default_template() -> String {
        let template = r#"[storage]
db_path = "~/.local/share/election-dashboard/elections.db"

[dataset]
csv_path = "election_data.csv"

[server]
host = "127.0.0.1"
port = 8000

[analysis]
default_top_n = 5
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_top_n: default_top_n(),
        }
    }
}

fn default_db_path() -> String {
    "~/.local/share/election-dashboard/elections.db".to_string()
}

fn default_csv_path() -> String {
    "election_data.csv".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{Config, ConfigOverrides};

    #[test]
    fn template_parses_to_defaults() {
        let parsed: Config = toml::from_str(&Config::default_template()).expect("bad template");
        let defaults = Config::default();
        assert_eq!(parsed.storage.db_path, defaults.storage.db_path);
        assert_eq!(parsed.dataset.csv_path, defaults.dataset.csv_path);
        assert_eq!(parsed.server.port, 8000);
        assert_eq!(parsed.analysis.default_top_n, 5);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let parsed: Config = toml::from_str("[server]\nport = 9001\n").expect("bad toml");
        assert_eq!(parsed.server.port, 9001);
        assert_eq!(parsed.server.host, "127.0.0.1");
        assert_eq!(parsed.dataset.csv_path, "election_data.csv");
    }

    #[test]
    fn missing_file_loads_defaults_and_overrides_apply() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let mut config =
            Config::load(Some(&dir.path().join("absent.toml"))).expect("load should not fail");
        config.apply_overrides(ConfigOverrides {
            db_path: Some("/tmp/elections.db".to_string()),
            csv_path: None,
            host: None,
            port: Some(8080),
        });
        assert_eq!(config.resolved_db_path().to_string_lossy(), "/tmp/elections.db");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn written_template_round_trips_through_load() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("conf/config.toml");
        Config::write_template(&path, false).expect("write failed");
        let config = Config::load(Some(&path)).expect("load failed");
        assert_eq!(config.analysis.default_top_n, 5);
    }

    #[test]
    fn template_keeps_existing_file_unless_overwriting() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server]\nport = 9100\n").expect("write failed");

        let err = Config::write_template(&path, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        let kept = Config::load(Some(&path)).expect("load failed");
        assert_eq!(kept.server.port, 9100);

        Config::write_template(&path, true).expect("overwrite failed");
        let replaced = Config::load(Some(&path)).expect("load failed");
        assert_eq!(replaced.server.port, Config::default().server.port);
    }
}
