use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Base URLs of the two upstream endpoints. Configured independently so a
/// proxy or a mock server can stand in for either one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    pub current: String,
    pub forecast: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            current: "https://api.weatherbit.io/v2.0/current".to_string(),
            forecast: "https://api.weatherbit.io/v2.0/forecast/daily".to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Shared API credential for both endpoints.
    pub api_key: Option<String>,

    /// City fetched on startup when the session cache is empty or stale.
    pub default_city: String,

    /// Example TOML:
    /// [endpoints]
    /// current = "https://api.weatherbit.io/v2.0/current"
    /// forecast = "https://api.weatherbit.io/v2.0/forecast/daily"
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            default_city: "Wellington".to_string(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Return the API key, or a hint to configure one first.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `skycast configure` and enter your API key."
            )
        })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Directory holding the session-scoped stores (cache, recent searches).
    pub fn store_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.cache_dir().to_path_buf())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.require_api_key().unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
        assert!(err.to_string().contains("Hint: run `skycast configure`"));
    }

    #[test]
    fn set_api_key_round_trips() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());

        assert_eq!(cfg.require_api_key().expect("api key must exist"), "KEY");
    }

    #[test]
    fn defaults_point_at_weatherbit_and_wellington() {
        let cfg = Config::default();

        assert_eq!(cfg.default_city, "Wellington");
        assert!(cfg.endpoints.current.ends_with("/current"));
        assert!(cfg.endpoints.forecast.ends_with("/forecast/daily"));
    }

    #[test]
    fn missing_endpoints_table_falls_back_to_defaults() {
        let cfg: Config = toml::from_str(
            "api_key = \"KEY\"\ndefault_city = \"Tokyo\"\n",
        )
        .expect("partial config must parse");

        assert_eq!(cfg.default_city, "Tokyo");
        assert_eq!(cfg.endpoints.current, Endpoints::default().current);
    }
}
