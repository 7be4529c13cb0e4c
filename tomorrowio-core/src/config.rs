use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::UnitSystem;

/// Default location queries are made for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// unit_system = "metric"
///
/// [location]
/// latitude = 28.4195
/// longitude = -81.5812
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub location: Option<Location>,
    pub unit_system: Option<UnitSystem>,
}

impl Config {
    /// API key, or an error with a configuration hint.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `tomorrowio configure` and enter your Tomorrow.io API key."
            )
        })
    }

    /// Default location, or an error with a configuration hint.
    pub fn location(&self) -> Result<Location> {
        self.location.ok_or_else(|| {
            anyhow!(
                "No default location configured.\n\
                 Hint: run `tomorrowio configure` and enter a latitude/longitude."
            )
        })
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system.unwrap_or_default()
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.location.is_some()
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
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
        let dirs = ProjectDirs::from("io", "tomorrowio", "tomorrowio-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_key().unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn location_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.location().unwrap_err();

        assert!(err.to_string().contains("No default location configured"));
    }

    #[test]
    fn unit_system_defaults_to_imperial() {
        let cfg = Config::default();
        assert_eq!(cfg.unit_system(), UnitSystem::Imperial);
    }

    #[test]
    fn configured_when_key_and_location_present() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            location: Some(Location { latitude: 28.4195, longitude: -81.5812 }),
            unit_system: None,
        };

        assert!(cfg.is_configured());
        assert_eq!(cfg.api_key().expect("api key must exist"), "KEY");
        assert_eq!(cfg.location().expect("location must exist").latitude, 28.4195);
    }

    #[test]
    fn roundtrips_through_toml() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            location: Some(Location { latitude: 50.45, longitude: 30.52 }),
            unit_system: Some(UnitSystem::Metric),
        };

        let toml = toml::to_string_pretty(&cfg).expect("serialization must succeed");
        let parsed: Config = toml::from_str(&toml).expect("deserialization must succeed");

        assert_eq!(parsed.api_key.as_deref(), Some("KEY"));
        assert_eq!(parsed.unit_system, Some(UnitSystem::Metric));
    }
}
