// ABOUTME: Dock settings loaded from settings.toml: icon size, timings, file locations, taskbar flag
// ABOUTME: Missing settings fall back to built-in defaults; malformed settings are a startup error

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    pub dock: DockSettings,
    pub files: FileSettings,
    #[serde(default)]
    pub taskbar: TaskbarSettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DockSettings {
    pub icon_size: u32,
    pub animation_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FileSettings {
    pub entries_path: String,
    pub log_path: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TaskbarSettings {
    /// Windows only. The taskbar should have auto-hide enabled, otherwise
    /// its reserved work area stays empty while it is hidden.
    pub hide: bool,
}

fn default_poll_interval_ms() -> u64 {
    400
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dock: DockSettings {
                icon_size: 48,
                animation_ms: 200,
                poll_interval_ms: default_poll_interval_ms(),
            },
            files: FileSettings {
                entries_path: "config.json".to_string(),
                log_path: "log.txt".to_string(),
            },
            taskbar: TaskbarSettings { hide: false },
        }
    }
}

impl Config {
    pub fn load_from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse settings")
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        Self::load_from_str(&content)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to determine config directory")?;
        Ok(config_dir.join("berth").join("settings.toml"))
    }

    pub fn expand_paths(&mut self) -> Result<()> {
        self.files.entries_path = expand_tilde(&self.files.entries_path)?;
        self.files.log_path = expand_tilde(&self.files.log_path)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.dock.icon_size == 0 {
            anyhow::bail!("icon_size must be greater than 0");
        }

        if self.dock.animation_ms == 0 {
            anyhow::bail!("animation_ms must be greater than 0");
        }

        if self.dock.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be greater than 0");
        }

        if self.files.entries_path.trim().is_empty() {
            anyhow::bail!("entries_path cannot be empty");
        }

        if self.files.log_path.trim().is_empty() {
            anyhow::bail!("log_path cannot be empty");
        }

        Ok(())
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.dock.animation_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.dock.poll_interval_ms)
    }
}

fn expand_tilde(path: &str) -> Result<String> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home.join(rest).to_string_lossy().into_owned())
    } else {
        Ok(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_minimal_config() {
        let config_str = r#"
[dock]
icon_size = 64
animation_ms = 150

[files]
entries_path = "dock.json"
log_path = "dock.log"
"#;

        let config = Config::load_from_str(config_str).unwrap();

        assert_eq!(config.dock.icon_size, 64);
        assert_eq!(config.dock.animation_ms, 150);
        assert_eq!(config.dock.poll_interval_ms, 400); // Default value
        assert_eq!(config.files.entries_path, "dock.json");
        assert!(!config.taskbar.hide); // Default section
    }

    #[test]
    fn test_parse_config_with_taskbar() {
        let config_str = r#"
[dock]
icon_size = 48
animation_ms = 200
poll_interval_ms = 250

[files]
entries_path = "config.json"
log_path = "log.txt"

[taskbar]
hide = true
"#;

        let config = Config::load_from_str(config_str).unwrap();

        assert_eq!(config.dock.poll_interval_ms, 250);
        assert!(config.taskbar.hide);
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.animation_duration(), Duration::from_millis(200));
    }

    #[test]
    fn test_parse_invalid_config_missing_section() {
        let config_str = r#"
[dock]
icon_size = 48
animation_ms = 200
"#;

        let result = Config::load_from_str(config_str);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to parse settings"));
    }

    #[test]
    fn test_parse_invalid_config_wrong_type() {
        let config_str = r#"
[dock]
icon_size = "large"
animation_ms = 200

[files]
entries_path = "config.json"
log_path = "log.txt"
"#;

        assert!(Config::load_from_str(config_str).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");

        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config, Config::default());
        // Defaults are used in memory only
        assert!(!path.exists());
    }

    #[test]
    fn test_load_or_default_malformed_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        fs::write(&path, "[dock\nicon_size = ").unwrap();

        assert!(Config::load_or_default(&path).is_err());
    }

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();

        assert_eq!(
            expand_tilde("~/dock/config.json").unwrap(),
            home.join("dock/config.json").to_string_lossy()
        );
        assert_eq!(expand_tilde("/absolute/path").unwrap(), "/absolute/path");
        assert_eq!(expand_tilde("relative/path").unwrap(), "relative/path");
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path().unwrap();
        assert!(path.to_string_lossy().contains("berth"));
        assert!(path.to_string_lossy().contains("settings.toml"));
    }

    #[test]
    fn test_validate_zero_icon_size() {
        let mut config = Config::default();
        config.dock.icon_size = 0;

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("icon_size must be greater than 0"));
    }

    #[test]
    fn test_validate_zero_timings() {
        let mut config = Config::default();
        config.dock.animation_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.dock.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_entries_path() {
        let mut config = Config::default();
        config.files.entries_path = "  ".to_string();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("entries_path cannot be empty"));
    }
}
