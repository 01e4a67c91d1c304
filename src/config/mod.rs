//! Configuration system for polydecode.
//!
//! User preferences live in a small TOML file; everything has a default, so a
//! missing or broken file never stops the tool. Type definitions and the
//! resolver to run are described separately by a [`schema::Schema`].
//!
//! # Example
//!
//! ```
//! use polydecode::config::Config;
//! use polydecode::resolver::Policy;
//!
//! let config = Config::default();
//! assert_eq!(config.policy, Policy::Strict);
//! assert_eq!(config.log_level, "warn");
//!
//! let custom = Config {
//!     policy: Policy::Soft,
//!     ..Config::default()
//! };
//! assert!(custom.pretty);
//! ```

pub mod schema;

use serde::{Deserialize, Serialize};

use crate::resolver::Policy;

/// Configuration for the polydecode command.
///
/// # Fields
///
/// * `policy` - No-match policy used when a schema does not set one (default: strict)
/// * `log_level` - Log filter used when `RUST_LOG` is unset (default: "warn")
/// * `pretty` - Pretty-print decoded output (default: true)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub policy: Policy,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_pretty() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            policy: Policy::default(),
            log_level: default_log_level(),
            pretty: default_pretty(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/polydecode/config.toml` on all platforms.
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("polydecode");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to defaults.
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config file");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    /// Saves configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.policy, Policy::Strict);
        assert_eq!(config.log_level, "warn");
        assert!(config.pretty);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("policy = \"soft\"").unwrap();
        assert_eq!(config.policy, Policy::Soft);
        assert_eq!(config.log_level, "warn");
        assert!(config.pretty);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        assert!(toml::from_str::<Config>("policy = \"lenient\"").is_err());
    }
}
