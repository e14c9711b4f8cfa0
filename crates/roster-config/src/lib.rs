//! Configuration management for Roster
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. CLI arguments (highest precedence)
//! 2. Environment variables (`ROSTER_*` prefix)
//! 3. roster.local.toml (gitignored, local overrides)
//! 4. roster.toml (git-tracked, project config)
//! 5. ~/.config/roster/config.toml (user defaults)
//! 6. Built-in defaults (lowest precedence)

use anyhow::Result;
use serde::{Deserialize, Serialize};

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Log levels accepted in `[logging] level`.
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Main Roster configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub project: ProjectConfig,
    pub registry: RegistryConfig,
    pub console: ConsoleConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "roster-project".to_string(),
        }
    }
}

/// Startup contents of the in-memory registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Load the sample courses and students on startup.
    pub seed_demo_data: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Colored output. `NO_COLOR` in the environment still wins.
    pub color: bool,
    pub prompt: String,
    /// Persist line history between console sessions.
    pub history: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            color: true,
            prompt: "roster> ".to_string(),
            history: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter level; `RUST_LOG` overrides it.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl RosterConfig {
    /// Checks values the type system cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }

        if self.console.prompt.is_empty() {
            return Err(ConfigError::ValidationError(
                "console.prompt must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RosterConfig::default();
        assert_eq!(config.project.name, "roster-project");
        assert!(config.registry.seed_demo_data);
        assert!(config.console.color);
        assert_eq!(config.console.prompt, "roster> ");
        assert_eq!(config.logging.level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_level() {
        let mut config = RosterConfig::default();
        config.logging.level = "chatty".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_validate_accepts_uppercase_level() {
        let mut config = RosterConfig::default();
        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_prompt() {
        let mut config = RosterConfig::default();
        config.console.prompt = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_rendering_round_trips() {
        let config = RosterConfig::default();
        let rendered = config.to_toml_string().unwrap();

        assert!(rendered.contains("[registry]"));
        assert!(rendered.contains("seed_demo_data = true"));

        let parsed: RosterConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
