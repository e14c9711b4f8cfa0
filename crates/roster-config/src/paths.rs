//! Path utilities and XDG directory discovery

use crate::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// XDG-compliant paths for Roster
pub struct Paths {
    project_dirs: Option<ProjectDirs>,
}

impl Paths {
    /// Create a new Paths instance with XDG discovery
    pub fn new() -> Self {
        Self {
            project_dirs: ProjectDirs::from("com", "Roster", "roster"),
        }
    }

    /// Get user config directory (~/.config/roster/)
    pub fn user_config_dir(&self) -> Result<PathBuf, ConfigError> {
        self.project_dirs
            .as_ref()
            .map(|p| p.config_dir().to_path_buf())
            .ok_or_else(|| {
                ConfigError::XdgError("Failed to determine user config directory".to_string())
            })
    }

    /// Get user data directory (~/.local/share/roster/)
    pub fn user_data_dir(&self) -> Result<PathBuf, ConfigError> {
        self.project_dirs
            .as_ref()
            .map(|p| p.data_dir().to_path_buf())
            .ok_or_else(|| {
                ConfigError::XdgError("Failed to determine user data directory".to_string())
            })
    }

    /// Get user config file path (~/.config/roster/config.toml)
    pub fn user_config_file(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.user_config_dir()?.join("config.toml"))
    }

    /// Get console history file path (~/.local/share/roster/history.txt)
    pub fn history_file(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.user_data_dir()?.join("history.txt"))
    }

    /// Get project config file path (roster.toml)
    pub fn project_config_file(project_dir: impl AsRef<Path>) -> PathBuf {
        project_dir.as_ref().join("roster.toml")
    }

    /// Get local config file path (roster.local.toml, gitignored)
    pub fn local_config_file(project_dir: impl AsRef<Path>) -> PathBuf {
        project_dir.as_ref().join("roster.local.toml")
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_xdg_paths() {
        let paths = Paths::new();

        // These should not panic (though paths may vary by platform)
        if let Ok(config_file) = paths.user_config_file() {
            assert!(config_file.to_string_lossy().contains("roster"));
            assert!(config_file.ends_with("config.toml"));
        }

        if let Ok(history) = paths.history_file() {
            assert!(history.to_string_lossy().contains("roster"));
        }
    }

    #[test]
    fn test_project_paths() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        let config_file = Paths::project_config_file(project_dir);
        assert_eq!(config_file, project_dir.join("roster.toml"));

        let local_file = Paths::local_config_file(project_dir);
        assert_eq!(local_file, project_dir.join("roster.local.toml"));
    }
}
