//! Configuration management commands.

use std::path::Path;

use anyhow::Result;
use roster_config::{Paths, RosterConfig};

use crate::Format;
use crate::style::colors::SemanticStyle;
use crate::style::{info_table, print_labeled};

/// Show current configuration.
pub fn show(config: &RosterConfig, project: &Path, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        Format::Toml => {
            print!("{}", config.to_toml_string()?);
        }
        Format::Text => {
            println!("{}", "Roster Configuration".header());
            println!();

            println!("Sources:");
            let user = Paths::new()
                .user_config_file()
                .map_or_else(|e| e.to_string(), |p| p.display().to_string());
            print_labeled("user", &user);
            print_labeled(
                "project",
                &Paths::project_config_file(project).display().to_string(),
            );
            print_labeled(
                "local",
                &Paths::local_config_file(project).display().to_string(),
            );
            println!();

            let entries = [
                ("project.name", config.project.name.clone()),
                (
                    "registry.seed_demo_data",
                    config.registry.seed_demo_data.to_string(),
                ),
                ("console.color", config.console.color.to_string()),
                ("console.prompt", format!("{:?}", config.console.prompt)),
                ("console.history", config.console.history.to_string()),
                ("logging.level", config.logging.level.clone()),
            ];
            println!("{}", info_table(&entries));
        }
    }

    Ok(())
}
