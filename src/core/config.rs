//! Configuration management with layered hierarchy
//!
//! Supplies the active craftsman identity to report filing; there is no
//! session or login machinery beyond this.

use serde::Deserialize;
use std::path::PathBuf;

use crate::core::Project;

/// MRT configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Craftsman record ID used when filing reports
    pub craftsman: Option<String>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/mrt/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        // 3. Project config (.mrt/config.yaml)
        if let Ok(project) = Project::discover() {
            let project_config_path = project.mrt_dir().join("config.yaml");
            if project_config_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&project_config_path) {
                    if let Ok(project_config) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(project_config);
                    }
                }
            }
        }

        // 4. Environment variables
        if let Ok(craftsman) = std::env::var("MRT_CRAFTSMAN") {
            config.craftsman = Some(craftsman);
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "mrt")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.craftsman.is_some() {
            self.craftsman = other.craftsman;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Get the configured craftsman record ID, if any
    pub fn craftsman(&self) -> Option<&str> {
        self.craftsman.as_deref().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            craftsman: Some("CM-A".to_string()),
            default_format: None,
        };
        base.merge(Config {
            craftsman: Some("CM-B".to_string()),
            default_format: Some("json".to_string()),
        });
        assert_eq!(base.craftsman(), Some("CM-B"));
        assert_eq!(base.default_format.as_deref(), Some("json"));
    }

    #[test]
    fn test_empty_craftsman_is_none() {
        let config = Config {
            craftsman: Some(String::new()),
            default_format: None,
        };
        assert_eq!(config.craftsman(), None);
    }
}
