//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Represents an MRT project
///
/// A project is any directory subtree marked by a `.mrt/` directory, which
/// holds the configuration file, the SQLite store, and the attachment blobs.
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .mrt/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current =
            std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            let mrt_dir = current.join(".mrt");
            if mrt_dir.is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let mrt_dir = root.join(".mrt");
        if mrt_dir.exists() {
            return Err(ProjectError::AlreadyExists(root.clone()));
        }

        std::fs::create_dir_all(mrt_dir.join("attachments"))
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        let config_path = mrt_dir.join("config.yaml");
        std::fs::write(&config_path, Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# MRT Project Configuration

# Craftsman identity used when filing reports (CM-... record ID)
# craftsman: ""

# Default output format (auto, yaml, tsv, json, csv, md, id)
# default_format: auto
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .mrt configuration directory
    pub fn mrt_dir(&self) -> PathBuf {
        self.root.join(".mrt")
    }

    /// Get the path to the SQLite store
    pub fn store_path(&self) -> PathBuf {
        self.mrt_dir().join("store.db")
    }

    /// Get the attachment blob directory
    pub fn attachments_dir(&self) -> PathBuf {
        self.mrt_dir().join("attachments")
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not an MRT project (searched from {searched_from:?}). Run 'mrt init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("MRT project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
