//! Global context for bootstrap operations.
//!
//! Provides centralized access to the project root, configuration
//! locations and output preferences.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::ProjectLayout;
use crate::util::config::{self, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Project root every relative path is resolved against
    root: PathBuf,

    /// Global config file (~/.darknext/setup.toml), if a home directory exists
    global_config: Option<PathBuf>,

    /// Whether to use verbose output
    verbose: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Self::with_root(cwd)
    }

    /// Create a GlobalContext rooted at a specific directory.
    ///
    /// A relative root is resolved against the current directory. Child
    /// processes run inside the root, so every layout path must be absolute.
    pub fn with_root(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let root = std::path::absolute(root)
            .with_context(|| format!("failed to resolve project root: {}", root.display()))?;

        Ok(GlobalContext {
            root,
            global_config: config::global_config_path(),
            verbose: false,
        })
    }

    /// Use a specific global config file instead of the home directory one.
    pub fn with_global_config(mut self, path: Option<PathBuf>) -> Self {
        self.global_config = path;
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Get the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the global configuration file path.
    pub fn global_config_path(&self) -> Option<&Path> {
        self.global_config.as_deref()
    }

    /// Get the project configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        config::project_config_path(&self.root)
    }

    /// Load merged global + project configuration.
    pub fn load_config(&self) -> Config {
        config::load_config(self.global_config_path(), &self.project_config_path())
    }

    /// Build the project layout from configuration.
    pub fn layout(&self, config: &Config) -> ProjectLayout {
        ProjectLayout::from_config(&self.root, &config.paths)
    }
}
