//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `~/.darknext/setup.toml` - User-wide defaults
//! - Project: `.darknext/setup.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.
//!
//! ```toml
//! [paths]
//! venv = ".venv"
//! template = "config/env.template"
//!
//! [python]
//! interpreter = "/usr/bin/python3.11"
//!
//! [install]
//! extra_args = ["--upgrade"]
//!
//! [self_test]
//! mode = "test"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Mode flag passed to the entry point for the self-test.
pub const DEFAULT_SELF_TEST_MODE: &str = "test";

/// Bootstrap configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path overrides
    pub paths: PathsConfig,

    /// Interpreter settings
    pub python: PythonConfig,

    /// Dependency installation settings
    pub install: InstallConfig,

    /// Self-test settings
    pub self_test: SelfTestConfig,
}

/// Overrides for the fixed project paths. Relative paths are relative to
/// the project root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub venv: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub entry_point: Option<PathBuf>,
}

/// Interpreter used to create the virtual environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PythonConfig {
    pub interpreter: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Extra arguments appended to `pip install -r <manifest>`
    pub extra_args: Option<Vec<String>>,
}

impl InstallConfig {
    pub fn extra_args(&self) -> &[String] {
        self.extra_args.as_deref().unwrap_or_default()
    }
}

/// Unset fields fall back to defaults only after all layers are merged, so
/// an explicit `mode = "test"` or `extra_args = []` still overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfTestConfig {
    /// Value passed to the entry point's `--mode` flag
    pub mode: Option<String>,

    /// Extra arguments appended after `--mode <mode>`
    pub extra_args: Option<Vec<String>>,
}

impl SelfTestConfig {
    pub fn mode(&self) -> &str {
        self.mode.as_deref().unwrap_or(DEFAULT_SELF_TEST_MODE)
    }

    pub fn extra_args(&self) -> &[String] {
        self.extra_args.as_deref().unwrap_or_default()
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Paths
        if other.paths.venv.is_some() {
            self.paths.venv = other.paths.venv;
        }
        if other.paths.manifest.is_some() {
            self.paths.manifest = other.paths.manifest;
        }
        if other.paths.config.is_some() {
            self.paths.config = other.paths.config;
        }
        if other.paths.template.is_some() {
            self.paths.template = other.paths.template;
        }
        if other.paths.entry_point.is_some() {
            self.paths.entry_point = other.paths.entry_point;
        }

        if other.python.interpreter.is_some() {
            self.python.interpreter = other.python.interpreter;
        }

        if other.install.extra_args.is_some() {
            self.install.extra_args = other.install.extra_args;
        }

        if other.self_test.mode.is_some() {
            self.self_test.mode = other.self_test.mode;
        }
        if other.self_test.extra_args.is_some() {
            self.self_test.extra_args = other.self_test.extra_args;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.darknext/setup.toml)
/// 2. Global config (~/.darknext/setup.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global config directory (~/.darknext).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".darknext"))
}

/// Get the global config path (~/.darknext/setup.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("setup.toml"))
}

/// Get the project config path (.darknext/setup.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".darknext").join("setup.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            [paths]
            venv = ".venv"
            entry_point = "app/main.py"

            [python]
            interpreter = "/usr/bin/python3.11"

            [install]
            extra_args = ["--upgrade"]

            [self_test]
            mode = "stats"
            "#,
        )
        .unwrap();

        assert_eq!(config.paths.venv, Some(PathBuf::from(".venv")));
        assert_eq!(config.paths.entry_point, Some(PathBuf::from("app/main.py")));
        assert_eq!(config.paths.manifest, None);
        assert_eq!(
            config.python.interpreter,
            Some(PathBuf::from("/usr/bin/python3.11"))
        );
        assert_eq!(config.install.extra_args(), ["--upgrade"]);
        assert_eq!(config.self_test.mode(), "stats");
        assert_eq!(config.self_test.extra_args, None);
    }

    #[test]
    fn test_empty_config_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.self_test.mode(), "test");
        assert!(config.self_test.extra_args().is_empty());
    }

    #[test]
    fn test_merge_project_over_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join("project.toml");
        std::fs::write(
            &global,
            "[paths]\nvenv = \"global-venv\"\nmanifest = \"reqs.txt\"\n",
        )
        .unwrap();
        std::fs::write(&project, "[paths]\nvenv = \".venv\"\n").unwrap();

        let config = load_config(Some(&global), &project);
        assert_eq!(config.paths.venv, Some(PathBuf::from(".venv")));
        assert_eq!(config.paths.manifest, Some(PathBuf::from("reqs.txt")));
    }

    #[test]
    fn test_project_defaults_override_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join("project.toml");
        std::fs::write(
            &global,
            "[install]\nextra_args = [\"--upgrade\"]\n\n[self_test]\nmode = \"stats\"\nextra_args = [\"--verbose\"]\n",
        )
        .unwrap();
        std::fs::write(
            &project,
            "[install]\nextra_args = []\n\n[self_test]\nmode = \"test\"\nextra_args = []\n",
        )
        .unwrap();

        let config = load_config(Some(&global), &project);
        assert_eq!(config.self_test.mode(), "test");
        assert!(config.self_test.extra_args().is_empty());
        assert!(config.install.extra_args().is_empty());
    }

    #[test]
    fn test_global_kept_when_project_silent() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join("project.toml");
        std::fs::write(&global, "[self_test]\nmode = \"stats\"\n").unwrap();
        std::fs::write(&project, "[paths]\nvenv = \".venv\"\n").unwrap();

        let config = load_config(Some(&global), &project);
        assert_eq!(config.self_test.mode(), "stats");
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("setup.toml");
        std::fs::write(&project, "[paths\nvenv = ").unwrap();

        let config = load_config(None, &project);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_files_are_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(
            Some(&tmp.path().join("none.toml")),
            &tmp.path().join("also-none.toml"),
        );
        assert_eq!(config, Config::default());
    }
}
