//! Project layout - the fixed set of paths the bootstrap operates on.
//!
//! Every path is stored relative to the project root unless the user
//! configured an absolute one. The virtual environment's interpreter is
//! resolved with the host platform's convention only: `bin/python` on
//! Unix-like hosts and `Scripts\python.exe` on Windows.

use std::path::{Path, PathBuf};

use crate::util::config::PathsConfig;

/// Default virtual environment directory.
pub const DEFAULT_VENV_DIR: &str = "venv";

/// Default dependency manifest.
pub const DEFAULT_MANIFEST: &str = "requirements.txt";

/// Default environment-configuration file.
pub const DEFAULT_CONFIG_FILE: &str = ".env";

/// Default template the configuration file is copied from.
pub const DEFAULT_CONFIG_TEMPLATE: &str = ".env.example";

/// Default entry point invoked for the self-test.
pub const DEFAULT_ENTRY_POINT: &str = "src/main.py";

/// Paths the bootstrap procedure checks, creates and invokes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    venv_dir: PathBuf,
    manifest: PathBuf,
    config_file: PathBuf,
    config_template: PathBuf,
    entry_point: PathBuf,
}

impl ProjectLayout {
    /// Create a layout with the default relative paths under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ProjectLayout {
            root: root.into(),
            venv_dir: PathBuf::from(DEFAULT_VENV_DIR),
            manifest: PathBuf::from(DEFAULT_MANIFEST),
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            config_template: PathBuf::from(DEFAULT_CONFIG_TEMPLATE),
            entry_point: PathBuf::from(DEFAULT_ENTRY_POINT),
        }
    }

    /// Create a layout under `root`, overriding any paths set in config.
    pub fn from_config(root: impl Into<PathBuf>, paths: &PathsConfig) -> Self {
        let mut layout = Self::new(root);
        if let Some(ref p) = paths.venv {
            layout.venv_dir = p.clone();
        }
        if let Some(ref p) = paths.manifest {
            layout.manifest = p.clone();
        }
        if let Some(ref p) = paths.config {
            layout.config_file = p.clone();
        }
        if let Some(ref p) = paths.template {
            layout.config_template = p.clone();
        }
        if let Some(ref p) = paths.entry_point {
            layout.entry_point = p.clone();
        }
        layout
    }

    /// Project root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join a path onto the root unless it is already absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Virtual environment directory (the "marker" directory).
    pub fn venv_dir(&self) -> PathBuf {
        self.resolve(&self.venv_dir)
    }

    /// Dependency manifest handed to the installer.
    pub fn manifest(&self) -> PathBuf {
        self.resolve(&self.manifest)
    }

    /// Live configuration file.
    pub fn config_file(&self) -> PathBuf {
        self.resolve(&self.config_file)
    }

    /// Template the configuration file is created from.
    pub fn config_template(&self) -> PathBuf {
        self.resolve(&self.config_template)
    }

    /// Entry point run in test mode.
    pub fn entry_point(&self) -> PathBuf {
        self.resolve(&self.entry_point)
    }

    /// Directory holding the environment's executables.
    pub fn venv_bin_dir(&self) -> PathBuf {
        self.venv_dir().join(venv_bin_name())
    }

    /// Interpreter inside the virtual environment.
    pub fn venv_python(&self) -> PathBuf {
        self.venv_bin_dir().join(venv_python_name())
    }

    /// Display a path relative to the project root when possible.
    pub fn display(&self, path: &Path) -> String {
        pathdiff::diff_paths(path, &self.root)
            .filter(|p| !p.as_os_str().is_empty() && !p.starts_with(".."))
            .unwrap_or_else(|| path.to_path_buf())
            .display()
            .to_string()
    }
}

/// Name of the environment's executable directory on this host.
pub fn venv_bin_name() -> &'static str {
    if cfg!(windows) {
        "Scripts"
    } else {
        "bin"
    }
}

/// File name of the environment's interpreter on this host.
pub fn venv_python_name() -> &'static str {
    if cfg!(windows) {
        "python.exe"
    } else {
        "python"
    }
}
