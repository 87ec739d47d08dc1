//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! addonkit has two configuration scopes:
//! - **Global**: User-level settings
//! - **Repo**: Settings stored next to the code under test
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$ADDONKIT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/addonkit/config.toml`
//! 3. `~/.addonkit/config.toml`
//!
//! # Repo Config Location
//!
//! `<dir>/.addonkit.toml` in the working directory.
//!
//! # Example
//!
//! ```no_run
//! use addonkit::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/path/to/repo"))).unwrap();
//! println!("dependency file: {}", config.dependency_file());
//! ```

pub mod schema;

pub use schema::{FileConfig, LogCheckConfig};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::deps::DEPENDENCY_FILE;

/// Repo config file name.
pub const REPO_CONFIG_FILE: &str = ".addonkit.toml";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Effective values (repo over global)
    pub values: FileConfig,
    /// Files that contributed, lowest precedence first
    pub sources: Vec<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// If `repo_dir` is provided, `<repo_dir>/.addonkit.toml` overrides the
    /// global file.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed.
    /// Missing config files are not an error (defaults are used).
    pub fn load(repo_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let global = Self::global_config_path();
        let repo = repo_dir.map(|dir| dir.join(REPO_CONFIG_FILE));
        Self::from_files(global.as_deref(), repo.as_deref())
    }

    /// Load configuration from explicit file locations.
    ///
    /// Paths that do not exist are skipped.
    pub fn from_files(global: Option<&Path>, repo: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        for path in [global, repo].into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            let file = Self::read_config(path)?;
            file.validate()?;
            debug!(path = %path.display(), "loaded config file");
            config.values = config.values.merged_with(file);
            config.sources.push(path.to_path_buf());
        }
        Ok(config)
    }

    /// First existing global config file, if any.
    fn global_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("ADDONKIT_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("addonkit/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        dirs::home_dir()
            .map(|home| home.join(".addonkit/config.toml"))
            .filter(|path| path.exists())
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Entries excluded from `list` output.
    pub fn exclude(&self) -> &[String] {
        self.values.exclude.as_deref().unwrap_or(&[])
    }

    /// Dependency declaration file name.
    ///
    /// Defaults to `oca_dependencies.txt`.
    pub fn dependency_file(&self) -> &str {
        self.values
            .dependency_file
            .as_deref()
            .unwrap_or(DEPENDENCY_FILE)
    }

    /// Extra message prefixes the log checker ignores.
    pub fn log_ignore(&self) -> &[String] {
        self.values
            .log_check
            .as_ref()
            .and_then(|l| l.ignore.as_deref())
            .unwrap_or(&[])
    }

    /// Extra message prefixes the log checker reports.
    pub fn log_report(&self) -> &[String] {
        self.values
            .log_check
            .as_ref()
            .and_then(|l| l.report.as_deref())
            .unwrap_or(&[])
    }

    /// Effective configuration rendered as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(&self.values).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn no_files_gives_defaults() {
        let config = Config::from_files(None, None).unwrap();
        assert!(config.exclude().is_empty());
        assert_eq!(config.dependency_file(), "oca_dependencies.txt");
        assert!(config.log_ignore().is_empty());
        assert!(config.sources.is_empty());
    }

    #[test]
    fn missing_files_are_skipped() {
        let temp = TempDir::new().unwrap();
        let config = Config::from_files(
            Some(&temp.path().join("global.toml")),
            Some(&temp.path().join(REPO_CONFIG_FILE)),
        )
        .unwrap();
        assert!(config.sources.is_empty());
    }

    #[test]
    fn repo_overrides_global() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global.toml");
        let repo = temp.path().join(REPO_CONFIG_FILE);
        fs::write(
            &global,
            r#"
            exclude = ["a"]
            dependency_file = "deps.txt"
            "#,
        )
        .unwrap();
        fs::write(
            &repo,
            r#"
            exclude = ["b", "c"]

            [log_check]
            report = ["Traceback"]
            "#,
        )
        .unwrap();

        let config = Config::from_files(Some(&global), Some(&repo)).unwrap();
        assert_eq!(config.exclude(), ["b", "c"]);
        assert_eq!(config.dependency_file(), "deps.txt");
        assert_eq!(config.log_report(), ["Traceback"]);
        assert_eq!(config.sources, vec![global, repo]);
    }

    #[test]
    fn parse_error_names_the_file() {
        let temp = TempDir::new().unwrap();
        let repo = temp.path().join(REPO_CONFIG_FILE);
        fs::write(&repo, "exclude = [").unwrap();

        let err = Config::from_files(None, Some(&repo)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { ref path, .. } if path == &repo));
    }

    #[test]
    fn invalid_values_rejected() {
        let temp = TempDir::new().unwrap();
        let repo = temp.path().join(REPO_CONFIG_FILE);
        fs::write(&repo, "dependency_file = \"a/b.txt\"").unwrap();
        assert!(matches!(
            Config::from_files(None, Some(&repo)),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn renders_effective_toml() {
        let temp = TempDir::new().unwrap();
        let repo = temp.path().join(REPO_CONFIG_FILE);
        fs::write(&repo, "exclude = [\"demo\"]").unwrap();
        let config = Config::from_files(None, Some(&repo)).unwrap();
        assert!(config.to_toml().unwrap().contains("demo"));
    }
}
