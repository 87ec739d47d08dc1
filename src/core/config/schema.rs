//! core::config::schema
//!
//! Configuration schema types.
//!
//! The same schema is used for the global file and the per-repository
//! `.addonkit.toml`; repository values override global ones key by key.
//!
//! # Validation
//!
//! Config values are validated after parsing (e.g. excluded modules must be
//! valid module names).

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::ModuleName;

/// One configuration file.
///
/// # Example
///
/// ```toml
/// exclude = ["website_demo"]
/// dependency_file = "oca_dependencies.txt"
///
/// [log_check]
/// ignore = ["Connection to the database failed"]
/// report = ["Traceback"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Modules or addons paths left out of `list` output
    pub exclude: Option<Vec<String>>,

    /// Name of the per-repository dependency declaration file
    pub dependency_file: Option<String>,

    /// Extra rules for the test-log checker
    pub log_check: Option<LogCheckConfig>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(exclude) = &self.exclude {
            for item in exclude {
                // Entries may be module names or addons paths.
                if item.trim().is_empty() {
                    return Err(ConfigError::InvalidValue(
                        "exclude entries cannot be empty".to_string(),
                    ));
                }
            }
        }

        if let Some(file) = &self.dependency_file {
            ModuleName::new(file.as_str()).map_err(|_| {
                ConfigError::InvalidValue(format!(
                    "dependency_file must be a plain file name, got '{}'",
                    file
                ))
            })?;
        }

        Ok(())
    }

    /// Overlay `other` on top of `self`: values set in `other` win.
    pub fn merged_with(self, other: FileConfig) -> FileConfig {
        FileConfig {
            exclude: other.exclude.or(self.exclude),
            dependency_file: other.dependency_file.or(self.dependency_file),
            log_check: match (self.log_check, other.log_check) {
                (Some(base), Some(over)) => Some(base.merged_with(over)),
                (base, over) => over.or(base),
            },
        }
    }
}

/// Test-log checker rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LogCheckConfig {
    /// Message prefixes that are never errors
    pub ignore: Option<Vec<String>>,

    /// Message prefixes that are always errors
    pub report: Option<Vec<String>>,
}

impl LogCheckConfig {
    fn merged_with(self, other: LogCheckConfig) -> LogCheckConfig {
        LogCheckConfig {
            ignore: other.ignore.or(self.ignore),
            report: other.report.or(self.report),
        }
    }
}
