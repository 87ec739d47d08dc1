//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`ModuleName`] - Validated addon technical name
//! - [`NodeId`] - Arena index into a dependency graph
//!
//! # Validation
//!
//! Module names are validated at construction time. A name that could
//! escape its addons directory (`..`, separators) cannot be represented.
//!
//! # Examples
//!
//! ```
//! use addonkit::core::types::ModuleName;
//!
//! let name = ModuleName::new("sale_stock").unwrap();
//! assert_eq!(name.as_str(), "sale_stock");
//!
//! assert!(ModuleName::new("").is_err());
//! assert!(ModuleName::new("../base").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid module name: {0}")]
    InvalidModuleName(String),
}

/// A validated addon module name.
///
/// Module names are directory names directly below an addons root:
/// - Cannot be empty
/// - Cannot be `.` or `..`
/// - Cannot contain `/`, `\` or whitespace
/// - Cannot contain ASCII control characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleName(String);

impl ModuleName {
    /// Create a new validated module name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidModuleName` if the name cannot name a
    /// directory below an addons root.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidModuleName(
                "module name cannot be empty".into(),
            ));
        }

        if name == "." || name == ".." {
            return Err(TypeError::InvalidModuleName(format!(
                "module name cannot be '{}'",
                name
            )));
        }

        for c in name.chars() {
            if c == '/' || c == '\\' {
                return Err(TypeError::InvalidModuleName(format!(
                    "module name cannot contain '{}': {}",
                    c, name
                )));
            }
            if c.is_whitespace() || c.is_ascii_control() {
                return Err(TypeError::InvalidModuleName(format!(
                    "module name cannot contain whitespace or control characters: {:?}",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModuleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ModuleName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModuleName> for String {
    fn from(name: ModuleName) -> Self {
        name.0
    }
}

/// Index of a node inside a [`DependencyGraph`](crate::core::graph::DependencyGraph).
///
/// Node ids are only meaningful for the graph that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in graph insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_regular_names() {
        for name in ["base", "sale_stock", "l10n_mx", "web-responsive", "a1"] {
            assert!(ModuleName::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn rejects_path_like_names() {
        assert!(ModuleName::new("").is_err());
        assert!(ModuleName::new(".").is_err());
        assert!(ModuleName::new("..").is_err());
        assert!(ModuleName::new("addons/base").is_err());
        assert!(ModuleName::new("addons\\base").is_err());
    }

    #[test]
    fn rejects_whitespace() {
        assert!(ModuleName::new("sale stock").is_err());
        assert!(ModuleName::new("sale\t").is_err());
    }

    #[test]
    fn serde_uses_plain_string() {
        let name = ModuleName::new("account").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"account\"");

        let bad: Result<ModuleName, _> = serde_json::from_str("\"a/b\"");
        assert!(bad.is_err());
    }

    #[test]
    fn ordering_is_lexical() {
        let mut names = vec![
            ModuleName::new("sale").unwrap(),
            ModuleName::new("account").unwrap(),
            ModuleName::new("base").unwrap(),
        ];
        names.sort();
        let names: Vec<_> = names.iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["account", "base", "sale"]);
    }
}
