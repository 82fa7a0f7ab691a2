//! Configuration snapshots and change diffing.

use std::ops::{BitOr, BitOrAssign};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// An immutable snapshot of the daemon configuration.
///
/// Snapshots are cheap to compare; [`ConfigData::diff`] computes which
/// values changed between two of them so collaborators can ignore reloads
/// that do not concern them.
///
/// # Examples
///
/// ```
/// use argus_config::ConfigData;
///
/// let data = ConfigData::default()
///     .with_audit_enabled(true)
///     .with_log_level("debug");
/// assert!(data.audit_enabled());
/// assert_eq!(data.log_level(), "debug");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigData {
    /// Whether events are forwarded to the external audit transport.
    audit_enabled: bool,

    /// Logging verbosity for the daemon's own log stream.
    log_level: String,

    /// Override for the audit daemon socket path.
    audit_socket: Option<PathBuf>,
}

impl Default for ConfigData {
    fn default() -> Self {
        Self {
            audit_enabled: false,
            log_level: "info".to_string(),
            audit_socket: None,
        }
    }
}

impl ConfigData {
    /// Creates a snapshot with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a snapshot from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Parses a snapshot from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid YAML for this schema.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Sets whether external audit forwarding is enabled.
    #[must_use]
    pub const fn with_audit_enabled(mut self, enabled: bool) -> Self {
        self.audit_enabled = enabled;
        self
    }

    /// Sets the log level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Sets the audit daemon socket path.
    #[must_use]
    pub fn with_audit_socket(mut self, path: impl Into<PathBuf>) -> Self {
        self.audit_socket = Some(path.into());
        self
    }

    /// Returns whether external audit forwarding is enabled.
    #[must_use]
    pub const fn audit_enabled(&self) -> bool {
        self.audit_enabled
    }

    /// Returns the log level.
    #[must_use]
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Returns the audit daemon socket path override, if any.
    #[must_use]
    pub fn audit_socket(&self) -> Option<&Path> {
        self.audit_socket.as_deref()
    }

    /// Computes which values changed between `self` and `newer`.
    #[must_use]
    pub fn diff(&self, newer: &Self) -> ConfigDiff {
        let mut diff = ConfigDiff::NONE;
        if self.audit_enabled != newer.audit_enabled {
            diff |= ConfigDiff::AUDIT;
        }
        if self.log_level != newer.log_level {
            diff |= ConfigDiff::LOG_LEVEL;
        }
        if self.audit_socket != newer.audit_socket {
            diff |= ConfigDiff::AUDIT_SOCKET;
        }
        diff
    }
}

/// A set of configuration values that changed across a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigDiff(u8);

impl ConfigDiff {
    /// Nothing changed.
    pub const NONE: Self = Self(0);

    /// The audit-enabled flag changed.
    pub const AUDIT: Self = Self(0b001);

    /// The log level changed.
    pub const LOG_LEVEL: Self = Self(0b010);

    /// The audit socket path changed.
    pub const AUDIT_SOCKET: Self = Self(0b100);

    /// Returns true if any of `other`'s flags are set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns true if no flags are set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ConfigDiff {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ConfigDiff {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
