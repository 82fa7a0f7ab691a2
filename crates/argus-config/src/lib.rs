//! # Argus Config
//!
//! Configuration snapshots for the Argus platform.
//!
//! Configuration is modeled as immutable [`ConfigData`] snapshots held by a
//! [`Config`] store. Collaborators never subscribe to change callbacks;
//! whoever detects a configuration change (a SIGHUP handler, a file
//! watcher, a control API) builds a new snapshot, calls [`Config::reload`],
//! and forwards the returned [`ConfigDiff`] to interested subsystems. A
//! subsystem whose values did not change sees an empty diff and does
//! nothing.
//!
//! ## Example
//!
//! ```rust
//! use argus_config::{Config, ConfigData, ConfigDiff};
//!
//! let config = Config::new(ConfigData::default());
//! assert!(!config.data().audit_enabled());
//!
//! let diff = config.reload(ConfigData::default().with_audit_enabled(true));
//! assert!(diff.contains(ConfigDiff::AUDIT));
//! assert!(config.data().audit_enabled());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod data;
mod error;
mod store;

pub use data::{ConfigData, ConfigDiff};
pub use error::ConfigError;
pub use store::Config;
