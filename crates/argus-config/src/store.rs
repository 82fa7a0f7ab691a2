//! The live configuration store.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::data::{ConfigData, ConfigDiff};

/// Holds the current configuration snapshot.
///
/// Readers take a cheap [`Arc`] clone of the snapshot; writers swap the
/// whole snapshot atomically through [`Config::reload`]. The store itself
/// performs no change detection on files or signals; that belongs to the
/// host's reload loop.
#[derive(Debug)]
pub struct Config {
    current: RwLock<Arc<ConfigData>>,
}

impl Config {
    /// Creates a store holding `data` as the initial snapshot.
    #[must_use]
    pub fn new(data: ConfigData) -> Self {
        Self {
            current: RwLock::new(Arc::new(data)),
        }
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn data(&self) -> Arc<ConfigData> {
        Arc::clone(&self.current.read())
    }

    /// Replaces the current snapshot with `new` and returns what changed.
    ///
    /// An unchanged snapshot is not swapped and yields an empty diff, so
    /// collaborators fed the diff see reloads as idempotent.
    pub fn reload(&self, new: ConfigData) -> ConfigDiff {
        let mut guard = self.current.write();
        let diff = guard.diff(&new);
        if !diff.is_empty() {
            debug!(?diff, "configuration reloaded");
            *guard = Arc::new(new);
        }
        diff
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(ConfigData::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_swaps_snapshot() {
        let config = Config::default();
        assert!(!config.data().audit_enabled());

        let diff = config.reload(ConfigData::default().with_audit_enabled(true));
        assert!(diff.contains(ConfigDiff::AUDIT));
        assert!(config.data().audit_enabled());
    }

    #[test]
    fn test_reload_identical_snapshot_is_noop() {
        let config = Config::default();
        let before = config.data();

        let diff = config.reload(ConfigData::default());
        assert!(diff.is_empty());
        assert!(Arc::ptr_eq(&before, &config.data()));
    }

    #[test]
    fn test_readers_keep_old_snapshot_alive() {
        let config = Config::default();
        let old = config.data();

        config.reload(ConfigData::default().with_log_level("trace"));
        assert_eq!(old.log_level(), "info");
        assert_eq!(config.data().log_level(), "trace");
    }
}
