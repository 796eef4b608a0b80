//! Persisted user preferences.
//!
//! Two flags survive between sessions: the theme choice and whether the
//! first-run data notice was acknowledged. Read once at startup, written on
//! the corresponding user action; a missing or unreadable file falls back to
//! defaults.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config;

/// Color theme selection.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    Light,
    #[default]
    Dark,
}

impl ThemeChoice {
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            ThemeChoice::Light => ThemeChoice::Dark,
            ThemeChoice::Dark => ThemeChoice::Light,
        }
    }
}

/// Session-spanning user preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Selected color theme.
    pub theme: ThemeChoice,
    /// Whether the first-run notice banner was dismissed.
    pub notice_acknowledged: bool,
}

impl Preferences {
    /// Load preferences from the given path, `None` if the file is absent.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read preferences {}", path.display()))?;
        let prefs = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse preferences {}", path.display()))?;
        Ok(Some(prefs))
    }

    /// Load from the default location, falling back to defaults on any
    /// error. Preference loss is not worth failing startup over.
    pub fn load_or_default() -> Self {
        let Some(path) = prefs_path() else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(Some(prefs)) => prefs,
            Ok(None) => Self::default(),
            Err(err) => {
                warn!(%err, "falling back to default preferences");
                Self::default()
            }
        }
    }

    /// Persist to the given path, creating parent directories as needed.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create preferences directory {}", parent.display())
            })?;
        }
        let serialized =
            serde_json::to_string_pretty(self).context("failed to serialize preferences")?;
        fs::write(path, serialized)
            .with_context(|| format!("failed to write preferences {}", path.display()))
    }

    /// Persist to the default location; errors are logged and swallowed.
    pub fn save(&self) {
        let Some(path) = prefs_path() else {
            return;
        };
        if let Err(err) = self.persist(&path) {
            warn!(%err, "failed to persist preferences");
        }
    }
}

/// Default location of the preferences file.
pub fn prefs_path() -> Option<PathBuf> {
    config::config_dir().map(|dir| dir.join("prefs.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrips_through_disk() -> Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("nested").join("prefs.json");

        let prefs = Preferences {
            theme: ThemeChoice::Light,
            notice_acknowledged: true,
        };
        prefs.persist(&path)?;

        let loaded = Preferences::load(&path)?.expect("file exists");
        assert_eq!(loaded, prefs);
        Ok(())
    }

    #[test]
    fn missing_file_loads_as_none() -> Result<()> {
        let temp = tempdir()?;
        assert!(Preferences::load(temp.path().join("prefs.json"))?.is_none());
        Ok(())
    }

    #[test]
    fn unknown_fields_default() {
        let prefs: Preferences = serde_json::from_str("{}").unwrap();
        assert_eq!(prefs.theme, ThemeChoice::Dark);
        assert!(!prefs.notice_acknowledged);
    }

    #[test]
    fn theme_toggle_flips() {
        assert_eq!(ThemeChoice::Dark.toggled(), ThemeChoice::Light);
        assert_eq!(ThemeChoice::Light.toggled(), ThemeChoice::Dark);
    }
}
