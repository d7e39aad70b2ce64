use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::bank::CardType;
use crate::error::ConfigError;
use crate::i18n::Locale;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ColorTheme {
    #[default]
    Dark,
    Light,
}

/// Preferences remembered between runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Preferences {
    pub language: Locale,
    pub color_theme: ColorTheme,
    pub api_key: Option<String>,
    pub card_type: CardType,
}

pub trait PreferenceStore {
    fn load(&self) -> Preferences;
    fn save(&self, prefs: &Preferences) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "civiquiz") {
            pd.config_dir().join("preferences.json")
        } else {
            PathBuf::from("civiquiz_preferences.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FilePreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Preferences {
        let Ok(bytes) = fs::read(&self.path) else {
            return Preferences::default();
        };
        match serde_json::from_slice::<Preferences>(&bytes) {
            Ok(prefs) => prefs,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring unreadable preferences");
                Preferences::default()
            }
        }
    }

    fn save(&self, prefs: &Preferences) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(prefs)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
