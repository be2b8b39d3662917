//! Settings that outlive a session.
//!
//! Only the welcome flag is stored. Swipe decisions are never written to disk.

use crate::error::{CatSwipeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "catswp";
const SETTINGS_FILE: &str = "config.json";

#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UserConfig {
    /// Set once the first-run overlay has been dismissed
    #[serde(default)]
    pub welcome_shown: bool,
}

impl UserConfig {
    /// `<config_dir>/catswp/config.json`, when the platform has a config dir
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&settings_file()?)
    }

    /// Reads settings from `path`. A file that isn't there yet means defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&raw).map_err(|e| {
            CatSwipeError::Config(format!("{} holds unreadable settings ({})", path.display(), e))
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&settings_file()?)
    }

    /// Writes settings to `path`, creating missing directories on the way
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CatSwipeError::Config(format!("settings could not be encoded ({})", e)))?;
        fs::write(path, json)?;
        Ok(())
    }
}

fn settings_file() -> Result<PathBuf> {
    UserConfig::config_path()
        .ok_or_else(|| CatSwipeError::Config("no per-user config directory on this system".to_string()))
}
