// Garta - GPX viewer and editor
// Copyright (C) 2016-2017, Timo Saarinen
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::io;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::core::persistence::{deserialize_from, serialize_to};
use crate::gpsl::offset::OffsetMode;
use crate::gpsl::writer::{LineSeparator, SaveOptions};

/// Creator string given to data sets read from GPSLink files.
pub const DEFAULT_CREATOR: &str = "GPSL Converter for GPX Inspector";

/// A singleton-like construct for settings_read and settings_write methods.
lazy_static! {
    static ref SETTINGS: RwLock<Settings> = RwLock::new(Settings::new());
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Which track point timestamp decides the GMT offset of a saved file
    pub offset_mode: OffsetMode,

    /// Line separator for saved files
    pub line_separator: LineSeparator,

    /// Creator of the parsed data sets
    pub creator: String,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings::new()
    }
}

impl Settings {
    /// Constructor with the defaults.
    pub fn new() -> Settings {
        Settings {
            offset_mode: OffsetMode::Last,
            line_separator: LineSeparator::Lf,
            creator: DEFAULT_CREATOR.to_string(),
        }
    }

    /// Options for the GPSLink writer.
    pub fn save_options(&self) -> SaveOptions {
        SaveOptions {
            offset_mode: self.offset_mode,
            line_separator: self.line_separator,
        }
    }

    /// Load settings from a file. Returns Ok if either the loading succeeded or
    /// if the settings file wasn't found.
    pub fn load<P: AsRef<Path>>(&mut self, filename: P) -> Result<(), io::Error> {
        if !filename.as_ref().exists() {
            debug!("Settings file {} not found, using defaults", filename.as_ref().display());
            return Ok(());
        }
        *self = deserialize_from(&filename)?;
        debug!("Settings loaded from {}", filename.as_ref().display());
        Ok(())
    }

    /// Save settings to a file. Returns Err if saving the file failed.
    pub fn save<P: AsRef<Path>>(&self, filename: P) -> Result<(), io::Error> {
        serialize_to(self, filename)
    }
}

/// Unlock settings for read access.
pub fn settings_read<'a>() -> RwLockReadGuard<'a, Settings> {
    SETTINGS.read().unwrap_or_else(|e| e.into_inner())
}

/// Unlock settings for write access.
pub fn settings_write<'a>() -> RwLockWriteGuard<'a, Settings> {
    SETTINGS.write().unwrap_or_else(|e| e.into_inner())
}

// ---- tests --------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_settings_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::new();
        settings.load(dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, Settings::new());
    }

    #[test]
    fn test_settings_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let filename = dir.path().join("settings.json");

        let mut settings = Settings::new();
        settings.offset_mode = OffsetMode::First;
        settings.line_separator = LineSeparator::CrLf;
        settings.save(&filename).unwrap();

        let mut loaded = Settings::new();
        loaded.load(&filename).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.save_options().offset_mode, OffsetMode::First);
        assert_eq!(loaded.save_options().line_separator, LineSeparator::CrLf);
    }

    #[test]
    fn test_settings_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let filename = dir.path().join("settings.json");
        fs::write(&filename, r#"{ "offset_mode": "first" }"#).unwrap();

        let mut settings = Settings::new();
        settings.load(&filename).unwrap();
        assert_eq!(settings.offset_mode, OffsetMode::First);
        assert_eq!(settings.line_separator, LineSeparator::Lf);
        assert_eq!(settings.creator, DEFAULT_CREATOR);
    }
}
