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

//! GPSLink (.gpsl) files: a header of four lines followed by blank line separated blocks of
//! tab or comma delimited waypoint, route and track records.

pub mod error;
pub mod header;
pub mod offset;
pub mod reader;
pub mod time;
pub mod writer;

pub use self::error::{GpslError, Warning, WarningKind};
pub use self::offset::OffsetMode;
pub use self::reader::{read_gpsl, Parsed};
pub use self::writer::{write_gpsl, LineSeparator, SaveOptions};

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::core::settings::settings_read;
use crate::gpx::model::GpsDataSet;

/// File name extensions of GPSLink files.
pub const EXTENSIONS: &[&str] = &["gpsl"];

/// Converter between a file format and the GPS data set.
pub trait GpxConverter {
    /// Supported file name extensions without the dot.
    fn extensions(&self) -> &[&'static str];

    /// File dialog filter, e.g. "*.gpsl;*.txt".
    fn filter_extensions(&self) -> String {
        self.extensions().iter()
            .map(|ext| format!("*.{}", ext))
            .collect::<Vec<String>>()
            .join(";")
    }

    /// True if the file name has one of the extensions, ignoring case.
    fn is_parse_supported(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(e) => self.extensions().iter().any(|ext| ext.eq_ignore_ascii_case(e)),
            None => false,
        }
    }

    fn is_save_supported(&self, path: &Path) -> bool {
        self.is_parse_supported(path)
    }

    /// Reads the file into a new data set.
    fn parse(&self, path: &Path) -> Result<Parsed, GpslError>;

    /// Writes the data set to the file. The file content is undefined if this fails.
    fn save(&self, data: &GpsDataSet, path: &Path) -> Result<(), GpslError>;
}

/// GPSLink converter.
#[derive(Clone, Debug)]
pub struct GpslConverter {
    pub creator: String,
    pub options: SaveOptions,
}

impl GpslConverter {
    /// Converter configured from the current settings.
    pub fn new() -> GpslConverter {
        let settings = settings_read();
        GpslConverter {
            creator: settings.creator.clone(),
            options: settings.save_options(),
        }
    }

    pub fn with_options(creator: &str, options: SaveOptions) -> GpslConverter {
        GpslConverter { creator: creator.to_string(), options }
    }
}

impl Default for GpslConverter {
    fn default() -> GpslConverter {
        GpslConverter::new()
    }
}

impl GpxConverter for GpslConverter {
    fn extensions(&self) -> &[&'static str] {
        EXTENSIONS
    }

    fn parse(&self, path: &Path) -> Result<Parsed, GpslError> {
        debug!("Reading GPSLink file {}", path.display());
        let file = File::open(path).map_err(|e| {
            error!("Failed to open {}: {}", path.display(), e);
            GpslError::Io(e)
        })?;
        read_gpsl(BufReader::new(file), &self.creator)
    }

    fn save(&self, data: &GpsDataSet, path: &Path) -> Result<(), GpslError> {
        debug!("Writing GPSLink file {}", path.display());
        let result = File::create(path)
            .and_then(|file| write_gpsl(data, BufWriter::new(file), &self.options));
        if let Err(ref e) = result {
            error!("Failed to save {}: {}", path.display(), e);
        }
        result.map_err(GpslError::Io)
    }
}

// ---- tests --------------------------------------------------------------------------------------
