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

use std::fs;
use std::io;
use std::path;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Loads a single element from the given JSON file.
pub fn deserialize_from<T, P>(filename: P) -> Result<T, io::Error>
    where T: DeserializeOwned,
          P: AsRef<path::Path>,
{
    let f = io::BufReader::new(fs::File::open(&filename)?);
    match serde_json::from_reader(f) {
        Ok(element) => { Ok(element) },
        Err(e) => {
            if e.is_io() {
                Err(io::Error::new(io::ErrorKind::Other, format!("Failed to read {}: {}",
                    filename.as_ref().display(), e)))
            } else {
                Err(io::Error::new(io::ErrorKind::InvalidData, format!("Syntax error in file {} at line {} column {}",
                    filename.as_ref().display(), e.line(), e.column())))
            }
        }
    }
}

/// Saves a single element to JSON file. Creates the parent directory if it doesn't exist already.
pub fn serialize_to<T, P>(element: &T, filename: P) -> Result<(), io::Error>
    where T: Serialize,
          P: AsRef<path::Path>,
{
    if let Some(dir) = filename.as_ref().parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }

    let mut f = fs::File::create(&filename)?;
    match serde_json::to_writer_pretty(&mut f, element) {
        Ok(()) => { Ok(()) },
        Err(e) => {
            Err(io::Error::new(io::ErrorKind::Other, format!("Error while serializing element to {}: {}",
                filename.as_ref().display(), e)))
        }
    }
}

// ---- tests --------------------------------------------------------------------------------------
