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

use std::fmt;
use std::io;

use thiserror::Error;

/// Fatal GPSLink error. Parsing stops at the first one and no data set is returned.
#[derive(Debug, Error)]
pub enum GpslError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Unexpected end of file at line {line}")]
    UnexpectedEof { line: u64 },

    #[error("Invalid GPSLink file (bad id {found:?}) at line {line}")]
    BadMagic { line: u64, found: String },

    #[error("Line {line}: missing name in '{tag}' record")]
    MissingName { line: u64, tag: char },

    #[error("Line {line}: invalid trackpoint with {fields} fields")]
    ShortTrackPoint { line: u64, fields: usize },

    #[error("Line {line}: missing {field} in '{tag}' record")]
    MissingField { line: u64, tag: char, field: &'static str },

    #[error("Line {line}: invalid {field} {value:?}")]
    InvalidNumber { line: u64, field: &'static str, value: String },
}

/// Recoverable condition found while parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WarningKind {
    /// No `Delimiter=` declaration, TAB assumed.
    NoDelimiter,

    /// Delimiter other than TAB or comma, TAB assumed.
    InvalidDelimiter(String),

    /// No `GMTOffset=` declaration, 0 assumed.
    NoOffset,

    /// Track point outside of any track, dropped.
    OrphanTrackPoint,
}

/// Recoverable condition with the line it was found on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Warning {
    pub line: u64,
    pub kind: WarningKind,
}

impl Warning {
    pub fn new(line: u64, kind: WarningKind) -> Warning {
        Warning { line, kind }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            WarningKind::NoDelimiter => {
                write!(f, "No delimiter found at line {}, assuming TAB", self.line)
            }
            WarningKind::InvalidDelimiter(ref d) => {
                write!(f, "Invalid delimiter {:?} found at line {}, assuming TAB", d, self.line)
            }
            WarningKind::NoOffset => {
                write!(f, "No GMTOffset found at line {}, assuming 0", self.line)
            }
            WarningKind::OrphanTrackPoint => {
                write!(f, "Found trackpoint without track at line {}", self.line)
            }
        }
    }
}

/// Collects recoverable warnings, logging each as it is reported.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics::default()
    }

    pub fn warn(&mut self, line: u64, kind: WarningKind) {
        let w = Warning::new(line, kind);
        warn!("{}", w);
        self.warnings.push(w);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

// ---- tests --------------------------------------------------------------------------------------
