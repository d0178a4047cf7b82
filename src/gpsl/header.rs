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

extern crate regex;

use std::io::BufRead;

use self::regex::Regex;

use super::error::{Diagnostics, GpslError, WarningKind};

/// File id on the first line.
pub const GPSLINK_ID: &str = "!GPSLINK";

/// Key of the delimiter declaration on the third line.
pub const DELIMITER: &str = "Delimiter";

/// Key of the GMT offset declaration on the fourth line.
pub const GMTOFFSET: &str = "GMTOffset";

/// Delimiter used when the file doesn't declare a valid one.
pub const DEFAULT_DELIMITER: char = '\t';

/// Offset used when the file doesn't declare one.
pub const DEFAULT_OFFSET: &str = "0";

lazy_static! {
    // Key=value, anything after a second '=' is ignored
    static ref DECLARATION: Regex = Regex::new(r"^(?P<key>[^=]*)=(?P<value>[^=]*)").unwrap();
}

/// The four mandatory lines at the beginning of a GPSLink file.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    /// Free text save time, not interpreted
    pub saved: String,

    /// Field delimiter of the records, TAB or comma
    pub delimiter: char,

    /// GMT offset in hours as written in the file
    pub offset: String,
}

impl Default for Header {
    fn default() -> Header {
        Header {
            saved: String::new(),
            delimiter: DEFAULT_DELIMITER,
            offset: DEFAULT_OFFSET.to_string(),
        }
    }
}

/// Line iterator keeping track of the line number. Carriage returns of CRLF files are dropped.
/// Bytes that aren't valid UTF-8, e.g. Latin-1 names, are replaced rather than rejected.
pub struct NumberedLines<R> {
    source: R,
    buf: Vec<u8>,
    line: u64,
}

impl<R: BufRead> NumberedLines<R> {
    pub fn new(source: R) -> NumberedLines<R> {
        NumberedLines { source, buf: Vec::new(), line: 0 }
    }

    /// Number of the line last read, or attempted to read at the end of input.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Reads the next line. Returns None at the end of input.
    pub fn next_line(&mut self) -> Result<Option<String>, GpslError> {
        self.line += 1;
        self.buf.clear();
        if self.source.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }

    /// Reads the next line, which must exist.
    fn require_line(&mut self) -> Result<String, GpslError> {
        match self.next_line()? {
            Some(s) => Ok(s),
            None => {
                error!("Unexpected end of file at line {}", self.line);
                Err(GpslError::UnexpectedEof { line: self.line })
            }
        }
    }
}

/// Reads and validates the header lines. Missing lines and a bad id are fatal,
/// a bad delimiter or offset declaration is replaced with the default.
pub fn read_header<R: BufRead>(lines: &mut NumberedLines<R>, diag: &mut Diagnostics) -> Result<Header, GpslError> {
    let mut header = Header::default();

    let id = lines.require_line()?;
    if id != GPSLINK_ID {
        error!("Invalid GPSLink file (bad id) at line {}", lines.line());
        return Err(GpslError::BadMagic { line: lines.line(), found: id });
    }

    header.saved = lines.require_line()?;

    let line = lines.require_line()?;
    match declaration(&line, DELIMITER) {
        Some(value) => {
            match value {
                "\t" => { header.delimiter = '\t'; }
                "," => { header.delimiter = ','; }
                _ => { diag.warn(lines.line(), WarningKind::InvalidDelimiter(value.to_string())); }
            }
        }
        None => { diag.warn(lines.line(), WarningKind::NoDelimiter); }
    }

    let line = lines.require_line()?;
    match declaration(&line, GMTOFFSET) {
        Some(value) => { header.offset = value.to_string(); }
        None => { diag.warn(lines.line(), WarningKind::NoOffset); }
    }

    debug!("GPSLink header: delimiter {:?}, GMT offset {}", header.delimiter, header.offset);
    Ok(header)
}

/// Value of a non-empty `key=value` declaration.
fn declaration<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let caps = DECLARATION.captures(line)?;
    let value = caps.name("value")?.as_str();
    if caps.name("key")?.as_str() == key && !value.is_empty() {
        Some(value)
    } else {
        None
    }
}

// ---- tests --------------------------------------------------------------------------------------
