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
use std::io::{self, Write};

use chrono::{DateTime, Local, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::core::units::Units;
use crate::gpx::model::{GpsDataSet, Waypoint};
use super::header::{DELIMITER, GMTOFFSET, GPSLINK_ID};
use super::offset::{infer_local_offset, OffsetMode};
use super::time::{encode_local, format_saved_stamp, GARMIN_TIME_0};

/// The only delimiter ever written.
const D: char = '\t';

/// Line separator of saved files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineSeparator {
    Lf,
    CrLf,
}

impl LineSeparator {
    pub fn as_str(&self) -> &'static str {
        match *self {
            LineSeparator::Lf => "\n",
            LineSeparator::CrLf => "\r\n",
        }
    }
}

impl Default for LineSeparator {
    fn default() -> LineSeparator {
        LineSeparator::Lf
    }
}

/// Options for writing GPSLink files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SaveOptions {
    pub offset_mode: OffsetMode,
    pub line_separator: LineSeparator,
}

/// Writes the data set as a GPSLink file using the local time zone for the GMT offset.
pub fn write_gpsl<W: Write>(data: &GpsDataSet, out: W, options: &SaveOptions) -> io::Result<()> {
    let offset = infer_local_offset(data, options.offset_mode);
    write_gpsl_with(data, out, options.line_separator, offset, &Local::now())
}

/// Writes the data set as a GPSLink file with an explicit GMT offset and save time.
pub fn write_gpsl_with<W, Tz>(data: &GpsDataSet, out: W, ls: LineSeparator, offset: f64,
                              saved: &DateTime<Tz>) -> io::Result<()>
    where W: Write,
          Tz: TimeZone,
          Tz::Offset: fmt::Display,
{
    if data.is_empty() {
        info!("GPSLink: no waypoints, routes or tracks, writing the header only");
    }
    let mut w = LineWriter { out, ls: ls.as_str() };

    // Header, the offset is printed e.g. -5.0 instead of -5
    w.line(GPSLINK_ID)?;
    w.line(&format!("Saved {}", format_saved_stamp(saved)))?;
    w.line(&format!("{}={}", DELIMITER, D))?;
    w.line(&format!("{}={:?}", GMTOFFSET, offset))?;

    if !data.waypoints.is_empty() {
        w.line("")?;
        w.line("Waypoints")?;
        w.line(&columns("Symbol"))?;
        for wpt in data.waypoints.iter() {
            w.line(&waypoint_row(wpt))?;
        }
    }

    if !data.routes.is_empty() {
        w.line("")?;
        w.line("Routes")?;
        w.line(&columns("Symbol"))?;
        for rte in data.routes.iter() {
            w.line(&format!("R{}{}", D, rte.name))?;
            for wpt in rte.points.iter() {
                w.line(&waypoint_row(wpt))?;
            }
        }
    }

    if !data.tracks.is_empty() {
        w.line("")?;
        w.line("Tracks")?;
        w.line(&columns("Time"))?;
        for trk in data.tracks.iter() {
            w.line(&format!("H{}{}", D, trk.name))?;
            for seg in trk.segments.iter() {
                for (i, pt) in seg.points.iter().enumerate() {
                    let label = if i == 0 { "Start" } else { "Cont" };
                    let time = match pt.time {
                        Some(ref t) => encode_local(t, offset),
                        None => GARMIN_TIME_0.to_string(),
                    };
                    w.line(&format!("T{d}{}{d}{}{d}{}{d}{}{d}{}", label,
                        degrees(pt.lat), degrees(pt.lon), feet(pt.elevation), time, d = D))?;
                }
            }
        }
    }

    w.out.flush()?;
    info!("GPSLink: wrote {} waypoints, {} routes and {} tracks with GMT offset {:?}",
        data.waypoints.len(), data.routes.len(), data.tracks.len(), offset);
    Ok(())
}

struct LineWriter<W> {
    out: W,
    ls: &'static str,
}

impl<W: Write> LineWriter<W> {
    fn line(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())?;
        self.out.write_all(self.ls.as_bytes())
    }
}

fn columns(last: &str) -> String {
    ["Type", "Name", "Latitude", "Longitude", "Alt", last].join("\t")
}

fn waypoint_row(wpt: &Waypoint) -> String {
    format!("W{d}{}{d}{}{d}{}{d}{}{d}{}", wpt.name,
        degrees(wpt.lat), degrees(wpt.lon), feet(wpt.elevation),
        wpt.sym.as_deref().unwrap_or(""), d = D)
}

/// Six decimals, half away from zero.
fn degrees(value: Decimal) -> String {
    format!("{:.6}", value.round_dp_with_strategy(6, RoundingStrategy::MidpointAwayFromZero))
}

/// Elevation in whole feet. Missing elevation is written as 0.
fn feet(elevation: Option<f64>) -> String {
    let ft = Units::Imperial.elevation_from_metres(elevation.unwrap_or(0.0)).round();
    format!("{:.0}", ft + 0.0)
}

// ---- tests --------------------------------------------------------------------------------------
