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

// -------------------------------------------------------------------------------------------------
// Only UTC times are stored in the data set, so the offset at the time the file was made is
// unknown, and so is the time zone. A time zone can have two offsets depending on DST, and a file
// could mix tracks with and without DST (that one we cannot handle). One track point time is
// picked, and the offset the local time zone has at that moment is used for the whole file.
// If there is no track point time, the offset of the current moment is used.

use chrono::{DateTime, Local, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::gpx::model::GpsDataSet;

/// Which track point time decides the offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetMode {
    /// The last track point time in file order.
    Last,

    /// The first track point time in file order.
    First,
}

impl Default for OffsetMode {
    fn default() -> OffsetMode {
        OffsetMode::Last
    }
}

/// The track point time used for the offset, scanning tracks, segments and points in order.
pub fn representative_time(data: &GpsDataSet, mode: OffsetMode) -> Option<DateTime<Utc>> {
    let mut times = data.track_points().filter_map(|pt| pt.time);
    match mode {
        OffsetMode::Last => times.last(),
        OffsetMode::First => times.next(),
    }
}

/// Offset of the time zone at the given moment in hours, rounded to minutes.
pub fn offset_hours_at<Tz: TimeZone>(tz: &Tz, at: &DateTime<Utc>) -> f64 {
    let seconds = tz.offset_from_utc_datetime(&at.naive_utc()).fix().local_minus_utc();
    (seconds as f64 / 60.0).round() / 60.0
}

/// GMT offset for saving the data set, evaluated in the given time zone.
pub fn infer_offset_in<Tz: TimeZone>(data: &GpsDataSet, mode: OffsetMode, tz: &Tz, now: DateTime<Utc>) -> f64 {
    let at = representative_time(data, mode).unwrap_or(now);
    let hours = offset_hours_at(tz, &at);
    debug!("GPSLink: GMT offset {} from {}", hours, at);
    hours
}

/// GMT offset for saving the data set in the local time zone.
pub fn infer_local_offset(data: &GpsDataSet, mode: OffsetMode) -> f64 {
    infer_offset_in(data, mode, &Local, Utc::now())
}

// ---- tests --------------------------------------------------------------------------------------
