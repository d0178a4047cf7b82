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
// GPSLink track point times are local wall clock times of the GMT offset declared in the header,
// written as fixed-width "MM/DD/YYYY HH:MM:SS". The data model only holds UTC instants.

extern crate chrono;

use std::fmt;

use self::chrono::{DateTime, Duration, NaiveDate, TimeZone, Timelike, Utc};

/// Time value written for track points without a time.
pub const GARMIN_TIME_0: &str = "GarminTime0";

/// Length of a track point time string.
pub const TIMESTAMP_LEN: usize = 19;

/// Format for the track point times.
pub const GPSL_TIME_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Converts GMT offset hours into whole minutes. Fractional offsets are used in some time zones.
pub fn offset_minutes(offset_hours: f64) -> Option<i64> {
    if !offset_hours.is_finite() {
        return None;
    }
    Some((offset_hours * 60.0).round() as i64)
}

/// Parses a GMT offset header value given in hours, e.g. "-5.0" or "5.75".
pub fn parse_offset(offset: &str) -> Option<f64> {
    offset.trim().parse::<f64>().ok().filter(|h| h.is_finite())
}

/// Converts a GPSLink track point time and the header GMT offset to UTC.
/// Returns None for the GarminTime0 sentinel and for anything that doesn't parse.
pub fn decode_local(text: &str, offset: &str) -> Option<DateTime<Utc>> {
    if text.eq_ignore_ascii_case(GARMIN_TIME_0) || text.chars().count() != TIMESTAMP_LEN {
        return None;
    }

    let month = field(text, 0, 2)?;
    let day = field(text, 3, 5)?;
    let year = field(text, 6, 10)?;
    let hour = field(text, 11, 13)?;
    let minute = field(text, 14, 16)?;
    let second = field(text, 17, 19)?;

    let wall_clock = NaiveDate::from_ymd_opt(year as i32, month, day)?
        .and_hms_opt(hour, minute, second)?;
    let shift = Duration::try_minutes(offset_minutes(parse_offset(offset)?)?)?;
    Utc.from_utc_datetime(&wall_clock).checked_sub_signed(shift)
}

/// Converts a UTC instant to a GPSLink track point time with the given GMT offset in hours.
pub fn encode_local(instant: &DateTime<Utc>, offset_hours: f64) -> String {
    let utc = instant.naive_utc();
    let local = offset_minutes(offset_hours)
        .and_then(Duration::try_minutes)
        .and_then(|shift| utc.checked_add_signed(shift))
        .unwrap_or_else(|| {
            warn!("GMT offset {} out of range, writing UTC time", offset_hours);
            utc
        });
    local.format(GPSL_TIME_FORMAT).to_string()
}

/// Save time label for the second header line, e.g. "Oct 14, 2026 03:04:05p".
pub fn format_saved_stamp<Tz>(t: &DateTime<Tz>) -> String
    where Tz: TimeZone,
          Tz::Offset: fmt::Display,
{
    let (pm, _) = t.hour12();
    format!("{}{}", t.format("%b %d, %Y %I:%M:%S"), if pm { 'p' } else { 'a' })
}

/// Picks a fixed position numeric field.
fn field(text: &str, start: usize, end: usize) -> Option<u32> {
    let s = text.get(start..end)?;
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

// ---- tests --------------------------------------------------------------------------------------
