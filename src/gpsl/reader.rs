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

use std::io::BufRead;
use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::core::units::Units;
use crate::gpx::model::*;
use super::error::{Diagnostics, GpslError, Warning, WarningKind};
use super::header::{read_header, Header, NumberedLines};
use super::time::decode_local;

/// Record type by the first character of a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    /// `W`: waypoint, or route point inside a route
    Waypoint,

    /// `R`: start of a route
    RouteStart,

    /// `H`: start of a track
    TrackStart,

    /// `T`: track point
    TrackPoint,

    /// Anything else.
    Unrecognized(char),
}

impl RecordKind {
    pub fn from_tag(tag: char) -> RecordKind {
        match tag {
            'W' => RecordKind::Waypoint,
            'R' => RecordKind::RouteStart,
            'H' => RecordKind::TrackStart,
            'T' => RecordKind::TrackPoint,
            c => RecordKind::Unrecognized(c),
        }
    }
}

/// Where the records currently go. Routes and tracks are referred by their index in the data set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Context {
    Idle,
    InRoute { route: usize },
    InTrack { track: usize, segment: Option<usize> },
}

/// Successfully parsed GPSLink file.
#[derive(Debug)]
pub struct Parsed {
    pub header: Header,
    pub data: GpsDataSet,

    /// Recoverable problems met while parsing, already logged
    pub warnings: Vec<Warning>,
}

/// Reads a GPSLink file. Any fatal error aborts reading and no data set is returned.
pub fn read_gpsl<R: BufRead>(source: R, creator: &str) -> Result<Parsed, GpslError> {
    let mut lines = NumberedLines::new(source);
    let mut diag = Diagnostics::new();
    let header = read_header(&mut lines, &mut diag)?;

    let mut data = GpsDataSet::new();
    data.creator = creator.to_string();
    data.time = Some(Utc::now());

    let mut ctx = Context::Idle;
    loop {
        let next = match lines.next_line() {
            Ok(Some(line)) => process_line(ctx, &line, lines.line(), &header, &mut data, &mut diag),
            Ok(None) => { break; }
            Err(e) => Err(e),
        };
        ctx = match next {
            Ok(next) => next,
            Err(e) => {
                error!("{}", e);
                return Err(e);
            }
        };
    }

    info!("GPSLink: read {} waypoints, {} routes and {} tracks with {} warnings",
        data.waypoints.len(), data.routes.len(), data.tracks.len(), diag.warnings().len());
    Ok(Parsed { header, data, warnings: diag.into_warnings() })
}

/// Handles one body line and returns the context for the next one.
fn process_line(ctx: Context, line: &str, line_no: u64, header: &Header,
                data: &mut GpsDataSet, diag: &mut Diagnostics) -> Result<Context, GpslError> {
    // A blank line terminates routes and tracks in progress
    if line.is_empty() {
        return Ok(Context::Idle);
    }
    if line.starts_with('#') {
        return Ok(ctx);
    }

    // Only lines with a type identifier followed by the delimiter are records
    let mut chars = line.chars();
    let tag = match (chars.next(), chars.next()) {
        (Some(tag), Some(d)) if d == header.delimiter => tag,
        _ => { return Ok(ctx); }
    };
    let fields = split_record(line, header.delimiter);

    match RecordKind::from_tag(tag) {
        RecordKind::Waypoint => {
            let wpt = waypoint_record(&fields, line_no)?;
            match ctx {
                Context::InRoute { route } => { data.routes[route].points.push(wpt); }
                _ => { data.waypoints.push(wpt); }
            }
            Ok(ctx)
        }
        RecordKind::RouteStart => {
            let name = required_name(&fields, line_no, tag)?;
            debug!("GPSLink: route {} at line {}", name, line_no);
            data.routes.push(Route::new(name));
            Ok(Context::InRoute { route: data.routes.len() - 1 })
        }
        RecordKind::TrackStart => {
            let name = required_name(&fields, line_no, tag)?;
            debug!("GPSLink: track {} at line {}", name, line_no);
            let mut trk = Track::new(name.clone());
            trk.desc = Some(name);
            data.tracks.push(trk);
            Ok(Context::InTrack { track: data.tracks.len() - 1, segment: None })
        }
        RecordKind::TrackPoint => {
            track_point_record(ctx, &fields, line_no, header, data, diag)
        }
        RecordKind::Unrecognized(c) => {
            debug!("GPSLink: skipping '{}' record at line {}", c, line_no);
            Ok(ctx)
        }
    }
}

/// `T label lat lon alt time`. A label starting with C continues the current segment.
fn track_point_record(ctx: Context, fields: &[&str], line_no: u64, header: &Header,
                      data: &mut GpsDataSet, diag: &mut Diagnostics) -> Result<Context, GpslError> {
    if fields.len() < 6 {
        return Err(GpslError::ShortTrackPoint { line: line_no, fields: fields.len() });
    }
    let label = fields[1];
    if label.is_empty() {
        return Err(GpslError::MissingName { line: line_no, tag: 'T' });
    }

    let mut pt = Waypoint::new(decimal(fields[2], line_no, "latitude")?,
                               decimal(fields[3], line_no, "longitude")?);
    pt.elevation = Some(feet_to_metres(fields[4], line_no)?);
    pt.time = decode_local(fields[5], &header.offset);

    let continues = label.chars().next().map_or(false, |c| c.eq_ignore_ascii_case(&'C'));
    match ctx {
        Context::InTrack { track, segment } => {
            let segments = &mut data.tracks[track].segments;
            match segment {
                Some(seg) if continues => {
                    segments[seg].points.push(pt);
                    Ok(ctx)
                }
                _ => {
                    segments.push(Segment::new(pt));
                    Ok(Context::InTrack { track, segment: Some(segments.len() - 1) })
                }
            }
        }
        _ => {
            diag.warn(line_no, WarningKind::OrphanTrackPoint);
            Ok(ctx)
        }
    }
}

/// `W name lat lon alt symbol`.
fn waypoint_record(fields: &[&str], line_no: u64) -> Result<Waypoint, GpslError> {
    let name = positional(fields, 1, line_no, "name")?;
    let lat = positional(fields, 2, line_no, "latitude")?;
    let lon = positional(fields, 3, line_no, "longitude")?;
    let alt = positional(fields, 4, line_no, "altitude")?;

    let mut wpt = Waypoint::new(decimal(lat, line_no, "latitude")?, decimal(lon, line_no, "longitude")?);
    wpt.name = name.to_string();
    wpt.desc = Some(wpt.name.clone()).filter(|s| !s.is_empty());
    wpt.elevation = Some(feet_to_metres(alt, line_no)?);
    wpt.sym = fields.get(5).filter(|s| !s.is_empty()).map(|s| s.to_string());
    debug!("GPSLink: waypoint {} at line {}, elevation {:.1} {}", wpt, line_no,
        wpt.elevation.unwrap_or(0.0), Units::Metric.elevation_unit_name());
    Ok(wpt)
}

fn positional<'a>(fields: &[&'a str], i: usize, line_no: u64, field: &'static str) -> Result<&'a str, GpslError> {
    match fields.get(i) {
        Some(s) => Ok(s),
        None => Err(GpslError::MissingField { line: line_no, tag: 'W', field }),
    }
}

fn required_name(fields: &[&str], line_no: u64, tag: char) -> Result<String, GpslError> {
    match fields.get(1) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(GpslError::MissingName { line: line_no, tag }),
    }
}

fn decimal(value: &str, line_no: u64, field: &'static str) -> Result<Decimal, GpslError> {
    Decimal::from_str(value.trim())
        .map_err(|_| GpslError::InvalidNumber { line: line_no, field, value: value.to_string() })
}

fn feet_to_metres(value: &str, line_no: u64) -> Result<f64, GpslError> {
    match value.trim().parse::<f64>() {
        Ok(ft) if ft.is_finite() => Ok(Units::Imperial.elevation_to_metres(ft)),
        _ => Err(GpslError::InvalidNumber { line: line_no, field: "altitude", value: value.to_string() }),
    }
}

/// Splits a record into fields. The type identifier is the first field, trailing empty fields
/// are dropped.
fn split_record(line: &str, delimiter: char) -> Vec<&str> {
    let mut fields: Vec<&str> = line.split(delimiter).collect();
    while fields.len() > 1 && fields.last().map_or(false, |s| s.is_empty()) {
        fields.pop();
    }
    fields
}

// ---- tests --------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    const HEADER: &str = "!GPSLINK\nSaved May 12, 2011 03:04:05p\nDelimiter=\t\nGMTOffset=0\n";

    fn parse(body: &str) -> Result<Parsed, GpslError> {
        read_gpsl(format!("{}{}", HEADER, body).as_bytes(), "test")
    }

    #[test]
    fn test_single_waypoint() {
        let parsed = parse("W\tPeak\t45.000000\t-122.000000\t1000\tFlag\n").unwrap();
        let data = parsed.data;
        assert_eq!(data.creator, "test");
        assert!(data.time.is_some());
        assert_eq!(data.waypoints.len(), 1);

        let wpt = &data.waypoints[0];
        assert_eq!(wpt.name, "Peak");
        assert_eq!(wpt.desc.as_deref(), Some("Peak"));
        assert_eq!(wpt.lat, Decimal::from_str("45.0").unwrap());
        assert_eq!(wpt.lon, Decimal::from_str("-122.0").unwrap());
        assert_eq!(wpt.lat.to_string(), "45.000000");
        assert::close(wpt.elevation.unwrap(), 304.8, 0.0001);
        assert_eq!(wpt.sym.as_deref(), Some("Flag"));
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_route_context() {
        let parsed = parse(concat!(
            "R\tTo the lake\n",
            "W\tHome\t60.1\t24.9\t30\tHouse\n",
            "W\tLake\t60.2\t25.0\t45\tFishing\n",
            "\n",
            "W\tShop\t60.3\t25.1\t10\tShopping\n",
        )).unwrap();
        let data = parsed.data;
        assert_eq!(data.routes.len(), 1);
        assert_eq!(data.routes[0].name, "To the lake");
        let names: Vec<&str> = data.routes[0].points.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Home", "Lake"]);
        assert_eq!(data.waypoints.len(), 1);
        assert_eq!(data.waypoints[0].name, "Shop");
    }

    #[test]
    fn test_track_segments() {
        let parsed = parse(concat!(
            "H\tMorning walk\n",
            "T\tStart\t60.1\t24.9\t30\t07/15/2017 06:00:00\n",
            "T\tCont\t60.2\t24.9\t31\t07/15/2017 06:01:00\n",
            "T\tcont\t60.3\t24.9\t32\tGarminTime0\n",
            "T\tStart\t60.4\t24.9\t33\t07/15/2017 06:10:00\n",
            "T\tX\t60.5\t24.9\t34\t07/15/2017 06:11:00\n",
            "T\tCont\t60.6\t24.9\t35\t07/15/2017 06:12:00\n",
        )).unwrap();
        let data = parsed.data;
        assert_eq!(data.tracks.len(), 1);
        let trk = &data.tracks[0];
        assert_eq!(trk.name, "Morning walk");
        assert_eq!(trk.desc.as_deref(), Some("Morning walk"));
        let sizes: Vec<usize> = trk.segments.iter().map(|s| s.points.len()).collect();
        assert_eq!(sizes, vec![3, 1, 2]);
        assert_eq!(trk.segments[0].points[0].time.unwrap().to_rfc3339(), "2017-07-15T06:00:00+00:00");
        assert!(trk.segments[0].points[2].time.is_none());
        assert!(trk.segments[0].points[0].name.is_empty());
    }

    #[test]
    fn test_context_switches() {
        let parsed = parse(concat!(
            "R\tRoad\n",
            "W\tA\t1\t2\t3\tFlag\n",
            "H\tWalk\n",
            "W\tB\t1\t2\t3\tFlag\n",
            "T\tStart\t1\t2\t3\tGarminTime0\n",
            "R\tBack\n",
            "T\tStart\t1\t2\t3\tGarminTime0\n",
        )).unwrap();
        let data = parsed.data;

        // H closes the route, R closes the track
        assert_eq!(data.routes.len(), 2);
        assert_eq!(data.routes[0].points.len(), 1);
        assert_eq!(data.routes[0].points[0].name, "A");
        assert!(data.routes[1].points.is_empty());

        // W inside a track is a top-level waypoint
        assert_eq!(data.waypoints.len(), 1);
        assert_eq!(data.waypoints[0].name, "B");

        assert_eq!(data.tracks.len(), 1);
        assert_eq!(data.tracks[0].segments.len(), 1);
        assert_eq!(data.tracks[0].segments[0].points.len(), 1);
        assert_eq!(parsed.warnings, vec![Warning::new(11, WarningKind::OrphanTrackPoint)]);
    }

    #[test]
    fn test_latin1_name() {
        let mut text = HEADER.as_bytes().to_vec();
        text.extend_from_slice(b"W\tJ\xE4rvi\t60\t25\t10\tFlag\nW\tPeak\t45\t-122\t1000\tFlag\n");
        let parsed = read_gpsl(&text[..], "test").unwrap();
        let names: Vec<&str> = parsed.data.waypoints.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["J\u{FFFD}rvi", "Peak"]);
        assert!(parsed.warnings.is_empty());
    }

    /// Reader failing once its content has been consumed.
    struct FailingSource {
        content: &'static [u8],
    }

    impl io::Read for FailingSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.content.is_empty() {
                return Err(io::Error::new(io::ErrorKind::Other, "device removed"));
            }
            self.content.read(buf)
        }
    }

    #[test]
    fn test_read_error_in_body() {
        let source = FailingSource {
            content: b"!GPSLINK\nSaved\nDelimiter=\t\nGMTOffset=0\nW\tPeak\t45\t-122\t1000\tFlag\n",
        };
        match read_gpsl(io::BufReader::new(source), "test") {
            Err(GpslError::Io(e)) => assert_eq!(e.to_string(), "device removed"),
            other => panic!("unexpected {:?}", other.map(|p| p.data)),
        }
    }

    #[test]
    fn test_continuation_without_segment_starts_one() {
        let data = parse("H\tT1\nT\tCont\t60.1\t24.9\t30\tGarminTime0\n").unwrap().data;
        assert_eq!(data.tracks[0].segments.len(), 1);
    }

    #[test]
    fn test_orphan_track_point() {
        let parsed = parse(concat!(
            "H\tT1\n",
            "T\tStart\t60.1\t24.9\t30\tGarminTime0\n",
            "\n",
            "T\tCont\t60.2\t24.9\t30\tGarminTime0\n",
        )).unwrap();
        assert_eq!(parsed.data.track_points().count(), 1);
        assert_eq!(parsed.warnings, vec![Warning::new(8, WarningKind::OrphanTrackPoint)]);
    }

    #[test]
    fn test_header_offset_applies_to_times() {
        let text = "!GPSLINK\nSaved\nDelimiter=\t\nGMTOffset=-5.0\nH\tT1\nT\tStart\t1\t2\t3\t07/15/2017 06:00:00\n";
        let data = read_gpsl(text.as_bytes(), "test").unwrap().data;
        let t = data.track_points().next().unwrap().time.unwrap();
        assert_eq!(t.to_rfc3339(), "2017-07-15T11:00:00+00:00");
    }

    #[test]
    fn test_skipped_lines() {
        let parsed = parse(concat!(
            "Waypoints\n",
            "Type\tName\tLatitude\tLongitude\tAlt\tSymbol\n",
            "# W\tHidden\t1\t2\t3\tFlag\n",
            "W\n",
            "W,Comma,1,2,3,Flag\n",
            "X\tUnknown\t1\n",
            "W\tShown\t1\t2\t3\n",
        )).unwrap();
        assert_eq!(parsed.data.waypoints.len(), 1);
        assert_eq!(parsed.data.waypoints[0].name, "Shown");
        assert!(parsed.data.waypoints[0].sym.is_none());
    }

    #[test]
    fn test_invalid_delimiter_falls_back_to_tab() {
        let text = "!GPSLINK\nSaved\nDelimiter=;\nGMTOffset=0\nW\tPeak\t45\t-122\t1000\tFlag\n";
        let parsed = read_gpsl(text.as_bytes(), "test").unwrap();
        assert_eq!(parsed.data.waypoints.len(), 1);
        assert_eq!(parsed.warnings, vec![Warning::new(3, WarningKind::InvalidDelimiter(";".into()))]);
    }

    #[test]
    fn test_comma_delimiter() {
        let text = "!GPSLINK\nSaved\nDelimiter=,\nGMTOffset=0\nR,Road\nW,A,1.5,2.5,0,\nW\tB\t1\t2\t3\tFlag\n";
        let data = read_gpsl(text.as_bytes(), "test").unwrap().data;
        assert_eq!(data.routes[0].points.len(), 1);
        assert_eq!(data.routes[0].points[0].name, "A");
        assert!(data.waypoints.is_empty());
    }

    #[test]
    fn test_fatal_records() {
        assert!(matches!(parse("R\t\n"), Err(GpslError::MissingName { line: 5, tag: 'R' })));
        assert!(matches!(parse("H\n\nH\t\n"), Err(GpslError::MissingName { line: 7, tag: 'H' })));
        assert!(matches!(parse("H\tT1\nT\tStart\t1\t2\t3\n"), Err(GpslError::ShortTrackPoint { line: 6, fields: 5 })));
        assert!(matches!(parse("H\tT1\nT\tStart\t1\t2\t3\t\n"), Err(GpslError::ShortTrackPoint { fields: 5, .. })));
        assert!(matches!(parse("H\tT1\nT\t\t1\t2\t3\tGarminTime0\n"), Err(GpslError::MissingName { tag: 'T', .. })));
        assert!(matches!(parse("W\tPeak\t45\n"), Err(GpslError::MissingField { field: "longitude", .. })));
        assert!(matches!(parse("W\tPeak\tnorth\t-122\t1000\tFlag\n"), Err(GpslError::InvalidNumber { field: "latitude", .. })));
        assert!(matches!(parse("W\tPeak\t45\t-122\thigh\tFlag\n"), Err(GpslError::InvalidNumber { field: "altitude", .. })));
    }

    #[test]
    fn test_bad_id_is_fatal_regardless_of_body() {
        let text = "GPSLINK\nSaved\nDelimiter=\t\nGMTOffset=0\nW\tPeak\t45\t-122\t1000\tFlag\n";
        assert!(matches!(read_gpsl(text.as_bytes(), "test"), Err(GpslError::BadMagic { line: 1, .. })));
    }

    #[test]
    fn test_record_kinds() {
        assert_eq!(RecordKind::from_tag('W'), RecordKind::Waypoint);
        assert_eq!(RecordKind::from_tag('R'), RecordKind::RouteStart);
        assert_eq!(RecordKind::from_tag('H'), RecordKind::TrackStart);
        assert_eq!(RecordKind::from_tag('T'), RecordKind::TrackPoint);
        assert_eq!(RecordKind::from_tag('w'), RecordKind::Unrecognized('w'));
    }

    #[test]
    fn test_split_record() {
        assert_eq!(split_record("W\ta\t\tb\t\t", '\t'), vec!["W", "a", "", "b"]);
        assert_eq!(split_record("R\t", '\t'), vec!["R"]);
    }
}
