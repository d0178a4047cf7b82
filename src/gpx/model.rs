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

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// GPS data set with waypoints, routes and tracks. Ownership is strictly hierarchical:
/// every route, track, segment and point belongs to exactly one parent.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GpsDataSet {
    pub creator: String,
    pub time: Option<DateTime<Utc>>,

    pub waypoints: Vec<Waypoint>,
    pub routes: Vec<Route>,
    pub tracks: Vec<Track>,
}

impl GpsDataSet {
    pub fn new() -> GpsDataSet {
        GpsDataSet::default()
    }

    /// True if there are no waypoints, routes or tracks.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty() && self.routes.is_empty() && self.tracks.is_empty()
    }

    /// Iterates all track points of all tracks and segments in order.
    pub fn track_points(&self) -> impl Iterator<Item = &Waypoint> {
        self.tracks.iter()
            .flat_map(|trk| trk.segments.iter())
            .flat_map(|seg| seg.points.iter())
    }
}

/// Waypoint, route point or track point.
/// Coordinates are decimal degrees kept as exact decimals, elevation is in metres.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Waypoint {
    pub name: String,
    pub desc: Option<String>,
    pub lat: Decimal,
    pub lon: Decimal,
    pub elevation: Option<f64>,
    pub sym: Option<String>,
    pub time: Option<DateTime<Utc>>,
}

impl Waypoint {
    pub fn new(lat: Decimal, lon: Decimal) -> Waypoint {
        Waypoint {
            name: String::new(),
            desc: None,
            lat,
            lon,
            elevation: None,
            sym: None,
            time: None,
        }
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.lat, self.lon)
    }
}

/// Route with its own points.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Route {
    pub name: String,
    pub points: Vec<Waypoint>,
}

impl Route {
    pub fn new(name: String) -> Route {
        Route {
            name,
            points: Vec::new(),
        }
    }
}

/// Track consisting of segments.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Track {
    pub name: String,
    pub desc: Option<String>,
    pub segments: Vec<Segment>,
}

impl Track {
    pub fn new(name: String) -> Track {
        Track {
            name,
            desc: None,
            segments: Vec::new(),
        }
    }
}

/// Track segment with points. A segment is created together with its first point.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Segment {
    pub points: Vec<Waypoint>,
}

impl Segment {
    pub fn new(first: Waypoint) -> Segment {
        Segment {
            points: vec![first],
        }
    }
}

// ---- tests --------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn point(lat: &str, lon: &str) -> Waypoint {
        Waypoint::new(Decimal::from_str(lat).unwrap(), Decimal::from_str(lon).unwrap())
    }

    #[test]
    fn test_track_points_order() {
        let mut trk1 = Track::new("One".into());
        let mut seg = Segment::new(point("1.0", "1.0"));
        seg.points.push(point("2.0", "2.0"));
        trk1.segments.push(seg);
        trk1.segments.push(Segment::new(point("3.0", "3.0")));
        let mut trk2 = Track::new("Two".into());
        trk2.segments.push(Segment::new(point("4.0", "4.0")));

        let mut data = GpsDataSet::new();
        assert!(data.is_empty());
        data.tracks.push(trk1);
        data.tracks.push(trk2);
        assert!(!data.is_empty());

        let lats: Vec<String> = data.track_points().map(|p| p.lat.to_string()).collect();
        assert_eq!(lats, vec!["1.0", "2.0", "3.0", "4.0"]);
    }

    #[test]
    fn test_decimal_coordinates_keep_digits() {
        let mut wpt = point("45.123456789012", "-122.000000");
        wpt.name = "Peak".into();
        assert_eq!(wpt.to_string(), "Peak (45.123456789012 -122.000000)");
    }
}
