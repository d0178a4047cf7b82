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

use serde::{Deserialize, Serialize};

/// Feet in one metre, as used by GPSLink files.
pub const FEET_PER_METRE: f64 = 3.280839895;

/// Units of elevation measurement.
#[derive(Copy, Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Units {
    Metric,
    Imperial,
}

impl Units {
    /// Returns elevation unit name.
    #[inline]
    pub fn elevation_unit_name(&self) -> &'static str {
        match *self {
            Units::Metric => { "m" },
            Units::Imperial => { "ft" },
        }
    }

    /// Converts elevation to metres.
    #[inline]
    pub fn elevation_to_metres(&self, h: f64) -> f64 {
        match *self {
            Units::Metric => { h },
            Units::Imperial => { h / FEET_PER_METRE },
        }
    }

    /// Converts elevation from metres.
    #[inline]
    pub fn elevation_from_metres(&self, h: f64) -> f64 {
        match *self {
            Units::Metric => { h },
            Units::Imperial => { h * FEET_PER_METRE },
        }
    }
}

// ---- tests --------------------------------------------------------------------------------------
