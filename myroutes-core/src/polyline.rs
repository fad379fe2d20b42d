//! Encoded polyline codec over the `polyline` crate.
//!
//! The routing engine sends precision-5 geometry, the traffic directions API
//! precision-6. Decoded positions are [`geo::Coord`]s, so they come out as
//! `(x = longitude, y = latitude)`; convert with [`LatLng::from`](crate::LatLng)
//! at component boundaries.

use geo::Coord;

use crate::Error;

/// Decimal-digit scale of an encoded polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// 1e5, used by the routing engine
    Five,
    /// 1e6, used by the traffic directions API
    Six,
}

impl Precision {
    pub fn digits(self) -> u32 {
        match self {
            Precision::Five => 5,
            Precision::Six => 6,
        }
    }
}

/// Decodes an encoded polyline into `(lng, lat)` coordinates.
///
/// # Errors
///
/// Returns [`Error::PolylineDecoding`] when the input ends inside a value,
/// contains a byte outside the polyline alphabet or holds a value too wide
/// to decode.
pub fn decode(encoded: &str, precision: Precision) -> Result<Vec<Coord<f64>>, Error> {
    ::polyline::decode_polyline(encoded, precision.digits())
        .map(|line| line.0)
        .map_err(|e| Error::PolylineDecoding(e.to_string()))
}

/// Encodes `(lng, lat)` coordinates with the given precision.
///
/// # Errors
///
/// Returns [`Error::InvalidData`] for coordinates outside the valid
/// latitude/longitude range.
pub fn encode(coords: &[Coord<f64>], precision: Precision) -> Result<String, Error> {
    ::polyline::encode_coordinates(coords.iter().copied(), precision.digits())
        .map_err(|e| Error::InvalidData(e.to_string()))
}
