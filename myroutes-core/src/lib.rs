//! Route/traffic reconciliation and route-corridor camera filtering.
//!
//! Every operation in this crate is a pure, synchronous computation over
//! immutable inputs. Network access, timeouts and degradation policy live in
//! the server crate; this crate only sees already-fetched upstream payloads.

pub mod cameras;
mod error;
pub mod geodesy;
pub mod polyline;
pub mod prelude;
pub mod route;
pub mod traffic;
pub mod upstream;

pub use error::Error;

use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

// geo types are x = longitude, y = latitude
impl From<geo::Coord<f64>> for LatLng {
    fn from(c: geo::Coord<f64>) -> Self {
        Self { lat: c.y, lng: c.x }
    }
}

impl From<LatLng> for geo::Coord<f64> {
    fn from(p: LatLng) -> Self {
        geo::Coord { x: p.lng, y: p.lat }
    }
}

/// Assumed urban driving speed for traffic segments without their own timing, km/h
pub const ASSUMED_URBAN_SPEED_KMH: f64 = 30.0;

/// Traffic vertices farther than this from a route vertex are not trusted (meters)
pub const MAX_MATCH_DISTANCE_METERS: f64 = 200.0;

/// Corridor radius used by the map view when listing cameras along a route (meters)
pub const DEFAULT_CORRIDOR_METERS: f64 = 50.0;
