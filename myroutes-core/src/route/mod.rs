//! Final route payload: geometry, turn-by-turn steps and the optional
//! traffic overlay.

mod format;
mod formatter;
mod instructions;
mod to_geojson;

pub use format::{format_distance, format_duration};
pub use formatter::RouteFormatter;
pub use instructions::instruction_for;

use serde::{Deserialize, Serialize};

use crate::{LatLng, traffic::TrafficSegment, upstream::Maneuver};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedDistance {
    pub text: String,
    pub meters: f64,
}

impl FormattedDistance {
    pub fn new(meters: f64) -> Self {
        Self {
            text: format_distance(meters),
            meters,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedDuration {
    pub text: String,
    pub seconds: f64,
}

impl FormattedDuration {
    pub fn new(seconds: f64) -> Self {
        Self {
            text: format_duration(seconds),
            seconds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub origin: LatLng,
    pub destination: LatLng,
    pub distance: FormattedDistance,
    pub duration: FormattedDuration,
    pub start_address: String,
    pub end_address: String,
}

/// One maneuver of the turn-by-turn list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub instruction: String,
    pub maneuver: Maneuver,
    pub distance: FormattedDistance,
    pub duration: FormattedDuration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePayload {
    pub summary: RouteSummary,
    pub coordinates: Vec<LatLng>,
    pub steps: Vec<RouteStep>,
    /// Present only when a traffic overlay was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_segments: Option<Vec<TrafficSegment>>,
}
