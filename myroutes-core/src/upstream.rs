//! Response bodies of the routing engine and the traffic directions API.
//!
//! Only the fields the route formatter reads are modelled; everything else
//! in the upstream JSON is ignored.

use serde::{Deserialize, Serialize};

use crate::traffic::CongestionLevel;

/// Routing engine (`/route/v1/{profile}/{coords}`) response
#[derive(Debug, Clone, Deserialize)]
pub struct RoutingResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<RoutingRoute>,
}

impl RoutingResponse {
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoutingRoute {
    /// Precision-5 encoded polyline
    pub geometry: String,
    /// Meters
    pub distance: f64,
    /// Seconds
    pub duration: f64,
    #[serde(default)]
    pub legs: Vec<RoutingLeg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoutingLeg {
    #[serde(default)]
    pub steps: Vec<RoutingStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoutingStep {
    pub distance: f64,
    pub duration: f64,
    #[serde(default)]
    pub maneuver: Option<Maneuver>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maneuver {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
}

/// Traffic-annotated directions response
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsRoute {
    /// Precision-6 encoded polyline
    pub geometry: String,
    #[serde(default)]
    pub legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsLeg {
    #[serde(default)]
    pub annotation: Option<Annotation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Annotation {
    /// One label per geometry segment, i.e. vertex count - 1
    #[serde(default)]
    pub congestion: Option<Vec<CongestionLevel>>,
}

impl DirectionsResponse {
    /// Whether the API reported success. A missing code is accepted.
    pub fn is_ok(&self) -> bool {
        self.code.as_deref().is_none_or(|code| code == "Ok")
    }

    /// Geometry and congestion labels of the first route's first leg, if
    /// the response carries an annotation at all.
    pub fn congestion(&self) -> Option<(&str, &[CongestionLevel])> {
        let route = self.routes.first()?;
        let labels = route
            .legs
            .first()?
            .annotation
            .as_ref()?
            .congestion
            .as_deref()?;
        Some((route.geometry.as_str(), labels))
    }
}
