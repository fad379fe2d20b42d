use log::debug;

use super::{FormattedDistance, FormattedDuration, RoutePayload, RouteStep, RouteSummary};
use crate::{
    Error, LatLng, MAX_MATCH_DISTANCE_METERS,
    polyline::{self, Precision},
    route::instruction_for,
    traffic::{build_segments, map_congestion},
    upstream::{DirectionsResponse, RoutingResponse},
};

/// Turns upstream responses into the route payload served to the map view.
#[derive(Debug, Clone, Copy)]
pub struct RouteFormatter {
    max_match_distance: f64,
}

impl Default for RouteFormatter {
    fn default() -> Self {
        Self {
            max_match_distance: MAX_MATCH_DISTANCE_METERS,
        }
    }
}

impl RouteFormatter {
    pub fn new(max_match_distance: f64) -> Self {
        Self { max_match_distance }
    }

    pub fn max_match_distance(&self) -> f64 {
        self.max_match_distance
    }

    /// Formats a routing-engine response without a traffic overlay.
    ///
    /// # Errors
    ///
    /// [`Error::UpstreamRouting`] when the engine did not answer `"Ok"` or
    /// returned no route, [`Error::PolylineDecoding`] when its geometry is
    /// malformed.
    pub fn format(
        &self,
        routing: &RoutingResponse,
        origin: LatLng,
        destination: LatLng,
    ) -> Result<RoutePayload, Error> {
        if !routing.is_ok() {
            let reason = routing.message.as_deref().unwrap_or("no message");
            return Err(Error::UpstreamRouting(format!("{}: {reason}", routing.code)));
        }
        let route = routing
            .routes
            .first()
            .ok_or_else(|| Error::UpstreamRouting("response contains no routes".to_string()))?;

        let coordinates: Vec<LatLng> = polyline::decode(&route.geometry, Precision::Five)?
            .into_iter()
            .map(LatLng::from)
            .collect();

        let steps = route
            .legs
            .iter()
            .flat_map(|leg| &leg.steps)
            .map(|step| {
                let maneuver = step.maneuver.clone().unwrap_or_default();
                RouteStep {
                    instruction: instruction_for(&maneuver.kind, maneuver.modifier.as_deref())
                        .into_owned(),
                    maneuver,
                    distance: FormattedDistance::new(step.distance),
                    duration: FormattedDuration::new(step.duration),
                }
            })
            .collect();

        Ok(RoutePayload {
            summary: RouteSummary {
                origin,
                destination,
                distance: FormattedDistance::new(route.distance),
                duration: FormattedDuration::new(route.duration),
                start_address: format_address(origin),
                end_address: format_address(destination),
            },
            coordinates,
            steps,
            traffic_segments: None,
        })
    }

    /// Formats a routing-engine response and overlays congestion from the
    /// traffic directions response.
    ///
    /// `traffic` is best-effort: `None`, a non-`"Ok"` response or a response
    /// without annotation produce an empty segment list, never an error.
    ///
    /// # Errors
    ///
    /// Same as [`RouteFormatter::format`]; the traffic side cannot fail.
    pub fn format_with_traffic(
        &self,
        routing: &RoutingResponse,
        traffic: Option<&DirectionsResponse>,
        origin: LatLng,
        destination: LatLng,
    ) -> Result<RoutePayload, Error> {
        let mut payload = self.format(routing, origin, destination)?;

        let traffic = traffic.filter(|t| t.is_ok());
        let labels = map_congestion(&payload.coordinates, traffic, self.max_match_distance);
        let segments = build_segments(&payload.coordinates, &labels);
        debug!(
            "Built {} traffic segments over {} route vertices",
            segments.len(),
            payload.coordinates.len()
        );

        payload.traffic_segments = Some(segments);
        Ok(payload)
    }
}

fn format_address(p: LatLng) -> String {
    format!("{:.6}, {:.6}", p.lat, p.lng)
}
