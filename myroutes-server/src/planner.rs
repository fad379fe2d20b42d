use std::time::Duration;

use myroutes_core::{
    LatLng,
    route::{RouteFormatter, RoutePayload},
    upstream::{DirectionsResponse, RoutingResponse},
};
use tracing::{info, warn};

use crate::{
    ApiError,
    upstream::{RoutingClient, TrafficClient},
};

/// Fetches upstream routes and turns them into payloads.
///
/// The routing engine is required; the traffic overlay is best-effort and
/// any failure there only empties the segment list.
#[derive(Debug, Clone)]
pub struct RoutePlanner {
    routing: RoutingClient,
    traffic: TrafficClient,
    formatter: RouteFormatter,
    timeout: Duration,
}

impl RoutePlanner {
    pub fn new(
        routing: RoutingClient,
        traffic: TrafficClient,
        formatter: RouteFormatter,
        timeout: Duration,
    ) -> Self {
        Self {
            routing,
            traffic,
            formatter,
            timeout,
        }
    }

    pub fn has_traffic(&self) -> bool {
        self.traffic.is_configured()
    }

    /// Route through `path` (origin, waypoints, destination) without traffic.
    pub async fn plan(&self, path: &[LatLng]) -> Result<RoutePayload, ApiError> {
        let (origin, destination) = endpoints(path)?;
        let routing = self.fetch_route(path).await?;
        Ok(self.formatter.format(&routing, origin, destination)?)
    }

    /// Route through `path` with the congestion overlay.
    pub async fn plan_with_traffic(&self, path: &[LatLng]) -> Result<RoutePayload, ApiError> {
        let (origin, destination) = endpoints(path)?;

        let (routing, traffic) = tokio::join!(self.fetch_route(path), self.fetch_traffic(path));
        let routing = routing?;
        let traffic = match traffic {
            Ok(traffic) => Some(traffic),
            Err(e) => {
                warn!("Traffic data unavailable, serving route without congestion: {e}");
                None
            }
        };

        let payload =
            self.formatter
                .format_with_traffic(&routing, traffic.as_ref(), origin, destination)?;
        info!(
            "Planned route with {} vertices and {} traffic segments",
            payload.coordinates.len(),
            payload.traffic_segments.as_ref().map_or(0, Vec::len)
        );
        Ok(payload)
    }

    async fn fetch_route(&self, path: &[LatLng]) -> Result<RoutingResponse, ApiError> {
        tokio::time::timeout(self.timeout, self.routing.route(path))
            .await
            .map_err(|_| ApiError::Timeout("Routing engine"))?
    }

    async fn fetch_traffic(&self, path: &[LatLng]) -> Result<DirectionsResponse, ApiError> {
        tokio::time::timeout(self.timeout, self.traffic.directions(path))
            .await
            .map_err(|_| ApiError::Timeout("Traffic directions"))?
    }
}

fn endpoints(path: &[LatLng]) -> Result<(LatLng, LatLng), ApiError> {
    match path {
        [origin, .., destination] => Ok((*origin, *destination)),
        _ => Err(ApiError::BadRequest(
            "A route needs an origin and a destination".to_string(),
        )),
    }
}
