//! HTTP clients for the routing engine, the traffic directions API and the
//! geocoder.

use std::time::Duration;

use myroutes_core::{
    LatLng,
    upstream::{DirectionsResponse, RoutingResponse},
};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    ApiError,
    config::{GeocoderConfig, RoutingConfig, TrafficConfig},
};

/// Builds a shared client with a per-request timeout.
pub fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// `lng,lat;lng,lat;...` as both upstream APIs expect
pub fn coordinate_path(path: &[LatLng]) -> String {
    path.iter()
        .map(|p| format!("{},{}", p.lng, p.lat))
        .collect::<Vec<_>>()
        .join(";")
}

#[derive(Debug, Clone)]
pub struct RoutingClient {
    client: Client,
    config: RoutingConfig,
}

impl RoutingClient {
    pub fn new(client: Client, config: RoutingConfig) -> Self {
        Self { client, config }
    }

    /// Fetches a route with full geometry and steps through `path`.
    ///
    /// The engine reports failures like `NoRoute` with a non-success status
    /// and a JSON body, so the body is parsed whenever it is JSON and the
    /// code is checked later by the formatter.
    pub async fn route(&self, path: &[LatLng]) -> Result<RoutingResponse, ApiError> {
        const SERVICE: &str = "Routing engine";

        let url = format!(
            "{}/route/v1/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coordinate_path(path)
        );
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("overview", "full"),
                ("geometries", "polyline"),
                ("steps", "true"),
            ])
            .send()
            .await
            .map_err(ApiError::upstream(SERVICE))?;

        let status = response.status();
        let body = response.bytes().await.map_err(ApiError::upstream(SERVICE))?;
        routing_from_body(status, &body)
    }
}

/// A failed status keeps the engine's own `code` when it sent one; a failed
/// status with an `Ok` code or an unreadable body is a status error.
fn routing_from_body(status: StatusCode, body: &[u8]) -> Result<RoutingResponse, ApiError> {
    const SERVICE: &str = "Routing engine";

    let status_error = || ApiError::UpstreamStatus {
        service: SERVICE,
        status: status.as_u16(),
    };
    match serde_json::from_slice::<RoutingResponse>(body) {
        Ok(routing) if !status.is_success() && routing.is_ok() => Err(status_error()),
        Ok(routing) => Ok(routing),
        Err(_) if !status.is_success() => Err(status_error()),
        Err(e) => Err(myroutes_core::Error::Json(e).into()),
    }
}

#[derive(Debug, Clone)]
pub struct TrafficClient {
    client: Client,
    config: TrafficConfig,
}

impl TrafficClient {
    pub fn new(client: Client, config: TrafficConfig) -> Self {
        Self { client, config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.access_token.is_some()
    }

    /// Fetches traffic-aware directions with per-segment congestion.
    pub async fn directions(&self, path: &[LatLng]) -> Result<DirectionsResponse, ApiError> {
        const SERVICE: &str = "Traffic directions";

        let token = self
            .config
            .access_token
            .as_deref()
            .ok_or(ApiError::NotConfigured("Traffic directions access token"))?;

        let url = format!(
            "{}/directions/v5/mapbox/driving-traffic/{}",
            self.config.base_url.trim_end_matches('/'),
            coordinate_path(path)
        );
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("overview", "full"),
                ("geometries", "polyline6"),
                ("annotations", "congestion"),
                ("access_token", token),
            ])
            .send()
            .await
            .map_err(ApiError::upstream(SERVICE))?;

        if !response.status().is_success() {
            return Err(ApiError::UpstreamStatus {
                service: SERVICE,
                status: response.status().as_u16(),
            });
        }

        response
            .json::<DirectionsResponse>()
            .await
            .map_err(ApiError::upstream(SERVICE))
    }
}

/// One autocomplete suggestion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeResult {
    pub name: String,
    pub address: LatLng,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<f64>,
}

// Autocomplete record; coordinates arrive as strings
#[derive(Debug, Deserialize)]
struct Place {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    display_place: Option<String>,
    lat: String,
    lon: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    class: Option<String>,
    #[serde(default)]
    importance: Option<f64>,
}

impl Place {
    fn into_result(self) -> Option<GeocodeResult> {
        let address = LatLng::new(self.lat.trim().parse().ok()?, self.lon.trim().parse().ok()?);
        Some(GeocodeResult {
            name: self.display_name.or(self.display_place).unwrap_or_default(),
            address,
            kind: self.kind,
            class: self.class,
            importance: self.importance,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GeocoderClient {
    client: Client,
    config: GeocoderConfig,
}

impl GeocoderClient {
    pub fn new(client: Client, config: GeocoderConfig) -> Self {
        Self { client, config }
    }

    pub async fn autocomplete(&self, query: &str) -> Result<Vec<GeocodeResult>, ApiError> {
        const SERVICE: &str = "Geocoder";

        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ApiError::NotConfigured("Geocoder API key"))?;

        let url = format!(
            "{}/v1/autocomplete.php",
            self.config.base_url.trim_end_matches('/')
        );
        let limit = self.config.limit.to_string();

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("key", key),
                ("q", query),
                ("limit", limit.as_str()),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(ApiError::upstream(SERVICE))?;

        if !response.status().is_success() {
            return Err(ApiError::UpstreamStatus {
                service: SERVICE,
                status: response.status().as_u16(),
            });
        }

        let places: Vec<Place> = response.json().await.map_err(ApiError::upstream(SERVICE))?;
        Ok(places.into_iter().filter_map(Place::into_result).collect())
    }
}
