//! HTTP API handlers with Axum

use std::sync::Arc;

use axum::{
    Json, Router,
    error_handling::HandleErrorLayer,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use myroutes_core::{
    LatLng,
    cameras::{Camera, CameraLocation, CameraRoster},
    route::{RouteFormatter, RoutePayload},
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower::{BoxError, ServiceBuilder, limit::GlobalConcurrencyLimitLayer};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    ApiError, ServerConfig,
    planner::RoutePlanner,
    stream::{self, StreamProxy},
    upstream::{GeocodeResult, GeocoderClient, RoutingClient, TrafficClient, http_client},
};

/// Shared, read-only state of all handlers
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
    pub roster: Arc<CameraRoster>,
    pub planner: RoutePlanner,
    pub geocoder: GeocoderClient,
    pub streams: StreamProxy,
}

impl AppState {
    pub fn new(config: ServerConfig, roster: Arc<CameraRoster>) -> Result<Self, reqwest::Error> {
        let upstream = http_client(config.upstream_timeout())?;
        // stream requests carry their own timeouts
        let streams = Client::builder().build()?;

        let planner = RoutePlanner::new(
            RoutingClient::new(upstream.clone(), config.routing.clone()),
            TrafficClient::new(upstream.clone(), config.traffic.clone()),
            RouteFormatter::new(config.max_match_distance_meters),
            config.upstream_timeout(),
        );

        Ok(Self {
            geocoder: GeocoderClient::new(upstream, config.geocoder.clone()),
            streams: StreamProxy::new(streams, config.stream.clone()),
            planner,
            roster,
            config,
        })
    }
}

/// Build the Axum router
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let limits = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .timeout(state.config.request_timeout())
        .layer(GlobalConcurrencyLimitLayer::new(state.config.concurrency_limit));

    let api = Router::new()
        .route("/api/route", get(route_get).post(route_post))
        .route("/api/route/traffic", get(traffic_route_get).post(traffic_route_post))
        .route("/api/cameras", get(list_cameras))
        .route("/api/cameras/nearby", post(nearby_cameras))
        .route("/api/cameras/{id}", get(get_camera))
        .route("/api/locations", get(list_locations))
        .route("/api/locations/{slug}", get(get_location))
        .route("/api/geocode", get(geocode))
        .route("/health", get(health))
        .layer(cors);

    // the proxy sets its own CORS headers and answers bare OPTIONS itself
    let streams = Router::new().route(
        stream::PROXY_PATH,
        get(proxy_stream).options(|| async { stream::preflight() }),
    );

    api.merge(streams)
        .layer(limits)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_middleware_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "Request took too long" })),
        )
            .into_response()
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Unhandled internal error: {err}") })),
        )
            .into_response()
    }
}

// ============ Route Endpoints ============

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    #[serde(default)]
    pub origin: Option<LatLng>,
    #[serde(default)]
    pub destination: Option<LatLng>,
    /// Stops between origin and destination, in order
    #[serde(default)]
    pub waypoints: Vec<LatLng>,
    #[serde(default)]
    pub include_cameras: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuery {
    /// `geojson` for a FeatureCollection instead of the route payload
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub include_cameras: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct RouteResponse<'a> {
    #[serde(flatten)]
    pub route: RoutePayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cameras: Option<Vec<&'a Camera>>,
}

impl RouteRequest {
    /// Origin, waypoints and destination, with configured defaults for
    /// missing endpoints.
    fn path(&self, config: &ServerConfig) -> Result<Vec<LatLng>, ApiError> {
        let origin = self.origin.unwrap_or(config.default_origin);
        let destination = self.destination.unwrap_or(config.default_destination);

        let mut path = Vec::with_capacity(self.waypoints.len() + 2);
        path.push(origin);
        path.extend_from_slice(&self.waypoints);
        path.push(destination);

        if let Some(bad) = path.iter().find(|p| !valid_position(p)) {
            return Err(ApiError::BadRequest(format!(
                "Invalid coordinate {}, {}",
                bad.lat, bad.lng
            )));
        }
        Ok(path)
    }
}

fn valid_position(p: &LatLng) -> bool {
    p.is_finite() && (-90.0..=90.0).contains(&p.lat) && (-180.0..=180.0).contains(&p.lng)
}

async fn route_get(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RouteQuery>,
) -> Result<Response, ApiError> {
    plan_route(&state, RouteRequest::default(), query, false).await
}

async fn route_post(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RouteQuery>,
    Json(request): Json<RouteRequest>,
) -> Result<Response, ApiError> {
    plan_route(&state, request, query, false).await
}

async fn traffic_route_get(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RouteQuery>,
) -> Result<Response, ApiError> {
    plan_route(&state, RouteRequest::default(), query, true).await
}

async fn traffic_route_post(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RouteQuery>,
    Json(request): Json<RouteRequest>,
) -> Result<Response, ApiError> {
    plan_route(&state, request, query, true).await
}

async fn plan_route(
    state: &AppState,
    request: RouteRequest,
    query: RouteQuery,
    with_traffic: bool,
) -> Result<Response, ApiError> {
    let geojson = match query.format.as_deref() {
        None | Some("json") => false,
        Some("geojson") => true,
        Some(other) => return Err(ApiError::BadRequest(format!("Unknown format '{other}'"))),
    };
    let path = request.path(&state.config)?;

    let route = if with_traffic {
        state.planner.plan_with_traffic(&path).await?
    } else {
        state.planner.plan(&path).await?
    };

    if geojson {
        return Ok(Json(route.to_geojson()?).into_response());
    }

    let cameras = query
        .include_cameras
        .unwrap_or(request.include_cameras)
        .then(|| {
            state
                .roster
                .nearby(&route.coordinates, state.config.corridor_meters)
        });

    Ok(Json(RouteResponse { route, cameras }).into_response())
}

// ============ Camera Endpoints ============

#[derive(Debug, Serialize)]
struct CamerasResponse<'a> {
    count: usize,
    cameras: Vec<&'a Camera>,
}

impl<'a> CamerasResponse<'a> {
    fn new(cameras: Vec<&'a Camera>) -> Self {
        Self {
            count: cameras.len(),
            cameras,
        }
    }
}

async fn list_cameras(State(state): State<Arc<AppState>>) -> Response {
    Json(CamerasResponse::new(state.roster.cameras().iter().collect())).into_response()
}

async fn get_camera(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Camera>, ApiError> {
    state
        .roster
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No camera with id '{id}'")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyRequest {
    pub coordinates: Vec<LatLng>,
    /// Corridor radius in meters
    #[serde(default)]
    pub max_distance: Option<f64>,
}

async fn nearby_cameras(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NearbyRequest>,
) -> Result<Response, ApiError> {
    let max_distance = request.max_distance.unwrap_or(state.config.corridor_meters);
    if !max_distance.is_finite() || max_distance < 0.0 {
        return Err(ApiError::BadRequest(format!(
            "maxDistance must be a non-negative number, got {max_distance}"
        )));
    }

    let cameras = state.roster.nearby(&request.coordinates, max_distance);
    Ok(Json(CamerasResponse::new(cameras)).into_response())
}

async fn list_locations(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let locations = state.roster.locations();
    Json(json!({ "count": locations.len(), "locations": locations }))
}

#[derive(Debug, Serialize)]
struct LocationResponse<'a> {
    location: CameraLocation,
    cameras: Vec<&'a Camera>,
}

async fn get_location(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let (location, cameras) = state
        .roster
        .cameras_at(&slug)
        .ok_or_else(|| ApiError::NotFound(format!("No location '{slug}'")))?;
    Ok(Json(LocationResponse { location, cameras }).into_response())
}

// ============ Geocoding, Streams, Health ============

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
struct GeocodeResponse {
    results: Vec<GeocodeResult>,
}

async fn geocode(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<GeocodeResponse>, ApiError> {
    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Query parameter 'q' is required".to_string()))?;

    let results = state.geocoder.autocomplete(q).await?;
    Ok(Json(GeocodeResponse { results }))
}

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    #[serde(default)]
    pub url: Option<String>,
}

async fn proxy_stream(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StreamQuery>,
) -> Result<Response, ApiError> {
    let url = query
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing stream URL".to_string()))?;
    state.streams.fetch(&url).await
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "cameras": state.roster.len() }))
}
