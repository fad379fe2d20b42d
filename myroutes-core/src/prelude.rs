pub use crate::{
    ASSUMED_URBAN_SPEED_KMH, DEFAULT_CORRIDOR_METERS, Error, LatLng, MAX_MATCH_DISTANCE_METERS,
};

// Codec and distances
pub use crate::geodesy::{distance_to_polyline, distance_to_segment, haversine_distance};
pub use crate::polyline::{Precision, decode, encode};

// Traffic overlay
pub use crate::traffic::{
    CongestionLevel, TrafficSegment, build_segments, map_congestion, match_labels,
};

// Route payload
pub use crate::route::{
    FormattedDistance, FormattedDuration, RouteFormatter, RoutePayload, RouteStep, RouteSummary,
    format_distance, format_duration, instruction_for,
};

// Cameras
pub use crate::cameras::{Camera, CameraLocation, CameraRoster, nearby_cameras};

// Upstream payloads
pub use crate::upstream::{DirectionsResponse, RoutingResponse};
