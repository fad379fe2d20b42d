//! Distances over spherical coordinates.
//!
//! [`distance_to_segment`] is a locally flattened projection, good enough at
//! metropolitan scale. Errors grow with segment length and latitude; it is
//! not a great-circle cross-track distance.

use crate::LatLng;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

// Squared radian length under which a segment is treated as a point
const DEGENERATE_SEGMENT_LEN2: f64 = 1e-12;

/// Great-circle distance between two points in meters (haversine).
pub fn haversine_distance(a: LatLng, b: LatLng) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);

    EARTH_RADIUS_METERS * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Distance in meters from `point` to the segment `start`-`end`.
///
/// The point is projected onto the segment in radian lat/lng space. A
/// projection before the start or past the end falls back to the haversine
/// distance to that endpoint, as does a near-zero-length segment.
pub fn distance_to_segment(point: LatLng, start: LatLng, end: LatLng) -> f64 {
    let (lat1, lng1) = (start.lat.to_radians(), start.lng.to_radians());
    let (lat2, lng2) = (end.lat.to_radians(), end.lng.to_radians());
    let (lat3, lng3) = (point.lat.to_radians(), point.lng.to_radians());

    let d_lat = lat2 - lat1;
    let d_lng = lng2 - lng1;
    let seg_len2 = d_lat * d_lat + d_lng * d_lng;

    if seg_len2 < DEGENERATE_SEGMENT_LEN2 {
        return haversine_distance(start, point);
    }

    let t = ((lat3 - lat1) * d_lat + (lng3 - lng1) * d_lng) / seg_len2;
    if t < 0.0 {
        return haversine_distance(start, point);
    }
    if t > 1.0 {
        return haversine_distance(end, point);
    }

    let proj_lat = lat1 + t * d_lat;
    let proj_lng = lng1 + t * d_lng;
    let dy = proj_lat - lat3;
    let dx = proj_lng - lng3;
    let a = dy * dy + dx * dx * ((lat3 + proj_lat) / 2.0).cos();

    EARTH_RADIUS_METERS * a.sqrt()
}

/// Minimum distance in meters from `point` to any segment of `polyline`.
///
/// A polyline with fewer than two vertices has no segments, so the result
/// is `f64::INFINITY`.
pub fn distance_to_polyline(point: LatLng, polyline: &[LatLng]) -> f64 {
    polyline
        .windows(2)
        .map(|w| distance_to_segment(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Sum of haversine distances between consecutive vertices.
pub fn path_length(path: &[LatLng]) -> f64 {
    path.windows(2)
        .map(|w| haversine_distance(w[0], w[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANDUNG: LatLng = LatLng::new(-6.914744, 107.609810);
    const CIMAHI: LatLng = LatLng::new(-6.872200, 107.542500);

    #[test]
    fn haversine_is_zero_for_identical_points() {
        assert_eq!(haversine_distance(BANDUNG, BANDUNG), 0.0);
    }

    #[test]
    fn haversine_matches_known_value() {
        // one degree of latitude on a 6371 km sphere
        let d = haversine_distance(LatLng::new(0.0, 0.0), LatLng::new(1.0, 0.0));
        assert!((d - 111_194.93).abs() < 0.1, "got {d}");
    }

    #[test]
    fn haversine_is_symmetric() {
        let ab = haversine_distance(BANDUNG, CIMAHI);
        let ba = haversine_distance(CIMAHI, BANDUNG);
        assert_eq!(ab, ba);
        assert!(ab > 8_000.0 && ab < 9_000.0, "got {ab}");
    }

    #[test]
    fn point_on_segment_has_zero_distance() {
        let start = LatLng::new(-6.90, 107.60);
        let end = LatLng::new(-6.90, 107.62);
        let mid = LatLng::new(-6.90, 107.61);
        assert!(distance_to_segment(mid, start, end) < 1e-6);
    }

    #[test]
    fn projection_before_start_uses_start_vertex() {
        let start = LatLng::new(-6.90, 107.60);
        let end = LatLng::new(-6.90, 107.62);
        let before = LatLng::new(-6.90, 107.59);
        assert_eq!(
            distance_to_segment(before, start, end),
            haversine_distance(start, before)
        );
    }

    #[test]
    fn projection_past_end_uses_end_vertex() {
        let start = LatLng::new(-6.90, 107.60);
        let end = LatLng::new(-6.90, 107.62);
        let after = LatLng::new(-6.91, 107.63);
        assert_eq!(
            distance_to_segment(after, start, end),
            haversine_distance(end, after)
        );
    }

    #[test]
    fn degenerate_segment_falls_back_to_start() {
        let p = LatLng::new(-6.91, 107.61);
        assert_eq!(
            distance_to_segment(p, BANDUNG, BANDUNG),
            haversine_distance(BANDUNG, p)
        );
    }

    #[test]
    fn perpendicular_offset_is_close_to_haversine_offset() {
        // 0.001 degree north of an east-west segment, about 111 m
        let start = LatLng::new(-6.900, 107.600);
        let end = LatLng::new(-6.900, 107.620);
        let p = LatLng::new(-6.899, 107.610);
        let d = distance_to_segment(p, start, end);
        let expected = haversine_distance(p, LatLng::new(-6.900, 107.610));
        assert!((d - expected).abs() < 1.0, "{d} vs {expected}");
    }

    #[test]
    fn polyline_takes_minimum_over_segments() {
        let route = [
            LatLng::new(-6.90, 107.60),
            LatLng::new(-6.90, 107.62),
            LatLng::new(-6.92, 107.62),
        ];
        let near_second = LatLng::new(-6.91, 107.6201);
        let d = distance_to_polyline(near_second, &route);
        assert!(d < 15.0, "got {d}");
    }

    #[test]
    fn polyline_without_segments_is_infinitely_far() {
        assert_eq!(distance_to_polyline(BANDUNG, &[]), f64::INFINITY);
        assert_eq!(distance_to_polyline(BANDUNG, &[BANDUNG]), f64::INFINITY);
    }

    #[test]
    fn path_length_sums_legs() {
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(1.0, 0.0);
        let c = LatLng::new(2.0, 0.0);
        let total = path_length(&[a, b, c]);
        assert!((total - 2.0 * haversine_distance(a, b)).abs() < 1e-6);
        assert_eq!(path_length(&[a]), 0.0);
    }
}
