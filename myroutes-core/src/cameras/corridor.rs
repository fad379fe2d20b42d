//! Cameras along a route.
//!
//! Inclusion uses the flattened perpendicular distance to the route
//! polyline, ordering uses the nearest route vertex in raw degree space.
//! The two metrics disagree near sharp bends; the ordering metric is kept
//! because changing it reorders the camera list the user sees.

use rayon::prelude::*;

use super::Camera;
use crate::{LatLng, geodesy::distance_to_polyline};

/// Index of the route vertex closest to `point` by squared planar distance
/// in degrees. Ties go to the lowest index; an empty route yields 0.
pub fn closest_vertex_index(point: LatLng, route: &[LatLng]) -> usize {
    let mut min_distance = f64::INFINITY;
    let mut closest = 0;

    for (idx, vertex) in route.iter().enumerate() {
        let d_lat = point.lat - vertex.lat;
        let d_lng = point.lng - vertex.lng;
        let distance = d_lat * d_lat + d_lng * d_lng;
        if distance < min_distance {
            min_distance = distance;
            closest = idx;
        }
    }

    closest
}

/// Cameras within `max_distance` meters of the route polyline, ordered by
/// their closest route vertex.
///
/// Cameras sharing a closest vertex keep their roster order. The roster
/// itself is untouched. A route with fewer than two vertices has no
/// corridor and yields nothing.
pub fn nearby_cameras<'a>(
    cameras: &'a [Camera],
    route: &[LatLng],
    max_distance: f64,
) -> Vec<&'a Camera> {
    let mut hits: Vec<(usize, &Camera)> = cameras
        .par_iter()
        .filter_map(|camera| {
            let position = camera.position();
            (distance_to_polyline(position, route) <= max_distance)
                .then(|| (closest_vertex_index(position, route), camera))
        })
        .collect();

    // stable, so equal indices stay in roster order
    hits.sort_by_key(|&(idx, _)| idx);
    hits.into_iter().map(|(_, camera)| camera).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(id: &str, lat: f64, lng: f64) -> Camera {
        Camera {
            id: id.to_string(),
            name: format!("KOTA - {id}"),
            lat,
            lng,
            stream_url: format!("https://example.test/{id}.m3u8"),
            region: None,
        }
    }

    // east along -6.90, then south along 107.62
    fn route() -> Vec<LatLng> {
        vec![
            LatLng::new(-6.900, 107.600),
            LatLng::new(-6.900, 107.610),
            LatLng::new(-6.900, 107.620),
            LatLng::new(-6.910, 107.620),
            LatLng::new(-6.920, 107.620),
        ]
    }

    fn ids<'a>(cameras: &[&'a Camera]) -> Vec<&'a str> {
        cameras.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn orders_by_position_along_route() {
        let roster = vec![
            camera("end", -6.9195, 107.6201),
            camera("start", -6.9001, 107.6005),
            camera("far", -6.950, 107.650),
            camera("middle", -6.9002, 107.6150),
        ];
        let nearby = nearby_cameras(&roster, &route(), 50.0);
        assert_eq!(ids(&nearby), vec!["start", "middle", "end"]);
    }

    #[test]
    fn equal_vertex_keeps_roster_order() {
        let roster = vec![
            camera("b", -6.9001, 107.6101),
            camera("a", -6.8999, 107.6099),
        ];
        let nearby = nearby_cameras(&roster, &route(), 50.0);
        assert_eq!(ids(&nearby), vec!["b", "a"]);
    }

    #[test]
    fn zero_radius_keeps_only_cameras_on_the_route() {
        let roster = vec![
            camera("on-vertex", -6.900, 107.610),
            camera("off", -6.9005, 107.605),
        ];
        let nearby = nearby_cameras(&roster, &route(), 0.0);
        assert_eq!(ids(&nearby), vec!["on-vertex"]);
    }

    #[test]
    fn degenerate_route_has_no_corridor() {
        let roster = vec![camera("here", -6.900, 107.600)];
        assert!(nearby_cameras(&roster, &[], 1_000.0).is_empty());
        assert!(nearby_cameras(&roster, &route()[..1], 1_000.0).is_empty());
    }

    #[test]
    fn closest_vertex_prefers_first_on_ties() {
        let route = [LatLng::new(0.0, 0.0), LatLng::new(0.0, 2.0)];
        let between = LatLng::new(0.0, 1.0);
        assert_eq!(closest_vertex_index(between, &route), 0);
        assert_eq!(closest_vertex_index(LatLng::new(0.0, 1.5), &route), 1);
        assert_eq!(closest_vertex_index(between, &[]), 0);
    }

    #[test]
    fn roster_is_left_untouched() {
        let roster = vec![
            camera("late", -6.9199, 107.6200),
            camera("early", -6.9000, 107.6001),
        ];
        let before = roster.clone();
        let nearby = nearby_cameras(&roster, &route(), 100.0);
        assert_eq!(ids(&nearby), vec!["early", "late"]);
        assert_eq!(roster, before);
    }
}
