//! End-to-end checks over the route, traffic and camera pipeline

use myroutes_core::prelude::*;
use myroutes_core::traffic::label_runs;
use serde_json::json;

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

// A gently winding route through central Bandung
fn bandung_route() -> Vec<LatLng> {
    (0..40)
        .map(|i| {
            let t = f64::from(i);
            LatLng::new(-6.900 - t * 0.0005, 107.600 + t * 0.0007 + (t * 0.3).sin() * 0.0002)
        })
        .collect()
}

fn routing_response(route: &[LatLng]) -> RoutingResponse {
    let coords: Vec<_> = route.iter().map(|&p| geo::Coord::from(p)).collect();
    serde_json::from_value(json!({
        "code": "Ok",
        "routes": [{
            "geometry": encode(&coords, Precision::Five).unwrap(),
            "distance": 3400.0,
            "duration": 540.0,
            "legs": [
                {"steps": [
                    {"distance": 1700.0, "duration": 270.0, "maneuver": {"type": "depart"}},
                    {"distance": 0.0, "duration": 0.0, "maneuver": {"type": "arrive"}}
                ]},
                {"steps": [
                    {"distance": 1700.0, "duration": 270.0, "maneuver": {"type": "new name", "modifier": "slight left"}},
                    {"distance": 0.0, "duration": 0.0, "maneuver": {"type": "arrive"}}
                ]}
            ]
        }]
    }))
    .unwrap()
}

fn traffic_response(route: &[LatLng], labels: &[&str]) -> DirectionsResponse {
    let coords: Vec<_> = route.iter().map(|&p| geo::Coord::from(p)).collect();
    serde_json::from_value(json!({
        "code": "Ok",
        "routes": [{
            "geometry": encode(&coords, Precision::Six).unwrap(),
            "legs": [{"annotation": {"congestion": labels}}]
        }]
    }))
    .unwrap()
}

#[test]
fn point_distance_is_symmetric_and_zero_only_for_equal_points() {
    let route = bandung_route();
    for pair in route.windows(2) {
        let ab = haversine_distance(pair[0], pair[1]);
        let ba = haversine_distance(pair[1], pair[0]);
        assert!(approx_eq(ab, ba, 1e-9));
        assert!(ab > 0.0);
        assert_eq!(haversine_distance(pair[0], pair[0]), 0.0);
    }
}

#[test]
fn labels_beyond_match_distance_are_absent() {
    let route = bandung_route();
    // traffic geometry shifted 0.003 degrees south, never within 200 m
    let shifted: Vec<_> = route
        .iter()
        .map(|p| LatLng::new(p.lat - 0.003, p.lng))
        .collect();
    let labels = vec![CongestionLevel::Heavy; shifted.len() - 1];

    let mapped = match_labels(&route, &shifted, &labels, MAX_MATCH_DISTANCE_METERS);
    assert_eq!(mapped.len(), route.len());
    assert!(mapped.iter().all(Option::is_none));

    // the same labels on top of the route all match
    let mapped = match_labels(&route, &route, &labels, MAX_MATCH_DISTANCE_METERS);
    assert!(mapped.iter().all(|l| *l == Some(CongestionLevel::Heavy)));
}

#[test]
fn segments_never_carry_unknown_and_runs_cover_the_route() {
    let route = bandung_route();
    let pattern = [
        Some(CongestionLevel::Low),
        None,
        Some(CongestionLevel::Unknown),
        Some(CongestionLevel::Moderate),
        Some(CongestionLevel::Severe),
    ];
    let labels: Vec<_> = (0..route.len()).map(|i| pattern[(i / 3) % pattern.len()]).collect();

    let runs = label_runs(&labels, route.len());
    let covered: usize = runs.iter().map(|(_, range)| range.len()).sum();
    assert_eq!(covered, route.len());
    for pair in runs.windows(2) {
        assert_eq!(pair[0].1.end, pair[1].1.start);
        assert_ne!(pair[0].0, pair[1].0);
    }

    let segments = build_segments(&route, &labels);
    assert!(!segments.is_empty());
    for segment in &segments {
        assert!(segment.congestion.is_usable());
        assert_eq!(segment.color, segment.congestion.color());
        assert!(!segment.coordinates.is_empty());
    }

    let usable_vertices: usize = labels
        .iter()
        .filter(|l| l.is_some_and(|l| l.is_usable()))
        .count();
    let segment_vertices: usize = segments.iter().map(|s| s.coordinates.len()).sum();
    assert_eq!(segment_vertices, usable_vertices);
}

#[test]
fn segment_duration_follows_assumed_speed() {
    let route = bandung_route();
    let labels = vec![Some(CongestionLevel::Moderate); route.len()];
    let segments = build_segments(&route, &labels);
    assert_eq!(segments.len(), 1);

    let segment = &segments[0];
    let speed = ASSUMED_URBAN_SPEED_KMH / 3.6;
    assert!(approx_eq(segment.duration, segment.distance / speed, 1e-9));
    assert!(segment.distance > 3_000.0 && segment.distance < 4_500.0);
}

#[test]
fn formatting_is_idempotent() {
    let route = bandung_route();
    let labels: Vec<_> = (0..route.len() - 1)
        .map(|i| if i < 20 { "heavy" } else { "low" })
        .collect();
    let routing = routing_response(&route);
    let traffic = traffic_response(&route, &labels);
    let origin = route[0];
    let destination = route[route.len() - 1];

    let formatter = RouteFormatter::default();
    let first = formatter
        .format_with_traffic(&routing, Some(&traffic), origin, destination)
        .unwrap();
    let second = formatter
        .format_with_traffic(&routing, Some(&traffic), origin, destination)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn severe_then_low_overlay_end_to_end() {
    let route = vec![
        LatLng::new(-6.9000, 107.6000),
        LatLng::new(-6.9000, 107.6010),
        LatLng::new(-6.9000, 107.6020),
    ];
    let payload = RouteFormatter::default()
        .format_with_traffic(
            &routing_response(&route),
            Some(&traffic_response(&route, &["severe", "low"])),
            route[0],
            route[2],
        )
        .unwrap();

    let segments = payload.traffic_segments.unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].congestion, CongestionLevel::Severe);
    assert_eq!(segments[0].coordinates, vec![route[0]]);
    assert_eq!(segments[0].color, "#ef4444");
    assert_eq!(segments[1].congestion, CongestionLevel::Low);
    assert_eq!(segments[1].coordinates, vec![route[1], route[2]]);

    // steps of both legs, in order
    let instructions: Vec<_> = payload.steps.iter().map(|s| s.instruction.as_str()).collect();
    assert_eq!(
        instructions,
        vec![
            "Start your journey",
            "Arrive at your destination",
            "Turn slight left",
            "Arrive at your destination"
        ]
    );
}

#[test]
fn corridor_grows_with_radius() {
    let route = bandung_route();
    let roster = CameraRoster::new(
        (0..30)
            .map(|i| {
                let t = f64::from(i);
                Camera {
                    id: format!("cam-{i}"),
                    name: format!("KOTA - Test {i}"),
                    lat: -6.905 - t * 0.0004 + (t * 0.7).cos() * 0.002,
                    lng: 107.603 + t * 0.0006,
                    stream_url: String::new(),
                    region: None,
                }
            })
            .collect(),
    );

    let mut previous: Vec<String> = Vec::new();
    for radius in [0.0, 25.0, 50.0, 100.0, 200.0, 400.0, 10_000.0] {
        let ids: Vec<String> = roster
            .nearby(&route, radius)
            .into_iter()
            .map(|c| c.id.clone())
            .collect();
        assert!(previous.iter().all(|id| ids.contains(id)), "radius {radius}");
        previous = ids;
    }
    assert_eq!(previous.len(), roster.len());
}

#[test]
fn zero_radius_corridor_keeps_cameras_on_vertices() {
    let route = bandung_route();
    let roster = CameraRoster::new(vec![
        Camera {
            id: "on".to_string(),
            name: "KOTA - On".to_string(),
            lat: route[5].lat,
            lng: route[5].lng,
            stream_url: String::new(),
            region: None,
        },
        Camera {
            id: "off".to_string(),
            name: "KOTA - Off".to_string(),
            lat: route[5].lat + 0.001,
            lng: route[5].lng,
            stream_url: String::new(),
            region: None,
        },
    ]);

    let ids: Vec<_> = roster
        .nearby(&route, 0.0)
        .into_iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(ids, vec!["on"]);
}
