//! Nearest-vertex alignment of congestion labels onto the base route.
//!
//! Both sides are scanned exhaustively, O(route × traffic). At route scale
//! (hundreds of vertices) this is well under a millisecond. Swapping in a
//! spatial index must keep the first-match tie-break below.

use log::{debug, warn};

use super::CongestionLevel;
use crate::{
    LatLng,
    geodesy::haversine_distance,
    polyline::{self, Precision},
    upstream::DirectionsResponse,
};

/// Labels every route vertex with the congestion of its nearest traffic vertex.
///
/// `labels[i]` describes the traffic stretch starting at `traffic[i]`, so the
/// list is one shorter than `traffic`; the last label is reused for the
/// final vertex. Ties go to the lowest traffic index. A route vertex whose
/// nearest traffic vertex is farther than `max_match_distance` meters gets
/// `None`.
pub fn match_labels(
    route: &[LatLng],
    traffic: &[LatLng],
    labels: &[CongestionLevel],
    max_match_distance: f64,
) -> Vec<Option<CongestionLevel>> {
    if traffic.is_empty() || labels.is_empty() {
        return vec![None; route.len()];
    }

    let mut too_far = 0usize;
    let mapped: Vec<_> = route
        .iter()
        .map(|&vertex| {
            let mut min_distance = f64::INFINITY;
            let mut closest = 0;
            for (i, &candidate) in traffic.iter().enumerate() {
                let distance = haversine_distance(vertex, candidate);
                if distance < min_distance {
                    min_distance = distance;
                    closest = i;
                }
            }

            if min_distance <= max_match_distance {
                Some(labels[closest.min(labels.len() - 1)])
            } else {
                too_far += 1;
                None
            }
        })
        .collect();

    debug!(
        "Matched {} of {} route vertices to traffic data ({} too far)",
        route.len() - too_far,
        route.len(),
        too_far
    );

    mapped
}

/// Aligns the congestion annotation of a traffic directions response onto
/// the base route.
///
/// A missing response, route, leg or annotation yields an all-`None`
/// sequence, as does an undecodable traffic geometry: the overlay is
/// best-effort and never fails the route.
pub fn map_congestion(
    route: &[LatLng],
    traffic: Option<&DirectionsResponse>,
    max_match_distance: f64,
) -> Vec<Option<CongestionLevel>> {
    let Some((geometry, labels)) = traffic.and_then(DirectionsResponse::congestion) else {
        return vec![None; route.len()];
    };

    let traffic_coords: Vec<LatLng> = match polyline::decode(geometry, Precision::Six) {
        Ok(coords) => coords.into_iter().map(LatLng::from).collect(),
        Err(e) => {
            warn!("Discarding traffic overlay: {e}");
            return vec![None; route.len()];
        }
    };

    match_labels(route, &traffic_coords, labels, max_match_distance)
}
