use std::ops::Range;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::CongestionLevel;
use crate::{ASSUMED_URBAN_SPEED_KMH, LatLng, geodesy::path_length};

/// Contiguous stretch of the route sharing one usable congestion label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSegment {
    pub coordinates: Vec<LatLng>,
    pub congestion: CongestionLevel,
    pub color: String,
    /// Meters along the segment's vertices
    pub distance: f64,
    /// Seconds at the assumed urban speed
    pub duration: f64,
}

impl TrafficSegment {
    fn new(coordinates: Vec<LatLng>, congestion: CongestionLevel) -> Self {
        let distance = path_length(&coordinates);
        let speed_mps = ASSUMED_URBAN_SPEED_KMH * 1000.0 / 3600.0;
        Self {
            coordinates,
            congestion,
            color: congestion.color().to_string(),
            distance,
            duration: distance / speed_mps,
        }
    }
}

/// Splits `0..len` into maximal runs of equal labels.
///
/// Positions past the end of `labels` count as `None`. The runs partition
/// `0..len` in order.
pub fn label_runs(
    labels: &[Option<CongestionLevel>],
    len: usize,
) -> Vec<(Option<CongestionLevel>, Range<usize>)> {
    let runs = (0..len).chunk_by(|&i| labels.get(i).copied().flatten());

    let mut out = Vec::new();
    let mut start = 0;
    for (label, run) in &runs {
        let end = start + run.count();
        out.push((label, start..end));
        start = end;
    }
    out
}

/// Groups per-vertex labels into colored segments.
///
/// Runs labelled `None` or `unknown` are dropped. Segments do not share
/// their boundary vertices. A route with fewer than two vertices yields no
/// segments.
pub fn build_segments(route: &[LatLng], labels: &[Option<CongestionLevel>]) -> Vec<TrafficSegment> {
    if route.len() < 2 {
        return Vec::new();
    }

    label_runs(labels, route.len())
        .into_iter()
        .filter_map(|(label, range)| {
            let level = label.filter(|l| l.is_usable())?;
            Some(TrafficSegment::new(route[range].to_vec(), level))
        })
        .collect()
}
