//! Traffic overlay: congestion labels from a separately sourced geometry,
//! aligned onto the routing engine's vertices and grouped into segments.

mod congestion;
mod mapper;
mod segments;

pub use congestion::CongestionLevel;
pub use mapper::{map_congestion, match_labels};
pub use segments::{TrafficSegment, build_segments, label_runs};
