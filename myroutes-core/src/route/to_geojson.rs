use geo::{Coord, LineString};
use geojson::{Feature, FeatureCollection, Geometry, GeometryValue};
use serde_json::json;

use super::RoutePayload;
use crate::{Error, LatLng, traffic::TrafficSegment};

impl RoutePayload {
    /// Converts the route and its traffic overlay to a `GeoJSON`
    /// `FeatureCollection`.
    ///
    /// The first feature is the whole route; each traffic segment with at
    /// least two vertices follows as its own line.
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let mut features = vec![self.route_feature()?];

        if let Some(segments) = &self.traffic_segments {
            for (idx, segment) in segments.iter().enumerate() {
                // a single vertex is not a valid LineString
                if segment.coordinates.len() < 2 {
                    continue;
                }
                features.push(create_segment_feature(idx, segment)?);
            }
        }

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::GeoJson(e.to_string()))
    }

    fn route_feature(&self) -> Result<Feature, Error> {
        let value = json!({
            "type": "Feature",
            "geometry": line_geometry(&self.coordinates),
            "properties": {
                "kind": "route",
                "distance": self.summary.distance.meters,
                "duration": self.summary.duration.seconds,
                "distance_text": self.summary.distance.text,
                "duration_text": self.summary.duration.text,
            }
        });

        serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJson(e.to_string()))
    }
}

fn create_segment_feature(idx: usize, segment: &TrafficSegment) -> Result<Feature, Error> {
    let value = json!({
        "type": "Feature",
        "geometry": line_geometry(&segment.coordinates),
        "properties": {
            "kind": "traffic",
            "segment_index": idx,
            "congestion": segment.congestion,
            "color": segment.color,
            "distance": segment.distance,
            "duration": segment.duration,
        }
    });

    serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJson(e.to_string()))
}

fn line_geometry(coordinates: &[LatLng]) -> Geometry {
    let line: LineString<f64> = coordinates.iter().map(|&p| Coord::from(p)).collect();
    Geometry::new(GeometryValue::from(&line))
}
