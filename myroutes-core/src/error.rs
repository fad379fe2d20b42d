use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed polyline: {0}")]
    PolylineDecoding(String),
    #[error("Routing engine error: {0}")]
    UpstreamRouting(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("GeoJSON error: {0}")]
    GeoJson(String),
}
