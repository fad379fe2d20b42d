//! HTTP service around `myroutes_core`: route planning with a traffic
//! overlay, the camera roster, geocoding and camera stream proxying.

pub mod api;
pub mod config;
mod error;
pub mod planner;
pub mod stream;
pub mod upstream;

pub use api::{AppState, build_router};
pub use config::ServerConfig;
pub use error::ApiError;
