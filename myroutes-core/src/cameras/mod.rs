//! Traffic camera roster and route-corridor filtering.

mod corridor;
mod de;
mod roster;

pub use corridor::{closest_vertex_index, nearby_cameras};
pub use roster::{Camera, CameraLocation, CameraRoster, location_key, slugify};
