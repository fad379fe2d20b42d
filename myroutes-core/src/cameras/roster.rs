use std::path::Path;

use hashbrown::{HashMap, HashSet, hash_map::Entry};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::de::{deserialize_coordinate, deserialize_nullable_string};
use crate::{Error, LatLng, cameras::nearby_cameras};

/// Fixed traffic camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub id: String,
    #[serde(alias = "cctv_name")]
    pub name: String,
    #[serde(deserialize_with = "deserialize_coordinate")]
    pub lat: f64,
    #[serde(deserialize_with = "deserialize_coordinate")]
    pub lng: f64,
    #[serde(
        default,
        alias = "stream_cctv",
        deserialize_with = "deserialize_nullable_string"
    )]
    pub stream_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl Camera {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

/// A named place with one or more cameras, addressable by slug
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CameraLocation {
    pub key: String,
    pub slug: String,
    /// Name of the first camera at this location
    pub name: String,
}

/// Read-only camera reference data, loaded once and shared by all requests
#[derive(Debug, Clone, Default)]
pub struct CameraRoster {
    cameras: Vec<Camera>,
    by_id: HashMap<String, usize>,
}

impl CameraRoster {
    /// Builds the roster. With duplicate ids the first camera wins the id
    /// lookup; all cameras stay in the list.
    pub fn new(cameras: Vec<Camera>) -> Self {
        let mut by_id = HashMap::with_capacity(cameras.len());
        for (idx, camera) in cameras.iter().enumerate() {
            match by_id.entry(camera.id.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(idx);
                }
                Entry::Occupied(_) => warn!("Duplicate camera id '{}'", camera.id),
            }
        }
        Self { cameras, by_id }
    }

    /// Loads a roster from a JSON array file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let bytes = std::fs::read(path).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("Failed to read camera roster '{}': {e}", path.display()),
            )
        })?;
        let roster = Self::from_json_slice(&bytes)?;
        info!("Loaded {} cameras from {}", roster.len(), path.display());
        Ok(roster)
    }

    /// Parses a JSON array of camera records. Records that do not describe a
    /// camera with usable coordinates are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the input is not a JSON array.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, Error> {
        let records: Vec<serde_json::Value> = serde_json::from_slice(bytes)?;
        let total = records.len();

        let cameras: Vec<Camera> = records
            .into_iter()
            .enumerate()
            .filter_map(|(idx, record)| match serde_json::from_value(record) {
                Ok(camera) => Some(camera),
                Err(e) => {
                    warn!("Skipping camera record {idx}: {e}");
                    None
                }
            })
            .collect();

        if cameras.len() < total {
            warn!("{} of {total} camera records skipped", total - cameras.len());
        }

        Ok(Self::new(cameras))
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Camera> {
        self.by_id.get(id).map(|&idx| &self.cameras[idx])
    }

    /// Cameras within `max_distance` meters of the route, in route order
    pub fn nearby(&self, route: &[LatLng], max_distance: f64) -> Vec<&Camera> {
        nearby_cameras(&self.cameras, route, max_distance)
    }

    /// Unique camera locations in roster order
    pub fn locations(&self) -> Vec<CameraLocation> {
        let mut seen = HashSet::new();
        self.cameras
            .iter()
            .filter_map(|camera| {
                let key = location_key(&camera.name);
                let slug = slugify(&key);
                seen.insert(slug.clone()).then(|| CameraLocation {
                    key,
                    slug,
                    name: camera.name.clone(),
                })
            })
            .collect()
    }

    /// The location with this slug and every camera whose name mentions it
    pub fn cameras_at(&self, slug: &str) -> Option<(CameraLocation, Vec<&Camera>)> {
        let location = self
            .locations()
            .into_iter()
            .find(|location| location.slug == slug)?;

        let needle = location.key.to_lowercase();
        let cameras = self
            .cameras
            .iter()
            .filter(|camera| camera.name.to_lowercase().contains(&needle))
            .collect();

        Some((location, cameras))
    }
}

/// Place part of a camera name: `"KOTA - Dago - Arah Utara"` → `"Dago"`
pub fn location_key(name: &str) -> String {
    let name = name.replacen("KOTA - ", "", 1);
    name.split(" - ").next().unwrap_or_default().trim().to_string()
}

/// URL slug: lower case, whitespace runs become `-`, anything other than
/// ASCII alphanumerics, `_` and `-` is dropped.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut in_whitespace = false;

    for c in text.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            slug.push(c);
        }
    }

    slug
}
