//! JSON room descriptions.
//!
//! A room file lists materials, the layers (surface groups) that use them,
//! the room's polygons, and the source and receiver. Loading validates
//! everything up front so tracing never meets a half-built room.
//!
//! ```json
//! {
//!   "name": "shoebox",
//!   "length_unit": "inches",
//!   "materials": [ { "name": "Concrete", "code": 1,
//!                    "absorption": [0.01, 0.01, 0.02, 0.02, 0.02, 0.03, 0.03] } ],
//!   "layers": [ { "name": "walls", "material": "Concrete" } ],
//!   "surfaces": [ { "layer": "walls", "vertices": [[0,0,0], [100,0,0], [100,0,100]] } ],
//!   "source": { "name": "speaker", "position": [20, 20, 20] },
//!   "receiver": { "name": "mic", "position": [80, 60, 40], "radius": 6 }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use aural_math::Vec3;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    AcousticError, LengthUnit, Layer, Material, Polygon, PolygonScene, Receiver, Room, Source,
    SurfaceKind,
};

/// Errors that can occur while loading a room file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Acoustic(#[from] AcousticError),

    #[error("Layer '{layer}' references unknown material '{material}'")]
    UnknownMaterial { layer: String, material: String },

    #[error("Surface {index} references unknown layer '{layer}'")]
    UnknownLayer { index: usize, layer: String },

    #[error("Surface {index} is opaque but has no layer")]
    MissingLayer { index: usize },
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// A fully built room: catalog, geometry and endpoints.
#[derive(Clone, Debug)]
pub struct RoomModel {
    pub name: String,
    pub length_unit: LengthUnit,
    pub room: Room,
    pub scene: PolygonScene,
    pub source: Source,
    pub receiver: Receiver,
}

#[derive(Debug, Deserialize)]
struct RoomDescription {
    name: String,
    #[serde(default)]
    length_unit: LengthUnit,
    #[serde(default)]
    materials: Vec<Material>,
    #[serde(default)]
    layers: Vec<LayerDescription>,
    #[serde(default)]
    surfaces: Vec<SurfaceDescription>,
    source: SourceDescription,
    receiver: ReceiverDescription,
}

#[derive(Debug, Deserialize)]
struct LayerDescription {
    name: String,
    material: String,
}

#[derive(Debug, Deserialize)]
struct SurfaceDescription {
    #[serde(default)]
    layer: Option<String>,
    #[serde(default = "default_kind")]
    kind: SurfaceKind,
    vertices: Vec<[f64; 3]>,
}

#[derive(Debug, Deserialize)]
struct SourceDescription {
    name: String,
    position: [f64; 3],
    #[serde(default = "default_strength")]
    strength: f64,
}

#[derive(Debug, Deserialize)]
struct ReceiverDescription {
    name: String,
    position: [f64; 3],
    radius: f64,
}

fn default_kind() -> SurfaceKind {
    SurfaceKind::Opaque
}

fn default_strength() -> f64 {
    1.0
}

/// Load a room description from a JSON file.
pub fn load_room_json<P: AsRef<Path>>(path: P) -> LoadResult<RoomModel> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let model = load_room_from_string(&content)?;
    log::info!(
        "Loaded room '{}' from {}: {} surfaces, {} layers",
        model.name,
        path.display(),
        model.scene.len(),
        model.room.len()
    );
    Ok(model)
}

/// Load a room description from a JSON string.
pub fn load_room_from_string(content: &str) -> LoadResult<RoomModel> {
    let description: RoomDescription = serde_json::from_str(content)?;
    description.build()
}

impl RoomDescription {
    fn build(self) -> LoadResult<RoomModel> {
        let mut materials = HashMap::new();
        for material in self.materials {
            material.validate()?;
            if materials.contains_key(&material.name) {
                log::warn!("Material '{}' defined twice; keeping the first", material.name);
                continue;
            }
            materials.insert(material.name.clone(), Arc::new(material));
        }

        let mut room = Room::new(self.name.clone());
        for layer in self.layers {
            let material = materials.get(&layer.material).ok_or_else(|| LoadError::UnknownMaterial {
                layer: layer.name.clone(),
                material: layer.material.clone(),
            })?;
            room.add_layer(Layer::new(layer.name, Arc::clone(material)));
        }

        let mut scene = PolygonScene::new();
        for (index, surface) in self.surfaces.into_iter().enumerate() {
            let group = match (surface.kind, surface.layer) {
                (SurfaceKind::Opaque, None) => return Err(LoadError::MissingLayer { index }),
                (SurfaceKind::Opaque, Some(layer)) => {
                    if room.layer(&layer).is_none() {
                        return Err(LoadError::UnknownLayer { index, layer });
                    }
                    layer
                }
                (_, layer) => layer.unwrap_or_default(),
            };
            let vertices = surface.vertices.into_iter().map(Vec3::from_array).collect();
            scene.add(Polygon::new(vertices, surface.kind, group)?);
        }

        if scene.is_empty() {
            log::warn!("Room '{}' has no surfaces; every ray escapes", self.name);
        }

        let source = Source::new(
            self.source.name,
            Vec3::from_array(self.source.position),
            self.source.strength,
        );
        let receiver = Receiver::new(
            self.receiver.name,
            Vec3::from_array(self.receiver.position),
            self.receiver.radius,
        )?;

        Ok(RoomModel {
            name: self.name,
            length_unit: self.length_unit,
            room,
            scene,
            source,
            receiver,
        })
    }
}
