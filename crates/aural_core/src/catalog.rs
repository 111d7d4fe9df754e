//! Layers and the material catalog.
//!
//! Surfaces in a scene are grouped by name. A `Layer` binds one of those
//! group names to a `Material`; a `MaterialCatalog` resolves group names to
//! layers while tracing.

use std::sync::Arc;

use crate::Material;

/// A named surface group and the material it is made of.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Group name as reported by the scene
    pub name: String,

    /// Shared material definition
    pub material: Arc<Material>,
}

impl Layer {
    pub fn new(name: impl Into<String>, material: Arc<Material>) -> Self {
        Self {
            name: name.into(),
            material,
        }
    }
}

/// Resolves a surface group name to its layer.
///
/// Implementations are read concurrently by every tracing worker and must
/// not change for the duration of a simulation run.
pub trait MaterialCatalog: Send + Sync {
    /// Look up the layer registered for `group_name`, if any.
    fn lookup(&self, group_name: &str) -> Option<Arc<Layer>>;
}

/// The default catalog: an ordered list of layers, first match wins.
#[derive(Clone, Debug, Default)]
pub struct Room {
    /// Room name (usually from the room file)
    pub name: String,

    layers: Vec<Arc<Layer>>,
}

impl Room {
    /// Create an empty room.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layers: Vec::new(),
        }
    }

    /// Register a layer and return the shared handle to it.
    pub fn add_layer(&mut self, layer: Layer) -> Arc<Layer> {
        let layer = Arc::new(layer);
        self.layers.push(Arc::clone(&layer));
        layer
    }

    /// Get a layer by group name.
    pub fn layer(&self, name: &str) -> Option<&Arc<Layer>> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Get layer count.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Iterate over the registered layers in registration order.
    pub fn layers(&self) -> impl Iterator<Item = &Arc<Layer>> {
        self.layers.iter()
    }
}

impl MaterialCatalog for Room {
    fn lookup(&self, group_name: &str) -> Option<Arc<Layer>> {
        self.layer(group_name).cloned()
    }
}
