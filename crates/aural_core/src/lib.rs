//! aural core - the acoustic room model.
//!
//! This crate provides:
//!
//! - **Acoustic data**: `Material`, `OctaveBand`, `Layer`, and the `Room`
//!   material catalog
//! - **Endpoints**: the omnidirectional `Source` and the spherical `Receiver`
//! - **Scene queries**: the `Scene` trait the tracer casts rays against, and
//!   `PolygonScene`, a plain polygon-soup implementation of it
//! - **Room files**: JSON room descriptions loaded into a `RoomModel`
//!
//! # Example
//!
//! ```ignore
//! use aural_core::load_room_json;
//!
//! let model = load_room_json("rooms/shoebox.json")?;
//! println!("{} surfaces, {} layers", model.scene.len(), model.room.len());
//! ```

pub mod catalog;
pub mod error;
pub mod loader;
pub mod material;
pub mod polygon;
pub mod receiver;
pub mod scene;
pub mod source;
pub mod units;

pub use catalog::{Layer, MaterialCatalog, Room};
pub use error::{AcousticError, AcousticResult};
pub use loader::{load_room_from_string, load_room_json, LoadError, LoadResult, RoomModel};
pub use material::{Material, OctaveBand};
pub use polygon::{Polygon, PolygonScene};
pub use receiver::{Receiver, ReceiverRoots};
pub use scene::{Scene, SceneHit, SurfaceHandle, SurfaceKind, SURFACE_EPSILON};
pub use source::{SamplingStrategy, Source};
pub use units::LengthUnit;

/// Re-export the math types used in this crate's public API.
pub use aural_math::{Ray, Vec3};
