//! The scene query contract the path tracer depends on.
//!
//! A scene answers one question: what is the nearest surface along a ray?
//! Surfaces come in three kinds. Opaque surfaces reflect sound. Transparent
//! markers are construction guides the tracer must look straight through.
//! Anything else ends the trace.

use aural_math::{Ray, Vec3};
use serde::{Deserialize, Serialize};

/// Smallest ray parameter a scene may report a hit at.
///
/// Hits must lie strictly ahead of the ray origin so that re-casting from a
/// hit point never finds the surface it just left.
pub const SURFACE_EPSILON: f64 = 1e-6;

/// What a struck surface is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    /// A physical surface that reflects.
    Opaque,
    /// A non-physical guide rays pass through.
    #[serde(alias = "marker")]
    TransparentMarker,
    /// Any other scene entity; the tracer cannot continue through it.
    Other,
}

/// Borrowed view of the surface a ray struck.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHandle<'a> {
    kind: SurfaceKind,
    normal: Vec3,
    group_name: &'a str,
}

impl<'a> SurfaceHandle<'a> {
    /// An opaque surface. `normal` must be unit length.
    pub fn opaque(normal: Vec3, group_name: &'a str) -> Self {
        Self {
            kind: SurfaceKind::Opaque,
            normal,
            group_name,
        }
    }

    pub fn transparent_marker(group_name: &'a str) -> Self {
        Self {
            kind: SurfaceKind::TransparentMarker,
            normal: Vec3::ZERO,
            group_name,
        }
    }

    pub fn other(group_name: &'a str) -> Self {
        Self {
            kind: SurfaceKind::Other,
            normal: Vec3::ZERO,
            group_name,
        }
    }

    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    /// Unit surface normal; only opaque surfaces have one.
    pub fn normal(&self) -> Option<Vec3> {
        match self.kind {
            SurfaceKind::Opaque => Some(self.normal),
            _ => None,
        }
    }

    /// Name of the surface group, used for material lookup.
    pub fn group_name(&self) -> &'a str {
        self.group_name
    }
}

/// The nearest hit along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneHit<'a> {
    pub point: Vec3,
    pub surface: SurfaceHandle<'a>,
}

/// Read-only scene geometry the tracer casts rays against.
///
/// Implementations are shared by every tracing worker, so they must be
/// `Send + Sync` and must not change during a simulation run.
pub trait Scene: Send + Sync {
    /// Nearest surface hit along `ray` with ray parameter greater than
    /// [`SURFACE_EPSILON`], or `None` if the ray leaves the scene.
    fn cast_ray(&self, ray: &Ray) -> Option<SceneHit<'_>>;
}
