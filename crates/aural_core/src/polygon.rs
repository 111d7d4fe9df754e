//! Polygon-soup scene.
//!
//! Rooms are described as planar convex polygons. Each polygon is split into
//! a triangle fan and intersected with the Möller-Trumbore algorithm. This is
//! the scene used by room files and tests; a host with its own geometry
//! engine implements [`Scene`] directly instead.

use aural_math::{Aabb, Interval, Ray, Vec3};

use crate::{AcousticError, AcousticResult, Scene, SceneHit, SurfaceHandle, SurfaceKind, SURFACE_EPSILON};

/// A planar convex polygon belonging to a named surface group.
#[derive(Clone, Debug)]
pub struct Polygon {
    /// Vertices, in winding order
    vertices: Vec<Vec3>,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    kind: SurfaceKind,
    /// Surface group (layer) name
    group: String,
    bbox: Aabb,
}

impl Polygon {
    /// Create a polygon from at least three vertices.
    ///
    /// The normal is taken from the first three vertices, which must not be
    /// collinear.
    pub fn new(vertices: Vec<Vec3>, kind: SurfaceKind, group: impl Into<String>) -> AcousticResult<Self> {
        let group = group.into();
        if vertices.len() < 3 {
            return Err(AcousticError::InvalidConfiguration(format!(
                "polygon in group '{group}' has {} vertices; at least 3 are required",
                vertices.len()
            )));
        }

        let edge1 = vertices[1] - vertices[0];
        let edge2 = vertices[2] - vertices[0];
        let cross = edge1.cross(edge2);
        if cross.length_squared() < 1e-18 {
            return Err(AcousticError::InvalidConfiguration(format!(
                "polygon in group '{group}' is degenerate (first three vertices are collinear)"
            )));
        }

        let bbox = Aabb::enclosing(&vertices);
        Ok(Self {
            vertices,
            normal: cross.normalize(),
            kind,
            group,
            bbox,
        })
    }

    /// Convenience constructor for an opaque polygon.
    pub fn opaque(vertices: Vec<Vec3>, group: impl Into<String>) -> AcousticResult<Self> {
        Self::new(vertices, SurfaceKind::Opaque, group)
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Ray parameter of the hit within `ray_t`, if any.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<f64> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }

        let v0 = self.vertices[0];
        self.vertices
            .windows(2)
            .skip(1)
            .find_map(|pair| hit_triangle(ray, v0, pair[0], pair[1], ray_t))
    }

    fn handle(&self) -> SurfaceHandle<'_> {
        match self.kind {
            SurfaceKind::Opaque => SurfaceHandle::opaque(self.normal, &self.group),
            SurfaceKind::TransparentMarker => SurfaceHandle::transparent_marker(&self.group),
            SurfaceKind::Other => SurfaceHandle::other(&self.group),
        }
    }
}

/// Möller-Trumbore ray-triangle intersection.
fn hit_triangle(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3, ray_t: Interval) -> Option<f64> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction().cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < 1e-12 {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin() - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction().dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    ray_t.contains(t).then_some(t)
}

/// A list of polygons answering nearest-hit queries.
#[derive(Clone, Debug)]
pub struct PolygonScene {
    polygons: Vec<Polygon>,
    bounds: Aabb,
}

impl PolygonScene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            polygons: Vec::new(),
            bounds: Aabb::EMPTY,
        }
    }

    /// Add a polygon to the scene.
    pub fn add(&mut self, polygon: Polygon) {
        self.bounds = Aabb::surrounding(&self.bounds, &polygon.bounding_box());
        self.polygons.push(polygon);
    }

    /// Get the number of polygons.
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Bounding box of every polygon in the scene.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }
}

impl Default for PolygonScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for PolygonScene {
    fn cast_ray(&self, ray: &Ray) -> Option<SceneHit<'_>> {
        let mut closest: Option<(f64, &Polygon)> = None;
        let mut closest_so_far = f64::INFINITY;

        for polygon in &self.polygons {
            let interval = Interval::new(SURFACE_EPSILON, closest_so_far);
            if let Some(t) = polygon.hit(ray, interval) {
                closest_so_far = t;
                closest = Some((t, polygon));
            }
        }

        closest.map(|(t, polygon)| SceneHit {
            point: ray.at(t),
            surface: polygon.handle(),
        })
    }
}
