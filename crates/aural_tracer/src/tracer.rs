//! The specular reflection path tracer.

use std::fmt;

use aural_core::{MaterialCatalog, Receiver, Scene, SceneHit, Source, SurfaceKind};
use aural_math::{reflect, Ray};
use log::{debug, info};
use rayon::prelude::*;

use crate::batch::{plan_round, run_batch};
use crate::{Intersection, Raypath, ReceiverTest, TargetKind, TraceConfig, TraceError, TraceResult};

/// Why a single ray did not become a raypath.
///
/// These are ordinary outcomes of random sampling. Callers of
/// [`PathTracer::find_paths`] never see them; they only show up in
/// [`SamplingStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFailure {
    /// Bounced `max_order` times without reaching the receiver
    MaxOrder,
    /// Left the scene without hitting anything
    Escaped,
    /// Struck a surface that is neither opaque nor a transparent marker
    UnsupportedSurface,
    /// Struck an opaque surface whose group has no layer in the catalog
    UnknownLayer,
    /// Passed through more transparent markers than allowed on one segment
    MarkerSkipLimit,
}

impl fmt::Display for TraceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TraceFailure::MaxOrder => "maximum reflection order reached",
            TraceFailure::Escaped => "ray left the scene",
            TraceFailure::UnsupportedSurface => "unsupported surface kind",
            TraceFailure::UnknownLayer => "surface group has no layer",
            TraceFailure::MarkerSkipLimit => "too many transparent markers",
        };
        f.write_str(text)
    }
}

/// Attempt and failure counts for a sampling run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplingStats {
    pub attempts: u64,
    pub successes: u64,
    pub max_order: u64,
    pub escaped: u64,
    pub unsupported_surface: u64,
    pub unknown_layer: u64,
    pub marker_skip_limit: u64,
}

impl SamplingStats {
    /// Count one traced ray.
    pub fn record(&mut self, outcome: &Result<Raypath, TraceFailure>) {
        self.attempts += 1;
        match outcome {
            Ok(_) => self.successes += 1,
            Err(TraceFailure::MaxOrder) => self.max_order += 1,
            Err(TraceFailure::Escaped) => self.escaped += 1,
            Err(TraceFailure::UnsupportedSurface) => self.unsupported_surface += 1,
            Err(TraceFailure::UnknownLayer) => self.unknown_layer += 1,
            Err(TraceFailure::MarkerSkipLimit) => self.marker_skip_limit += 1,
        }
    }

    pub fn merge(&mut self, other: &SamplingStats) {
        self.attempts += other.attempts;
        self.successes += other.successes;
        self.max_order += other.max_order;
        self.escaped += other.escaped;
        self.unsupported_surface += other.unsupported_surface;
        self.unknown_layer += other.unknown_layer;
        self.marker_skip_limit += other.marker_skip_limit;
    }

    pub fn failures(&self) -> u64 {
        self.attempts - self.successes
    }
}

/// Paths found by a sampling run together with its statistics.
#[derive(Debug, Clone, Default)]
pub struct Sampling {
    pub paths: Vec<Raypath>,
    pub stats: SamplingStats,
}

/// Traces specular reflection paths from a source to a receiver.
///
/// The scene and catalog are borrowed for the lifetime of the tracer and
/// only ever read, so one tracer is shared by all sampling workers.
pub struct PathTracer<'a> {
    scene: &'a dyn Scene,
    catalog: &'a dyn MaterialCatalog,
    source: &'a Source,
    receiver: &'a Receiver,
    config: TraceConfig,
}

impl<'a> PathTracer<'a> {
    pub fn new(
        scene: &'a dyn Scene,
        catalog: &'a dyn MaterialCatalog,
        source: &'a Source,
        receiver: &'a Receiver,
        config: TraceConfig,
    ) -> Self {
        Self {
            scene,
            catalog,
            source,
            receiver,
            config,
        }
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    pub fn source(&self) -> &Source {
        self.source
    }

    pub fn receiver(&self) -> &Receiver {
        self.receiver
    }

    /// Follow one ray from its origin through specular reflections.
    ///
    /// The returned path starts at the ray origin, lists every reflection
    /// and ends at the receiver capture point.
    pub fn trace_ray(&self, ray: Ray) -> Result<Raypath, TraceFailure> {
        let mut path = Raypath::new();
        path.push(Intersection::endpoint(ray.origin()));

        let mut ray = ray;
        let mut order = 0;
        loop {
            // One scene query per segment serves both the receiver check and
            // the next bounce.
            let root = self.receiver_root(&ray);
            let hit = self.nearest_surface(&ray, root.map(|t| ray.distance_at(t)))?;

            if let Some(t) = Self::capture(&ray, root, hit.as_ref()) {
                path.push(Intersection::endpoint(ray.at(t)));
                return Ok(path);
            }

            if order >= self.config.max_order {
                return Err(TraceFailure::MaxOrder);
            }

            let hit = hit.ok_or(TraceFailure::Escaped)?;
            let normal = hit.surface.normal().ok_or(TraceFailure::UnsupportedSurface)?;
            let layer = self
                .catalog
                .lookup(hit.surface.group_name())
                .ok_or(TraceFailure::UnknownLayer)?;

            path.push(Intersection::surface(hit.point, layer));
            ray = Ray::new(hit.point, reflect(ray.direction(), normal));
            order += 1;
        }
    }

    /// Whether the receiver can be reached from the ray origin along the
    /// ray without anything solid in between.
    pub fn is_valid_receiver_hit(&self, ray: &Ray) -> bool {
        let root = self.receiver_root(ray);
        match self.nearest_surface(ray, root.map(|t| ray.distance_at(t))) {
            Ok(hit) => Self::capture(ray, root, hit.as_ref()).is_some(),
            Err(_) => false,
        }
    }

    /// Sample `ray_count` paths.
    ///
    /// What `ray_count` counts depends on the configured [`TargetKind`].
    pub fn find_paths(&self, ray_count: usize) -> TraceResult<Vec<Raypath>> {
        self.find_paths_with_stats(ray_count).map(|sampling| sampling.paths)
    }

    /// Like [`find_paths`](Self::find_paths), also returning attempt counts.
    pub fn find_paths_with_stats(&self, ray_count: usize) -> TraceResult<Sampling> {
        self.config.validate()?;
        let base_seed = self.config.seed.unwrap_or_else(rand::random);

        let sampling = match self.config.target_kind {
            TargetKind::SuccessfulHits => self.sample_hits(ray_count, base_seed)?,
            TargetKind::AttemptBudget => {
                // Equal hit and attempt shares make every batch spend exactly
                // its attempts unless all of them succeed.
                self.run_round(ray_count, ray_count as u64, 0, base_seed)
            }
        };

        info!(
            "Found {} paths in {} attempts ({} max order, {} escaped, {} other failures)",
            sampling.paths.len(),
            sampling.stats.attempts,
            sampling.stats.max_order,
            sampling.stats.escaped,
            sampling.stats.unsupported_surface
                + sampling.stats.unknown_layer
                + sampling.stats.marker_skip_limit
        );

        Ok(sampling)
    }

    fn sample_hits(&self, target: usize, base_seed: u64) -> TraceResult<Sampling> {
        let mut sampling = Sampling::default();
        let mut round = 0;

        while sampling.paths.len() < target {
            let remaining_attempts = self.config.max_attempts.saturating_sub(sampling.stats.attempts);
            if remaining_attempts == 0 {
                return Err(TraceError::SamplingExhausted {
                    found: sampling.paths.len(),
                    target,
                    attempts: sampling.stats.attempts,
                });
            }

            let remaining_hits = target - sampling.paths.len();
            let result = self.run_round(remaining_hits, remaining_attempts, round, base_seed);
            sampling.paths.extend(result.paths);
            sampling.stats.merge(&result.stats);
            round += 1;
        }

        Ok(sampling)
    }

    /// Trace one round of batches in parallel and concatenate the results
    /// in batch order.
    fn run_round(&self, hits: usize, attempts: u64, round: u64, base_seed: u64) -> Sampling {
        let batches = plan_round(hits, attempts, self.config.batch_size, round, base_seed);
        debug!("Round {}: {} batches for {} paths", round, batches.len(), hits);

        let results: Vec<_> = batches
            .into_par_iter()
            .map(|batch| run_batch(self, &batch))
            .collect();

        let mut sampling = Sampling::default();
        for result in results {
            sampling.paths.extend(result.paths);
            sampling.stats.merge(&result.stats);
        }
        sampling
    }

    /// Nearest non-marker surface along `ray`, re-casting past transparent
    /// markers from each marker hit in the same direction.
    ///
    /// With a `reach` (distance to the receiver capture point), a marker at
    /// or beyond it ends the search with no surface: nothing can lie nearer
    /// than the receiver any more. Only markers short of the receiver count
    /// toward the skip limit.
    fn nearest_surface(&self, ray: &Ray, reach: Option<f64>) -> Result<Option<SceneHit<'a>>, TraceFailure> {
        let scene = self.scene;
        let mut probe = *ray;
        for _ in 0..=self.config.max_marker_skips {
            match scene.cast_ray(&probe) {
                Some(hit) if hit.surface.kind() == SurfaceKind::TransparentMarker => {
                    if reach.is_some_and(|reach| hit.point.distance(ray.origin()) >= reach) {
                        return Ok(None);
                    }
                    probe = Ray::new(hit.point, ray.direction());
                }
                hit => return Ok(hit),
            }
        }
        Err(TraceFailure::MarkerSkipLimit)
    }

    /// Ray parameter where the configured receiver test meets the sphere.
    fn receiver_root(&self, ray: &Ray) -> Option<f64> {
        match self.config.receiver_test {
            ReceiverTest::Line => self.receiver.distance_to_intersection(ray).map(|roots| roots.nearest()),
            ReceiverTest::ForwardRay => self.receiver.forward_intersection(ray),
        }
    }

    /// The receiver root, unless a surface lies strictly closer. Ties go to
    /// the receiver.
    fn capture(ray: &Ray, root: Option<f64>, hit: Option<&SceneHit<'_>>) -> Option<f64> {
        let t = root?;
        match hit {
            Some(hit) if hit.point.distance(ray.origin()) < ray.distance_at(t) => None,
            _ => Some(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use aural_core::{Layer, Material, OctaveBand, Polygon, PolygonScene, Room, SamplingStrategy, SurfaceHandle, SURFACE_EPSILON};
    use aural_math::Vec3;

    // Infinite plane x = const facing -X
    struct PlaneScene {
        x: f64,
        kind: SurfaceKind,
    }

    impl PlaneScene {
        fn opaque(x: f64) -> Self {
            Self { x, kind: SurfaceKind::Opaque }
        }
    }

    impl Scene for PlaneScene {
        fn cast_ray(&self, ray: &Ray) -> Option<SceneHit<'_>> {
            if ray.direction().x == 0.0 {
                return None;
            }
            let t = (self.x - ray.origin().x) / ray.direction().x;
            if t <= SURFACE_EPSILON {
                return None;
            }
            let surface = match self.kind {
                SurfaceKind::Opaque => SurfaceHandle::opaque(Vec3::NEG_X, "wall"),
                SurfaceKind::TransparentMarker => SurfaceHandle::transparent_marker("guide"),
                SurfaceKind::Other => SurfaceHandle::other("text"),
            };
            Some(SceneHit {
                point: ray.at(t),
                surface,
            })
        }
    }

    // A stack of marker planes at x = 1, 2, ..., n
    struct MarkerStack {
        count: usize,
    }

    impl Scene for MarkerStack {
        fn cast_ray(&self, ray: &Ray) -> Option<SceneHit<'_>> {
            if ray.direction().x <= 0.0 {
                return None;
            }
            let next = ray.origin().x.floor() + 1.0;
            if next > self.count as f64 {
                return None;
            }
            let t = (next - ray.origin().x) / ray.direction().x;
            Some(SceneHit {
                point: ray.at(t),
                surface: SurfaceHandle::transparent_marker("guide"),
            })
        }
    }

    struct EmptyScene;

    impl Scene for EmptyScene {
        fn cast_ray(&self, _ray: &Ray) -> Option<SceneHit<'_>> {
            None
        }
    }

    fn room_with(layer: &str, alpha: f64) -> Room {
        let mut room = Room::new("test room");
        room.add_layer(Layer::new(layer, Arc::new(Material::new("test", 1, [alpha; 7], ""))));
        room
    }

    fn seeded(config: TraceConfig) -> TraceConfig {
        TraceConfig {
            seed: Some(1234),
            ..config
        }
    }

    // Axis-aligned box of opaque squares spanning -h..h
    fn box_scene(h: f64, layer: &str) -> PolygonScene {
        let mut scene = PolygonScene::new();
        for axis in 0..3 {
            for side in [-h, h] {
                let corners = [(-h, -h), (h, -h), (h, h), (-h, h)];
                let vertices = corners
                    .iter()
                    .map(|&(a, b)| {
                        let mut v = [0.0; 3];
                        v[axis] = side;
                        v[(axis + 1) % 3] = a;
                        v[(axis + 2) % 3] = b;
                        Vec3::from_array(v)
                    })
                    .collect();
                scene.add(Polygon::opaque(vertices, layer).unwrap());
            }
        }
        scene
    }

    #[test]
    fn test_receiver_wins_tie_with_surface() {
        let scene = PlaneScene::opaque(9.0);
        let room = room_with("wall", 0.5);
        let source = Source::new("s", Vec3::ZERO, 1.0);
        let receiver = Receiver::new("r", Vec3::new(10.0, 0.0, 0.0), 1.0).unwrap();
        let tracer = PathTracer::new(&scene, &room, &source, &receiver, TraceConfig::default());

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(tracer.is_valid_receiver_hit(&ray));

        let path = tracer.trace_ray(ray).unwrap();
        assert_eq!(path.order(), 0);
        assert_eq!(path.intersections()[1].point(), Vec3::new(9.0, 0.0, 0.0));
    }

    #[test]
    fn test_nearer_surface_forces_bounce() {
        let scene = PlaneScene::opaque(8.5);
        let room = room_with("wall", 0.5);
        let source = Source::new("s", Vec3::ZERO, 1.0);
        let receiver = Receiver::new("r", Vec3::new(10.0, 0.0, 0.0), 1.0).unwrap();
        let tracer = PathTracer::new(&scene, &room, &source, &receiver, TraceConfig::default());

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(!tracer.is_valid_receiver_hit(&ray));

        // Reflected back along -X the line test still sees the receiver. The
        // capture point sits at the unsigned near root along the new ray.
        let path = tracer.trace_ray(ray).unwrap();
        assert_eq!(path.order(), 1);
        assert_eq!(path.intersections()[1].point(), Vec3::new(8.5, 0.0, 0.0));
        assert_eq!(path.intersections()[2].point(), Vec3::new(8.0, 0.0, 0.0));
        assert_eq!(path.total_length(), 9.0);
        assert_eq!(path.arrival_energy(1.0, 1000).unwrap(), 0.5);
    }

    #[test]
    fn test_nearer_surface_with_zero_max_order_fails() {
        let scene = PlaneScene::opaque(8.5);
        let room = room_with("wall", 0.5);
        let source = Source::new("s", Vec3::ZERO, 1.0);
        let receiver = Receiver::new("r", Vec3::new(10.0, 0.0, 0.0), 1.0).unwrap();
        let config = TraceConfig {
            max_order: 0,
            ..Default::default()
        };
        let tracer = PathTracer::new(&scene, &room, &source, &receiver, config);

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(tracer.trace_ray(ray), Err(TraceFailure::MaxOrder));
    }

    #[test]
    fn test_forward_ray_test_ignores_receiver_behind() {
        let scene = PlaneScene::opaque(8.5);
        let room = room_with("wall", 0.5);
        let source = Source::new("s", Vec3::ZERO, 1.0);
        let receiver = Receiver::new("r", Vec3::new(10.0, 0.0, 0.0), 1.0).unwrap();
        let config = TraceConfig {
            receiver_test: ReceiverTest::ForwardRay,
            ..Default::default()
        };
        let tracer = PathTracer::new(&scene, &room, &source, &receiver, config);

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(tracer.trace_ray(ray), Err(TraceFailure::Escaped));
    }

    #[test]
    fn test_unknown_layer_fails_trace() {
        let scene = PlaneScene::opaque(5.0);
        let room = room_with("carpet", 0.5);
        let source = Source::new("s", Vec3::ZERO, 1.0);
        let receiver = Receiver::new("r", Vec3::new(10.0, 0.0, 0.0), 1.0).unwrap();
        let tracer = PathTracer::new(&scene, &room, &source, &receiver, TraceConfig::default());

        assert_eq!(
            tracer.trace_ray(Ray::new(Vec3::ZERO, Vec3::X)),
            Err(TraceFailure::UnknownLayer)
        );
    }

    #[test]
    fn test_other_surface_fails_trace() {
        let scene = PlaneScene {
            x: 5.0,
            kind: SurfaceKind::Other,
        };
        let room = room_with("wall", 0.5);
        let source = Source::new("s", Vec3::ZERO, 1.0);
        let receiver = Receiver::new("r", Vec3::new(10.0, 0.0, 0.0), 1.0).unwrap();
        let tracer = PathTracer::new(&scene, &room, &source, &receiver, TraceConfig::default());

        assert_eq!(
            tracer.trace_ray(Ray::new(Vec3::ZERO, Vec3::X)),
            Err(TraceFailure::UnsupportedSurface)
        );
    }

    #[test]
    fn test_markers_are_transparent() {
        let scene = MarkerStack { count: 5 };
        let room = room_with("wall", 0.5);
        let source = Source::new("s", Vec3::ZERO, 1.0);
        let receiver = Receiver::new("r", Vec3::new(10.0, 0.0, 0.0), 1.0).unwrap();
        let tracer = PathTracer::new(&scene, &room, &source, &receiver, TraceConfig::default());

        let path = tracer.trace_ray(Ray::new(Vec3::ZERO, Vec3::X)).unwrap();
        assert_eq!(path.order(), 0);
        assert!(path.is_complete());
    }

    #[test]
    fn test_marker_skip_limit() {
        let scene = MarkerStack { count: 5 };
        let room = room_with("wall", 0.5);
        let source = Source::new("s", Vec3::ZERO, 1.0);
        let receiver = Receiver::new("r", Vec3::new(10.0, 0.0, 0.0), 1.0).unwrap();
        let config = TraceConfig {
            max_marker_skips: 3,
            ..Default::default()
        };
        let tracer = PathTracer::new(&scene, &room, &source, &receiver, config);

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(tracer.trace_ray(ray), Err(TraceFailure::MarkerSkipLimit));
        assert!(!tracer.is_valid_receiver_hit(&ray));
    }

    #[test]
    fn test_markers_past_receiver_do_not_count() {
        // 100 markers, but only two lie in front of the receiver
        let scene = MarkerStack { count: 100 };
        let room = room_with("wall", 0.5);
        let source = Source::new("s", Vec3::ZERO, 1.0);
        let receiver = Receiver::new("r", Vec3::new(3.0, 0.0, 0.0), 0.5).unwrap();
        let tracer = PathTracer::new(&scene, &room, &source, &receiver, TraceConfig::default());

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(tracer.is_valid_receiver_hit(&ray));

        let path = tracer.trace_ray(ray).unwrap();
        assert_eq!(path.order(), 0);
        assert_eq!(path.intersections()[1].point(), Vec3::new(2.5, 0.0, 0.0));

        // Two skips are enough to get past the markers short of the receiver
        let config = TraceConfig {
            max_marker_skips: 2,
            ..Default::default()
        };
        let tracer = PathTracer::new(&scene, &room, &source, &receiver, config);
        assert!(tracer.trace_ray(ray).is_ok());
    }

    #[test]
    fn test_open_scene_finds_direct_paths() {
        let room = Room::new("empty");
        let source = Source::new("s", Vec3::ZERO, 1.0);
        let receiver = Receiver::new("r", Vec3::new(10.0, 0.0, 0.0), 5.0).unwrap();
        let tracer = PathTracer::new(&EmptyScene, &room, &source, &receiver, seeded(TraceConfig::default()));

        let paths = tracer.find_paths(5).unwrap();
        assert_eq!(paths.len(), 5);
        for path in &paths {
            assert_eq!(path.order(), 0);
            assert_eq!(path.len(), 2);
        }
    }

    #[test]
    fn test_fully_absorptive_room_silences_reflections() {
        let scene = box_scene(50.0, "absorber");
        let room = room_with("absorber", 1.0);
        let source = Source::new("s", Vec3::ZERO, 1.0);
        let receiver = Receiver::new("r", Vec3::new(20.0, 0.0, 0.0), 5.0).unwrap();
        let config = seeded(TraceConfig {
            max_order: 5,
            ..Default::default()
        });
        let tracer = PathTracer::new(&scene, &room, &source, &receiver, config);

        let paths = tracer.find_paths(50).unwrap();
        assert_eq!(paths.len(), 50);
        for path in paths.iter().filter(|p| p.order() > 0) {
            for band in OctaveBand::ALL {
                assert_eq!(path.arrival_energy(1.0, band.hz()).unwrap(), 0.0);
            }
        }
        for path in paths.iter().filter(|p| p.order() == 0) {
            assert_eq!(path.arrival_energy(1.0, 1000).unwrap(), 1.0);
        }
    }

    #[test]
    fn test_unreachable_receiver_exhausts_attempts() {
        let scene = box_scene(10.0, "walls");
        let room = room_with("walls", 0.1);
        let source = Source::new("s", Vec3::ZERO, 1.0);
        let receiver = Receiver::new("r", Vec3::new(100.0, 0.0, 0.0), 1.0).unwrap();
        let config = seeded(TraceConfig {
            max_order: 0,
            max_attempts: 500,
            ..Default::default()
        });
        let tracer = PathTracer::new(&scene, &room, &source, &receiver, config);

        match tracer.find_paths(10) {
            Err(TraceError::SamplingExhausted {
                found,
                target,
                attempts,
            }) => {
                assert_eq!(found, 0);
                assert_eq!(target, 10);
                assert_eq!(attempts, 500);
            }
            other => panic!("expected SamplingExhausted, got {other:?}"),
        }
    }

    #[test]
    fn test_paths_are_well_formed() {
        let _ = env_logger::builder().is_test(true).try_init();

        let scene = box_scene(20.0, "plaster");
        let room = room_with("plaster", 0.05);
        let source = Source::new("s", Vec3::new(-5.0, 2.0, 1.0), 1.0);
        let receiver = Receiver::new("r", Vec3::new(8.0, -3.0, 4.0), 2.0).unwrap();
        let config = seeded(TraceConfig {
            max_order: 15,
            batch_size: 16,
            ..Default::default()
        });
        let tracer = PathTracer::new(&scene, &room, &source, &receiver, config);

        let sampling = tracer.find_paths_with_stats(100).unwrap();
        assert_eq!(sampling.paths.len(), 100);
        assert_eq!(sampling.stats.successes, 100);
        assert!(sampling.paths.iter().any(|p| p.order() > 0));

        for path in &sampling.paths {
            assert!(path.len() >= 2);
            assert!(path.is_complete());
            assert_eq!(path.intersections()[0].point(), source.position());
            for hit in &path.intersections()[1..path.len() - 1] {
                assert_eq!(hit.layer().map(|l| l.name.as_str()), Some("plaster"));
            }
        }
    }

    #[test]
    fn test_attempt_budget_counts_rays() {
        let room = Room::new("empty");
        let source = Source::new("s", Vec3::ZERO, 1.0);
        let receiver = Receiver::new("r", Vec3::new(10.0, 0.0, 0.0), 2.0).unwrap();
        let config = seeded(TraceConfig {
            target_kind: TargetKind::AttemptBudget,
            batch_size: 32,
            ..Default::default()
        });
        let tracer = PathTracer::new(&EmptyScene, &room, &source, &receiver, config);

        let sampling = tracer.find_paths_with_stats(200).unwrap();
        assert_eq!(sampling.stats.attempts, 200);
        assert!(sampling.paths.len() < 200);
        assert_eq!(sampling.paths.len() as u64, sampling.stats.successes);
        assert_eq!(sampling.stats.escaped, sampling.stats.failures());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let scene = box_scene(20.0, "plaster");
        let room = room_with("plaster", 0.2);
        let source = Source::new("s", Vec3::ZERO, 1.0);
        let receiver = Receiver::new("r", Vec3::new(10.0, 5.0, 0.0), 2.0).unwrap();
        let config = seeded(TraceConfig {
            sampling: SamplingStrategy::UnitSphere,
            ..Default::default()
        });
        let tracer = PathTracer::new(&scene, &room, &source, &receiver, config);

        let first = tracer.find_paths(40).unwrap();
        let second = tracer.find_paths(40).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let room = Room::new("empty");
        let source = Source::new("s", Vec3::ZERO, 1.0);
        let receiver = Receiver::new("r", Vec3::new(10.0, 0.0, 0.0), 2.0).unwrap();
        let config = TraceConfig {
            batch_size: 0,
            ..Default::default()
        };
        let tracer = PathTracer::new(&EmptyScene, &room, &source, &receiver, config);

        assert!(matches!(tracer.find_paths(1), Err(TraceError::Acoustic(_))));
    }
}
