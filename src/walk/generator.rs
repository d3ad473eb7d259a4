use std::{f64::consts::TAU, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    config::WalkConfig,
    foundation::core::{Point, Vec2},
    walk::random::RandomSource,
};

/// Ordered, immutable list of walk positions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalkPath {
    points: Vec<Point>,
}

impl WalkPath {
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of drawable line segments (`len - 1`, or zero).
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Endpoints of the segment starting at `index`.
    pub fn segment(&self, index: usize) -> Option<(Point, Point)> {
        let a = *self.points.get(index)?;
        let b = *self.points.get(index + 1)?;
        Some((a, b))
    }
}

/// Isotropic random walk with constant step length.
///
/// Starts at `origin`, takes `steps` steps in uniformly random directions and
/// records the position after each step. No clamping is applied, so the walk is
/// free to leave the canvas.
pub fn generate_walk<R: RandomSource + ?Sized>(
    steps: usize,
    origin: Point,
    step_length: f64,
    rng: &mut R,
) -> WalkPath {
    let mut pos = origin;
    let mut points = Vec::with_capacity(steps);
    for _ in 0..steps {
        let theta = rng.uniform() * TAU;
        pos += Vec2::from_angle(theta) * step_length;
        points.push(pos);
    }
    WalkPath { points }
}

/// Random hue offset in whole degrees `[0, 360)`.
pub fn draw_hue_offset<R: RandomSource + ?Sized>(rng: &mut R) -> u16 {
    ((rng.uniform() * 360.0).floor() as u16).min(359)
}

/// One generation: the walk plus the values drawn alongside it.
#[derive(Clone, Debug, PartialEq)]
pub struct Artwork {
    pub path: Arc<WalkPath>,
    /// Drawn once per generation and carried with the artwork. The stroke hue
    /// sweep does not read it; a new offset only marks a new generation.
    pub hue_offset: u16,
    pub seed: Option<u64>,
}

impl Artwork {
    /// Generate a walk centered on the configured canvas.
    #[tracing::instrument(skip(cfg, rng), fields(steps = cfg.steps))]
    pub fn generate<R: RandomSource + ?Sized>(cfg: &WalkConfig, rng: &mut R) -> Self {
        let path = generate_walk(cfg.steps, cfg.canvas.center(), cfg.step_length, rng);
        let hue_offset = draw_hue_offset(rng);
        tracing::debug!(points = path.len(), hue_offset, "generated walk");
        Self {
            path: Arc::new(path),
            hue_offset,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}
