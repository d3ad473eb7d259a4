use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::Canvas,
    error::{WalkError, WalkResult},
};

pub const DEFAULT_CANVAS_SIZE: u32 = 400;
pub const DEFAULT_STEPS: usize = 2000;
pub const DEFAULT_STEP_LENGTH: f64 = 4.0;
pub const DEFAULT_BATCH_SIZE: usize = 20;
pub const DEFAULT_FPS: u32 = 60;

/// Everything needed to generate, animate and export one walk.
///
/// Deserializes from JSON; missing fields fall back to [`WalkConfig::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WalkConfig {
    pub canvas: Canvas,
    pub steps: usize,
    pub step_length: f64,
    /// Segments painted per frame callback.
    pub batch_size: usize,
    pub stroke_width: f64,
    /// Straight RGBA8 background. `None` keeps the canvas transparent.
    pub background: Option<[u8; 4]>,
    pub fps: u32,
    /// Fixed seed for reproducible walks. `None` draws fresh entropy.
    pub seed: Option<u64>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::square(DEFAULT_CANVAS_SIZE),
            steps: DEFAULT_STEPS,
            step_length: DEFAULT_STEP_LENGTH,
            batch_size: DEFAULT_BATCH_SIZE,
            stroke_width: 1.0,
            background: None,
            fps: DEFAULT_FPS,
            seed: None,
        }
    }
}

impl WalkConfig {
    pub fn validate(&self) -> WalkResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(WalkError::validation("canvas width/height must be non-zero"));
        }
        if self.canvas.to_u16().is_none() {
            return Err(WalkError::validation("canvas width/height must fit in u16"));
        }
        if self.steps == 0 {
            return Err(WalkError::validation("steps must be >= 1"));
        }
        if !self.step_length.is_finite() || self.step_length <= 0.0 {
            return Err(WalkError::validation("step_length must be finite and > 0"));
        }
        if self.batch_size == 0 {
            return Err(WalkError::validation("batch_size must be >= 1"));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(WalkError::validation("stroke_width must be finite and > 0"));
        }
        if self.fps == 0 {
            return Err(WalkError::validation("fps must be non-zero"));
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> WalkResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    #[tracing::instrument]
    pub fn from_json_file(path: &Path) -> WalkResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| WalkError::serde(format!("parse config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
