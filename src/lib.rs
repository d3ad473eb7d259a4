//! walkmint renders animated random-walk artwork and exports it for minting.
//!
//! # Pipeline overview
//!
//! 1. **Generate**: `WalkConfig + RandomSource -> Artwork` (an isotropic, constant-step
//!    random walk starting at the canvas center)
//! 2. **Animate**: the `Renderer` paints the walk in fixed-size batches, one batch per
//!    frame callback, with the stroke hue sweeping the color wheel over the path
//! 3. **Export**: the finished raster becomes a PNG plus ERC-721 metadata, or the whole
//!    animation is streamed to the system `ffmpeg` binary as MP4
//!
//! Everything runs on one thread. [`Studio`] owns the frame loop; each new
//! generation supersedes the pass in flight through a generation counter.
#![forbid(unsafe_code)]

mod config;
mod export;
mod foundation;
mod render;
mod session;
mod walk;

pub use config::{
    DEFAULT_BATCH_SIZE, DEFAULT_CANVAS_SIZE, DEFAULT_FPS, DEFAULT_STEP_LENGTH, DEFAULT_STEPS,
    WalkConfig,
};
pub use export::metadata::{TOKEN_DESCRIPTION, TOKEN_NAME, TokenAttribute, TokenMetadata};
pub use export::png::{ensure_parent_dir, write_png};
pub use export::video::{VideoStats, ffmpeg_available, record_mp4};
pub use foundation::color::{Hsl, hue_for_cursor};
pub use foundation::core::{Canvas, FrameIndex, FrameRGBA, Point, Rect, Vec2};
pub use foundation::error::{WalkError, WalkResult};
pub use render::cpu::CpuSurface;
pub use render::frame::{FrameQueue, FrameScheduler, PassTicket};
pub use render::renderer::{FrameOutcome, RenderPass, Renderer};
pub use render::surface::{DrawCall, DrawingSurface, RecordingSurface};
pub use session::studio::{FrameReport, Studio};
pub use walk::generator::{Artwork, WalkPath, draw_hue_offset, generate_walk};
pub use walk::random::{RandomSource, SequenceSource, rng_from_seed};
