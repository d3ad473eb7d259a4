use std::{
    io::Write as _,
    path::Path,
    process::{Child, ChildStdin, Command, Stdio},
};

use crate::{
    config::WalkConfig,
    export::png::ensure_parent_dir,
    foundation::{
        core::FrameRGBA,
        error::{WalkError, WalkResult},
    },
    render::cpu::CpuSurface,
    session::studio::Studio,
    walk::random::RandomSource,
};

/// Flattening color when the walk is drawn on a transparent canvas.
const VIDEO_MATTE: [u8; 3] = [0, 0, 0];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VideoStats {
    /// Frame callbacks run while recording.
    pub animation_frames: u64,
    /// Frames written to the video, held tail included.
    pub video_frames: u64,
}

/// `ffmpeg -version` runs successfully.
pub fn ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

/// Record the studio's live pass to H.264 MP4 at `config.fps`.
///
/// Each frame callback becomes one video frame, then the finished raster is
/// repeated `hold_frames` times. With nothing animating, the current raster
/// is written once so the video is never empty.
#[tracing::instrument(skip(studio))]
pub fn record_mp4<R: RandomSource>(
    studio: &mut Studio<CpuSurface, R>,
    out: &Path,
    hold_frames: u32,
) -> WalkResult<VideoStats> {
    let Some(surface) = studio.surface() else {
        return Err(WalkError::validation("recording needs an attached surface"));
    };
    let matte = match surface.background() {
        Some([r, g, b, _]) => [r, g, b],
        None => VIDEO_MATTE,
    };
    let mut sink = Rgb24Pipe::spawn(studio.config(), matte, out)?;

    let mut stats = VideoStats::default();
    let budget = studio.frames_remaining();
    while !studio.is_idle() && stats.animation_frames < budget {
        studio.run_frame();
        stats.animation_frames += 1;
        if let Some(frame) = studio.snapshot() {
            sink.push(&frame)?;
        }
    }
    if sink.frames == 0
        && let Some(frame) = studio.snapshot()
    {
        sink.push(&frame)?;
    }
    sink.hold(hold_frames)?;

    stats.video_frames = sink.frames;
    sink.close()?;
    tracing::info!(
        animation_frames = stats.animation_frames,
        video_frames = stats.video_frames,
        "wrote {}",
        out.display()
    );
    Ok(stats)
}

fn check_video_canvas(cfg: &WalkConfig) -> WalkResult<()> {
    let (w, h) = (cfg.canvas.width, cfg.canvas.height);
    // yuv420p subsamples chroma 2x2.
    if !w.is_multiple_of(2) || !h.is_multiple_of(2) {
        return Err(WalkError::validation(format!(
            "mp4 output needs an even canvas, got {w}x{h}"
        )));
    }
    Ok(())
}

/// Opaque RGB24 frames piped into an `ffmpeg` child.
struct Rgb24Pipe {
    child: Child,
    stdin: Option<ChildStdin>,
    width: u32,
    height: u32,
    matte: [u8; 3],
    /// Last flattened frame; re-sent for the held tail.
    rgb: Vec<u8>,
    frames: u64,
}

impl Rgb24Pipe {
    fn spawn(cfg: &WalkConfig, matte: [u8; 3], out: &Path) -> WalkResult<Self> {
        check_video_canvas(cfg)?;
        ensure_parent_dir(out)?;

        let size = format!("{}x{}", cfg.canvas.width, cfg.canvas.height);
        let rate = cfg.fps.to_string();
        let mut child = Command::new("ffmpeg")
            .args(["-y", "-loglevel", "error", "-f", "rawvideo"])
            .args(["-pixel_format", "rgb24", "-video_size", &size])
            .args(["-framerate", &rate, "-i", "-", "-an"])
            .args(["-c:v", "libx264", "-pix_fmt", "yuv420p"])
            .arg(out)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| WalkError::export(format!("cannot start ffmpeg: {e}")))?;
        let stdin = child.stdin.take();
        tracing::debug!(%size, %rate, "ffmpeg started");

        Ok(Self {
            child,
            stdin,
            width: cfg.canvas.width,
            height: cfg.canvas.height,
            matte,
            rgb: Vec::new(),
            frames: 0,
        })
    }

    fn push(&mut self, frame: &FrameRGBA) -> WalkResult<()> {
        if (frame.width, frame.height) != (self.width, self.height) {
            return Err(WalkError::export(format!(
                "frame is {}x{}, video is {}x{}",
                frame.width, frame.height, self.width, self.height
            )));
        }
        flatten_premul_to_rgb(&frame.data, self.matte, &mut self.rgb);
        self.send()
    }

    fn hold(&mut self, n: u32) -> WalkResult<()> {
        if self.rgb.is_empty() {
            return Ok(());
        }
        for _ in 0..n {
            self.send()?;
        }
        Ok(())
    }

    fn send(&mut self) -> WalkResult<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| WalkError::export("ffmpeg stdin is closed"))?;
        stdin
            .write_all(&self.rgb)
            .map_err(|e| WalkError::export(format!("write frame {}: {e}", self.frames)))?;
        self.frames += 1;
        Ok(())
    }

    fn close(mut self) -> WalkResult<()> {
        drop(self.stdin.take());
        let output = self
            .child
            .wait_with_output()
            .map_err(|e| WalkError::export(format!("wait for ffmpeg: {e}")))?;
        if !output.status.success() {
            return Err(WalkError::export(format!(
                "ffmpeg failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

/// Composite premultiplied RGBA8 over an opaque matte into packed RGB8.
fn flatten_premul_to_rgb(premul: &[u8], matte: [u8; 3], rgb: &mut Vec<u8>) {
    rgb.clear();
    rgb.reserve(premul.len() / 4 * 3);
    for px in premul.chunks_exact(4) {
        let cover = 255 - u32::from(px[3]);
        for (c, m) in px[..3].iter().zip(matte) {
            let under = (u32::from(m) * cover + 127) / 255;
            rgb.push((u32::from(*c) + under).min(255) as u8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Canvas;

    #[test]
    fn flatten_keeps_opaque_and_fills_transparent() {
        let premul = [10, 20, 30, 255, 0, 0, 0, 0];
        let mut rgb = Vec::new();
        flatten_premul_to_rgb(&premul, [200, 100, 50], &mut rgb);
        assert_eq!(rgb, vec![10, 20, 30, 200, 100, 50]);
    }

    #[test]
    fn flatten_blends_half_coverage_over_the_matte() {
        // Half-covered red over white.
        let premul = [128, 0, 0, 128];
        let mut rgb = vec![9; 12];
        flatten_premul_to_rgb(&premul, [255, 255, 255], &mut rgb);
        assert_eq!(rgb, vec![255, 127, 127]);
    }

    #[test]
    fn odd_canvas_is_rejected() {
        let odd = WalkConfig {
            canvas: Canvas {
                width: 64,
                height: 63,
            },
            ..WalkConfig::default()
        };
        let err = check_video_canvas(&odd).unwrap_err();
        assert!(matches!(err, WalkError::Validation(_)));
        check_video_canvas(&WalkConfig::default()).unwrap();
    }
}
