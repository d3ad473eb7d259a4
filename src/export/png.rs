use std::path::Path;

use anyhow::Context as _;

use crate::foundation::{
    core::FrameRGBA,
    error::{WalkError, WalkResult},
};

/// Write `frame` as an RGBA PNG, un-premultiplying when needed.
#[tracing::instrument(skip(frame), fields(w = frame.width, h = frame.height))]
pub fn write_png(frame: &FrameRGBA, path: &Path) -> WalkResult<()> {
    let expected = (frame.width as usize) * (frame.height as usize) * 4;
    if frame.data.len() != expected {
        return Err(WalkError::export(format!(
            "frame.data has {} bytes, expected {expected}",
            frame.data.len()
        )));
    }

    ensure_parent_dir(path)?;

    let straight;
    let data = if frame.premultiplied {
        straight = unpremultiply_rgba8(&frame.data);
        straight.as_slice()
    } else {
        frame.data.as_slice()
    };

    image::save_buffer_with_format(
        path,
        data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

pub fn ensure_parent_dir(path: &Path) -> WalkResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

fn unpremultiply_rgba8(src: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len());
    for px in src.chunks_exact(4) {
        let a = px[3];
        if a == 0 {
            out.extend_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        if a == 255 {
            out.extend_from_slice(px);
            continue;
        }
        let a32 = u32::from(a);
        let un = |c: u8| ((u32::from(c) * 255 + a32 / 2) / a32).min(255) as u8;
        out.extend_from_slice(&[un(px[0]), un(px[1]), un(px[2]), a]);
    }
    out
}
