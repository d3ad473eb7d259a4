use serde::{Deserialize, Serialize};

/// Hue/saturation/lightness color.
///
/// `h` is in degrees (any value, wrapped into `[0, 360)` on conversion), `s` and
/// `l` are normalized to `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Fully saturated, mid-lightness color at `hue` degrees.
    pub fn vivid(hue: f64) -> Self {
        Self::new(hue, 1.0, 0.5)
    }

    /// Straight (non-premultiplied) opaque RGBA8.
    pub fn to_rgba8(self) -> [u8; 4] {
        let [r, g, b] = hsl_to_rgb(self.h, self.s, self.l);
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [to_u8(r), to_u8(g), to_u8(b), 255]
    }
}

/// Stroke hue for the segment starting at `cursor` of a path with `len` points.
///
/// Sweeps the color wheel once over the path: 0 at the first segment, strictly
/// below 360 at the last.
pub fn hue_for_cursor(cursor: usize, len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    (cursor as f64 / len as f64) * 360.0
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [f64; 3] {
    // Standard HSL -> RGB conversion (sRGB space, normalized 0..1 inputs).
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return [l, l, l];
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    [
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    ]
}
