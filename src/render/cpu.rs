use crate::{
    foundation::{
        color::Hsl,
        core::{Canvas, FrameRGBA, Point, Rect},
        error::{WalkError, WalkResult},
    },
    render::surface::DrawingSurface,
};

/// CPU raster surface backed by `vello_cpu`.
///
/// Draw calls accumulate in a render context; [`CpuSurface::snapshot`]
/// rasterizes everything since the last full clear into a fresh pixmap.
pub struct CpuSurface {
    canvas: Canvas,
    width: u16,
    height: u16,
    background: Option<[u8; 4]>,
    stroke_width: f64,
    ctx: vello_cpu::RenderContext,
    path: vello_cpu::kurbo::BezPath,
    stroke_rgba: [u8; 4],
    strokes: usize,
}

impl CpuSurface {
    pub fn new(
        canvas: Canvas,
        background: Option<[u8; 4]>,
        stroke_width: f64,
    ) -> WalkResult<Self> {
        let Some((width, height)) = canvas.to_u16() else {
            return Err(WalkError::render(format!(
                "canvas {}x{} exceeds the u16 raster limit",
                canvas.width, canvas.height
            )));
        };
        let mut surface = Self {
            canvas,
            width,
            height,
            background,
            stroke_width,
            ctx: vello_cpu::RenderContext::new(width, height),
            path: vello_cpu::kurbo::BezPath::new(),
            stroke_rgba: [0, 0, 0, 255],
            strokes: 0,
        };
        surface.reset();
        Ok(surface)
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn background(&self) -> Option<[u8; 4]> {
        self.background
    }

    /// Strokes painted since the last full clear.
    pub fn stroke_count(&self) -> usize {
        self.strokes
    }

    /// Rasterize the current contents as premultiplied RGBA8.
    pub fn snapshot(&mut self) -> FrameRGBA {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn reset(&mut self) {
        self.ctx = vello_cpu::RenderContext::new(self.width, self.height);
        self.path = vello_cpu::kurbo::BezPath::new();
        self.strokes = 0;
        if let Some(bg) = self.background {
            let bounds = self.canvas.bounds();
            self.fill_rect(bounds, bg);
        }
    }

    fn fill_rect(&mut self, rect: Rect, [r, g, b, a]: [u8; 4]) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }
}

impl DrawingSurface for CpuSurface {
    fn clear(&mut self, region: Rect) {
        let bounds = self.canvas.bounds();
        let region = region.intersect(bounds);
        if region.area() <= 0.0 {
            return;
        }
        if region == bounds {
            self.reset();
            return;
        }
        match self.background {
            Some(bg) => self.fill_rect(region, bg),
            None => tracing::debug!(?region, "partial clear ignored on transparent surface"),
        }
    }

    fn begin_path(&mut self) {
        self.path = vello_cpu::kurbo::BezPath::new();
    }

    fn move_to(&mut self, p: Point) {
        self.path.move_to(point_to_cpu(p));
    }

    fn line_to(&mut self, p: Point) {
        if self.path.elements().is_empty() {
            self.path.move_to(point_to_cpu(p));
        } else {
            self.path.line_to(point_to_cpu(p));
        }
    }

    fn set_stroke_color(&mut self, color: Hsl) {
        self.stroke_rgba = color.to_rgba8();
    }

    fn stroke(&mut self) {
        if self.path.elements().is_empty() {
            return;
        }
        let [r, g, b, a] = self.stroke_rgba;
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_stroke(vello_cpu::kurbo::Stroke::new(self.stroke_width));
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        self.ctx.stroke_path(&self.path);
        self.strokes += 1;
    }

    fn bounds(&self) -> Rect {
        self.canvas.bounds()
    }
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke_line(s: &mut CpuSurface, a: Point, b: Point, hue: f64) {
        s.set_stroke_color(Hsl::vivid(hue));
        s.begin_path();
        s.move_to(a);
        s.line_to(b);
        s.stroke();
    }

    #[test]
    fn fresh_transparent_surface_is_blank() {
        let mut s = CpuSurface::new(Canvas::square(16), None, 1.0).unwrap();
        let f = s.snapshot();
        assert_eq!((f.width, f.height), (16, 16));
        assert_eq!(f.data.len(), 16 * 16 * 4);
        assert!(f.premultiplied);
        assert!(f.is_blank());
    }

    #[test]
    fn background_fills_every_pixel() {
        let mut s = CpuSurface::new(Canvas::square(8), Some([0, 0, 255, 255]), 1.0).unwrap();
        let f = s.snapshot();
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(f.pixel(x, y), Some([0, 0, 255, 255]));
            }
        }
    }

    #[test]
    fn stroke_paints_along_the_segment() {
        let mut s = CpuSurface::new(Canvas::square(32), None, 2.0).unwrap();
        stroke_line(&mut s, Point::new(4.0, 16.0), Point::new(28.0, 16.0), 0.0);
        assert_eq!(s.stroke_count(), 1);

        let f = s.snapshot();
        let [r, g, b, a] = f.pixel(16, 16).unwrap();
        assert!(a > 0);
        assert!(r > g && r > b);
        assert_eq!(f.pixel(16, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn full_clear_discards_strokes() {
        let mut s = CpuSurface::new(Canvas::square(32), None, 2.0).unwrap();
        stroke_line(&mut s, Point::new(4.0, 16.0), Point::new(28.0, 16.0), 120.0);
        let bounds = s.bounds();
        s.clear(bounds);
        assert_eq!(s.stroke_count(), 0);
        assert!(s.snapshot().is_blank());
    }

    #[test]
    fn partial_clear_repaints_only_the_region() {
        let white = [255, 255, 255, 255];
        let mut s = CpuSurface::new(Canvas::square(32), Some(white), 2.0).unwrap();
        stroke_line(&mut s, Point::new(4.0, 16.0), Point::new(28.0, 16.0), 0.0);
        s.clear(Rect::new(0.0, 0.0, 16.0, 32.0));
        assert_eq!(s.stroke_count(), 1);

        let f = s.snapshot();
        assert_eq!(f.pixel(8, 16), Some(white));
        let [r, g, b, a] = f.pixel(24, 16).unwrap();
        assert_eq!(a, 255);
        assert!(r > g && r > b);
        assert_eq!(f.pixel(24, 2), Some(white));
    }

    #[test]
    fn partial_clear_on_transparent_surface_is_ignored() {
        let mut s = CpuSurface::new(Canvas::square(32), None, 2.0).unwrap();
        stroke_line(&mut s, Point::new(4.0, 16.0), Point::new(28.0, 16.0), 0.0);
        let before = s.snapshot();
        s.clear(Rect::new(0.0, 0.0, 16.0, 32.0));

        let after = s.snapshot();
        assert!(after.pixel(8, 16).unwrap()[3] > 0);
        assert_eq!(after.data, before.data);
    }

    #[test]
    fn clear_outside_the_canvas_is_a_no_op() {
        let mut s = CpuSurface::new(Canvas::square(8), Some([0, 0, 255, 255]), 1.0).unwrap();
        stroke_line(&mut s, Point::new(0.0, 4.0), Point::new(8.0, 4.0), 240.0);
        s.clear(Rect::new(20.0, 20.0, 30.0, 30.0));
        assert_eq!(s.stroke_count(), 1);
    }

    #[test]
    fn stroke_without_geometry_is_ignored() {
        let mut s = CpuSurface::new(Canvas::square(8), None, 1.0).unwrap();
        s.begin_path();
        s.stroke();
        assert_eq!(s.stroke_count(), 0);
    }

    #[test]
    fn oversized_canvas_is_a_render_error() {
        let err = CpuSurface::new(Canvas::square(70_000), None, 1.0).err().unwrap();
        assert!(matches!(err, WalkError::Render(_)));
    }
}
