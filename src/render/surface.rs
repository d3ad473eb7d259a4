use crate::foundation::{
    color::Hsl,
    core::{Point, Rect},
};

/// Immediate-mode 2-D drawing target.
///
/// Mirrors the subset of a canvas 2-D context the renderer needs. Calls are
/// infallible; a surface that cannot draw should drop the call.
pub trait DrawingSurface {
    fn clear(&mut self, region: Rect);
    fn begin_path(&mut self);
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    fn set_stroke_color(&mut self, color: Hsl);
    fn stroke(&mut self);

    /// Full drawable area; `clear(self.bounds())` wipes everything.
    fn bounds(&self) -> Rect;
}

impl<S: DrawingSurface + ?Sized> DrawingSurface for &mut S {
    fn clear(&mut self, region: Rect) {
        (**self).clear(region)
    }
    fn begin_path(&mut self) {
        (**self).begin_path()
    }
    fn move_to(&mut self, p: Point) {
        (**self).move_to(p)
    }
    fn line_to(&mut self, p: Point) {
        (**self).line_to(p)
    }
    fn set_stroke_color(&mut self, color: Hsl) {
        (**self).set_stroke_color(color)
    }
    fn stroke(&mut self) {
        (**self).stroke()
    }
    fn bounds(&self) -> Rect {
        (**self).bounds()
    }
}

/// One recorded surface call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Clear(Rect),
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    StrokeColor(Hsl),
    Stroke,
}

/// Surface that records every call instead of rasterizing.
///
/// Handy for headless inspection of what a render pass emits.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    bounds: Rect,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of `stroke()` calls since the last full clear.
    pub fn strokes_since_clear(&self) -> usize {
        let start = self
            .calls
            .iter()
            .rposition(|c| matches!(c, DrawCall::Clear(r) if *r == self.bounds))
            .map(|i| i + 1)
            .unwrap_or(0);
        self.calls[start..]
            .iter()
            .filter(|c| matches!(c, DrawCall::Stroke))
            .count()
    }

    /// Segments `(from, to)` stroked since the last full clear, in order.
    pub fn segments_since_clear(&self) -> Vec<(Point, Point)> {
        let start = self
            .calls
            .iter()
            .rposition(|c| matches!(c, DrawCall::Clear(r) if *r == self.bounds))
            .map(|i| i + 1)
            .unwrap_or(0);

        let mut out = Vec::new();
        let mut from = None;
        let mut to = None;
        for call in &self.calls[start..] {
            match call {
                DrawCall::BeginPath => {
                    from = None;
                    to = None;
                }
                DrawCall::MoveTo(p) => from = Some(*p),
                DrawCall::LineTo(p) => to = Some(*p),
                DrawCall::Stroke => {
                    if let (Some(a), Some(b)) = (from, to) {
                        out.push((a, b));
                    }
                }
                DrawCall::Clear(_) | DrawCall::StrokeColor(_) => {}
            }
        }
        out
    }
}

impl DrawingSurface for RecordingSurface {
    fn clear(&mut self, region: Rect) {
        self.calls.push(DrawCall::Clear(region));
    }
    fn begin_path(&mut self) {
        self.calls.push(DrawCall::BeginPath);
    }
    fn move_to(&mut self, p: Point) {
        self.calls.push(DrawCall::MoveTo(p));
    }
    fn line_to(&mut self, p: Point) {
        self.calls.push(DrawCall::LineTo(p));
    }
    fn set_stroke_color(&mut self, color: Hsl) {
        self.calls.push(DrawCall::StrokeColor(color));
    }
    fn stroke(&mut self) {
        self.calls.push(DrawCall::Stroke);
    }
    fn bounds(&self) -> Rect {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke_line(s: &mut impl DrawingSurface, a: Point, b: Point) {
        s.begin_path();
        s.move_to(a);
        s.line_to(b);
        s.stroke();
    }

    #[test]
    fn segments_reset_on_full_clear_only() {
        let bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
        let mut s = RecordingSurface::new(bounds);
        stroke_line(&mut s, Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        s.clear(Rect::new(0.0, 0.0, 1.0, 1.0));
        stroke_line(&mut s, Point::new(1.0, 1.0), Point::new(2.0, 2.0));
        assert_eq!(s.strokes_since_clear(), 2);

        s.clear(bounds);
        stroke_line(&mut s, Point::new(5.0, 5.0), Point::new(6.0, 6.0));
        assert_eq!(
            s.segments_since_clear(),
            vec![(Point::new(5.0, 5.0), Point::new(6.0, 6.0))]
        );
    }

    #[test]
    fn forwards_through_mut_ref() {
        fn drive(mut surface: impl DrawingSurface) {
            surface.begin_path();
            surface.stroke();
        }

        let mut s = RecordingSurface::new(Rect::new(0.0, 0.0, 1.0, 1.0));
        drive(&mut s);
        assert_eq!(s.calls(), &[DrawCall::BeginPath, DrawCall::Stroke]);
        assert_eq!(s.take_calls().len(), 2);
        assert!(s.calls().is_empty());
    }
}
