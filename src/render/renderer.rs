use std::sync::Arc;

use crate::{
    foundation::color::{Hsl, hue_for_cursor},
    render::{
        frame::{FrameScheduler, PassTicket},
        surface::DrawingSurface,
    },
    walk::generator::WalkPath,
};

/// One animation pass over a single path.
///
/// Owns the cursor for the lifetime of the pass. A new path always gets a new
/// pass; passes are never rewound.
#[derive(Clone, Debug)]
pub struct RenderPass {
    path: Arc<WalkPath>,
    cursor: usize,
    batch_size: usize,
    generation: u64,
    batches: u64,
}

impl RenderPass {
    pub fn new(path: Arc<WalkPath>, batch_size: usize, generation: u64) -> Self {
        Self {
            path,
            cursor: 0,
            batch_size: batch_size.max(1),
            generation,
            batches: 0,
        }
    }

    /// Index of the next segment to draw.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn path(&self) -> &Arc<WalkPath> {
        &self.path
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Batches drawn so far.
    pub fn batches(&self) -> u64 {
        self.batches
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.path.segment_count()
    }

    /// Fraction of segments drawn, `0..=1`.
    pub fn progress(&self) -> f64 {
        let total = self.path.segment_count();
        if total == 0 {
            return 1.0;
        }
        self.cursor as f64 / total as f64
    }

    /// Paint up to `batch_size` segments and advance the cursor.
    ///
    /// Returns the number of segments drawn.
    pub fn draw_batch<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> usize {
        let len = self.path.len();
        let mut drawn = 0;
        while drawn < self.batch_size {
            let Some((from, to)) = self.path.segment(self.cursor) else {
                break;
            };

            surface.set_stroke_color(Hsl::vivid(hue_for_cursor(self.cursor, len)));
            surface.begin_path();
            surface.move_to(from);
            surface.line_to(to);
            surface.stroke();

            self.cursor += 1;
            drawn += 1;
        }
        if drawn > 0 {
            self.batches += 1;
        }
        drawn
    }
}

/// What a frame callback did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Painted `segments` segments; `finished` when the pass is complete.
    Drew { segments: usize, finished: bool },
    /// Ticket belongs to a superseded pass; nothing drawn.
    Stale,
    /// No surface to draw on; the pass was dropped.
    NoSurface,
}

/// Incremental renderer: drives at most one live [`RenderPass`].
///
/// Every install bumps the generation, so continuations of older passes fail
/// their check and stop without drawing.
#[derive(Debug)]
pub struct Renderer {
    batch_size: usize,
    generation: u64,
    pass: Option<RenderPass>,
}

impl Renderer {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            generation: 0,
            pass: None,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pass(&self) -> Option<&RenderPass> {
        self.pass.as_ref()
    }

    /// True when no pass is in flight.
    pub fn is_idle(&self) -> bool {
        self.pass.as_ref().is_none_or(RenderPass::is_finished)
    }

    /// Start a pass over `path`, superseding any pass in flight.
    ///
    /// Clears the surface and schedules the first batch. An empty path or a
    /// missing surface installs nothing. Returns the scheduled ticket, if any.
    #[tracing::instrument(skip_all, fields(points = path.len()))]
    pub fn install<S, F>(
        &mut self,
        path: Arc<WalkPath>,
        surface: Option<&mut S>,
        scheduler: &mut F,
    ) -> Option<PassTicket>
    where
        S: DrawingSurface + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        self.generation += 1;
        self.pass = None;

        if path.is_empty() {
            return None;
        }
        let Some(surface) = surface else {
            tracing::debug!("no drawing surface; render pass skipped");
            return None;
        };

        let bounds = surface.bounds();
        surface.clear(bounds);

        let pass = RenderPass::new(path, self.batch_size, self.generation);
        let finished = pass.is_finished();
        self.pass = Some(pass);
        if finished {
            return None;
        }

        let ticket = PassTicket {
            generation: self.generation,
        };
        scheduler.schedule_next_frame(ticket);
        Some(ticket)
    }

    /// Frame callback for `ticket`: draw one batch and reschedule if unfinished.
    pub fn on_frame<S, F>(
        &mut self,
        ticket: PassTicket,
        surface: Option<&mut S>,
        scheduler: &mut F,
    ) -> FrameOutcome
    where
        S: DrawingSurface + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        if ticket.generation != self.generation || self.pass.is_none() {
            return FrameOutcome::Stale;
        }
        let Some(surface) = surface else {
            tracing::debug!(generation = ticket.generation, "surface gone; dropping pass");
            self.pass = None;
            return FrameOutcome::NoSurface;
        };
        let Some(pass) = self.pass.as_mut() else {
            return FrameOutcome::Stale;
        };

        let segments = pass.draw_batch(surface);
        let finished = pass.is_finished();
        if finished {
            tracing::debug!(
                generation = pass.generation(),
                batches = pass.batches(),
                "render pass complete"
            );
        } else {
            scheduler.schedule_next_frame(ticket);
        }
        FrameOutcome::Drew { segments, finished }
    }

    /// Invalidate the pass in flight without starting a new one.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pass = None;
    }
}
