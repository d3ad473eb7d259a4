use crate::{
    config::WalkConfig,
    foundation::core::{FrameIndex, FrameRGBA},
    render::{
        cpu::CpuSurface,
        frame::FrameQueue,
        renderer::{FrameOutcome, RenderPass, Renderer},
        surface::DrawingSurface,
    },
    walk::{
        generator::Artwork,
        random::{RandomSource, rng_from_seed},
    },
};

/// What one turn of the frame loop did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: FrameIndex,
    /// Callbacks that ran this frame, stale ones included.
    pub callbacks: usize,
    pub segments: usize,
    pub stale: usize,
    /// The live pass completed during this frame.
    pub finished: bool,
}

/// State wiring between generation, the renderer and the frame loop.
///
/// Holds at most one live artwork. `generate` replaces it and restarts the
/// animation from an empty surface.
pub struct Studio<S: DrawingSurface, R: RandomSource = fastrand::Rng> {
    config: WalkConfig,
    rng: R,
    surface: Option<S>,
    renderer: Renderer,
    frames: FrameQueue,
    artwork: Option<Artwork>,
    generated: u64,
}

impl<S: DrawingSurface> Studio<S, fastrand::Rng> {
    /// Studio seeded from `config.seed` (fresh entropy when unset).
    pub fn from_config(config: WalkConfig) -> Self {
        let rng = rng_from_seed(config.seed);
        Self::new(config, rng)
    }
}

impl<S: DrawingSurface, R: RandomSource> Studio<S, R> {
    pub fn new(config: WalkConfig, rng: R) -> Self {
        Self {
            renderer: Renderer::new(config.batch_size),
            config,
            rng,
            surface: None,
            frames: FrameQueue::new(),
            artwork: None,
            generated: 0,
        }
    }

    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    pub fn artwork(&self) -> Option<&Artwork> {
        self.artwork.as_ref()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn pass(&self) -> Option<&RenderPass> {
        self.renderer.pass()
    }

    pub fn generation(&self) -> u64 {
        self.renderer.generation()
    }

    pub fn frame(&self) -> FrameIndex {
        self.frames.frame()
    }

    /// Total frame callbacks run since the studio was created.
    pub fn callbacks_run(&self) -> u64 {
        self.frames.callbacks_run()
    }

    /// No callbacks pending.
    pub fn is_idle(&self) -> bool {
        self.frames.is_idle()
    }

    /// Mount a surface and restart the current artwork on it.
    pub fn attach_surface(&mut self, surface: S) {
        self.surface = Some(surface);
        self.restart();
    }

    /// Unmount the surface. A pass in flight stops at its next frame.
    pub fn detach_surface(&mut self) -> Option<S> {
        self.surface.take()
    }

    /// Generate a new walk and start animating it.
    ///
    /// Only the first walk drawn from a seeded RNG is reproducible from the
    /// seed alone, so later generations carry no seed.
    pub fn generate(&mut self) -> &Artwork {
        let seed = if self.generated == 0 {
            self.config.seed
        } else {
            None
        };
        self.generated += 1;
        let artwork = Artwork::generate(&self.config, &mut self.rng).with_seed(seed);
        self.install(artwork)
    }

    /// Replace the live artwork and start a fresh pass for it.
    pub fn install(&mut self, artwork: Artwork) -> &Artwork {
        let artwork = self.artwork.insert(artwork);
        self.renderer.install(
            artwork.path.clone(),
            self.surface.as_mut(),
            &mut self.frames,
        );
        artwork
    }

    fn restart(&mut self) {
        let Some(artwork) = self.artwork.as_ref() else {
            return;
        };
        self.renderer.install(
            artwork.path.clone(),
            self.surface.as_mut(),
            &mut self.frames,
        );
    }

    /// Run every callback due in the next frame.
    pub fn run_frame(&mut self) -> FrameReport {
        let (frame, due) = self.frames.begin_frame();
        let mut report = FrameReport {
            frame,
            callbacks: due.len(),
            ..FrameReport::default()
        };
        for ticket in due {
            match self
                .renderer
                .on_frame(ticket, self.surface.as_mut(), &mut self.frames)
            {
                FrameOutcome::Drew { segments, finished } => {
                    report.segments += segments;
                    report.finished |= finished;
                }
                FrameOutcome::Stale => report.stale += 1,
                FrameOutcome::NoSurface => {}
            }
        }
        report
    }

    /// Frames the live pass still needs, plus one for stale tickets ahead of it.
    pub fn frames_remaining(&self) -> u64 {
        if self.is_idle() {
            return 0;
        }
        let Some(pass) = self.renderer.pass() else {
            return 1;
        };
        let left = pass.path().segment_count().saturating_sub(pass.cursor());
        (left.div_ceil(self.renderer.batch_size()) as u64).saturating_add(1)
    }

    /// Run the live pass to its end. Returns the number of frames run.
    pub fn finish_pass(&mut self) -> u64 {
        let budget = self.frames_remaining();
        self.run_until_idle(budget)
    }

    /// Run frames until nothing is scheduled or `max_frames` have run.
    ///
    /// Returns the number of frames run.
    pub fn run_until_idle(&mut self, max_frames: u64) -> u64 {
        let mut n = 0;
        while !self.is_idle() && n < max_frames {
            self.run_frame();
            n += 1;
        }
        n
    }
}

impl<R: RandomSource> Studio<CpuSurface, R> {
    /// Raster of the current surface contents, if a surface is attached.
    pub fn snapshot(&mut self) -> Option<FrameRGBA> {
        self.surface.as_mut().map(CpuSurface::snapshot)
    }

    /// Finish any pass in flight and return the completed raster.
    pub fn finished_raster(&mut self) -> Option<FrameRGBA> {
        self.finish_pass();
        self.snapshot()
    }
}
