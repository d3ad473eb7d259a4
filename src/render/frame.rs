use crate::foundation::core::FrameIndex;

/// Continuation handle for a render pass.
///
/// Carries the generation of the pass that scheduled it; a ticket whose
/// generation is no longer current is stale and must not draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PassTicket {
    pub generation: u64,
}

/// Per-frame callback scheduling.
///
/// A scheduled ticket runs exactly once, in the next frame.
pub trait FrameScheduler {
    fn schedule_next_frame(&mut self, ticket: PassTicket);
}

/// Single-threaded frame loop queue.
///
/// Tickets scheduled while frame `n` is being processed run in frame `n + 1`.
#[derive(Debug, Default)]
pub struct FrameQueue {
    frame: FrameIndex,
    pending: Vec<PassTicket>,
    callbacks_run: u64,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next frame to run.
    pub fn frame(&self) -> FrameIndex {
        self.frame
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Total tickets handed out by [`FrameQueue::begin_frame`] so far.
    pub fn callbacks_run(&self) -> u64 {
        self.callbacks_run
    }

    /// Start a frame: returns the tickets due now and advances the frame index.
    pub fn begin_frame(&mut self) -> (FrameIndex, Vec<PassTicket>) {
        let due = std::mem::take(&mut self.pending);
        let frame = self.frame;
        self.frame = self.frame.next();
        self.callbacks_run += due.len() as u64;
        (frame, due)
    }
}

impl FrameScheduler for FrameQueue {
    fn schedule_next_frame(&mut self, ticket: PassTicket) {
        self.pending.push(ticket);
    }
}
