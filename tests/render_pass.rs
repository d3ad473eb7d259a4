use std::sync::Arc;

use walkmint::{
    DrawCall, DrawingSurface, FrameOutcome, FrameQueue, Point, RecordingSurface, Rect, Renderer,
    WalkPath, generate_walk, hue_for_cursor,
};

fn canvas() -> Rect {
    Rect::new(0.0, 0.0, 400.0, 400.0)
}

fn walk(n: usize, seed: u64) -> Arc<WalkPath> {
    let mut rng = fastrand::Rng::with_seed(seed);
    Arc::new(generate_walk(n, Point::new(200.0, 200.0), 4.0, &mut rng))
}

/// Drive the frame loop until idle, collecting every outcome.
fn drain(
    renderer: &mut Renderer,
    queue: &mut FrameQueue,
    surface: &mut RecordingSurface,
) -> Vec<FrameOutcome> {
    let mut outcomes = Vec::new();
    while !queue.is_idle() {
        let (_, due) = queue.begin_frame();
        for ticket in due {
            outcomes.push(renderer.on_frame(ticket, Some(&mut *surface), &mut *queue));
        }
    }
    outcomes
}

#[test]
fn full_pass_takes_one_hundred_callbacks() {
    let mut renderer = Renderer::new(20);
    let mut queue = FrameQueue::new();
    let mut surface = RecordingSurface::new(canvas());

    renderer.install(walk(2000, 7), Some(&mut surface), &mut queue);
    let outcomes = drain(&mut renderer, &mut queue, &mut surface);

    assert_eq!(outcomes.len(), 100);
    assert_eq!(queue.callbacks_run(), 100);
    for (i, o) in outcomes.iter().enumerate() {
        let FrameOutcome::Drew { segments, finished } = *o else {
            panic!("callback {i} did not draw: {o:?}");
        };
        assert!(segments > 0);
        if i < 99 {
            assert_eq!(segments, 20);
            assert!(!finished);
        } else {
            assert_eq!(segments, 19);
            assert!(finished);
        }
    }
    assert_eq!(surface.strokes_since_clear(), 1999);
    assert_eq!(renderer.pass().unwrap().cursor(), 1999);
}

#[test]
fn cursor_advances_one_per_segment_and_stays_in_range() {
    let path = walk(97, 3);
    let mut renderer = Renderer::new(7);
    let mut queue = FrameQueue::new();
    let mut surface = RecordingSurface::new(canvas());
    renderer.install(path.clone(), Some(&mut surface), &mut queue);

    let mut prev = 0;
    while !queue.is_idle() {
        let (_, due) = queue.begin_frame();
        for ticket in due {
            let before = surface.strokes_since_clear();
            renderer.on_frame(ticket, Some(&mut surface), &mut queue);
            let drawn = surface.strokes_since_clear() - before;
            let cursor = renderer.pass().unwrap().cursor();
            assert_eq!(cursor, prev + drawn);
            assert!(cursor <= path.len() - 1);
            prev = cursor;
        }
    }
    assert_eq!(prev, path.len() - 1);
}

#[test]
fn segments_follow_the_path_in_order() {
    let path = walk(60, 11);
    let mut renderer = Renderer::new(20);
    let mut queue = FrameQueue::new();
    let mut surface = RecordingSurface::new(canvas());
    renderer.install(path.clone(), Some(&mut surface), &mut queue);
    drain(&mut renderer, &mut queue, &mut surface);

    let expected: Vec<(Point, Point)> = path
        .points()
        .windows(2)
        .map(|w| (w[0], w[1]))
        .collect();
    assert_eq!(surface.segments_since_clear(), expected);
}

#[test]
fn stroke_hue_sweeps_from_zero_to_below_full_circle() {
    let path = walk(2000, 5);
    let mut renderer = Renderer::new(20);
    let mut queue = FrameQueue::new();
    let mut surface = RecordingSurface::new(canvas());
    renderer.install(path, Some(&mut surface), &mut queue);
    drain(&mut renderer, &mut queue, &mut surface);

    let hues: Vec<f64> = surface
        .calls()
        .iter()
        .filter_map(|c| match c {
            DrawCall::StrokeColor(h) => Some(h.h),
            _ => None,
        })
        .collect();
    assert_eq!(hues.len(), 1999);
    assert_eq!(hues[0], 0.0);
    assert!(hues.windows(2).all(|w| w[1] > w[0]));
    assert_eq!(*hues.last().unwrap(), hue_for_cursor(1998, 2000));
    assert!(hue_for_cursor(1999, 2000) < 360.0);

    for c in surface.calls() {
        if let DrawCall::StrokeColor(h) = c {
            assert_eq!((h.s, h.l), (1.0, 0.5));
        }
    }
}

#[test]
fn new_path_mid_pass_clears_and_restarts() {
    let old = walk(2000, 1);
    let new = walk(2000, 2);
    let mut renderer = Renderer::new(20);
    let mut queue = FrameQueue::new();
    let mut surface = RecordingSurface::new(canvas());

    renderer.install(old, Some(&mut surface), &mut queue);
    for _ in 0..10 {
        let (_, due) = queue.begin_frame();
        for ticket in due {
            renderer.on_frame(ticket, Some(&mut surface), &mut queue);
        }
    }
    assert_eq!(renderer.pass().unwrap().cursor(), 200);

    // The old continuation is still queued when the new path arrives.
    assert_eq!(queue.pending(), 1);
    renderer.install(new.clone(), Some(&mut surface), &mut queue);
    assert_eq!(renderer.pass().unwrap().cursor(), 0);
    assert_eq!(surface.calls().last(), Some(&DrawCall::Clear(surface.bounds())));

    let outcomes = drain(&mut renderer, &mut queue, &mut surface);
    assert_eq!(outcomes[0], FrameOutcome::Stale);
    assert_eq!(outcomes.iter().filter(|o| **o == FrameOutcome::Stale).count(), 1);

    let expected: Vec<(Point, Point)> = new
        .points()
        .windows(2)
        .map(|w| (w[0], w[1]))
        .collect();
    assert_eq!(surface.segments_since_clear(), expected);
}
