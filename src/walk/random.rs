/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource {
    fn uniform(&mut self) -> f64;
}

impl RandomSource for fastrand::Rng {
    fn uniform(&mut self) -> f64 {
        self.f64()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }
}

/// RNG for a session: seeded when `seed` is set, fresh entropy otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> fastrand::Rng {
    match seed {
        Some(s) => fastrand::Rng::with_seed(s),
        None => fastrand::Rng::new(),
    }
}

/// Replays a fixed list of samples, cycling when exhausted.
///
/// Useful for pinning exact angles in tests and demos.
#[derive(Clone, Debug)]
pub struct SequenceSource {
    samples: Vec<f64>,
    next: usize,
}

impl SequenceSource {
    pub fn new(samples: impl Into<Vec<f64>>) -> Self {
        Self {
            samples: samples.into(),
            next: 0,
        }
    }
}

impl RandomSource for SequenceSource {
    fn uniform(&mut self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let v = self.samples[self.next % self.samples.len()];
        self.next = self.next.wrapping_add(1);
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
