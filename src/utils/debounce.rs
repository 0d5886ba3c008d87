use embassy_time::{Duration, Instant};

/// Filters a noisy input: a new value is only accepted once every sample
/// for `delay` agreed on it.
#[derive(Debug, Copy, Clone)]
pub struct Debounce<T> {
    stable: T,
    candidate: T,
    candidate_since: Instant,
    delay: Duration,
}

impl<T> Debounce<T> where T: Copy + PartialEq<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            stable: initial,
            candidate: initial,
            candidate_since: Instant::now(),
            delay,
        }
    }

    /// Feed one sample. Returns the new stable value when it changes.
    pub fn update(&mut self, sample: T) -> Option<T> {
        let now = Instant::now();

        if sample != self.candidate {
            self.candidate = sample;
            self.candidate_since = now;

            return None;
        }

        if self.candidate != self.stable && now.duration_since(self.candidate_since) >= self.delay {
            self.stable = sample;

            return Some(sample);
        }

        None
    }
}
