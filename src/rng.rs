use rand::Rng;

/// Source of the game's few random decisions: whether an enemy fires this
/// tick, which enemy fires, and which flavor message to show.
///
/// Every `rand::Rng` is a `RandomSource`, so tests can pass a seeded
/// `StdRng` or a scripted implementation.
pub trait RandomSource {
    /// Returns true with probability `p`
    fn chance(&mut self, p: f64) -> bool;

    /// Picks an index uniformly from `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: Rng> RandomSource for R {
    fn chance(&mut self, p: f64) -> bool {
        self.random_bool(p.clamp(0.0, 1.0))
    }

    fn pick(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}
