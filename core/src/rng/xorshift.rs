//! xorshift64* random number generator
//!
//! Fast, high-quality PRNG suitable for reproducible simulation runs.
//! Same seed → same sequence, which is what makes a stochastic run
//! replayable: the seed travels in the parameter document and two runs
//! with the same document produce identical trajectories.

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use beecs_core_rs::RngManager;
///
/// let mut rng = RngManager::new(42);
/// let raw = rng.next();
/// let p = rng.next_f64(); // [0.0, 1.0)
/// ```
#[derive(Debug, Clone)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new generator from a seed.
    ///
    /// A zero seed is mapped to a nonzero internal state (xorshift
    /// requires it), so seed 0 is valid and still deterministic.
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate the next random u64 value, advancing the internal state.
    pub fn next(&mut self) -> u64 {
        // xorshift64* algorithm
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate a random f64 in [0.0, 1.0).
    ///
    /// Used for sampling the per-individual transition probabilities.
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        // Take the top 53 bits so the result is an exact dyadic fraction
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Draw a single Bernoulli trial with success probability `p`.
    pub fn bernoulli(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Draw from Binomial(n, p): how many of `n` individuals undergo a
    /// transition with per-individual probability `p`.
    ///
    /// Implemented as `n` Bernoulli trials. Counts in this engine are
    /// colony-sized, so the linear cost is irrelevant next to the
    /// guarantee that the draw consumes a deterministic number of
    /// generator steps.
    ///
    /// # Example
    /// ```
    /// use beecs_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(7);
    /// let survivors = rng.binomial(1000, 0.95);
    /// assert!(survivors <= 1000);
    /// ```
    pub fn binomial(&mut self, n: u64, p: f64) -> u64 {
        if p <= 0.0 {
            return 0;
        }
        if p >= 1.0 {
            return n;
        }
        let mut successes = 0;
        for _ in 0..n {
            if self.bernoulli(p) {
                successes += 1;
            }
        }
        successes
    }

    /// Get current generator state (for replay from a known point).
    pub fn get_state(&self) -> u64 {
        self.state
    }
}
