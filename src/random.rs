use rand::Rng;

/// A source of uniform randomness
///
/// Agents take their randomness through this trait rather than reaching for
/// [`thread_rng`](rand::thread_rng), so callers can seed or script it. Every
/// [`rand::Rng`] is a `RandomSource`.
pub trait RandomSource {
    /// Uniform draw from `[0, 1)`
    fn next_f64(&mut self) -> f64;

    /// Uniform index from `0..n`
    ///
    /// **Panics** if `n == 0`
    fn next_index(&mut self, n: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn next_index(&mut self, n: usize) -> usize {
        self.gen_range(0..n)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    /// Replays fixed draws, then falls back to `0.0` / index `0`
    #[derive(Debug, Default)]
    pub struct Scripted {
        pub floats: VecDeque<f64>,
        pub indices: VecDeque<usize>,
    }

    impl Scripted {
        pub fn new(floats: &[f64], indices: &[usize]) -> Self {
            Self {
                floats: floats.iter().copied().collect(),
                indices: indices.iter().copied().collect(),
            }
        }
    }

    impl RandomSource for Scripted {
        fn next_f64(&mut self) -> f64 {
            self.floats.pop_front().unwrap_or(0.0)
        }

        fn next_index(&mut self, n: usize) -> usize {
            let ix = self.indices.pop_front().unwrap_or(0);
            assert!(ix < n, "scripted index {ix} out of range 0..{n}");
            ix
        }
    }

    #[test]
    fn rng_draws_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x), "float in [0, 1)");
            assert!(rng.next_index(4) < 4, "index in range");
        }
    }

    #[test]
    fn seeded_sources_repeat() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let xs: Vec<usize> = (0..16).map(|_| a.next_index(10)).collect();
        let ys: Vec<usize> = (0..16).map(|_| b.next_index(10)).collect();
        assert_eq!(xs, ys, "same seed gives same draws");
    }
}
