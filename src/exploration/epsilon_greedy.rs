use crate::{assert_interval, random::RandomSource};

use super::Choice;

/// Epsilon greedy exploration policy with a multiplicative, floored decay schedule
///
/// Epsilon only ever moves within `[min, 1]`: [`decay`](EpsilonGreedy::decay) never
/// increases it and never pushes it below `min`.
#[derive(Debug, Clone, PartialEq)]
pub struct EpsilonGreedy {
    epsilon: f64,
    min: f64,
    decay: f64,
}

impl EpsilonGreedy {
    /// Initialize epsilon greedy policy from start value, floor, and per-episode decay factor
    ///
    /// `start` is clamped into `[min, 1]`.
    ///
    /// **Panics** if `min` or `decay` is not in the interval `[0,1]`
    pub fn new(start: f64, min: f64, decay: f64) -> Self {
        assert_interval!(min, 0.0, 1.0);
        assert_interval!(decay, 0.0, 1.0);
        let mut policy = Self {
            epsilon: min,
            min,
            decay,
        };
        policy.set(start);
        policy
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    /// Explore with probability epsilon
    pub fn choose(&self, rng: &mut impl RandomSource) -> Choice {
        if rng.next_f64() < self.epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }

    /// Apply one step of the decay schedule
    pub fn decay(&mut self) {
        if self.epsilon > self.min {
            self.epsilon = (self.epsilon * self.decay).max(self.min);
        }
    }

    /// Override epsilon, clamped into `[min, 1]`
    pub fn set(&mut self, value: f64) {
        self.epsilon = value.clamp(self.min, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use crate::random::tests::Scripted;

    use super::*;

    #[test]
    fn decay_is_monotone_and_floored() {
        let mut policy = EpsilonGreedy::new(1.0, 0.05, 0.9);
        let mut prev = policy.epsilon();
        for _ in 0..200 {
            policy.decay();
            assert!(policy.epsilon() <= prev, "non-increasing");
            assert!(policy.epsilon() >= 0.05, "never below the floor");
            prev = policy.epsilon();
        }
        assert_eq!(policy.epsilon(), 0.05, "reaches the floor exactly");

        policy.decay();
        assert_eq!(policy.epsilon(), 0.05, "idempotent at the floor");
    }

    #[test]
    fn decay_single_step() {
        let mut policy = EpsilonGreedy::new(0.5, 0.1, 0.5);
        policy.decay();
        assert_eq!(policy.epsilon(), 0.25);
        policy.decay();
        assert_eq!(policy.epsilon(), 0.125);
        policy.decay();
        assert_eq!(policy.epsilon(), 0.1, "clamped to the floor");
    }

    #[test]
    #[should_panic]
    fn decay_factor_above_one() {
        EpsilonGreedy::new(0.5, 0.1, 1.5);
    }

    #[test]
    fn set_clamps() {
        let mut policy = EpsilonGreedy::new(1.0, 0.05, 0.99);
        policy.set(0.0);
        assert_eq!(policy.epsilon(), 0.05, "clamped up to the floor");
        policy.set(3.0);
        assert_eq!(policy.epsilon(), 1.0, "clamped down to one");
        policy.set(0.3);
        assert_eq!(policy.epsilon(), 0.3);
    }

    #[test]
    fn start_is_clamped() {
        assert_eq!(EpsilonGreedy::new(2.0, 0.1, 0.9).epsilon(), 1.0);
        assert_eq!(EpsilonGreedy::new(0.0, 0.1, 0.9).epsilon(), 0.1);
    }

    #[test]
    fn choose_compares_draw_against_epsilon() {
        let policy = EpsilonGreedy::new(0.3, 0.0, 1.0);
        let mut rng = Scripted::new(&[0.29, 0.3, 0.9], &[]);
        assert_eq!(policy.choose(&mut rng), Choice::Explore);
        assert_eq!(policy.choose(&mut rng), Choice::Exploit, "draw equal to epsilon exploits");
        assert_eq!(policy.choose(&mut rng), Choice::Exploit);
    }

    #[test]
    #[should_panic]
    fn floor_out_of_range() {
        EpsilonGreedy::new(1.0, 1.5, 0.9);
    }
}
