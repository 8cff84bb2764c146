/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time, episodic MDP with
/// one agent. Episodes end either when [`step`](Environment::step) reports `done` or
/// when the driver gives up (step cap, cancellation).
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State: Clone;

    /// A representation of an action that an agent can take to affect the environment
    type Action: Copy;

    /// Reset the environment to an initial state
    ///
    /// **Returns** the state
    fn reset(&mut self) -> Self::State;

    /// Update the environment in response to an action taken by an agent, producing a new state and associated reward
    ///
    /// **Returns** `(next_state, reward, done)`
    fn step(&mut self, action: Self::Action) -> (Self::State, f64, bool);

    /// Whether the episode that just ended counts as a success
    fn is_success(&self) -> bool;
}

/// A closed, finite action set whose members map onto dense indices `0..COUNT`
///
/// Tabular agents store one value per index, so the mapping must be a bijection.
pub trait DiscreteAction: Copy {
    /// Number of actions in the set
    const COUNT: usize;

    /// Index of this action in `0..COUNT`
    fn index(self) -> usize;

    /// Action at `index`
    ///
    /// **Panics** if `index >= COUNT`
    fn from_index(index: usize) -> Self;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A corridor of `len` cells; action `1` moves right, anything else stays put
    pub struct MockEnv {
        pub len: usize,
        pub pos: usize,
    }

    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct MockAction(pub usize);

    impl DiscreteAction for MockAction {
        const COUNT: usize = 2;

        fn index(self) -> usize {
            self.0
        }

        fn from_index(index: usize) -> Self {
            assert!(index < Self::COUNT, "action index {index} out of range");
            Self(index)
        }
    }

    impl Environment for MockEnv {
        type State = usize;
        type Action = MockAction;

        fn reset(&mut self) -> Self::State {
            self.pos = 0;
            self.pos
        }

        fn step(&mut self, action: Self::Action) -> (Self::State, f64, bool) {
            if action.0 == 1 {
                self.pos += 1;
            }
            let done = self.pos + 1 == self.len;
            (self.pos, if done { 1.0 } else { 0.0 }, done)
        }

        fn is_success(&self) -> bool {
            self.pos + 1 == self.len
        }
    }

    #[test]
    fn mock_env_reaches_end() {
        let mut env = MockEnv { len: 3, pos: 0 };
        assert_eq!(env.reset(), 0);
        assert_eq!(env.step(MockAction(0)), (0, 0.0, false), "stay action");
        assert_eq!(env.step(MockAction(1)), (1, 0.0, false), "move action");
        assert_eq!(env.step(MockAction(1)), (2, 1.0, true), "terminal step");
        assert!(env.is_success());
    }
}
