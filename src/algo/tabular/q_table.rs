use rand::{rngs::StdRng, SeedableRng};

use crate::{
    agent::Agent,
    ds::{TableSnapshot, ValueTable},
    env::{DiscreteAction, Environment},
    error::Result,
    exploration::{Choice, EpsilonGreedy},
    exp::Exp,
    random::RandomSource,
};

/// Configuration for the [`QTableAgent`]
#[derive(Debug, Clone, PartialEq)]
pub struct QTableAgentConfig {
    /// Learning rate α; not clamped, keeping it in `(0, 1]` is up to the caller
    ///
    /// **Default**: `0.1`
    pub alpha: f64,
    /// Discount factor γ; not clamped, keeping it in `(0, 1]` is up to the caller
    ///
    /// **Default**: `0.95`
    pub gamma: f64,
    /// Initial exploration rate
    ///
    /// **Default**: `1.0`
    pub epsilon: f64,
    /// Exploration floor
    ///
    /// **Default**: `0.05`
    pub epsilon_min: f64,
    /// Multiplicative exploration decay applied once per episode
    ///
    /// **Default**: `0.995`
    pub epsilon_decay: f64,
}

impl Default for QTableAgentConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.95,
            epsilon: 1.0,
            epsilon_min: 0.05,
            epsilon_decay: 0.995,
        }
    }
}

/// A Q-learning agent that keeps a dense value per state-action pair
///
/// States and actions are plain indices. Actions are picked epsilon-greedily, with ties
/// among the greedy actions broken uniformly at random, and values are learned with the
/// one-step Q-learning update
///
/// Q(s,a) ← Q(s,a) + α[r + γ max<sub>a'</sub> Q(s',a') - Q(s,a)]
///
/// ### Generics
/// - `R` - The [`RandomSource`] driving exploration and tie-breaking
pub struct QTableAgent<R = StdRng> {
    table: ValueTable,
    exploration: EpsilonGreedy,
    alpha: f64,
    gamma: f64,
    rng: R,
}

impl QTableAgent<StdRng> {
    /// Initialize a new agent with a zeroed table, seeded from system entropy
    ///
    /// **Panics** if `num_states` or `num_actions` is zero, or if the exploration
    /// settings are outside `[0,1]`
    pub fn new(num_states: usize, num_actions: usize, config: QTableAgentConfig) -> Self {
        Self::with_rng(num_states, num_actions, config, StdRng::from_entropy())
    }

    /// Like [`new`](Self::new), with a reproducible random stream
    pub fn with_seed(
        num_states: usize,
        num_actions: usize,
        config: QTableAgentConfig,
        seed: u64,
    ) -> Self {
        Self::with_rng(num_states, num_actions, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: RandomSource> QTableAgent<R> {
    /// Initialize a new agent that draws its randomness from `rng`
    pub fn with_rng(
        num_states: usize,
        num_actions: usize,
        config: QTableAgentConfig,
        rng: R,
    ) -> Self {
        Self {
            table: ValueTable::zeros(num_states, num_actions),
            exploration: EpsilonGreedy::new(
                config.epsilon,
                config.epsilon_min,
                config.epsilon_decay,
            ),
            alpha: config.alpha,
            gamma: config.gamma,
            rng,
        }
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    /// The learned values of every action in `state`
    pub fn q_values(&self, state: usize) -> &[f64] {
        self.table.row(state)
    }

    pub fn epsilon(&self) -> f64 {
        self.exploration.epsilon()
    }

    /// Pick an action index for `state`
    pub fn choose_action(&mut self, state: usize) -> usize {
        match self.exploration.choose(&mut self.rng) {
            Choice::Explore => self.rng.next_index(self.table.num_actions()),
            Choice::Exploit => self.greedy_action(state),
        }
    }

    /// One of the actions tied for the highest value in `state`, chosen uniformly
    fn greedy_action(&mut self, state: usize) -> usize {
        let max = self.table.max(state);
        let candidates: Vec<usize> = self
            .table
            .row(state)
            .iter()
            .enumerate()
            .filter(|&(_, &q)| q == max)
            .map(|(a, _)| a)
            .collect();
        candidates[self.rng.next_index(candidates.len())]
    }

    /// Apply the one-step Q-learning update to the `(state, action)` entry
    pub fn update(&mut self, state: usize, action: usize, reward: f64, next_state: usize) {
        let target = reward + self.gamma * self.table.max(next_state);
        let q = self.table.get_mut(state, action);
        *q += self.alpha * (target - *q);
    }

    /// Apply one step of the exploration decay schedule
    pub fn decay_epsilon(&mut self) {
        self.exploration.decay();
    }

    /// Override the exploration rate, clamped into `[epsilon_min, 1]`
    pub fn set_epsilon(&mut self, value: f64) {
        self.exploration.set(value);
    }

    pub fn snapshot(&self) -> TableSnapshot {
        self.table.snapshot()
    }

    /// Load a previously exported table; see [`ValueTable::restore`]
    pub fn restore(&mut self, snapshot: &TableSnapshot) -> Result<()> {
        self.table.restore(snapshot)
    }
}

impl<E, R> Agent<E> for QTableAgent<R>
where
    E: Environment<State = usize>,
    E::Action: DiscreteAction,
    R: RandomSource,
{
    fn act(&mut self, state: &usize) -> E::Action {
        <E::Action as DiscreteAction>::from_index(self.choose_action(*state))
    }

    fn learn(&mut self, exp: Exp<E>) {
        self.update(exp.state, exp.action.index(), exp.reward, exp.next_state);
    }

    fn end_episode(&mut self) {
        self.decay_epsilon();
    }

    fn exploration_rate(&self) -> Option<f64> {
        Some(self.epsilon())
    }
}
