use crate::{env::Environment, exp::Exp};

/// A learner that acts in and learns from an [`Environment`]
pub trait Agent<E>
where
    E: Environment,
{
    /// Choose the action to take in `state`
    fn act(&mut self, state: &E::State) -> E::Action;

    /// Learn from a single transition
    fn learn(&mut self, exp: Exp<E>);

    /// Called exactly once after every episode, however it ended
    fn end_episode(&mut self) {}

    /// Current exploration rate, if the agent has one
    fn exploration_rate(&self) -> Option<f64> {
        None
    }
}
